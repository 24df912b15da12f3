use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::intake::models::IntakePath;
use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_STRATEGY_MAX_OUTPUT_TOKENS: u32 = 6000;
const DEFAULT_LOOKUP_MAX_OUTPUT_TOKENS: u32 = 3500;

/// Per-path output bounds. The strategy path also renders the report sections,
/// so its bound must be the larger of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLimits {
    pub strategy: u32,
    pub lookup: u32,
}

impl OutputLimits {
    pub fn new(strategy: u32, lookup: u32) -> Result<Self> {
        if lookup == 0 {
            bail!("LOOKUP_MAX_OUTPUT_TOKENS must be greater than zero");
        }
        if strategy <= lookup {
            bail!(
                "STRATEGY_MAX_OUTPUT_TOKENS ({strategy}) must be larger than LOOKUP_MAX_OUTPUT_TOKENS ({lookup})"
            );
        }
        Ok(Self { strategy, lookup })
    }

    pub fn for_path(&self, path: IntakePath) -> u32 {
        match path {
            IntakePath::Strategy => self.strategy,
            IntakePath::Lookup => self.lookup,
        }
    }
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY_MAX_OUTPUT_TOKENS,
            lookup: DEFAULT_LOOKUP_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the generation credential is missing.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub limits: OutputLimits,
    /// `None` keeps the transport default (no overall timeout).
    pub generation_timeout_secs: Option<u64>,
    pub ruleset_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_model", &self.openai_model)
            .field("limits", &self.limits)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .field("ruleset_path", &self.ruleset_path)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let limits = OutputLimits::new(
            parse_or(&get, "STRATEGY_MAX_OUTPUT_TOKENS", DEFAULT_STRATEGY_MAX_OUTPUT_TOKENS)?,
            parse_or(&get, "LOOKUP_MAX_OUTPUT_TOKENS", DEFAULT_LOOKUP_MAX_OUTPUT_TOKENS)?,
        )?;

        let generation_timeout_secs = get("GENERATION_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?;

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY").with_context(|| {
                "Required environment variable 'OPENAI_API_KEY' is not set; \
                 the generation service cannot be reached without it"
            })?,
            openai_api_url: get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            limits,
            generation_timeout_secs,
            ruleset_path: get("RULESET_PATH").map(PathBuf::from),
            port: parse_or(&get, "PORT", 8080u16)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
