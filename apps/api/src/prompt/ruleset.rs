//! The fixed operating instructions sent with every generation call.
//!
//! The ruleset is data, not logic. It ships as a versioned markdown asset and can
//! be replaced at startup with `RULESET_PATH`; either way its text reaches the
//! generation service untouched.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub const BUNDLED_RULESET_VERSION: &str = "coi-rules-v1";
pub const BUNDLED_RULESET: &str = include_str!("../../prompts/coi_rules_v1.md");

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("failed to read ruleset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ruleset {path} is empty")]
    Empty { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    pub version: String,
    pub text: String,
}

impl Ruleset {
    pub fn bundled() -> Self {
        Self {
            version: BUNDLED_RULESET_VERSION.to_string(),
            text: BUNDLED_RULESET.to_string(),
        }
    }

    /// Reads a ruleset file. The version is the file stem (`coi_rules_v2.md` → `coi_rules_v2`).
    pub fn from_file(path: &Path) -> Result<Self, RulesetError> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if text.trim().is_empty() {
            return Err(RulesetError::Empty {
                path: path.to_path_buf(),
            });
        }

        let version = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { version, text })
    }

    /// Loads the override when one is configured, otherwise the bundled ruleset.
    pub fn load(path: Option<&Path>) -> Result<Self, RulesetError> {
        let ruleset = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::bundled(),
        };
        info!(
            "Ruleset loaded: version={} ({} bytes)",
            ruleset.version,
            ruleset.text.len()
        );
        Ok(ruleset)
    }
}
