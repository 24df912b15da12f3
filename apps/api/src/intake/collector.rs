//! Input Collector — turns raw form payloads into validated intake records.
//!
//! Validation is deliberately minimal: a ZIP code is required on both paths
//! and a quick lookup must name one of the known COI categories. Everything
//! else is free text and passes through as typed (trimmed).

use thiserror::Error;

use crate::intake::models::{
    CoiType, FullIntakeForm, IntakeRecord, QuickLookupForm, QuickLookupRecord,
};

pub const ZIP_REQUIRED: &str = "zip required";

/// A submission the collector refused. Nothing downstream runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Rejected {
    pub reason: String,
}

impl Rejected {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Validates a Path A submission.
pub fn collect_full_intake(form: &FullIntakeForm) -> Result<IntakeRecord, Rejected> {
    let zip = require_zip(&form.zip)?;

    Ok(IntakeRecord {
        zip,
        segments: form.segments.normalized(),
        life_events: form.life_events.normalized(),
        communities: form.communities.normalized(),
        background: form.background.trim().to_string(),
        networks: form.networks.normalized(),
    })
}

/// Validates a Path B submission.
pub fn collect_quick_lookup(form: &QuickLookupForm) -> Result<QuickLookupRecord, Rejected> {
    let zip = require_zip(&form.zip)?;

    let coi_type = CoiType::parse(&form.coi_type).ok_or_else(|| {
        Rejected::new(format!(
            "invalid coi_type '{}': choose one of the listed categories",
            form.coi_type.trim()
        ))
    })?;

    Ok(QuickLookupRecord {
        zip,
        coi_type,
        extra_context: form.extra_context.trim().to_string(),
    })
}

fn require_zip(raw: &str) -> Result<String, Rejected> {
    let zip = raw.trim();
    if zip.is_empty() {
        return Err(Rejected::new(ZIP_REQUIRED));
    }
    Ok(zip.to_string())
}
