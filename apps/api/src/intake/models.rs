use std::fmt;

use serde::{Deserialize, Serialize};

/// The two request shapes an advisor can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntakePath {
    /// Path A — personalized COI strategy with COI list.
    #[serde(rename = "A", alias = "a", alias = "strategy")]
    Strategy,
    /// Path B — quick COI lookup.
    #[serde(rename = "B", alias = "b", alias = "lookup")]
    Lookup,
}

impl IntakePath {
    pub fn label(self) -> &'static str {
        match self {
            IntakePath::Strategy => "A",
            IntakePath::Lookup => "B",
        }
    }
}

impl fmt::Display for IntakePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A form field that may arrive as free text or as a list of selections.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Text(String),
    Selections(Vec<String>),
}

impl Default for FieldInput {
    fn default() -> Self {
        FieldInput::Text(String::new())
    }
}

impl FieldInput {
    /// Flattens the input into a single trimmed string. Selections are joined with ", ".
    pub fn normalized(&self) -> String {
        match self {
            FieldInput::Text(text) => text.trim().to_string(),
            FieldInput::Selections(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw form payloads
// ────────────────────────────────────────────────────────────────────────────

/// Path A form body, exactly as submitted by the operator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FullIntakeForm {
    pub zip: String,
    pub segments: FieldInput,
    pub life_events: FieldInput,
    pub communities: FieldInput,
    pub background: String,
    pub networks: FieldInput,
}

/// Path B form body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuickLookupForm {
    pub zip: String,
    pub coi_type: String,
    pub extra_context: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Validated records
// ────────────────────────────────────────────────────────────────────────────

/// Validated Path A intake. Only `zip` is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRecord {
    pub zip: String,
    pub segments: String,
    pub life_events: String,
    pub communities: String,
    pub background: String,
    pub networks: String,
}

/// Validated Path B intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickLookupRecord {
    pub zip: String,
    pub coi_type: CoiType,
    pub extra_context: String,
}

/// COI categories an advisor can search for in a quick lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoiType {
    CpaTaxAdvisor,
    MortgageLender,
    Realtor,
    EstatePlanningAttorney,
    ImmigrationAttorney,
    PediatricianObgyn,
    SchoolCounselor,
    BusinessBanker,
    BusinessConsultant,
    CommunityLeader,
    /// Catch-all: no specific category.
    Any,
}

impl CoiType {
    pub const ALL: [CoiType; 11] = [
        CoiType::CpaTaxAdvisor,
        CoiType::MortgageLender,
        CoiType::Realtor,
        CoiType::EstatePlanningAttorney,
        CoiType::ImmigrationAttorney,
        CoiType::PediatricianObgyn,
        CoiType::SchoolCounselor,
        CoiType::BusinessBanker,
        CoiType::BusinessConsultant,
        CoiType::CommunityLeader,
        CoiType::Any,
    ];

    /// Stable identifier used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            CoiType::CpaTaxAdvisor => "cpa_tax_advisor",
            CoiType::MortgageLender => "mortgage_lender",
            CoiType::Realtor => "realtor",
            CoiType::EstatePlanningAttorney => "estate_planning_attorney",
            CoiType::ImmigrationAttorney => "immigration_attorney",
            CoiType::PediatricianObgyn => "pediatrician_obgyn",
            CoiType::SchoolCounselor => "school_counselor",
            CoiType::BusinessBanker => "business_banker",
            CoiType::BusinessConsultant => "business_consultant",
            CoiType::CommunityLeader => "community_leader",
            CoiType::Any => "any",
        }
    }

    /// Human-facing label, also what the prompt shows the model.
    pub fn label(self) -> &'static str {
        match self {
            CoiType::CpaTaxAdvisor => "CPA / Tax Advisor",
            CoiType::MortgageLender => "Mortgage Lender / Broker",
            CoiType::Realtor => "Realtor (family/relocation)",
            CoiType::EstatePlanningAttorney => "Estate Planning Attorney",
            CoiType::ImmigrationAttorney => "Immigration Attorney",
            CoiType::PediatricianObgyn => "Pediatrician / OB-GYN",
            CoiType::SchoolCounselor => "School Counselor / Principal",
            CoiType::BusinessBanker => "Business Banker / RM",
            CoiType::BusinessConsultant => "Business Consultant / Career Coach",
            CoiType::CommunityLeader => "Community / Cultural Leader",
            CoiType::Any => "Any / Mixed",
        }
    }

    /// Accepts either the wire key or the display label, case-insensitively.
    pub fn parse(value: &str) -> Option<CoiType> {
        let value = value.trim();
        CoiType::ALL.into_iter().find(|t| {
            t.key().eq_ignore_ascii_case(value) || t.label().eq_ignore_ascii_case(value)
        })
    }
}
