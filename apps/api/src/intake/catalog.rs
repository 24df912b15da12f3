//! Static option lists used to populate the intake form widgets.

use serde::Serialize;

use crate::intake::models::CoiType;

#[derive(Debug, Clone, Serialize)]
pub struct SegmentOption {
    pub name: &'static str,
    pub age_range: &'static str,
    pub triggers: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityCategory {
    pub category: &'static str,
    pub examples: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct CoiTypeOption {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeCatalog {
    pub segments: &'static [SegmentOption],
    pub life_events: &'static [&'static str],
    pub communities: &'static [CommunityCategory],
    pub coi_types: Vec<CoiTypeOption>,
}

pub const SEGMENTS: &[SegmentOption] = &[
    SegmentOption {
        name: "Young Childfree",
        age_range: "24–44",
        triggers: "New job, recently engaged or married.",
    },
    SegmentOption {
        name: "Young Families",
        age_range: "25–44",
        triggers: "New baby, house, job change.",
    },
    SegmentOption {
        name: "Mid-Career Families",
        age_range: "35–54",
        triggers: "Major job change, loss, caregiving for parents, new child, paying for education.",
    },
    SegmentOption {
        name: "Affluent Mid-Career Families",
        age_range: "35–54",
        triggers: "Higher income, job change, new home purchase.",
    },
    SegmentOption {
        name: "Affluent Pre-Retirees",
        age_range: "55+",
        triggers: "Approaching retirement, reviewing financial situation.",
    },
    SegmentOption {
        name: "Affluent Retirees",
        age_range: "65+",
        triggers: "In retirement, reviewing financial situation.",
    },
];

pub const LIFE_EVENTS: &[&str] = &[
    "New baby",
    "Home purchase / move",
    "Job change / stock compensation",
    "Kids' education decisions",
    "Cash-flow / tax changes",
    "Immigration / relocation",
];

pub const COMMUNITIES: &[CommunityCategory] = &[
    CommunityCategory {
        category: "Target Cultural Markets",
        examples: &[
            "African American",
            "Chinese",
            "Korean",
            "Latino",
            "South Asian",
            "Vietnamese",
        ],
    },
    CommunityCategory {
        category: "Other Communities",
        examples: &[
            "LGBTQ+",
            "Immigrant communities",
            "Faith communities",
            "Military / veteran",
            "Parent groups",
            "Alumni",
            "Civic groups",
        ],
    },
];

pub fn intake_catalog() -> IntakeCatalog {
    IntakeCatalog {
        segments: SEGMENTS,
        life_events: LIFE_EVENTS,
        communities: COMMUNITIES,
        coi_types: CoiType::ALL
            .into_iter()
            .map(|t| CoiTypeOption {
                key: t.key(),
                label: t.label(),
            })
            .collect(),
    }
}
