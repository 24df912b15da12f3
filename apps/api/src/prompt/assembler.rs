//! Prompt Assembler — pure templating from a validated record plus the ruleset.
//!
//! No I/O, no clock, no randomness: the same record and ruleset always produce
//! a byte-identical `GenerationRequest`.

use serde::Serialize;

use crate::intake::models::{IntakePath, IntakeRecord, QuickLookupRecord};
use crate::prompt::ruleset::Ruleset;
use crate::prompt::templates::{
    CLOSING_QUESTION, COI_TABLE_COLUMNS, FOCUS_REPORT_PART, LOOKUP_FIT_BASIS,
    LOOKUP_TASK_TEMPLATE, NOT_PROVIDED, SEARCH_RULES, STRATEGY_FIT_BASIS,
    STRATEGY_TASK_TEMPLATE, TABLE_CONTRACT, THEMES_PART,
};

/// Row-count rules the model is told to honour for a first batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListContract {
    pub batch_min: u32,
    pub batch_max: u32,
    /// Strict results below this count trigger broadening.
    pub broaden_below: u32,
    /// Floor that may only be undercut after `min_broadenings` broadening passes.
    pub min_rows: u32,
    pub min_broadenings: u32,
    pub max_total: u32,
}

pub const LIST_CONTRACT: ListContract = ListContract {
    batch_min: 20,
    batch_max: 25,
    broaden_below: 15,
    min_rows: 10,
    min_broadenings: 2,
    max_total: 125,
};

/// One fully assembled payload for the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub path: IntakePath,
    /// The ruleset text, untouched.
    pub instructions: String,
    pub task: String,
    /// Always true: every list is produced with live web search.
    pub browsing_enabled: bool,
}

/// Builds the Path A request: intelligence report, opportunity themes, COI table.
pub fn assemble_full(record: &IntakeRecord, ruleset: &Ruleset) -> GenerationRequest {
    let search_rules = render_search_rules(&record.zip);
    let table_contract = render_table_contract(STRATEGY_FIT_BASIS);
    let closing_question = render_closing_question();

    let task = render_template(
        STRATEGY_TASK_TEMPLATE,
        &[
            ("zip", record.zip.as_str()),
            ("segments", or_not_provided(&record.segments)),
            ("life_events", or_not_provided(&record.life_events)),
            ("communities", or_not_provided(&record.communities)),
            ("background", or_not_provided(&record.background)),
            ("networks", or_not_provided(&record.networks)),
            ("focus_report", FOCUS_REPORT_PART),
            ("themes", THEMES_PART),
            ("search_rules", search_rules.as_str()),
            ("table_contract", table_contract.as_str()),
            ("closing_question", closing_question.as_str()),
        ],
    );

    GenerationRequest {
        path: IntakePath::Strategy,
        instructions: ruleset.text.clone(),
        task,
        browsing_enabled: true,
    }
}

/// Builds the Path B request: COI table and closing question only.
pub fn assemble_quick(record: &QuickLookupRecord, ruleset: &Ruleset) -> GenerationRequest {
    let search_rules = render_search_rules(&record.zip);
    let table_contract = render_table_contract(LOOKUP_FIT_BASIS);
    let closing_question = render_closing_question();
    let batch_min = LIST_CONTRACT.batch_min.to_string();
    let batch_max = LIST_CONTRACT.batch_max.to_string();

    let task = render_template(
        LOOKUP_TASK_TEMPLATE,
        &[
            ("zip", record.zip.as_str()),
            ("coi_type", record.coi_type.label()),
            ("extra_context", or_not_provided(&record.extra_context)),
            ("batch_min", batch_min.as_str()),
            ("batch_max", batch_max.as_str()),
            ("search_rules", search_rules.as_str()),
            ("table_contract", table_contract.as_str()),
            ("closing_question", closing_question.as_str()),
        ],
    );

    GenerationRequest {
        path: IntakePath::Lookup,
        instructions: ruleset.text.clone(),
        task,
        browsing_enabled: true,
    }
}

/// Markdown header plus separator row for the COI table.
pub fn table_header() -> String {
    let header = format!("| {} |", COI_TABLE_COLUMNS.join(" | "));
    let separator = format!("|{}", "---|".repeat(COI_TABLE_COLUMNS.len()));
    format!("{header}\n{separator}")
}

/// Replaces `{key}` placeholders in one pass. Substituted values are never
/// re-scanned, and unknown placeholders are left as written.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn render_search_rules(zip: &str) -> String {
    let c = LIST_CONTRACT;
    let batch_min = c.batch_min.to_string();
    let batch_max = c.batch_max.to_string();
    let broaden_below = c.broaden_below.to_string();
    let min_rows = c.min_rows.to_string();
    let min_broadenings = c.min_broadenings.to_string();
    render_template(
        SEARCH_RULES,
        &[
            ("zip", zip),
            ("batch_min", batch_min.as_str()),
            ("batch_max", batch_max.as_str()),
            ("broaden_below", broaden_below.as_str()),
            ("min_rows", min_rows.as_str()),
            ("min_broadenings", min_broadenings.as_str()),
        ],
    )
}

fn render_table_contract(fit_basis: &str) -> String {
    let header = table_header();
    render_template(
        TABLE_CONTRACT,
        &[("table_header", header.as_str()), ("fit_basis", fit_basis)],
    )
}

fn render_closing_question() -> String {
    let max_total = LIST_CONTRACT.max_total.to_string();
    render_template(CLOSING_QUESTION, &[("max_total", max_total.as_str())])
}

fn or_not_provided(value: &str) -> &str {
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}
