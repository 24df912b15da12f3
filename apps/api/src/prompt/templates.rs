// Per-request task templates. Placeholders use `{name}` and are filled by
// `assembler::render_template` in a single pass.

/// Column contract shared by both paths.
pub const COI_TABLE_COLUMNS: [&str; 5] = [
    "Name",
    "Role/Specialty",
    "Organization + Link",
    "Public Contact",
    "Why They Fit",
];

pub const NOT_PROVIDED: &str = "Not provided";

/// Path A task. Replace: {zip}, {segments}, {life_events}, {communities}, {background},
/// {networks}, {focus_report}, {themes}, {search_rules}, {table_contract}, {closing_question}
pub const STRATEGY_TASK_TEMPLATE: &str = r#"PATH A — PERSONALIZED COI STRATEGY WITH COI LIST

The advisor already answered the six intake questions in this app. Do NOT re-ask them.
Use these answers as if you had just collected them:

Q1/6 — Main ZIP code: {zip}
Q2/6 — Target segments: {segments}
Q3/6 — Life events: {life_events}
Q4/6 — Communities / affinity groups: {communities}
Q5/6 — Past professional background: {background}
Q6/6 — Warm networks: {networks}

Produce ONE response containing exactly these three parts, in this order:

{focus_report}

{themes}

3. FIRST BATCH OF REAL COIs — say "Searching now…" and, in the same response, list the COIs in the table below.

{search_rules}

{table_contract}

{closing_question}"#;

/// Part 1 of the Path A response.
pub const FOCUS_REPORT_PART: &str = "\
1. COI INTELLIGENCE REPORT — start with the Client Focus Overview table (Item | Summary) \
restating Main Area, Key Segments, Life Events, Communities, Background and Networks from the \
answers above. Follow it with the Priority COI Categories table (8–10 categories, each with why \
it is high priority) and a 2–3 sentence COI Opportunity Channels paragraph.";

/// Part 2 of the Path A response.
pub const THEMES_PART: &str = "\
2. OPPORTUNITY THEMES — 3–5 short themes, each a bold mini-headline with 1–2 sentences, \
grounded in the segments, life events, communities and background above.";

/// Path B task. Replace: {zip}, {coi_type}, {extra_context}, {batch_min}, {batch_max},
/// {search_rules}, {table_contract}, {closing_question}
pub const LOOKUP_TASK_TEMPLATE: &str = r#"PATH B — QUICK COI LOOKUP

Main ZIP code: {zip}
COI type: {coi_type}
Extra context: {extra_context}

Skip the intelligence report and every narrative section. Output ONLY the first batch of
{batch_min}–{batch_max} real COIs in the table below, followed by the closing question.
Say "Searching now…" and show the table in the same response.

{search_rules}

{table_contract}

{closing_question}"#;

/// Replace: {zip}, {batch_min}, {batch_max}, {broaden_below}, {min_rows}, {min_broadenings}
pub const SEARCH_RULES: &str = r#"SEARCH RULES
- Use live web search for this list. Never ask permission to search and never stop at "Searching…".
- Aim for {batch_min}–{batch_max} COIs. Start strict: ZIP {zip} and the requested categories.
- If that yields fewer than {broaden_below} qualifying COIs, broaden automatically: adjacent ZIPs, nearby towns (5–10 miles), CPA/attorney/medical/realtor directories, public LinkedIn profiles, chambers of commerce, schools, hospitals and professional associations. Combine results to reach {batch_min}–{batch_max}.
- Never return fewer than {min_rows} rows unless you broadened at least {min_broadenings} times AND you say: "Limited results after broadening. Here's what I found:""#;

/// Replace: {table_header}, {fit_basis}
pub const TABLE_CONTRACT: &str = r#"COI TABLE (mandatory header, exactly these columns in this order):

{table_header}

Public Contact may contain only a business phone, a business email published on a website, a public LinkedIn profile, or a website contact page. No personal cell numbers. No personal emails.
"Why They Fit" must tie each COI back to {fit_basis}."#;

pub const STRATEGY_FIT_BASIS: &str =
    "the advisor's segments, life events, communities, background, or networks";

pub const LOOKUP_FIT_BASIS: &str = "the requested COI type and the extra context";

/// Replace: {max_total}. Must stay the final text of every task.
pub const CLOSING_QUESTION: &str = r#"End your response with exactly this question:

> **Would you like more COIs?**
> I can add more (up to {max_total} total), or we can finish with your summary."#;
