//! Prompt context built from the frontend's case snapshot.

use crate::models::case::{display_value, Case};
use std::fmt::Write;

/// Cases listed individually in the prompt. The header still reports the
/// full count.
pub const MAX_LISTED_CASES: usize = 20;

/// Render the selected case in full, then one summary line for each of the
/// first [`MAX_LISTED_CASES`] cases in the order given.
pub fn format_case_context(cases: &[Case], selected_case: Option<&Case>) -> String {
    let mut context = String::new();

    if let Some(selected) = selected_case.filter(|c| !c.is_empty()) {
        context.push_str("\n=== CURRENTLY SELECTED CASE ===\n");
        context.push_str(&selected.to_pretty_json());
        context.push_str("\n\n");
    }

    if !cases.is_empty() {
        let _ = writeln!(context, "\n=== ALL AVAILABLE CASES ({} total) ===", cases.len());
        for case in cases.iter().take(MAX_LISTED_CASES) {
            let _ = writeln!(context, "\n{}", summary_line(case));
        }
    }

    context
}

fn summary_line(case: &Case) -> String {
    format!(
        "- {}: {} (Status: {}, Priority: {}, Risk: {})",
        case.display_field("case_number"),
        case.display_field("summary"),
        case.display_field("status"),
        case.display_field("priority"),
        display_value(case.risk_level()),
    )
}
