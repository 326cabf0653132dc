//! Which input cases the model's answer refers to.

use crate::models::Case;

/// Case numbers of every case whose `case_number` or `case_id` occurs
/// verbatim in `text`. Scans the whole list, keeps input order and does not
/// de-duplicate.
pub fn extract_mentioned_cases(cases: &[Case], text: &str) -> Vec<String> {
    cases
        .iter()
        .filter_map(|case| {
            let case_number = case.case_number()?;
            let by_number = text.contains(case_number.as_str());
            let by_id = || case.case_id().is_some_and(|id| text.contains(id.as_str()));

            (by_number || by_id()).then_some(case_number)
        })
        .collect()
}
