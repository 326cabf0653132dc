//! Wire types of the assistant query endpoint.

use super::Case;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/assistant/query`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub cases: Option<Vec<Case>>,
    #[serde(default, rename = "selectedCase")]
    pub selected_case: Option<Case>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, cases: Vec<Case>, selected_case: Option<Case>) -> Self {
        Self {
            query: Some(query.into()),
            cases: Some(cases),
            selected_case,
        }
    }

    /// The analyst's question, `None` when missing or empty.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn cases(&self) -> &[Case] {
        self.cases.as_deref().unwrap_or_default()
    }
}

/// Answer payload. Always rendered with HTTP 200 so the frontend can show
/// `response` as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(rename = "caseIds", skip_serializing_if = "Option::is_none")]
    pub case_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "hasContext", skip_serializing_if = "Option::is_none")]
    pub has_context: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryMetadata {
    pub fn answered(case_ids: Vec<String>, model: impl Into<String>, has_context: bool) -> Self {
        Self {
            case_ids: Some(case_ids),
            model: Some(model.into()),
            has_context: Some(has_context),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_cases_and_selection_are_accepted() {
        let req: QueryRequest =
            serde_json::from_value(json!({ "query": "hi", "cases": null, "selectedCase": null }))
                .unwrap();
        assert!(req.cases().is_empty());
        assert!(req.selected_case.is_none());
        assert_eq!(req.query_text(), Some("hi"));
    }

    #[test]
    fn empty_query_reads_as_missing() {
        let req: QueryRequest = serde_json::from_value(json!({ "query": "" })).unwrap();
        assert!(req.query_text().is_none());
    }

    #[test]
    fn failure_metadata_only_carries_error() {
        let body = serde_json::to_value(QueryMetadata::failed("api_key_missing")).unwrap();
        assert_eq!(body, json!({ "error": "api_key_missing" }));
    }

    #[test]
    fn answered_metadata_uses_frontend_field_names() {
        let body = serde_json::to_value(QueryMetadata::answered(
            vec!["CASE-1".to_string()],
            "gemini-2.0-flash-exp",
            true,
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({ "caseIds": ["CASE-1"], "model": "gemini-2.0-flash-exp", "hasContext": true })
        );
    }
}
