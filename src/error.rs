use serde::Deserialize;
use thiserror::Error;

/// Failures surfaced by the Admin API adapter and the view-model projector.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Transport failure, non-success status, or a body that is not JSON.
    #[error("upstream request failed: {0}")]
    UpstreamRequest(String),

    /// The upstream answered with a populated `errors` (or `userErrors`) list.
    #[error("upstream API errors: {}", format_graphql_errors(.0))]
    UpstreamApi(Vec<GraphQlError>),

    /// The response did not have the shape the projector requires.
    #[error("precondition violation: {0}")]
    Precondition(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        AdminError::UpstreamRequest(err.to_string())
    }
}

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_api_error_joins_messages() {
        let err = AdminError::UpstreamApi(vec![
            GraphQlError::new("Field 'foo' doesn't exist"),
            GraphQlError::new("Throttled"),
        ]);
        assert_eq!(
            err.to_string(),
            "upstream API errors: Field 'foo' doesn't exist; Throttled"
        );
    }

    #[test]
    fn precondition_wraps_serde_error() {
        let serde_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = AdminError::from(serde_err);
        assert!(err.to_string().starts_with("precondition violation:"));
    }
}
