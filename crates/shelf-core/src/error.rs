//! Error type shared by the translation layer and the index adapters.

/// Why a search could not be answered.
///
/// Translation either yields a complete [`QueryRequest`](crate::QueryRequest)
/// or fails with [`SearchError::InvalidFilterInput`] before any clause is
/// built. Index adapters report every failure as
/// [`SearchError::UpstreamQueryFailure`]; nothing is retried here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid filter input: {0}")]
    InvalidFilterInput(String),

    #[error("upstream query failed{}: {message}", status_suffix(.status))]
    UpstreamQueryFailure {
        status: Option<u16>,
        message: String,
    },
}

impl SearchError {
    pub fn upstream(message: impl Into<String>) -> Self {
        SearchError::UpstreamQueryFailure {
            status: None,
            message: message.into(),
        }
    }

    /// Stable snake_case code used in HTTP error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidFilterInput(_) => "invalid_filter_input",
            SearchError::UpstreamQueryFailure { .. } => "upstream_query_failure",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
