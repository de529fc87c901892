use std::fmt;

use thiserror::Error;

/// The gateway call that was being attempted when a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Cursor-paginated listing.
    ListPage { cursor: String, limit: usize },
    /// Unpaginated name search.
    Search { term: String },
    /// Single product lookup.
    ById { id: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListPage { cursor, limit } => {
                write!(f, "list products (cursor={cursor}, limit={limit})")
            }
            Operation::Search { term } => write!(f, "search products (nome={term:?})"),
            Operation::ById { id } => write!(f, "fetch product {id}"),
        }
    }
}

/// Why a single gateway call failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("expected a JSON array of products, got {found}")]
    NotAnArray { found: &'static str },
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, non-2xx status, or undecodable body. Never partial.
    #[error("{operation} failed: {reason}")]
    FetchFailed {
        operation: Operation,
        #[source]
        reason: FetchFailure,
    },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// The operation that failed, if this error came from a fetch.
    #[must_use]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            ClientError::FetchFailed { operation, .. } => Some(operation),
            ClientError::InvalidBaseUrl { .. } | ClientError::Build(_) => None,
        }
    }
}
