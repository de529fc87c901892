use std::path::PathBuf;

use economia_client::ClientError;
use thiserror::Error;

/// Failures of a [`crate::persistence::KeyedStorage`] backend.
///
/// These are logged by [`crate::persistence::Persistence`] and never reach
/// the user.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum DetailError {
    /// No id was given, or the product could not be fetched.
    #[error("product not found: {id:?}")]
    ProductNotFound {
        id: String,
        #[source]
        source: Option<ClientError>,
    },
}
