//! # Tea Inventory - local store for a tea shop's stock
//!
//! Tea Inventory provides:
//! - A contract describing the `teas` table and valid tea types
//! - Content-URI addressing for the whole collection or a single tea
//! - A SQLite-backed record store with validation on every mutation
//! - Lazy, closable cursors over query results
//! - Explicit change subscriptions notified after successful mutations

pub mod contract;
pub mod uri;
pub mod tea;
pub mod notify;
pub mod storage;
pub mod service;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use contract::{TeaColumn, TeaType};
pub use uri::{ContentUri, ResourceKind, TeaUris, UriMatch};
pub use tea::{Tea, TeaValues, ValidationError};
pub use notify::{ChangeEvent, ChangeObserver, ChannelObserver, SubscriptionHandle};
pub use storage::{Selection, SortOrder, TeaCursor, TeaRow, TeaStore};
pub use service::{InventoryService, RestockSummary};

/// Result type alias for Tea Inventory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Store operation named in `UnsupportedOperation` errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Query => "query",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// Error types for Tea Inventory operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("{operation} is not supported for {uri}")]
    UnsupportedOperation { operation: Operation, uri: String },

    #[error("Validation failed for {uri}: {source}")]
    Validation {
        uri: String,
        #[source]
        source: ValidationError,
    },

    #[error("Storage error{}: {source}", at_suffix(.uri))]
    Storage {
        uri: Option<String>,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database schema version {found} is newer than supported {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], for callers that only need to
/// pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddress,
    UnsupportedOperation,
    Validation,
    Storage,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUri(_) => ErrorKind::InvalidAddress,
            Error::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Storage { .. } | Error::UnsupportedSchemaVersion { .. } => ErrorKind::Storage,
            Error::Io(_) | Error::Config(_) => ErrorKind::Other,
        }
    }

    /// The address the failed operation targeted, when known
    pub fn uri(&self) -> Option<&str> {
        match self {
            Error::InvalidUri(uri) => Some(uri),
            Error::UnsupportedOperation { uri, .. } | Error::Validation { uri, .. } => Some(uri),
            Error::Storage { uri, .. } => uri.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn storage_at(uri: &ContentUri, source: rusqlite::Error) -> Self {
        Error::Storage {
            uri: Some(uri.to_uri_string()),
            source,
        }
    }
}

fn at_suffix(uri: &Option<String>) -> String {
    uri.as_deref().map(|u| format!(" for {}", u)).unwrap_or_default()
}

impl From<rusqlite::Error> for Error {
    fn from(source: rusqlite::Error) -> Self {
        Error::Storage { uri: None, source }
    }
}
