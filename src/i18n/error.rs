use thiserror::Error;

/// Transport level failure while fetching a resource.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The resource does not exist.
    #[error("Resource not found: {path}")]
    NotFound { path: String },
    /// The resource exists but could not be served.
    #[error("Unexpected status {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The language code cannot name a resource.
    #[error("Invalid language code '{0}'")]
    InvalidCode(String),
}

/// Failure to turn a resource into translation data.
///
/// Fetch and parse failures are folded into this one type; the message of
/// the underlying cause is kept.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load {resource}: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: FetchError,
    },
    #[error("Failed to parse {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse {resource}: {message}")]
    InvalidShape { resource: String, message: String },
}

impl LoadError {
    /// Name of the resource that failed (language code or catalog path).
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::Fetch { resource, .. }
            | Self::Parse { resource, .. }
            | Self::InvalidShape { resource, .. } => resource,
        }
    }

    /// Whether the failure happened before any payload was received.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Failure to read or write the persisted language preference.
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}
