//! Error types and result aliases for InkAR.
//!
//! One shared error enum covers every remote interaction the catalog
//! makes. The containment rules live with the callers: `Decode` and
//! `ImageFetch` are per-item and never abort a batch, while `Fetch`,
//! `Timeout`, and `Write` abort only the operation that raised them
//! and must leave previously held state intact.

/// The result type used throughout InkAR.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in InkAR operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or auth failure fetching a collection or document.
    #[error("fetch error: {message}")]
    Fetch {
        /// Description of the fetch failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A remote operation exceeded its deadline.
    #[error("timeout after {seconds}s in {operation}")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// The configured deadline in seconds.
        seconds: u64,
    },

    /// A single record was malformed. Contained per item: callers skip
    /// the record and continue the batch.
    #[error("decode error: {message} (field: {field})")]
    Decode {
        /// The field that was missing or malformed.
        field: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A per-item image fetch or decode failed. Never fatal to the
    /// surrounding list.
    #[error("image fetch error for {url}: {message}")]
    ImageFetch {
        /// The image URL that failed.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// A create/update/delete on the remote store failed.
    #[error("write error: {message}")]
    Write {
        /// Description of the write failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Authentication with the identity provider failed.
    #[error("auth error: {message}")]
    Auth {
        /// Description of the auth failure.
        message: String,
    },

    /// An internal error that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new fetch error with the given message.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new fetch error with a source cause.
    #[must_use]
    pub fn fetch_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new decode error for the given field.
    #[must_use]
    pub fn decode(field: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            field,
            message: message.into(),
        }
    }

    /// Creates a new image fetch error for the given URL.
    #[must_use]
    pub fn image_fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ImageFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new write error with the given message.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new write error with a source cause.
    #[must_use]
    pub fn write_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Write {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new auth error with the given message.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for failures that abort a whole load/refresh
    /// (transport, auth, timeout), as opposed to per-item failures.
    #[must_use]
    pub const fn aborts_batch(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Timeout { .. } | Self::Write { .. } | Self::Auth { .. }
        )
    }
}
