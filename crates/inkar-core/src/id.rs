//! Strongly-typed identifiers for InkAR entities.
//!
//! The remote document store assigns opaque string IDs, so unlike a
//! purely ULID-based scheme these newtypes accept any non-empty string.
//! Locally generated IDs (new uploads) use ULIDs, which sort by
//! creation time and need no coordination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

use crate::error::{Error, Result};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a new unique ID (ULID-backed).
            #[must_use]
            pub fn generate() -> Self {
                Self(Ulid::new().to_string())
            }

            /// Wraps a vendor-assigned ID.
            ///
            /// # Errors
            ///
            /// Returns `Error::InvalidInput` if the ID is empty or
            /// whitespace-only.
            pub fn new(id: impl Into<String>) -> Result<Self> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "{} ID cannot be empty",
                        $label
                    )));
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// A unique identifier for a tattoo record in the catalog.
    TattooId,
    "tattoo"
);

string_id!(
    /// A unique identifier for an artist (identity-provider user ID).
    ArtistId,
    "artist"
);
