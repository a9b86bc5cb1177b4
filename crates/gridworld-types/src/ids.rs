//! Type-safe identifier wrappers.
//!
//! PAC identifiers are opaque strings assigned by the controller. They are
//! stable across snapshots and unique within a single snapshot, which makes
//! them the key for every visual handle on the overlay.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty (never valid on the wire).
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Return at most the first `len` characters of the identifier.
            ///
            /// Counts characters, not bytes, so multi-byte identifiers are
            /// never split inside a code point.
            pub fn prefix(&self, len: usize) -> &str {
                match self.0.char_indices().nth(len) {
                    Some((end, _)) => self.0.get(..end).unwrap_or(&self.0),
                    None => &self.0,
                }
            }

            /// Consume the wrapper and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a PAC (positioned actor cell) on the overlay.
    PacId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_truncates_long_ids() {
        let id = PacId::new("abc123def456");
        assert_eq!(id.prefix(8), "abc123de");
    }

    #[test]
    fn prefix_keeps_short_ids_whole() {
        let id = PacId::new("abc");
        assert_eq!(id.prefix(8), "abc");
        assert_eq!(PacId::new("").prefix(8), "");
    }

    #[test]
    fn prefix_counts_characters() {
        let id = PacId::new("ééééééééé");
        assert_eq!(id.prefix(2), "éé");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PacId::new("abc123");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"abc123\"");
    }
}
