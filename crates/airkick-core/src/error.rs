// ============================================
// File: crates/airkick-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Decode-side failures for the protocol crate. Wire-level failures
//! (transport, HTTP status, missing headers) live in the agent crate next
//! to the code that talks to the device.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include credentials or session cookies in error messages
//!
//! ## Last Modified
//! v0.2.0 - Initial error definitions

use thiserror::Error;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, StationIdentifierError>;

/// Failures while deriving the station identifier from board metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationIdentifierError {
    /// The metadata blob has no entry under the expected key.
    #[error("board info has no '{key}' entry")]
    HwaddrMissing {
        /// The key that was looked up
        key: String,
    },

    /// The hardware address value cannot form a 6-octet identifier.
    #[error("hardware address '{value}' is not a 6-octet address: {reason}")]
    MalformedHwaddr {
        /// The offending value as reported by the device
        value: String,
        /// Description of what's wrong with it
        reason: String,
    },
}

impl StationIdentifierError {
    /// Creates an `HwaddrMissing` error.
    pub fn hwaddr_missing(key: impl Into<String>) -> Self {
        Self::HwaddrMissing { key: key.into() }
    }

    /// Creates a `MalformedHwaddr` error.
    pub fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHwaddr {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
