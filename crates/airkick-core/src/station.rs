// ============================================
// File: crates/airkick-core/src/station.rs
// ============================================
//! # Station Identifier
//!
//! ## Creation Reason
//! The kick endpoint addresses the station by a colon-delimited MAC, but the
//! device reports its own hardware address as contiguous hex in the board
//! metadata. This newtype owns the conversion and the 6-octet shape check
//! so the submitter never sends a malformed identifier.
//!
//! ## Main Functionality
//! - `StationId`: 6-octet identifier stored as raw bytes
//! - Parses contiguous (`AABBCCDDEEFF`) and colon-delimited forms
//! - Renders uppercase colon-delimited, the form the firmware expects
//!
//! ## Last Modified
//! v0.2.0 - Initial implementation

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StationIdentifierError};

// ============================================
// StationId
// ============================================

/// A wireless station identifier: 6 octets, rendered colon-delimited.
///
/// # Example
/// ```
/// use airkick_core::StationId;
///
/// let id = StationId::from_hwaddr("AABBCCDDEEFF").unwrap();
/// assert_eq!(id.to_string(), "AA:BB:CC:DD:EE:FF");
///
/// // Already-delimited input parses to the same identifier.
/// assert_eq!(StationId::from_hwaddr("AA:BB:CC:DD:EE:FF").unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationId([u8; 6]);

/// Number of octets in a station identifier.
pub const OCTETS: usize = 6;

impl StationId {
    /// Creates a `StationId` from raw octets.
    #[must_use]
    pub const fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Parses a hardware address as the device reports it.
    ///
    /// Accepts the contiguous 12-digit form found in board metadata and the
    /// colon-delimited form, so re-parsing an already formatted identifier
    /// is a no-op.
    ///
    /// # Errors
    /// Returns [`StationIdentifierError::MalformedHwaddr`] when the value is
    /// empty, the wrong length, or not hexadecimal.
    pub fn from_hwaddr(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(StationIdentifierError::malformed(raw, "empty value"));
        }

        let digits: String = if raw.contains(':') {
            let groups: Vec<&str> = raw.split(':').collect();
            if groups.len() != OCTETS || groups.iter().any(|g| g.len() != 2) {
                return Err(StationIdentifierError::malformed(
                    raw,
                    format!("expected {OCTETS} colon-delimited octets"),
                ));
            }
            groups.concat()
        } else {
            raw.to_string()
        };

        if digits.len() != OCTETS * 2 {
            return Err(StationIdentifierError::malformed(
                raw,
                format!("expected {} hex digits, got {}", OCTETS * 2, digits.len()),
            ));
        }

        let mut octets = [0u8; OCTETS];
        for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
            octets[i] = std::str::from_utf8(chunk)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| StationIdentifierError::malformed(raw, "not hexadecimal"))?;
        }

        Ok(Self(octets))
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for StationId {
    type Err = StationIdentifierError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hwaddr(s)
    }
}

// ============================================
// Tests
// ============================================
