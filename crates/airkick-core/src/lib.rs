// ============================================
// File: crates/airkick-core/src/lib.rs
// ============================================
//! # AirKick Core - Device Protocol Library
//!
//! ## Creation Reason
//! Holds the pure, I/O-free half of the station-kick protocol: decoding the
//! board metadata blob the bridge returns at login, deriving the station
//! identifier from it, and shaping the session artifacts the kick command
//! reuses. Keeping this separate from the HTTP driver lets every protocol
//! rule be tested without a device on the bench.
//!
//! ## Main Functionality
//! - [`boardinfo`]: `key=value` blob decoding and `board.hwaddr` lookup
//! - [`station`]: 6-octet station identifier newtype with shape validation
//! - [`session`]: auth-session artifacts and `Set-Cookie` collapsing
//! - [`error`]: decode-side error types
//!
//! ## Architecture Position
//! ```text
//! ┌───────────────────────────────────────────┐
//! │              airkick-agent                │
//! │   (HTTP driver, pipeline, scheduler)      │
//! │                    │                      │
//! │                    ▼                      │
//! │             airkick-core  ◄── You are here│
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Nothing in this crate performs I/O or logging; callers decide what to
//!   do with skipped-line counts and decode failures
//! - The wire formats decoded here must track the device firmware exactly
//!
//! ## Last Modified
//! v0.2.0 - Initial split out of the agent crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boardinfo;
pub mod error;
pub mod session;
pub mod station;

// Re-export commonly used items at crate root
pub use boardinfo::BoardInfo;
pub use error::{Result, StationIdentifierError};
pub use session::{collapse_cookies, AuthSession};
pub use station::StationId;
