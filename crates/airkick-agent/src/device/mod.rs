// ============================================
// File: crates/airkick-agent/src/device/mod.rs
// ============================================
//! # Device Driver Module
//!
//! ## Creation Reason
//! Everything that talks to the bridge goes through the [`BridgeDriver`]
//! contract: establish an authenticated session, then submit the kick with
//! it. The production driver speaks the web UI's HTTP API; the mock driver
//! scripts outcomes for pipeline tests. A browser-automation driver would
//! implement the same two steps.
//!
//! ## Main Functionality
//! - `BridgeDriver`: two-step authenticate/kick contract
//! - `HttpBridge`: reqwest implementation against the device API
//! - `MockBridge`: scripted in-memory implementation for tests
//!
//! ## Session Flow
//! ```text
//! 1. Authenticate:
//!    POST /api/auth  (form: username, password)
//!    ← x-csrf-id header, Set-Cookie headers, boardinfo body field
//!
//! 2. Kick:
//!    POST /stakick.cgi  (form: staif, staid)
//!    Headers:
//!      x-csrf-id: <token>
//!      Cookie: <collapsed name=value pairs>
//! ```
//!
//! ## Last Modified
//! v0.2.0 - Initial driver contract

use std::fmt;

use async_trait::async_trait;

use airkick_core::{AuthSession, StationId};

use crate::error::{AuthenticationError, CommandSubmissionError};

pub mod client;
pub mod mock;

pub use client::HttpBridge;
pub use mock::MockBridge;

// ============================================
// Wire constants
// ============================================

/// Header carrying the anti-forgery token, in both directions.
pub const CSRF_HEADER: &str = "x-csrf-id";

/// Form content type the device firmware expects, charset suffix included.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Authentication endpoint path.
pub const AUTH_PATH: &str = "/api/auth";

/// Station-kick endpoint path.
pub const KICK_PATH: &str = "/stakick.cgi";

// ============================================
// Types
// ============================================

/// Device account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password. Redacted from `Debug` output.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What a successful login yields: the session artifacts plus the raw
/// board metadata blob from the auth response body.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Session artifacts the kick request replays.
    pub session: AuthSession,
    /// Raw `boardinfo` blob, decoded later by the pipeline.
    pub boardinfo: String,
}

/// Target of a kick command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickTarget {
    /// Wireless interface name, sent as `staif`.
    pub interface: String,
    /// Station identifier, sent as `staid`.
    pub station: StationId,
}

// ============================================
// BridgeDriver
// ============================================

/// Two-step contract against the bridge device.
///
/// Implementations must reuse whatever transport state authentication
/// established (TLS settings, connection pool) for the kick call; a fresh
/// unauthenticated agent there would defeat the session.
#[async_trait]
pub trait BridgeDriver: Send + Sync {
    /// Logs into the device and extracts the session artifacts and board
    /// metadata.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, AuthenticationError>;

    /// Disconnects the station using a previously established session.
    async fn kick_station(
        &self,
        session: &AuthSession,
        target: &KickTarget,
    ) -> Result<(), CommandSubmissionError>;
}

// Shared drivers are still drivers.
#[async_trait]
impl<T: BridgeDriver + ?Sized> BridgeDriver for std::sync::Arc<T> {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, AuthenticationError> {
        (**self).authenticate(credentials).await
    }

    async fn kick_station(
        &self,
        session: &AuthSession,
        target: &KickTarget,
    ) -> Result<(), CommandSubmissionError> {
        (**self).kick_station(session, target).await
    }
}

// ============================================
// Tests
// ============================================
