// ============================================
// File: crates/airkick-agent/src/device/mock.rs
// ============================================
//! # Mock Bridge Driver
//!
//! ## Creation Reason
//! Pipeline and scheduler behavior must be testable without a bridge on
//! the bench. `MockBridge` scripts login outcomes and captures every kick
//! call for verification.
//!
//! ## Usage in Tests
//! ```
//! use airkick_agent::MockBridge;
//!
//! let bridge = MockBridge::new();
//! bridge.script_login_ok("tok123", "SESSION=xyz", "board.hwaddr=001122334455");
//! // run the pipeline against it, then:
//! // let kicks = bridge.take_kicks();
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Testing only; an unscripted login answers HTTP 503
//! - An unscripted kick succeeds, so happy-path tests stay short
//!
//! ## Last Modified
//! v0.2.0 - Initial mock implementation

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use airkick_core::AuthSession;

use crate::error::{AuthenticationError, CommandSubmissionError};

use super::{BridgeDriver, Credentials, KickTarget, LoginOutcome};

// ============================================
// MockBridge
// ============================================

/// Scripted in-memory driver for tests.
#[derive(Default)]
pub struct MockBridge {
    login_script: Mutex<VecDeque<Result<LoginOutcome, AuthenticationError>>>,
    kick_script: Mutex<VecDeque<Result<(), CommandSubmissionError>>>,
    kicks: Mutex<Vec<(AuthSession, KickTarget)>>,
    login_calls: AtomicUsize,
}

impl MockBridge {
    /// Creates an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next login outcome.
    pub fn script_login(&self, outcome: Result<LoginOutcome, AuthenticationError>) {
        self.login_script.lock().push_back(outcome);
    }

    /// Scripts a successful login with the given artifacts.
    pub fn script_login_ok(&self, csrf_token: &str, cookies: &str, boardinfo: &str) {
        self.script_login(Ok(LoginOutcome {
            session: AuthSession::new(csrf_token, cookies),
            boardinfo: boardinfo.to_string(),
        }));
    }

    /// Scripts the next kick outcome.
    pub fn script_kick(&self, outcome: Result<(), CommandSubmissionError>) {
        self.kick_script.lock().push_back(outcome);
    }

    /// Number of login attempts made so far.
    #[must_use]
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Drains the captured kick calls.
    #[must_use]
    pub fn take_kicks(&self) -> Vec<(AuthSession, KickTarget)> {
        std::mem::take(&mut *self.kicks.lock())
    }
}

#[async_trait]
impl BridgeDriver for MockBridge {
    async fn authenticate(
        &self,
        _credentials: &Credentials,
    ) -> Result<LoginOutcome, AuthenticationError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_script
            .lock()
            .pop_front()
            .unwrap_or(Err(AuthenticationError::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
            }))
    }

    async fn kick_station(
        &self,
        session: &AuthSession,
        target: &KickTarget,
    ) -> Result<(), CommandSubmissionError> {
        self.kicks.lock().push((session.clone(), target.clone()));
        self.kick_script.lock().pop_front().unwrap_or(Ok(()))
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_login_and_capture() {
        let bridge = MockBridge::new();
        bridge.script_login_ok("tok", "a=1", "board.hwaddr=AABBCCDDEEFF");

        let outcome = bridge
            .authenticate(&Credentials::new("u", "p"))
            .await
            .unwrap();
        assert_eq!(outcome.session.csrf_token(), "tok");
        assert_eq!(bridge.login_calls(), 1);

        // Unscripted login fails closed.
        assert!(bridge
            .authenticate(&Credentials::new("u", "p"))
            .await
            .is_err());
        assert_eq!(bridge.login_calls(), 2);
    }
}
