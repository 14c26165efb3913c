// ============================================
// File: crates/airkick-agent/src/error.rs
// ============================================
//! # Agent Error Types
//!
//! ## Creation Reason
//! One enum per failure kind, mirroring the run's phases: authentication,
//! station-identifier derivation (re-exported from the core crate), and
//! command submission. `RunError` is their union for one invocation;
//! `AgentError` adds the startup-time configuration kinds.
//!
//! ## Propagation
//! Component errors are raised at their boundary and propagated
//! un-recovered to the orchestration layer, which logs and ends the current
//! invocation. Nothing here retries; resilience comes from the next
//! scheduled tick.
//!
//! ## Last Modified
//! v0.2.0 - Initial error definitions

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use airkick_core::StationIdentifierError;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

// ============================================
// AuthenticationError
// ============================================

/// Failures while establishing an authenticated device session.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The auth request never completed (DNS, TCP, TLS, timeout).
    #[error("auth request to {url} failed: {source}")]
    Request {
        /// Endpoint that was called
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-success status.
    #[error("device rejected credentials: HTTP {status}")]
    Rejected {
        /// Status the device returned
        status: StatusCode,
    },

    /// The response carried no anti-forgery token header.
    #[error("auth response is missing the x-csrf-id header")]
    MissingCsrfToken,

    /// The response carried no `Set-Cookie` headers.
    #[error("auth response carried no session cookies")]
    MissingCookies,

    /// The response body could not be decoded.
    #[error("auth response body is not valid: {source}")]
    Body {
        /// Underlying decode error
        #[source]
        source: reqwest::Error,
    },
}

// ============================================
// CommandSubmissionError
// ============================================

/// Failures while submitting the kick command.
#[derive(Error, Debug)]
pub enum CommandSubmissionError {
    /// The kick request never completed (DNS, TCP, TLS, timeout).
    #[error("kick request to {url} failed: {source}")]
    Request {
        /// Endpoint that was called
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-success status.
    #[error("device refused the kick command: HTTP {status}")]
    Rejected {
        /// Status the device returned
        status: StatusCode,
    },

    /// The auth session is missing its token or cookies.
    #[error("cannot submit a kick with an incomplete auth session")]
    IncompleteSession,
}

// ============================================
// RunError
// ============================================

/// Phase of a pipeline invocation, for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Logging into the device web UI.
    Authenticating,
    /// Decoding board metadata into a station identifier.
    Decoding,
    /// Submitting the kick command.
    Submitting,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authenticating => "authenticating",
            Self::Decoding => "decoding",
            Self::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// Any failure of a single pipeline invocation.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    StationIdentifier(#[from] StationIdentifierError),

    #[error(transparent)]
    CommandSubmission(#[from] CommandSubmissionError),
}

impl RunError {
    /// Returns the pipeline phase this error aborted.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        match self {
            Self::Authentication(_) => RunPhase::Authenticating,
            Self::StationIdentifier(_) => RunPhase::Decoding,
            Self::CommandSubmission(_) => RunPhase::Submitting,
        }
    }
}

// ============================================
// AgentError
// ============================================

/// Agent error types.
#[derive(Error, Debug)]
pub enum AgentError {
    /// A required configuration variable is absent.
    #[error("missing required configuration: {var}")]
    ConfigMissing {
        /// Environment variable name
        var: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Field or variable name
        field: String,
        /// Description of what's wrong
        reason: String,
    },

    /// The agent could not be brought up (e.g. HTTP client construction).
    #[error("agent failed to start: {reason}")]
    StartupFailed {
        /// Description of the startup failure
        reason: String,
    },

    /// A pipeline invocation failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

impl AgentError {
    /// Creates a `ConfigMissing` error.
    pub fn config_missing(var: impl Into<String>) -> Self {
        Self::ConfigMissing { var: var.into() }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `StartupFailed` error.
    pub fn startup_failed(reason: impl Into<String>) -> Self {
        Self::StartupFailed {
            reason: reason.into(),
        }
    }

    /// Returns `true` for configuration problems.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns `true` when the process should not keep running.
    ///
    /// Run failures are per-tick and never fatal; the scheduler keeps going.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. } | Self::ConfigInvalid { .. } | Self::StartupFailed { .. }
        )
    }
}

// ============================================
// Tests
// ============================================
