// ============================================
// File: crates/airkick-agent/src/lib.rs
// ============================================
//! # AirKick Agent - Station Kick Watchdog
//!
//! ## Creation Reason
//! Some bridge firmwares occasionally wedge a wireless link in a state a
//! soft "kick station" command clears without a power cycle. This crate is
//! the long-running agent that logs into the device's web UI on a schedule
//! and issues that command.
//!
//! ## Main Functionality
//! - [`config`]: environment-sourced configuration, validated at startup
//! - [`device`]: the `BridgeDriver` contract plus HTTP and mock drivers
//! - [`pipeline`]: one authenticate → decode → kick invocation
//! - [`scheduler`]: cron-driven invocation loop with graceful shutdown
//! - [`error`]: per-run and startup error types
//!
//! ## Pipeline
//! ```text
//! ┌───────────────┐   ┌────────────────┐   ┌────────────────┐
//! │ Authenticator │──▶│ Board Metadata │──▶│ Kick Submitter │
//! │ POST /api/auth│   │    Decoder     │   │ POST /stakick  │
//! └───────────────┘   └────────────────┘   └────────────────┘
//!   x-csrf-id +          board.hwaddr        token + cookies
//!   Set-Cookie +         → StationId         + staif/staid
//!   boardinfo blob
//! ```
//! Strictly sequential; any failure aborts the remaining steps and ends the
//! current invocation only. The next scheduled tick always fires.
//!
//! ## Last Modified
//! v0.2.0 - Collapsed the script snapshots into one pipeline + scheduler

#![warn(clippy::all)]

pub mod config;
pub mod device;
pub mod error;
pub mod pipeline;
pub mod scheduler;

pub use config::AgentConfig;
pub use device::{BridgeDriver, Credentials, HttpBridge, KickTarget, LoginOutcome, MockBridge};
pub use error::{AgentError, AuthenticationError, CommandSubmissionError, RunError, RunPhase};
pub use pipeline::{KickPipeline, KickReport};
pub use scheduler::{KickSchedule, KickScheduler};
