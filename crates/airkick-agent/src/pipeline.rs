// ============================================
// File: crates/airkick-agent/src/pipeline.rs
// ============================================
//! # Kick Pipeline
//!
//! ## Creation Reason
//! One invocation of the watchdog: authenticate, decode the board metadata
//! into a station identifier, submit the kick. Strictly sequential; any
//! failure aborts the remaining steps and surfaces as a [`RunError`]
//! carrying the phase it aborted.
//!
//! ## State
//! Each invocation is independent and stateless with respect to prior
//! invocations. The auth session lives only for the current run.
//!
//! ## Last Modified
//! v0.2.0 - Initial pipeline

use std::time::{Duration, Instant};

use tracing::debug;

use airkick_core::{BoardInfo, StationId};

use crate::config::AgentConfig;
use crate::device::{BridgeDriver, Credentials, KickTarget};
use crate::error::RunError;

// ============================================
// KickReport
// ============================================

/// Outcome of a successful invocation.
#[derive(Debug, Clone)]
pub struct KickReport {
    /// Station that was disconnected.
    pub station: StationId,
    /// Wall time of the whole invocation.
    pub elapsed: Duration,
}

// ============================================
// KickPipeline
// ============================================

/// Runs the authenticate → decode → kick sequence against a driver.
pub struct KickPipeline<D> {
    driver: D,
    credentials: Credentials,
    interface: String,
}

impl<D: BridgeDriver> KickPipeline<D> {
    /// Wires the pipeline to a driver and the validated configuration.
    pub fn new(driver: D, config: &AgentConfig) -> Self {
        Self {
            driver,
            credentials: Credentials::new(&config.username, &config.password),
            interface: config.sta_interface.clone(),
        }
    }

    /// Runs one full invocation.
    ///
    /// # Errors
    /// Returns the first component failure; later steps are not attempted.
    pub async fn run_once(&self) -> Result<KickReport, RunError> {
        let started = Instant::now();

        debug!("authenticating against device");
        let login = self.driver.authenticate(&self.credentials).await?;

        let board = BoardInfo::parse(&login.boardinfo);
        if board.skipped_lines() > 0 {
            debug!(
                skipped = board.skipped_lines(),
                "board info contained undecodable lines"
            );
        }
        let station = board.station_id()?;
        debug!(%station, "derived station identifier");

        let target = KickTarget {
            interface: self.interface.clone(),
            station,
        };
        self.driver.kick_station(&login.session, &target).await?;

        Ok(KickReport {
            station,
            elapsed: started.elapsed(),
        })
    }

    /// Authenticates and decodes the station identifier without kicking.
    ///
    /// Diagnostic half of the pipeline, used by the `station` command.
    ///
    /// # Errors
    /// Same as [`run_once`](Self::run_once), minus the submission phase.
    pub async fn resolve_station(&self) -> Result<StationId, RunError> {
        let login = self.driver.authenticate(&self.credentials).await?;
        Ok(BoardInfo::parse(&login.boardinfo).station_id()?)
    }
}

// ============================================
// Tests
// ============================================
