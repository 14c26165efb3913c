// ============================================
// File: crates/airkick-agent/src/scheduler.rs
// ============================================
//! # Kick Scheduler
//!
//! ## Creation Reason
//! Drives the pipeline on a cron cadence for as long as the agent runs.
//! One loop, one invocation at a time: the next occurrence is computed
//! only after the current run finishes, so invocations never overlap and
//! ticks that land mid-run are skipped rather than queued.
//!
//! ## Failure Policy
//! A failed tick is logged and never blocks future ticks; resilience comes
//! solely from the next occurrence. Repeated failures escalate from warn
//! to error after three in a row.
//!
//! ## Last Modified
//! v0.2.0 - Initial scheduler

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::device::BridgeDriver;
use crate::error::{AgentError, Result};
use crate::pipeline::KickPipeline;

/// Consecutive failures before escalating the log level.
const FAILURE_ESCALATION: u32 = 3;

// ============================================
// KickSchedule
// ============================================

/// A validated cron schedule.
///
/// Expressions use the seconds-resolution cron form
/// (`sec min hour day month weekday`); a standard 5-field expression is
/// accepted and treated as firing at second 0.
#[derive(Clone)]
pub struct KickSchedule {
    expr: String,
    inner: Schedule,
}

impl KickSchedule {
    /// Parses and validates a cron expression.
    ///
    /// # Errors
    /// Returns [`AgentError::ConfigInvalid`] for unparseable expressions.
    pub fn parse(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        // 5-field classic cron gets an explicit seconds column.
        let normalized = if expr.split_whitespace().count() == 5 {
            format!("0 {expr}")
        } else {
            expr.to_string()
        };

        let inner = Schedule::from_str(&normalized)
            .map_err(|e| AgentError::config_invalid("schedule", e.to_string()))?;

        Ok(Self {
            expr: expr.to_string(),
            inner,
        })
    }

    /// The expression as configured.
    #[must_use]
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Next occurrence after now, if the schedule has one.
    #[must_use]
    pub fn next_occurrence(&self) -> Option<DateTime<Utc>> {
        self.inner.upcoming(Utc).next()
    }
}

impl fmt::Debug for KickSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KickSchedule").field(&self.expr).finish()
    }
}

// ============================================
// KickScheduler
// ============================================

/// Runs the pipeline at every schedule occurrence until shutdown.
pub struct KickScheduler<D> {
    pipeline: KickPipeline<D>,
    schedule: KickSchedule,
}

impl<D: BridgeDriver> KickScheduler<D> {
    /// Creates a scheduler around a wired pipeline.
    pub fn new(pipeline: KickPipeline<D>, schedule: KickSchedule) -> Self {
        Self { pipeline, schedule }
    }

    /// Runs the scheduling loop until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(schedule = %self.schedule.expr(), "kick scheduler started");
        let mut failures = 0u32;

        loop {
            let Some(next) = self.schedule.next_occurrence() else {
                error!("schedule has no future occurrences, scheduler stopping");
                break;
            };
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            debug!("next kick at {}", next);

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("kick scheduler stopping");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    match self.pipeline.run_once().await {
                        Ok(report) => {
                            failures = 0;
                            info!(
                                "station {} kicked in {}ms",
                                report.station,
                                report.elapsed.as_millis()
                            );
                        }
                        Err(e) => {
                            failures += 1;
                            if failures >= FAILURE_ESCALATION {
                                error!("kick failed while {} ({} in a row): {}", e.phase(), failures, e);
                            } else {
                                warn!("kick failed while {}: {}", e.phase(), e);
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{AgentConfig, ENV_GATEWAY, ENV_PASSWORD, ENV_STAIF, ENV_USERNAME};
    use crate::device::MockBridge;
    use std::sync::Arc;

    #[test]
    fn test_schedule_parsing() {
        let schedule = KickSchedule::parse("0 */10 * * * *").unwrap();
        assert_eq!(schedule.expr(), "0 */10 * * * *");
        assert!(schedule.next_occurrence().is_some());

        assert!(KickSchedule::parse("every ten minutes").is_err());
        assert!(KickSchedule::parse("").is_err());
    }

    #[test]
    fn test_five_field_expression_accepted() {
        let schedule = KickSchedule::parse("*/10 * * * *").unwrap();
        assert!(schedule.next_occurrence().is_some());
    }

    #[test]
    fn test_next_occurrence_is_in_the_future() {
        let schedule = KickSchedule::parse("* * * * * *").unwrap();
        let next = schedule.next_occurrence().unwrap();
        assert!(next > Utc::now() - chrono::Duration::seconds(1));
    }

    fn test_config() -> AgentConfig {
        AgentConfig::from_lookup(|var| match var {
            ENV_USERNAME => Some("ubnt".into()),
            ENV_PASSWORD => Some("ubnt".into()),
            ENV_GATEWAY => Some("https://192.168.1.20".into()),
            ENV_STAIF => Some("ath0".into()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_tick_does_not_block_next_tick() {
        // First tick fails to authenticate, second succeeds; the scheduler
        // must keep going through the failure.
        let bridge = Arc::new(MockBridge::new());
        bridge.script_login(Err(crate::error::AuthenticationError::MissingCsrfToken));
        bridge.script_login_ok("tok", "SESSION=xyz", "board.hwaddr=001122334455");

        let pipeline = KickPipeline::new(Arc::clone(&bridge), &test_config());
        let scheduler =
            KickScheduler::new(pipeline, KickSchedule::parse("* * * * * *").unwrap());

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        // Two every-second ticks, plus slack for the first to line up.
        tokio::time::sleep(Duration::from_millis(2600)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        assert!(bridge.login_calls() >= 2, "expected at least two ticks");
        assert_eq!(bridge.take_kicks().len(), 1);
    }
}
