// ============================================
// File: crates/airkick-agent/src/config.rs
// ============================================
//! # Agent Configuration
//!
//! ## Creation Reason
//! All deployment-specific knobs (device credentials, gateway URL, target
//! interface, schedule) arrive through the environment, as the service
//! manager injects them. They are read and validated exactly once at
//! startup into an explicit `AgentConfig`, then passed by reference into
//! the pipeline. No ambient lookups inside components.
//!
//! ## Variables
//! - `AIRKICK_USERNAME` / `AIRKICK_PASSWORD`: device account (required)
//! - `AIRKICK_GATEWAY`: base URL of the device web UI (required, https;
//!   plain http is tolerated for loopback hosts so bench setups and the
//!   driver's own tests can run without TLS)
//! - `AIRKICK_STAIF`: wireless interface name the kick targets (required)
//! - `AIRKICK_SCHEDULE`: cron expression, required for the `run` command
//! - `AIRKICK_TIMEOUT_SECS`: per-request timeout, default 15
//! - `AIRKICK_ACCEPT_INVALID_CERTS`: default true; the device certificate
//!   is self-signed and known out-of-band
//! - `AIRKICK_LOG`: log level, default "info"
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Credentials must never appear in logs; `Debug` redacts the password
//! - Config changes require an agent restart
//!
//! ## Last Modified
//! v0.2.0 - Environment sourcing with per-field validation

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{AgentError, Result};
use crate::scheduler::KickSchedule;

// ============================================
// Environment variable names
// ============================================

/// Device account username.
pub const ENV_USERNAME: &str = "AIRKICK_USERNAME";
/// Device account password.
pub const ENV_PASSWORD: &str = "AIRKICK_PASSWORD";
/// Gateway base URL.
pub const ENV_GATEWAY: &str = "AIRKICK_GATEWAY";
/// Wireless interface name passed as `staif`.
pub const ENV_STAIF: &str = "AIRKICK_STAIF";
/// Cron schedule expression.
pub const ENV_SCHEDULE: &str = "AIRKICK_SCHEDULE";
/// Per-request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "AIRKICK_TIMEOUT_SECS";
/// Whether to accept the device's self-signed certificate.
pub const ENV_ACCEPT_INVALID_CERTS: &str = "AIRKICK_ACCEPT_INVALID_CERTS";
/// Log level.
pub const ENV_LOG: &str = "AIRKICK_LOG";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================
// AgentConfig
// ============================================

/// Immutable agent configuration, validated once at startup.
#[derive(Clone)]
pub struct AgentConfig {
    /// Device account username.
    pub username: String,
    /// Device account password. Redacted from `Debug` output.
    pub password: String,
    /// Base URL of the device web UI.
    pub gateway: Url,
    /// Wireless interface name the kick targets.
    pub sta_interface: String,
    /// Run cadence; `None` when only one-shot commands are used.
    pub schedule: Option<KickSchedule>,
    /// Per-request timeout for both device calls.
    pub request_timeout: Duration,
    /// Accept the device's self-signed certificate. The trust decision is
    /// deliberate and local to the HTTP client construction.
    pub accept_invalid_certs: bool,
    /// Log level used when the environment sets no filter of its own.
    pub log_level: String,
}

impl AgentConfig {
    /// Builds the configuration from the process environment.
    ///
    /// A `.env` file is loaded first when present; absence is normal.
    ///
    /// # Errors
    /// Returns a [`ConfigMissing`](AgentError::ConfigMissing) or
    /// [`ConfigInvalid`](AgentError::ConfigInvalid) error naming the
    /// offending variable.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// The indirection keeps validation testable without mutating the
    /// process environment.
    ///
    /// # Errors
    /// Same contract as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = require(&lookup, ENV_USERNAME)?;
        let password = require(&lookup, ENV_PASSWORD)?;
        let gateway = parse_gateway(&require(&lookup, ENV_GATEWAY)?)?;
        let sta_interface = require(&lookup, ENV_STAIF)?;

        let schedule = match lookup(ENV_SCHEDULE) {
            Some(expr) if !expr.trim().is_empty() => Some(KickSchedule::parse(&expr)?),
            _ => None,
        };

        let request_timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AgentError::config_invalid(ENV_TIMEOUT_SECS, "must be a whole number of seconds")
                })?;
                if secs == 0 {
                    return Err(AgentError::config_invalid(
                        ENV_TIMEOUT_SECS,
                        "must be greater than 0",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let accept_invalid_certs = match lookup(ENV_ACCEPT_INVALID_CERTS) {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| AgentError::config_invalid(ENV_ACCEPT_INVALID_CERTS, "expected true or false"))?,
            None => true,
        };

        let log_level = lookup(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            username,
            password,
            gateway,
            sta_interface,
            schedule,
            request_timeout,
            accept_invalid_certs,
            log_level,
        })
    }

    /// Returns the schedule, failing when none was configured.
    ///
    /// # Errors
    /// Returns [`ConfigMissing`](AgentError::ConfigMissing) for
    /// [`ENV_SCHEDULE`].
    pub fn schedule(&self) -> Result<&KickSchedule> {
        self.schedule
            .as_ref()
            .ok_or_else(|| AgentError::config_missing(ENV_SCHEDULE))
    }
}

// Credentials must never leak through debug logging.
impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("gateway", &self.gateway.as_str())
            .field("sta_interface", &self.sta_interface)
            .field("schedule", &self.schedule)
            .field("request_timeout", &self.request_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

// ============================================
// Helpers
// ============================================

fn require<F>(lookup: &F, var: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AgentError::config_missing(var))
}

fn parse_gateway(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AgentError::config_invalid(ENV_GATEWAY, e.to_string()))?;

    if url.host_str().is_none() {
        return Err(AgentError::config_invalid(ENV_GATEWAY, "URL has no host"));
    }

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback_host(&url) => Ok(url),
        other => Err(AgentError::config_invalid(
            ENV_GATEWAY,
            format!("scheme '{other}' not allowed; the device is reached over https"),
        )),
    }
}

fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================
// Tests
// ============================================
