// ============================================
// File: crates/airkick-agent/src/device/client.rs
// ============================================
//! # HTTP Bridge Driver
//!
//! ## Creation Reason
//! The production [`BridgeDriver`] implementation. Speaks the device web
//! UI's API directly: form-encoded login against `/api/auth`, then the
//! authenticated kick against `/stakick.cgi`.
//!
//! ## TLS
//! The device ships a self-signed certificate, so certificate verification
//! is skipped when (and only when) the explicit `accept_invalid_certs`
//! config flag says so. The same client instance carries both calls; the
//! kick must ride the connection settings the login established.
//!
//! ## ⚠️ Important Note for Next Developer
//! - The form content type must keep its `;charset=UTF-8` suffix and the
//!   `staid` value must stay colon-delimited; the firmware rejects
//!   anything else
//!
//! ## Last Modified
//! v0.2.0 - Initial HTTP driver

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use serde::Deserialize;
use tracing::debug;

use airkick_core::{collapse_cookies, AuthSession};

use crate::config::AgentConfig;
use crate::error::{AgentError, AuthenticationError, CommandSubmissionError};

use super::{
    BridgeDriver, Credentials, KickTarget, LoginOutcome, AUTH_PATH, CSRF_HEADER,
    FORM_CONTENT_TYPE, KICK_PATH,
};

// ============================================
// HttpBridge
// ============================================

/// reqwest-backed driver for the device web API.
pub struct HttpBridge {
    http: reqwest::Client,
    gateway: String,
}

impl HttpBridge {
    /// Builds the driver from validated configuration.
    ///
    /// # Errors
    /// Returns [`AgentError::StartupFailed`] when the HTTP client cannot
    /// be constructed.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AgentError::startup_failed(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            gateway: config.gateway.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.gateway, path)
    }
}

impl std::fmt::Debug for HttpBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBridge")
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Subset of the auth response body the agent consumes.
#[derive(Debug, Deserialize)]
struct AuthResponseBody {
    boardinfo: String,
}

#[async_trait]
impl BridgeDriver for HttpBridge {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, AuthenticationError> {
        let url = self.endpoint(AUTH_PATH);

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &credentials.username)
            .append_pair("password", &credentials.password)
            .finish();

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|source| AuthenticationError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthenticationError::Rejected { status });
        }

        let csrf_token = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(AuthenticationError::MissingCsrfToken)?;

        let cookies = collapse_cookies(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        if cookies.is_empty() {
            return Err(AuthenticationError::MissingCookies);
        }

        let body: AuthResponseBody = response
            .json()
            .await
            .map_err(|source| AuthenticationError::Body { source })?;

        debug!("device session established");
        Ok(LoginOutcome {
            session: AuthSession::new(csrf_token, cookies),
            boardinfo: body.boardinfo,
        })
    }

    async fn kick_station(
        &self,
        session: &AuthSession,
        target: &KickTarget,
    ) -> Result<(), CommandSubmissionError> {
        if !session.is_complete() {
            return Err(CommandSubmissionError::IncompleteSession);
        }

        let url = self.endpoint(KICK_PATH);

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("staif", &target.interface)
            .append_pair("staid", &target.station.to_string())
            .finish();

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CSRF_HEADER, session.csrf_token())
            .header(COOKIE, session.cookies())
            .body(body)
            .send()
            .await
            .map_err(|source| CommandSubmissionError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommandSubmissionError::Rejected { status });
        }

        debug!(station = %target.station, "kick accepted");
        Ok(())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    use airkick_core::StationId;
    use crate::config::{AgentConfig, ENV_GATEWAY, ENV_PASSWORD, ENV_STAIF, ENV_USERNAME};

    /// Canned single-shot HTTP device: serves one response per connection,
    /// in order, and hands every raw request back to the test.
    struct MockDevice {
        addr: SocketAddr,
        requests: mpsc::UnboundedReceiver<String>,
    }

    impl MockDevice {
        async fn spawn(responses: Vec<String>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, requests) = mpsc::unbounded_channel();

            tokio::spawn(async move {
                for response in responses {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        return;
                    };
                    let request = read_request(&mut socket).await;
                    let _ = tx.send(request);
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            Self { addr, requests }
        }

        fn gateway(&self) -> String {
            format!("http://{}", self.addr)
        }

        async fn next_request(&mut self) -> String {
            self.requests.recv().await.expect("no request captured")
        }
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + content_length {
                    return String::from_utf8_lossy(&buf[..pos + 4 + content_length])
                        .to_string();
                }
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return String::from_utf8_lossy(&buf).to_string();
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn http_response(status_line: &str, headers: &[&str], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {status_line}\r\n");
        for header in headers {
            response.push_str(header);
            response.push_str("\r\n");
        }
        response.push_str(&format!("Content-Length: {}\r\n", body.len()));
        response.push_str("Connection: close\r\n\r\n");
        response.push_str(body);
        response
    }

    fn auth_ok_response() -> String {
        let body = serde_json::json!({
            "boardinfo": "board.hwaddr=001122334455\nother=val"
        });
        http_response(
            "200 OK",
            &[
                "x-csrf-id: tok123",
                "Set-Cookie: SESSION=xyz; Path=/",
                "Content-Type: application/json",
            ],
            &body.to_string(),
        )
    }

    fn driver_for(gateway: &str) -> HttpBridge {
        let config = AgentConfig::from_lookup(|var| match var {
            ENV_USERNAME => Some("ubnt".into()),
            ENV_PASSWORD => Some("ubnt".into()),
            ENV_GATEWAY => Some(gateway.to_string()),
            ENV_STAIF => Some("ath0".into()),
            _ => None,
        })
        .unwrap();
        HttpBridge::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_extracts_artifacts() {
        let mut device = MockDevice::spawn(vec![http_response(
            "200 OK",
            &[
                "x-csrf-id: tok123",
                "Set-Cookie: AIROS_SESSIONID=deadbeef; Path=/; HttpOnly",
                "Set-Cookie: last_ip=10.0.0.2; Expires=Wed, 01 Jan 2031 00:00:00 GMT",
                "Content-Type: application/json",
            ],
            r#"{"boardinfo":"board.hwaddr=AABBCCDDEEFF"}"#,
        )])
        .await;

        let driver = driver_for(&device.gateway());
        let outcome = driver
            .authenticate(&Credentials::new("ubnt", "ubnt"))
            .await
            .unwrap();

        assert_eq!(outcome.session.csrf_token(), "tok123");
        assert_eq!(
            outcome.session.cookies(),
            "AIROS_SESSIONID=deadbeef; last_ip=10.0.0.2"
        );
        assert_eq!(outcome.boardinfo, "board.hwaddr=AABBCCDDEEFF");

        let request = device.next_request().await;
        let head = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/auth HTTP/1.1"));
        assert!(head.contains("content-type: application/x-www-form-urlencoded;charset=utf-8"));
        assert!(request.ends_with("username=ubnt&password=ubnt"));
    }

    #[tokio::test]
    async fn test_authenticate_encodes_credentials() {
        let mut device = MockDevice::spawn(vec![auth_ok_response()]).await;
        let driver = driver_for(&device.gateway());

        driver
            .authenticate(&Credentials::new("admin", "p&ss=word"))
            .await
            .unwrap();

        let request = device.next_request().await;
        assert!(request.ends_with("username=admin&password=p%26ss%3Dword"));
    }

    #[tokio::test]
    async fn test_authenticate_rejected_status() {
        let mut device = MockDevice::spawn(vec![http_response(
            "401 Unauthorized",
            &[],
            "",
        )])
        .await;
        let driver = driver_for(&device.gateway());

        let err = driver
            .authenticate(&Credentials::new("ubnt", "wrong"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AuthenticationError::Rejected { status } if status.as_u16() == 401)
        );
        let _ = device.next_request().await;
    }

    #[tokio::test]
    async fn test_authenticate_missing_csrf_header() {
        let mut device = MockDevice::spawn(vec![http_response(
            "200 OK",
            &["Set-Cookie: SESSION=xyz; Path=/"],
            r#"{"boardinfo":""}"#,
        )])
        .await;
        let driver = driver_for(&device.gateway());

        let err = driver
            .authenticate(&Credentials::new("ubnt", "ubnt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::MissingCsrfToken));
        let _ = device.next_request().await;
    }

    #[tokio::test]
    async fn test_authenticate_missing_cookies() {
        let device = MockDevice::spawn(vec![http_response(
            "200 OK",
            &["x-csrf-id: tok123"],
            r#"{"boardinfo":""}"#,
        )])
        .await;
        let driver = driver_for(&device.gateway());

        let err = driver
            .authenticate(&Credentials::new("ubnt", "ubnt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::MissingCookies));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_body() {
        let device = MockDevice::spawn(vec![http_response(
            "200 OK",
            &["x-csrf-id: tok123", "Set-Cookie: SESSION=xyz"],
            "<html>login ok</html>",
        )])
        .await;
        let driver = driver_for(&device.gateway());

        let err = driver
            .authenticate(&Credentials::new("ubnt", "ubnt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::Body { .. }));
    }

    #[tokio::test]
    async fn test_kick_station_carries_session() {
        let mut device = MockDevice::spawn(vec![http_response("200 OK", &[], "")]).await;
        let driver = driver_for(&device.gateway());

        let session = AuthSession::new("tok123", "SESSION=xyz");
        let target = KickTarget {
            interface: "ath0".to_string(),
            station: StationId::from_hwaddr("001122334455").unwrap(),
        };
        driver.kick_station(&session, &target).await.unwrap();

        let request = device.next_request().await;
        let head = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /stakick.cgi HTTP/1.1"));
        assert!(head.contains("x-csrf-id: tok123"));
        assert!(head.contains("cookie: session=xyz"));
        assert!(head.contains("content-type: application/x-www-form-urlencoded;charset=utf-8"));
        // form_urlencoded percent-encodes the colons, as the web UI does
        assert!(request.ends_with("staif=ath0&staid=00%3A11%3A22%3A33%3A44%3A55"));
    }

    #[tokio::test]
    async fn test_kick_station_rejected() {
        let mut device = MockDevice::spawn(vec![http_response(
            "500 Internal Server Error",
            &[],
            "",
        )])
        .await;
        let driver = driver_for(&device.gateway());

        let session = AuthSession::new("tok123", "SESSION=xyz");
        let target = KickTarget {
            interface: "ath0".to_string(),
            station: StationId::from_hwaddr("001122334455").unwrap(),
        };
        let err = driver.kick_station(&session, &target).await.unwrap_err();
        assert!(
            matches!(err, CommandSubmissionError::Rejected { status } if status.as_u16() == 500)
        );
        let _ = device.next_request().await;
    }

    #[tokio::test]
    async fn test_kick_refuses_incomplete_session() {
        // No server: the driver must bail before any request is made.
        let driver = driver_for("http://127.0.0.1:9");

        let target = KickTarget {
            interface: "ath0".to_string(),
            station: StationId::from_hwaddr("001122334455").unwrap(),
        };
        let err = driver
            .kick_station(&AuthSession::new("", ""), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandSubmissionError::IncompleteSession));
    }

    #[tokio::test]
    async fn test_full_pipeline_against_device() {
        use crate::pipeline::KickPipeline;

        let mut device = MockDevice::spawn(vec![
            http_response(
                "200 OK",
                &[
                    "x-csrf-id: tok123",
                    "Set-Cookie: SESSION=xyz; Path=/",
                    "Content-Type: application/json",
                ],
                r#"{"boardinfo":"board.hwaddr=001122334455\nother=val"}"#,
            ),
            http_response("200 OK", &[], ""),
        ])
        .await;

        let config = AgentConfig::from_lookup(|var| match var {
            ENV_USERNAME => Some("ubnt".into()),
            ENV_PASSWORD => Some("ubnt".into()),
            ENV_GATEWAY => Some(device.gateway()),
            ENV_STAIF => Some("ath0".into()),
            _ => None,
        })
        .unwrap();
        let pipeline = KickPipeline::new(HttpBridge::new(&config).unwrap(), &config);

        let report = pipeline.run_once().await.unwrap();
        assert_eq!(report.station.to_string(), "00:11:22:33:44:55");

        let auth_request = device.next_request().await;
        assert!(auth_request.starts_with("POST /api/auth HTTP/1.1"));

        let kick_request = device.next_request().await;
        let head = kick_request.to_ascii_lowercase();
        assert!(kick_request.starts_with("POST /stakick.cgi HTTP/1.1"));
        assert!(head.contains("x-csrf-id: tok123"));
        assert!(head.contains("cookie: session=xyz"));
        assert!(kick_request.ends_with("staif=ath0&staid=00%3A11%3A22%3A33%3A44%3A55"));
    }

    #[tokio::test]
    async fn test_full_pipeline_auth_rejection_stops_short() {
        use crate::pipeline::KickPipeline;

        // Only one response scripted; the captured-request channel proves
        // only the auth call was made.
        let mut device =
            MockDevice::spawn(vec![http_response("401 Unauthorized", &[], "")]).await;

        let config = AgentConfig::from_lookup(|var| match var {
            ENV_USERNAME => Some("ubnt".into()),
            ENV_PASSWORD => Some("wrong".into()),
            ENV_GATEWAY => Some(device.gateway()),
            ENV_STAIF => Some("ath0".into()),
            _ => None,
        })
        .unwrap();
        let pipeline = KickPipeline::new(HttpBridge::new(&config).unwrap(), &config);

        let err = pipeline.run_once().await.unwrap_err();
        assert_eq!(err.phase().to_string(), "authenticating");

        let auth_request = device.next_request().await;
        assert!(auth_request.starts_with("POST /api/auth HTTP/1.1"));
        assert!(
            device.requests.try_recv().is_err(),
            "no kick request may follow a rejected login"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_request_error() {
        // Nothing listens on this port.
        let driver = driver_for("http://127.0.0.1:9");

        let err = driver
            .authenticate(&Credentials::new("ubnt", "ubnt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::Request { .. }));
    }
}
