//! The diagnostic probe: individual checks plus the ordered decision procedure
//! that turns them into a single `ConnectionStatus`.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::time::Duration;

use chrono::Utc;
use reqwest::{Method, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::locality;
use super::pinger::{PingOutcome, Pinger, SystemPinger};
use super::types::{CheckKind, CheckResult, ConnectionStatus, DiagnosisReport, StatusReport};
use crate::client::{OllamaClient, TagsResponse, TAGS_PATH};
use crate::config::ProbeConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_PING_COUNT: u32 = 4;

pub const INTERNET_CHECK_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53));
pub const INTERNET_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Endpoints exercised by `get_detailed_status`.
pub const STATUS_ENDPOINTS: &[&str] = &["/api/tags", "/api/version", "/api/health"];

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid base address '{address}': {reason}")]
    InvalidBaseAddress { address: String, reason: String },

    #[error("base address '{0}' has no host")]
    MissingHost(String),

    #[error("invalid internet check address '{address}': {reason}")]
    InvalidInternetCheckAddr { address: String, reason: String },
}

/// Classified response of a single endpoint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
    Success(u16),
    AuthenticationFailed,
    NotFound,
    ServerError(u16),
    RequestFailed(u16),
    TimedOut,
    Transport(String),
    InvalidMethod(String),
}

impl EndpointOutcome {
    /// Status codes are matched in priority order: 401 and 404 win over the
    /// generic 4xx bucket.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => EndpointOutcome::AuthenticationFailed,
            404 => EndpointOutcome::NotFound,
            c if c >= 500 => EndpointOutcome::ServerError(c),
            c if c >= 400 => EndpointOutcome::RequestFailed(c),
            c => EndpointOutcome::Success(c),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EndpointOutcome::Success(_))
    }

    pub fn status(&self) -> ConnectionStatus {
        match self {
            EndpointOutcome::Success(_) => ConnectionStatus::Connected,
            EndpointOutcome::AuthenticationFailed => ConnectionStatus::AuthenticationFailed,
            EndpointOutcome::TimedOut => ConnectionStatus::Timeout,
            EndpointOutcome::ServerError(_) => ConnectionStatus::ResourceUnavailable,
            EndpointOutcome::Transport(_) => ConnectionStatus::ServerUnreachable,
            EndpointOutcome::NotFound
            | EndpointOutcome::RequestFailed(_)
            | EndpointOutcome::InvalidMethod(_) => ConnectionStatus::UnknownError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EndpointOutcome::Success(c) => format!("Endpoint test successful: {}", c),
            EndpointOutcome::AuthenticationFailed => "Authentication failed".to_string(),
            EndpointOutcome::NotFound => "Endpoint not found".to_string(),
            EndpointOutcome::ServerError(c) => format!("Server error: {}", c),
            EndpointOutcome::RequestFailed(c) => format!("Request failed: {}", c),
            EndpointOutcome::TimedOut => "Request timed out".to_string(),
            EndpointOutcome::Transport(e) => format!("Request failed: {}", e),
            EndpointOutcome::InvalidMethod(m) => {
                format!("Request failed: invalid HTTP method '{}'", m)
            }
        }
    }
}

impl From<EndpointOutcome> for CheckResult {
    fn from(outcome: EndpointOutcome) -> Self {
        CheckResult {
            available: outcome.is_success(),
            message: outcome.message(),
        }
    }
}

pub struct DiagnosticProbe {
    base_url: String,
    host: String,
    timeout: Duration,
    is_local: bool,
    model: String,
    ping_count: u32,
    internet_addr: SocketAddr,
    internet_timeout: Duration,
    pinger: Box<dyn Pinger>,
}

impl DiagnosticProbe {
    /// Build a probe for `base_url`. Locality is resolved here, once.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let host = hostname_of(base_url)?;
        let is_local = locality::is_local_host(&host);
        debug!(base_url, host = %host, is_local, "probe configured");

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            timeout,
            is_local,
            model: DEFAULT_MODEL.to_string(),
            ping_count: DEFAULT_PING_COUNT,
            internet_addr: INTERNET_CHECK_ADDR,
            internet_timeout: INTERNET_CHECK_TIMEOUT,
            pinger: Box::new(SystemPinger::detect()),
        })
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let internet_addr = config.internet_check_addr.parse::<SocketAddr>().map_err(|e| {
            ProbeError::InvalidInternetCheckAddr {
                address: config.internet_check_addr.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self::new(&config.base_url, config.timeout())?
            .with_model(&config.model)
            .with_ping_count(config.ping_count)
            .with_internet_check(internet_addr, config.internet_timeout()))
    }

    pub fn with_pinger(mut self, pinger: Box<dyn Pinger>) -> Self {
        self.pinger = pinger;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_ping_count(mut self, count: u32) -> Self {
        self.ping_count = count;
        self
    }

    pub fn with_internet_check(mut self, addr: SocketAddr, timeout: Duration) -> Self {
        self.internet_addr = addr;
        self.internet_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn ping_count(&self) -> u32 {
        self.ping_count
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn is_remote(&self) -> bool {
        !self.is_local
    }

    // ── Individual checks ──────────────────────────────────

    pub fn check_internet_connectivity(&self) -> bool {
        match TcpStream::connect_timeout(&self.internet_addr, self.internet_timeout) {
            Ok(_) => true,
            Err(e) => {
                debug!(addr = %self.internet_addr, error = %e, "internet check failed");
                false
            }
        }
    }

    /// Ping `host`, which may be a bare hostname or an http(s) URL.
    pub fn ping_host(&self, host: &str, count: u32) -> CheckResult {
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            match hostname_of(host) {
                Ok(h) => h,
                Err(e) => return CheckResult::fail(format!("Error pinging {}: {}", host, e)),
            }
        } else {
            host.to_string()
        };

        match self.pinger.ping(&host, count, self.timeout) {
            PingOutcome::Reachable => CheckResult::ok(format!("Successfully pinged {}", host)),
            PingOutcome::Unreachable { stderr } => {
                CheckResult::fail(format!("Failed to ping {}: {}", host, stderr))
            }
            PingOutcome::TimedOut => CheckResult::fail(format!("Ping timeout for {}", host)),
            PingOutcome::Failed { error } => {
                CheckResult::fail(format!("Error pinging {}: {}", host, error))
            }
        }
    }

    pub fn check_remote_server(&self) -> CheckResult {
        if self.is_local {
            return CheckResult::ok("Local server, no ping test needed");
        }

        let ping = self.ping_host(&self.host, self.ping_count);
        if !ping.available {
            return CheckResult::fail(format!("Remote server ping failed: {}", ping.message));
        }
        CheckResult::ok("Remote server is reachable")
    }

    pub fn check_server_availability(&self) -> CheckResult {
        match self.client().and_then(|c| c.get(TAGS_PATH)) {
            Ok(resp) if resp.status() == StatusCode::OK => {
                CheckResult::ok("Server is available and responding")
            }
            Ok(resp) => CheckResult::fail(format!(
                "Server returned status code: {}",
                resp.status().as_u16()
            )),
            Err(e) => CheckResult::fail(format!("Server is not reachable: {}", e)),
        }
    }

    /// Exact, case-sensitive lookup of `model_name` in `/api/tags`.
    pub fn check_model_status(&self, model_name: &str) -> CheckResult {
        let resp = match self.client().and_then(|c| c.get(TAGS_PATH)) {
            Ok(resp) => resp,
            Err(e) => return CheckResult::fail(format!("Error checking model status: {}", e)),
        };

        if resp.status() != StatusCode::OK {
            return CheckResult::fail(format!(
                "Failed to check model status: {}",
                resp.status().as_u16()
            ));
        }

        match resp.json::<TagsResponse>() {
            Ok(tags) if tags.has_model(model_name) => {
                CheckResult::ok(format!("Model {} is available", model_name))
            }
            Ok(_) => CheckResult::fail(format!("Model {} is not loaded", model_name)),
            Err(e) => CheckResult::fail(format!("Error checking model status: {}", e)),
        }
    }

    pub fn test_endpoint(
        &self,
        endpoint: &str,
        method: &str,
        data: Option<&serde_json::Value>,
    ) -> CheckResult {
        self.probe_endpoint(endpoint, method, data).into()
    }

    /// Like `test_endpoint`, but keeps the classified outcome.
    pub fn probe_endpoint(
        &self,
        endpoint: &str,
        method: &str,
        data: Option<&serde_json::Value>,
    ) -> EndpointOutcome {
        let method = match Method::from_bytes(method.to_ascii_uppercase().as_bytes()) {
            Ok(m) => m,
            Err(_) => return EndpointOutcome::InvalidMethod(method.to_string()),
        };

        let result = self
            .client()
            .and_then(|c| c.request(method.clone(), endpoint, data));

        let outcome = match result {
            Ok(resp) => EndpointOutcome::from_status(resp.status().as_u16()),
            Err(e) if e.is_timeout() => EndpointOutcome::TimedOut,
            Err(e) => EndpointOutcome::Transport(e.to_string()),
        };
        debug!(%method, endpoint, ?outcome, "endpoint tested");
        outcome
    }

    // ── Composite procedures ───────────────────────────────

    /// Run the checks in order and stop at the first one that fails.
    pub fn test_connection(&self) -> DiagnosisReport {
        let mut report = DiagnosisReport::new();

        let has_internet = self.check_internet_connectivity();
        report.record(CheckKind::Internet, internet_result(has_internet));
        if !has_internet {
            return finish(report, ConnectionStatus::NoInternet);
        }

        if self.is_remote() {
            let remote = self.check_remote_server();
            let available = remote.available;
            report.record(CheckKind::Remote, remote);
            if !available {
                return finish(report, ConnectionStatus::RemoteServerUnreachable);
            }
        }

        let server = self.check_server_availability();
        let available = server.available;
        report.record(CheckKind::Server, server);
        if !available {
            return finish(report, ConnectionStatus::ServerUnreachable);
        }

        let model = self.check_model_status(&self.model);
        let available = model.available;
        report.record(CheckKind::Model, model);
        if !available {
            return finish(report, ConnectionStatus::ModelNotLoaded);
        }

        finish(report, ConnectionStatus::Connected)
    }

    /// Run every check regardless of earlier failures.
    pub fn get_detailed_status(&self) -> StatusReport {
        let mut tests = vec![(
            CheckKind::Internet.to_string(),
            internet_result(self.check_internet_connectivity()),
        )];

        if self.is_remote() {
            tests.push((CheckKind::Remote.to_string(), self.check_remote_server()));
        }

        for endpoint in STATUS_ENDPOINTS {
            tests.push((endpoint.to_string(), self.test_endpoint(endpoint, "GET", None)));
        }

        StatusReport {
            timestamp: Utc::now(),
            base_address: self.base_url.clone(),
            request_timeout_secs: self.timeout.as_secs_f64(),
            is_local: self.is_local,
            tests,
        }
    }

    fn client(&self) -> reqwest::Result<OllamaClient> {
        OllamaClient::new(&self.base_url, self.timeout)
    }
}

fn internet_result(available: bool) -> CheckResult {
    if available {
        CheckResult::ok("Internet is available")
    } else {
        CheckResult::fail("No internet connection")
    }
}

fn finish(mut report: DiagnosisReport, status: ConnectionStatus) -> DiagnosisReport {
    if status.is_connected() {
        info!(%status, "diagnosis complete");
    } else {
        warn!(%status, checks = report.details.len(), "diagnosis found a problem");
    }
    report.status = status;
    report
}

/// Hostname of a URL, with IPv6 brackets stripped.
fn hostname_of(url: &str) -> Result<String, ProbeError> {
    let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidBaseAddress {
        address: url.to_string(),
        reason: e.to_string(),
    })?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProbeError::MissingHost(url.to_string()))?;
    Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
}
