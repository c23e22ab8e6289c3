use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Best explanation for why the server (or its model) can or cannot be used.
///
/// `test_connection` only ever produces `Connected`, `NoInternet`,
/// `RemoteServerUnreachable`, `ServerUnreachable` and `ModelNotLoaded`.
/// The remaining variants are reached through `EndpointOutcome::status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    NoInternet,
    ServerUnreachable,
    ModelNotLoaded,
    AuthenticationFailed,
    Timeout,
    ResourceUnavailable,
    RemoteServerUnreachable,
    #[default]
    UnknownError,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Next step to suggest to a user, if there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConnectionStatus::Connected => None,
            ConnectionStatus::NoInternet => Some("check your network connection"),
            ConnectionStatus::RemoteServerUnreachable => {
                Some("the remote host does not answer ping; check the address or firewall")
            }
            ConnectionStatus::ServerUnreachable => Some("start the server with `ollama serve`"),
            ConnectionStatus::ModelNotLoaded => Some("pull the model with `ollama pull <model>`"),
            ConnectionStatus::AuthenticationFailed => Some("check the credentials of the proxy in front of the server"),
            ConnectionStatus::Timeout => Some("raise --timeout or check server load"),
            ConnectionStatus::ResourceUnavailable => Some("the server is overloaded or failing; check its logs"),
            ConnectionStatus::UnknownError => None,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::NoInternet => "no_internet",
            ConnectionStatus::ServerUnreachable => "server_unreachable",
            ConnectionStatus::ModelNotLoaded => "model_not_loaded",
            ConnectionStatus::AuthenticationFailed => "authentication_failed",
            ConnectionStatus::Timeout => "timeout",
            ConnectionStatus::ResourceUnavailable => "resource_unavailable",
            ConnectionStatus::RemoteServerUnreachable => "remote_server_unreachable",
            ConnectionStatus::UnknownError => "unknown_error",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub available: bool,
    pub message: String,
}

impl CheckResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            available: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            available: false,
            message: message.into(),
        }
    }
}

/// Steps of the composite diagnosis, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Internet,
    Remote,
    Server,
    Model,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Internet => write!(f, "internet"),
            CheckKind::Remote => write!(f, "remote"),
            CheckKind::Server => write!(f, "server"),
            CheckKind::Model => write!(f, "model"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub timestamp: DateTime<Utc>,
    pub status: ConnectionStatus,
    pub details: BTreeMap<CheckKind, CheckResult>,
}

impl DiagnosisReport {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            status: ConnectionStatus::default(),
            details: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, kind: CheckKind, result: CheckResult) {
        self.details.insert(kind, result);
    }
}

/// Exhaustive, non-short-circuiting view of the server.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub timestamp: DateTime<Utc>,
    pub base_address: String,
    pub request_timeout_secs: f64,
    pub is_local: bool,
    /// In the order the checks ran; serialized as a map.
    #[serde(serialize_with = "ordered_map")]
    pub tests: Vec<(String, CheckResult)>,
}

impl StatusReport {
    pub fn test(&self, name: &str) -> Option<&CheckResult> {
        self.tests
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, result)| result)
    }
}

fn ordered_map<S: Serializer>(
    tests: &[(String, CheckResult)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(tests.iter().map(|(name, result)| (name, result)))
}
