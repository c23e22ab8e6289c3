use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::probe::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PING_COUNT, DEFAULT_TIMEOUT, INTERNET_CHECK_ADDR,
    INTERNET_CHECK_TIMEOUT,
};

pub const ENV_PREFIX: &str = "OLLAMA_PROBE_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub model: String,
    pub internet_check_addr: String,
    pub internet_timeout_secs: u64,
    pub ping_count: u32,
    pub log_level: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            model: DEFAULT_MODEL.to_string(),
            internet_check_addr: INTERNET_CHECK_ADDR.to_string(),
            internet_timeout_secs: INTERNET_CHECK_TIMEOUT.as_secs(),
            ping_count: DEFAULT_PING_COUNT,
            log_level: "warn".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("ollama-probe").join("config.yaml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn internet_timeout(&self) -> Duration {
        Duration::from_secs(self.internet_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        self.internet_check_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("internet_check_addr '{}'", self.internet_check_addr))?;
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.internet_timeout_secs == 0 {
            bail!("internet_timeout_secs must be greater than zero");
        }
        if self.ping_count == 0 {
            bail!("ping_count must be greater than zero");
        }
        Ok(())
    }
}

/// Defaults, then the YAML file (explicit path or the default location), then
/// `OLLAMA_PROBE_*` environment variables.
pub fn load(path: Option<&Path>) -> Result<ProbeConfig> {
    let path = match path {
        Some(p) if !p.exists() => bail!("config file {} does not exist", p.display()),
        Some(p) => p.to_path_buf(),
        None => ProbeConfig::path()?,
    };
    load_from(&path, Env::prefixed(ENV_PREFIX))
}

fn load_from(path: &Path, env: Env) -> Result<ProbeConfig> {
    let config: ProbeConfig = Figment::from(Serialized::defaults(ProbeConfig::default()))
        .merge(Yaml::file(path))
        .merge(env)
        .extract()
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
