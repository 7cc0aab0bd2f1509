use super::errors::ConfigError;
use crate::dns_record::RecordType;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Query policy handed to the resolver engine: which servers to ask, how
/// long to wait for each attempt and how many times to re-send.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Ordered server list, each `IP` or `IP:PORT`.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Re-sends to the same server after a timeout, before failing over.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_true")]
    pub recursion_desired: bool,

    #[serde(default = "default_record_type")]
    pub record_type: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            recursion_desired: true,
            record_type: default_record_type(),
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn server_addrs(&self) -> Result<Vec<SocketAddr>, DomainError> {
        self.servers.iter().map(|s| parse_server(s)).collect()
    }

    pub fn query_type(&self) -> Result<RecordType, ConfigError> {
        self.record_type
            .parse::<RecordType>()
            .map_err(ConfigError::Validation)
    }
}

/// Parses `IP`, `IP:PORT` or `[IPv6]:PORT`; a bare address gets port 53.
pub fn parse_server(s: &str) -> Result<SocketAddr, DomainError> {
    let trimmed = s.trim();
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let bare = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    bare.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| DomainError::InvalidServer(s.to_string()))
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()]
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_record_type() -> String {
    "A".to_string()
}
