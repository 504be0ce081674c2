//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::errors::ConfigError;
use std::fmt;

/// Standard PostgreSQL port, used when a host entry omits one.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// One candidate replica endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostCandidate {
    /// Hostname or IP literal (IPv6 without brackets)
    pub address: String,
    /// TCP port
    pub port: u16,
}

impl HostCandidate {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Parse a single `host[:port]` entry.
    ///
    /// Accepts `[v6addr]:port` and `[v6addr]` as well. Surrounding whitespace
    /// is ignored; a missing port falls back to [`DEFAULT_POSTGRES_PORT`].
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let entry = entry.trim();
        let invalid = || ConfigError::InvalidHost(entry.to_string());

        if entry.is_empty() {
            return Err(invalid());
        }

        let (address, port) = if let Some(rest) = entry.strip_prefix('[') {
            let (addr, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (addr, None),
                _ => (addr, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match entry.split_once(':') {
                Some((addr, port)) => (addr, Some(port)),
                None => (entry, None),
            }
        };

        let address = address.trim();
        if address.is_empty() {
            return Err(invalid());
        }

        let port = match port.map(str::trim) {
            None | Some("") => DEFAULT_POSTGRES_PORT,
            Some(p) => p.parse::<u16>().map_err(|_| invalid())?,
        };

        Ok(Self::new(address, port))
    }

    /// Address in `host:port` form, bracketing IPv6 literals.
    pub fn socket_addr_string(&self) -> String {
        if self.address.contains(':') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

impl fmt::Display for HostCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.socket_addr_string())
    }
}

/// Parse a comma-separated host list such as `"h1:5432, h2"`.
///
/// Empty entries are skipped. An empty result is a configuration error.
pub fn parse_host_list(list: &str) -> Result<Vec<HostCandidate>, ConfigError> {
    let hosts = list
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(HostCandidate::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if hosts.is_empty() {
        return Err(ConfigError::NoCandidates);
    }
    Ok(hosts)
}

/// Validated name of the cart table.
///
/// The name ends up inside SQL text, so only plain identifiers
/// (optionally `schema.table`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(ConfigError::InvalidTableName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// How AddItem writes the new total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertMode {
    /// Read the current quantity, add, then overwrite. Concurrent callers on
    /// the same (user, product) pair can lose updates.
    #[default]
    ReadThenWrite,
    /// Single increment-or-insert statement, no separate read.
    Atomic,
}

impl UpsertMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "read-then-write" | "read_then_write" => Some(Self::ReadThenWrite),
            "atomic" => Some(Self::Atomic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadThenWrite => "read-then-write",
            Self::Atomic => "atomic",
        }
    }
}

/// Round-trip used to time a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeKind {
    /// Bare TCP connect
    #[default]
    Tcp,
    /// Authenticated connection running `SELECT version()`
    Query,
}

impl ProbeKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "query" => Some(Self::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Query => "query",
        }
    }
}
