use crate::domain::errors::ConfigError;
use crate::domain::value_objects::{parse_host_list, HostCandidate, ProbeKind, TableName, UpsertMode};
use crate::infrastructure::connection_factory::Secret;
use crate::infrastructure::probe_runner::ProbePolicy;
use std::time::Duration;

pub const ENV_DATABASE_NAME: &str = "POSTGRES_DATABASE_NAME";
pub const ENV_HOSTS_LIST: &str = "PGEDGE_HOSTS_LIST";
pub const ENV_USERNAME: &str = "POSTGRES_USERNAME";
pub const ENV_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const ENV_TABLE_NAME: &str = "POSTGRES_TABLE_NAME";
pub const ENV_BACKEND: &str = "CARTSTORE_BACKEND";
pub const ENV_SQLITE_PATH: &str = "CARTSTORE_SQLITE_PATH";
pub const ENV_PROBE_KIND: &str = "CARTSTORE_PROBE_KIND";
pub const ENV_PROBE_ATTEMPTS: &str = "CARTSTORE_PROBE_ATTEMPTS";
pub const ENV_PROBE_DELAY_MS: &str = "CARTSTORE_PROBE_DELAY_MS";
pub const ENV_PROBE_TIMEOUT_MS: &str = "CARTSTORE_PROBE_TIMEOUT_MS";
pub const ENV_UPSERT_MODE: &str = "CARTSTORE_UPSERT_MODE";

/// Upper bound for `CARTSTORE_PROBE_ATTEMPTS`.
pub const MAX_PROBE_ATTEMPTS: u32 = 100;

/// Which store the cart table lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Replicated PostgreSQL, with latency-based host selection
    Postgres,
    /// Local SQLite file
    Sqlite,
}

/// Process configuration, read once at startup.
///
/// `Debug` output is safe to log: the password is a [`Secret`].
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub database_name: String,
    pub hosts: Vec<HostCandidate>,
    pub username: String,
    pub password: Secret,
    pub table: TableName,
    pub sqlite_path: String,
    pub probe_kind: ProbeKind,
    pub probe: ProbePolicy,
    pub upsert_mode: UpsertMode,
    pub debug: bool,
}

impl Config {
    /// Build the configuration from a key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let backend = match get(ENV_BACKEND) {
            None => StoreBackend::Postgres,
            Some(v) => match v.to_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "sqlite" => StoreBackend::Sqlite,
                _ => return Err(invalid(ENV_BACKEND, v)),
            },
        };

        let table = TableName::parse(&require(ENV_TABLE_NAME)?)?;

        let (database_name, hosts, username) = match backend {
            StoreBackend::Postgres => (
                require(ENV_DATABASE_NAME)?,
                parse_host_list(&require(ENV_HOSTS_LIST)?)?,
                require(ENV_USERNAME)?,
            ),
            StoreBackend::Sqlite => (
                get(ENV_DATABASE_NAME).unwrap_or_default(),
                Vec::new(),
                get(ENV_USERNAME).unwrap_or_default(),
            ),
        };

        // Passwords are taken verbatim, surrounding spaces included.
        let password = Secret::new(lookup(ENV_PASSWORD).unwrap_or_default());

        let probe_kind = match get(ENV_PROBE_KIND) {
            None => ProbeKind::default(),
            Some(v) => ProbeKind::parse(&v).ok_or_else(|| invalid(ENV_PROBE_KIND, v))?,
        };

        let upsert_mode = match get(ENV_UPSERT_MODE) {
            None => UpsertMode::default(),
            Some(v) => UpsertMode::parse(&v).ok_or_else(|| invalid(ENV_UPSERT_MODE, v))?,
        };

        let defaults = ProbePolicy::default();
        let probe = ProbePolicy {
            attempts: parse_number(ENV_PROBE_ATTEMPTS, get(ENV_PROBE_ATTEMPTS))?
                .map(probe_attempts)
                .transpose()?
                .unwrap_or(defaults.attempts),
            delay: parse_number(ENV_PROBE_DELAY_MS, get(ENV_PROBE_DELAY_MS))?
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
            timeout: parse_number(ENV_PROBE_TIMEOUT_MS, get(ENV_PROBE_TIMEOUT_MS))?
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        };

        Ok(Self {
            backend,
            database_name,
            hosts,
            username,
            password,
            table,
            sqlite_path: get(ENV_SQLITE_PATH).unwrap_or_else(|| "cart.db".to_string()),
            probe_kind,
            probe,
            upsert_mode,
            debug: lookup("DEBUG").is_some(),
        })
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}

/// Zero is raised to one attempt; anything above [`MAX_PROBE_ATTEMPTS`] is rejected.
fn probe_attempts(value: u64) -> Result<u32, ConfigError> {
    u32::try_from(value)
        .ok()
        .filter(|n| *n <= MAX_PROBE_ATTEMPTS)
        .map(|n| n.max(1))
        .ok_or_else(|| invalid(ENV_PROBE_ATTEMPTS, value.to_string()))
}

fn parse_number(key: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| v.parse::<u64>().map_err(|_| invalid(key, v)))
        .transpose()
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    Config::from_lookup(|key| std::env::var(key).ok())
}
