//! Connection Factory
//!
//! Assembles the credentials-bearing descriptor used to open connections
//! to the selected replica. Pure data assembly, no I/O.

use crate::domain::entities::SelectedHost;
use crate::domain::value_objects::HostCandidate;
use sqlx::postgres::PgConnectOptions;
use std::fmt;

const REDACTED: &str = "***";

/// A credential that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

/// Opaque handle describing how to reach the cart database.
///
/// Has no `Display` impl and a redacted `Debug`, so it cannot leak the
/// password through logs or error messages.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    host: HostCandidate,
    database: String,
    username: String,
    password: Secret,
}

impl ConnectionDescriptor {
    pub fn host(&self) -> &HostCandidate {
        &self.host
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Driver options for opening a connection.
    pub(crate) fn pg_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new_without_pgpass()
            .host(&self.host.address)
            .port(self.host.port)
            .username(&self.username)
            .database(&self.database);
        if !self.password.is_empty() {
            options = options.password(self.password.expose());
        }
        options
    }

    /// Mask any occurrence of the password in `text`.
    pub fn redact(&self, text: &str) -> String {
        if self.password.is_empty() {
            text.to_string()
        } else {
            text.replace(self.password.expose(), REDACTED)
        }
    }
}

/// Builds descriptors from a host plus the configured credentials.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    database: String,
    username: String,
    password: Secret,
}

impl ConnectionFactory {
    pub fn new(database: impl Into<String>, username: impl Into<String>, password: Secret) -> Self {
        Self {
            database: database.into(),
            username: username.into(),
            password,
        }
    }

    /// Descriptor for the replica chosen at startup.
    pub fn build(&self, selected: &SelectedHost) -> ConnectionDescriptor {
        self.for_host(selected.host())
    }

    /// Descriptor for an arbitrary candidate (used by authenticated probes).
    pub fn for_host(&self, host: &HostCandidate) -> ConnectionDescriptor {
        ConnectionDescriptor {
            host: host.clone(),
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}
