//! Domain Errors
//!
//! Construction-time failures are [`ConfigError`]; everything an operation
//! can surface to a caller is a [`CartError`].

/// Configuration and replica-selection errors. Fatal at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not configured")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid host entry {0:?}")]
    InvalidHost(String),
    #[error("invalid table name {0:?}")]
    InvalidTableName(String),
    #[error("host list contains no candidates")]
    NoCandidates,
    #[error("none of the {candidates} replica hosts are reachable")]
    NoReachableHost { candidates: usize },
}

/// Classification attached to every surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    /// Storage precondition failed
    FailedPrecondition,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::FailedPrecondition => "failed_precondition",
        }
    }
}

/// Errors returned by the cart operation surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// Connection or query failure. The message never carries credentials.
    #[error("{message}")]
    StorageUnavailable { message: String },
    #[error("invalid quantity for user {user_id} product {product_id}: {reason}")]
    InvalidQuantity {
        user_id: String,
        product_id: String,
        reason: &'static str,
    },
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::StorageUnavailable { .. } | Self::InvalidQuantity { .. } => {
                ErrorKind::FailedPrecondition
            }
        }
    }
}

pub type CartResult<T> = Result<T, CartError>;
