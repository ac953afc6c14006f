use std::fmt;
use std::time::Duration;

use notifier_core::Category;

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFailure {
    InvalidUrl,
    Connection,
    Auth,
    HttpStatus(u16),
    Timeout,
    Decode,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFailure::InvalidUrl => write!(f, "invalid url"),
            SourceFailure::Connection => write!(f, "connection failed"),
            SourceFailure::Auth => write!(f, "authentication rejected"),
            SourceFailure::HttpStatus(code) => write!(f, "http status {code}"),
            SourceFailure::Timeout => write!(f, "timeout"),
            SourceFailure::Decode => write!(f, "unexpected response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: SourceFailure,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: SourceFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchFailure::InvalidUrl => write!(f, "invalid url"),
            DispatchFailure::HttpStatus(code) => write!(f, "http status {code}"),
            DispatchFailure::Timeout => write!(f, "timeout"),
            DispatchFailure::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DispatchError {
    pub kind: DispatchFailure,
    pub message: String,
}

impl DispatchError {
    pub fn new(kind: DispatchFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Why a run aborted. Every variant is fatal; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("stored state is unusable: {0}")]
    CorruptState(#[source] StoreError),
    #[error("cannot access the state file: {0}")]
    StateIo(#[source] StoreError),
    #[error("cannot connect to the portal: {0}")]
    Connection(#[source] SourceError),
    #[error("fetching {category} failed: {source}")]
    Fetch {
        category: Category,
        #[source]
        source: SourceError,
    },
    #[error("saving state after {category} failed: {source}")]
    Save {
        category: Category,
        #[source]
        source: StoreError,
    },
    #[error("sending {category} notification failed: {source}")]
    Dispatch {
        category: Category,
        #[source]
        source: DispatchError,
    },
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Categories a notification was sent for, in run order.
    pub notified: Vec<Category>,
}

impl RunSummary {
    pub fn any_sent(&self) -> bool {
        !self.notified.is_empty()
    }
}
