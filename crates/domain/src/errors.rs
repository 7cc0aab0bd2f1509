use std::fmt;
use thiserror::Error;

/// Why a resolution gave up after the retry policy was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionReason {
    Timeout,
    MalformedResponse,
    NoServers,
}

impl ResolutionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionReason::Timeout => "timeout",
            ResolutionReason::MalformedResponse => "malformed response",
            ResolutionReason::NoServers => "no servers",
        }
    }
}

impl fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Resolution failed: {reason}")]
    Resolution { reason: ResolutionReason },

    #[error("Transaction id {0:#06x} is already in flight")]
    TransactionIdInUse(u16),

    #[error("Invalid server address: {0}")]
    InvalidServer(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DomainError {
    pub fn resolution(reason: ResolutionReason) -> Self {
        DomainError::Resolution { reason }
    }

    pub fn resolution_reason(&self) -> Option<ResolutionReason> {
        match self {
            DomainError::Resolution { reason } => Some(*reason),
            _ => None,
        }
    }
}
