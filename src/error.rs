// src/error.rs
use serde::Serialize;
use thiserror::Error;

use crate::networks::Network;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("token API returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed token API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token API credential not configured")]
    MissingCredential,

    #[error("no USDC entry in {network} response")]
    NoMatchingToken { network: Network },

    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("no baseline value for synthetic {0} series")]
    NoHistoricalBaseline(&'static str),
}

impl DashboardError {
    /// HTTP status carried by an upstream failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Transient failures: transport errors, 5xx and 429.
    /// Everything else (auth, not found, bad payloads) fails fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => !e.is_builder(),
            Self::UpstreamHttp { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// User-visible classification of a failed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailure {
    NotConfigured,
    Authentication,
    EndpointNotFound,
    Generic,
}

impl LoadFailure {
    pub fn classify(err: &DashboardError) -> Self {
        if matches!(err, DashboardError::MissingCredential) {
            return Self::NotConfigured;
        }
        match err.status() {
            Some(401) => Self::Authentication,
            Some(404) => Self::EndpointNotFound,
            _ => Self::Generic,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NotConfigured => "API key not configured",
            Self::Authentication => "Authentication failed",
            Self::EndpointNotFound => "API endpoint not found",
            Self::Generic => "Failed to load data",
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
