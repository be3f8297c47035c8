//! Errors raised by the portal API client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body transfer failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, with the server's message when it sent one
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// Envelope came back with `success: false`
    #[error("request was rejected{}", detail(.message))]
    Rejected { message: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Human-readable message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Server message when present, otherwise the caller's generic text
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}
