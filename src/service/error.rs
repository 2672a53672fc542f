use std::fmt;

/// Failure of a single crypto-service call.
///
/// Users see one generic notice for every variant; the variants exist for
/// logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never got a response (connection, DNS, I/O).
    Transport(String),
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The response body was not the expected JSON.
    Decode(String),
    /// The service answered with an `{"error": ...}` body.
    Rejected(String),
    /// The worker running the call went away without replying.
    Disconnected,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status(code) => write!(f, "service returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "malformed response: {msg}"),
            Self::Rejected(msg) => write!(f, "service rejected request: {msg}"),
            Self::Disconnected => f.write_str("service worker disconnected"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
