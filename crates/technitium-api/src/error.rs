use thiserror::Error;

/// Errors returned by the Technitium API client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ──
    #[error("configuration error: {message}")]
    Config { message: String },

    // ── Authentication ──
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The server rejected the session token (`status == "invalid-token"`).
    /// Recoverable by re-authenticating when credentials are on hand.
    #[error("invalid token: session has expired or the token was revoked")]
    InvalidToken,

    // ── Transport ──
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("API request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("operation cancelled")]
    Cancelled,

    // ── API responses ──
    /// The server processed the request and reported a failure
    /// (`status == "error"`). These are definitive answers, not glitches.
    #[error("API error: {message}")]
    Api { message: String },

    /// The envelope carried a status string other than the three the
    /// protocol defines.
    #[error("unexpected API status: {status}")]
    UnexpectedStatus { status: String },

    #[error("failed to decode API response: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// True when the failure is a rejected session token, the one error
    /// class the client may recover from by logging in again.
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Error::InvalidToken)
    }

    /// True for failures worth retrying: the request may not have reached
    /// the server, or the response was not a well-formed envelope. Domain
    /// errors ([`Error::Api`]) are deliberate server answers and are never
    /// transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::HttpStatus { .. }
                | Error::Deserialization { .. }
                | Error::UnexpectedStatus { .. }
        )
    }

    /// True when the server itself reported the failure.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    /// The server-reported failure message, if this is a domain error.
    #[must_use]
    pub fn domain_message(&self) -> Option<&str> {
        match self {
            Error::Api { message } => Some(message),
            _ => None,
        }
    }
}
