// ── Core error types ──
//
// Reconciler-facing errors. Everything above the `Api` variant is
// raised locally before a network call; `Api` wraps transport,
// envelope, and server-side failures with the remote message intact so
// callers can show it to a user unchanged.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local pre-flight failures ────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid import ID: {message}")]
    InvalidId { message: String },

    // ── Remote state preconditions ───────────────────────────────────
    #[error("DNS app '{name}' not found. Ensure the app is installed before configuring it.")]
    AppNotInstalled { name: String },

    #[error("DNS app '{name}' not found on server")]
    AppNotFound { name: String },

    #[error("DNS app '{name}' has no configuration to import")]
    AppConfigMissing { name: String },

    // ── Remote API failures ──────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] technitium_api::Error),
}

impl CoreError {
    /// The server-reported message when this wraps a domain-level API
    /// rejection, as opposed to a transport or decode failure.
    #[must_use]
    pub fn domain_message(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.domain_message(),
            _ => None,
        }
    }
}
