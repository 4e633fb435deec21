// Shared transport configuration for building reqwest::Client instances.
//
// TLS verification and timeouts live here so the session client stays
// focused on protocol concerns.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// TLS verification behaviour for the DNS server connection.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the platform trust store.
    #[default]
    System,
    /// Trust a custom CA bundle (PEM file).
    CustomCa(PathBuf),
    /// Accept any certificate. Local testing only.
    DangerAcceptInvalid,
}

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build a `reqwest` client honouring the transport configuration.
pub(crate) fn build_client(config: &TransportConfig) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(concat!("technitium-client/", env!("CARGO_PKG_VERSION")));

    match &config.tls {
        TlsMode::System => {}
        TlsMode::CustomCa(path) => {
            let pem = std::fs::read(path).map_err(|e| {
                Error::Tls(format!("failed to read CA bundle {}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| Error::Tls(format!("invalid CA bundle: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        TlsMode::DangerAcceptInvalid => {
            builder = builder.danger_accept_invalid_certs(true);
        }
    }

    builder.build().map_err(Error::from)
}
