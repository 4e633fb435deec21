// ── App lifecycle ──
//
// Two reconcilers share this module: one manages the installed app
// itself (install, reinstall, uninstall), one manages only an app's
// configuration string for apps installed out of band. Apps have no
// get-by-name endpoint, so presence checks scan the installed list.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use technitium_api::apps::DnsApp;
use technitium_api::Client;

use crate::error::CoreError;

use super::ReadOutcome;

/// How an app package reaches the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InstallMethod {
    /// The server downloads the zip itself, store-install style.
    #[default]
    Url,
    /// The zip travels in the request body, supplied base64-encoded.
    File,
}

/// Declared and observed state of one installed app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub id: String,
    pub name: String,
    pub install_method: String,
    pub url: Option<String>,
    pub file_content: Option<String>,
    pub config: Option<String>,
    /// Read-only fields refreshed from the server.
    pub version: Option<String>,
    pub dns_apps: Vec<DnsApp>,
}

/// Drives the lifecycle of installed apps against one server.
pub struct AppReconciler<'a> {
    client: &'a Client,
}

impl<'a> AppReconciler<'a> {
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Install the app and apply its initial configuration.
    ///
    /// A config failure right after a successful install degrades to a
    /// warning; the app is installed and a later update can fix the
    /// config without reinstalling.
    pub async fn create(&self, state: &mut AppState) -> Result<(), CoreError> {
        let method = validated_install_method(state)?;
        debug!(name = %state.name, install_method = %method, "installing DNS app");

        let app = match method {
            InstallMethod::Url => {
                let url = state.url.as_deref().unwrap_or_default();
                self.client.download_and_install_app(&state.name, url).await?
            }
            InstallMethod::File => {
                let zip = decode_base64(state.file_content.as_deref().unwrap_or_default())?;
                self.client.install_app(&state.name, zip).await?
            }
        };

        if let Some(config) = &state.config {
            if let Err(err) = self.client.set_app_config(&state.name, config).await {
                warn!(name = %state.name, error = %err, "failed to set app config");
            }
        }

        state.id = state.name.clone();
        state.version = Some(app.version);
        state.dns_apps = app.dns_apps;
        debug!(name = %state.name, "DNS app installed");
        Ok(())
    }

    /// Refresh from the installed-apps list, or report the app gone.
    ///
    /// A config fetch failure does not fail the read; the config just
    /// comes back unset.
    pub async fn read(&self, state: &mut AppState) -> Result<ReadOutcome, CoreError> {
        let Some(app) = self.client.find_app(&state.name).await? else {
            debug!(name = %state.name, "DNS app not installed remotely");
            return Ok(ReadOutcome::Gone);
        };

        match self.client.get_app_config(&state.name).await {
            Ok(config) => state.config = config,
            Err(err) => {
                warn!(name = %state.name, error = %err, "failed to get app config");
                state.config = None;
            }
        }

        state.version = Some(app.version);
        state.dns_apps = app.dns_apps;
        Ok(ReadOutcome::Found)
    }

    /// Reinstall from the configured source and push the config.
    ///
    /// Unlike create, a config failure here is an error: the app was
    /// already installed, so nothing half-finished needs protecting.
    pub async fn update(&self, state: &mut AppState) -> Result<(), CoreError> {
        debug!(name = %state.name, "updating DNS app");

        let method = state.install_method.parse::<InstallMethod>().ok();
        match (method, &state.url, &state.file_content) {
            (Some(InstallMethod::Url), Some(url), _) => {
                let app = self.client.download_and_update_app(&state.name, url).await?;
                state.version = Some(app.version);
                state.dns_apps = app.dns_apps;
            }
            (Some(InstallMethod::File), _, Some(file_content)) => {
                let zip = decode_base64(file_content)?;
                let app = self.client.update_app(&state.name, zip).await?;
                state.version = Some(app.version);
                state.dns_apps = app.dns_apps;
            }
            _ => {}
        }

        if let Some(config) = &state.config {
            self.client.set_app_config(&state.name, config).await?;
        }
        debug!(name = %state.name, "DNS app updated");
        Ok(())
    }

    /// Uninstall the app.
    pub async fn delete(&self, state: &AppState) -> Result<(), CoreError> {
        debug!(name = %state.name, "uninstalling DNS app");
        self.client.uninstall_app(&state.name).await?;
        Ok(())
    }

    /// Verify the app exists and seed a state bag for it. The install
    /// source cannot be recovered from the server, so the method
    /// defaults to `url` until the caller declares otherwise.
    pub async fn import(&self, name: &str) -> Result<AppState, CoreError> {
        if self.client.find_app(name).await?.is_none() {
            return Err(CoreError::AppNotFound {
                name: name.to_owned(),
            });
        }
        Ok(AppState {
            id: name.to_owned(),
            name: name.to_owned(),
            install_method: InstallMethod::Url.to_string(),
            ..AppState::default()
        })
    }
}

/// Declared state of one app's configuration, managed separately from
/// the app install itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigState {
    pub id: String,
    pub name: String,
    pub config: Option<String>,
}

/// Manages only the configuration string of an already-installed app.
pub struct AppConfigReconciler<'a> {
    client: &'a Client,
}

impl<'a> AppConfigReconciler<'a> {
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Apply the configuration. The app must already be installed.
    pub async fn create(&self, state: &mut AppConfigState) -> Result<(), CoreError> {
        debug!(name = %state.name, "creating DNS app config");
        if self.client.find_app(&state.name).await?.is_none() {
            return Err(CoreError::AppNotInstalled {
                name: state.name.clone(),
            });
        }
        let config = state.config.as_deref().unwrap_or_default();
        self.client.set_app_config(&state.name, config).await?;
        state.id = state.name.clone();
        Ok(())
    }

    /// Refresh the config. Both a missing app and a cleared config
    /// mean the managed object is gone.
    pub async fn read(&self, state: &mut AppConfigState) -> Result<ReadOutcome, CoreError> {
        if self.client.find_app(&state.name).await?.is_none() {
            debug!(name = %state.name, "DNS app not installed remotely");
            return Ok(ReadOutcome::Gone);
        }
        let Some(config) = self.client.get_app_config(&state.name).await? else {
            debug!(name = %state.name, "DNS app has no config remotely");
            return Ok(ReadOutcome::Gone);
        };
        state.config = Some(config);
        Ok(ReadOutcome::Found)
    }

    /// Replace the configuration.
    pub async fn update(&self, state: &AppConfigState) -> Result<(), CoreError> {
        debug!(name = %state.name, "updating DNS app config");
        let config = state.config.as_deref().unwrap_or_default();
        self.client.set_app_config(&state.name, config).await?;
        Ok(())
    }

    /// Clear the configuration. There is no config-delete endpoint; an
    /// empty string stands in for absent.
    pub async fn delete(&self, state: &AppConfigState) -> Result<(), CoreError> {
        debug!(name = %state.name, "clearing DNS app config");
        self.client.set_app_config(&state.name, "").await?;
        Ok(())
    }

    /// Verify the app exists and carries a configuration, then seed a
    /// state bag. The next read pulls the config itself.
    pub async fn import(&self, name: &str) -> Result<AppConfigState, CoreError> {
        if self.client.find_app(name).await?.is_none() {
            return Err(CoreError::AppNotFound {
                name: name.to_owned(),
            });
        }
        let config = self.client.get_app_config(name).await?;
        if config.as_deref().is_none_or(str::is_empty) {
            return Err(CoreError::AppConfigMissing {
                name: name.to_owned(),
            });
        }
        Ok(AppConfigState {
            id: name.to_owned(),
            name: name.to_owned(),
            config: None,
        })
    }
}

/// Check that the install method names a known scheme and that exactly
/// the matching source field is set.
fn validated_install_method(state: &AppState) -> Result<InstallMethod, CoreError> {
    let Ok(method) = state.install_method.parse::<InstallMethod>() else {
        return Err(validation(format!(
            "invalid install_method: {}",
            state.install_method
        )));
    };
    match method {
        InstallMethod::Url => {
            if state.url.is_none() {
                return Err(validation("'url' is required when install_method is 'url'"));
            }
            if state.file_content.is_some() {
                return Err(validation(
                    "'file_content' should not be set when install_method is 'url'",
                ));
            }
        }
        InstallMethod::File => {
            if state.file_content.is_none() {
                return Err(validation(
                    "'file_content' is required when install_method is 'file'",
                ));
            }
            if state.url.is_some() {
                return Err(validation(
                    "'url' should not be set when install_method is 'file'",
                ));
            }
        }
    }
    Ok(method)
}

/// Decode a base64 zip payload, tolerating embedded whitespace from
/// heredocs and line-wrapped encoders.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, CoreError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r' | '\t'))
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| validation(format!("Failed to decode base64 file content: {err}")))
}

fn validation(message: impl Into<String>) -> CoreError {
    CoreError::Validation {
        message: message.into(),
    }
}
