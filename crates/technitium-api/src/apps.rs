// DNS application endpoints
//
// Apps are zip-packaged plugins. They install either from the Technitium
// app store (the server downloads the zip itself) or from a zip uploaded
// as a multipart body. Per-app configuration is an opaque string, JSON by
// convention.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::{Client, QueryParams};
use crate::error::Error;

/// One plugin class inside an installed app package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)] // capability flags arrive as discrete booleans
pub struct DnsApp {
    pub class_path: String,
    pub description: String,
    pub is_app_record_request_handler: bool,
    pub record_data_template: Option<String>,
    pub is_request_controller: bool,
    pub is_authoritative_request_handler: bool,
    pub is_request_blocking_handler: bool,
    pub is_query_logger: bool,
    pub is_post_processor: bool,
}

/// An installed app and its plugin classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct App {
    pub name: String,
    pub version: String,
    pub dns_apps: Vec<DnsApp>,
}

/// An app listed by the Technitium app store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreApp {
    pub name: String,
    pub version: String,
    pub description: String,
    pub url: String,
    pub size: String,
    pub installed: bool,
    pub installed_version: Option<String>,
    pub update_available: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListAppsResponse {
    apps: Vec<App>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListStoreAppsResponse {
    store_apps: Vec<StoreApp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InstallAppResponse {
    installed_app: Option<App>,
    updated_app: Option<App>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GetAppConfigResponse {
    config: Option<String>,
}

/// Pretty-print a config string when it parses as JSON, otherwise pass it
/// through untouched. The server stores whatever it receives; normalizing
/// here keeps stored configs diffable.
fn format_config(config: &str) -> String {
    if config.is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(config) {
        Ok(parsed) => {
            serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| config.to_owned())
        }
        Err(_) => config.to_owned(),
    }
}

impl Client {
    /// List installed apps.
    ///
    /// `GET /api/apps/list`
    pub async fn list_apps(&self) -> Result<Vec<App>, Error> {
        let response: ListAppsResponse = self.get_json("apps/list", &QueryParams::new()).await?;
        Ok(response.apps)
    }

    /// Look up an installed app by exact name.
    pub async fn find_app(&self, name: &str) -> Result<Option<App>, Error> {
        let apps = self.list_apps().await?;
        Ok(apps.into_iter().find(|app| app.name == name))
    }

    /// List apps available in the Technitium app store.
    ///
    /// `GET /api/apps/listStoreApps`
    pub async fn list_store_apps(&self) -> Result<Vec<StoreApp>, Error> {
        let response: ListStoreAppsResponse =
            self.get_json("apps/listStoreApps", &QueryParams::new()).await?;
        Ok(response.store_apps)
    }

    /// Have the server download an app zip from a URL and install it.
    ///
    /// `GET /api/apps/downloadAndInstall`
    pub async fn download_and_install_app(&self, name: &str, url: &str) -> Result<App, Error> {
        debug!(name, url, "installing app from URL");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        params.insert("url".to_owned(), url.to_owned());
        let response: InstallAppResponse = self.get_json("apps/downloadAndInstall", &params).await?;
        Ok(response.installed_app.unwrap_or_default())
    }

    /// Have the server download an app zip from a URL and update the
    /// installed copy.
    ///
    /// `GET /api/apps/downloadAndUpdate`
    pub async fn download_and_update_app(&self, name: &str, url: &str) -> Result<App, Error> {
        debug!(name, url, "updating app from URL");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        params.insert("url".to_owned(), url.to_owned());
        let response: InstallAppResponse = self.get_json("apps/downloadAndUpdate", &params).await?;
        Ok(response.updated_app.unwrap_or_default())
    }

    /// Upload an app zip and install it.
    ///
    /// `POST /api/apps/install` with the zip in a multipart `file` part.
    pub async fn install_app(&self, name: &str, zip: Vec<u8>) -> Result<App, Error> {
        debug!(name, bytes = zip.len(), "installing app from zip");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        let response: InstallAppResponse = self
            .post_multipart("apps/install", &params, "app.zip", zip)
            .await?;
        Ok(response.installed_app.unwrap_or_default())
    }

    /// Upload an app zip and update the installed copy.
    ///
    /// `POST /api/apps/update` with the zip in a multipart `file` part.
    pub async fn update_app(&self, name: &str, zip: Vec<u8>) -> Result<App, Error> {
        debug!(name, bytes = zip.len(), "updating app from zip");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        let response: InstallAppResponse = self
            .post_multipart("apps/update", &params, "app.zip", zip)
            .await?;
        Ok(response.updated_app.unwrap_or_default())
    }

    /// Remove an installed app.
    ///
    /// `GET /api/apps/uninstall`
    pub async fn uninstall_app(&self, name: &str) -> Result<(), Error> {
        debug!(name, "uninstalling app");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        self.get_unit("apps/uninstall", &params).await
    }

    /// Fetch an app's config string. `None` when the app has never been
    /// configured.
    ///
    /// `GET /api/apps/config/get`
    pub async fn get_app_config(&self, name: &str) -> Result<Option<String>, Error> {
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        let response: GetAppConfigResponse = self.get_json("apps/config/get", &params).await?;
        Ok(response.config)
    }

    /// Replace an app's config string. JSON configs are re-indented before
    /// upload so the stored copy stays stable across round trips; an empty
    /// string clears the config.
    ///
    /// `POST /api/apps/config/set` with the config in an urlencoded form.
    pub async fn set_app_config(&self, name: &str, config: &str) -> Result<(), Error> {
        debug!(name, "setting app config");
        let mut params = QueryParams::new();
        params.insert("name".to_owned(), name.to_owned());
        let formatted = format_config(config);
        let _payload: serde::de::IgnoredAny = self
            .post_form("apps/config/set", &params, &[("config", formatted.as_str())])
            .await?;
        Ok(())
    }
}
