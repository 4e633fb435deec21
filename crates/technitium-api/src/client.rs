// Session HTTP client
//
// Wraps `reqwest::Client` with Technitium-specific URL construction,
// envelope decoding, token-based session handling, and bounded retries.
// Every endpoint authenticates with a session token passed as the `token`
// query parameter; the client acquires one by logging in with credentials,
// or uses a pre-issued API token from the configuration.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::envelope;
use crate::error::Error;
use crate::transport;

/// Ordered query parameters for an API call.
pub type QueryParams = IndexMap<String, String>;

/// Asynchronous client for a single Technitium DNS server.
///
/// Cheap to share behind an `Arc`; all methods take `&self`. The session
/// token lives in an interior cell with a single writer: only [`login`]
/// replaces it, and every request re-reads the cell just before sending.
/// Concurrent calls that each observe a rejected token may log in
/// redundantly; the last completed login wins and subsequent requests pick
/// up whichever token is current.
///
/// [`login`]: Client::login
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    username: Option<String>,
    password: Option<SecretString>,
    token: RwLock<Option<String>>,
    max_attempts: u32,
    cancel: CancellationToken,
}

/// `user/login` is the one endpoint that answers outside the status
/// envelope; the token arrives at the top level.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default, rename = "displayName")]
    display_name: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    token: String,
    #[serde(default, rename = "errorMessage")]
    error_message: String,
}

impl Client {
    /// Build a client from configuration.
    ///
    /// Validates that an authentication method is present and constructs
    /// the HTTP transport. No network traffic happens here; the first API
    /// call performs the login when needed.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        config.validate()?;
        let http = transport::build_client(&config.transport())?;
        let token = config
            .token
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
            .filter(|t| !t.is_empty());
        let username = config.username.clone().filter(|u| !u.is_empty());
        let password = config
            .password
            .clone()
            .filter(|p| !p.expose_secret().is_empty());

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            username,
            password,
            token: RwLock::new(token),
            max_attempts: config.retry_attempts.max(1),
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the cancellation token observed while waiting out backoff
    /// delays between retries.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute `GET /api/{path}` and return the decoded payload.
    ///
    /// Transient failures (transport errors, non-2xx statuses, malformed
    /// envelopes, unexpected status strings) are retried with a linear
    /// backoff of `attempt` seconds up to the configured attempt budget.
    /// A rejected token triggers at most one synchronous re-login per call,
    /// followed by an immediate retry with no backoff; if no credentials
    /// are configured the rejection is surfaced as-is. Server-reported
    /// errors are returned on first occurrence: the server already gave
    /// its answer, and asking again would not change it.
    pub async fn get_json<T>(&self, path: &str, params: &QueryParams) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.authenticate().await?;

        let mut reauthenticated = false;
        let mut attempt: u32 = 1;
        loop {
            match self.attempt_get(path, params).await {
                Ok(payload) => return Self::decode_payload(payload),
                Err(err) if err.is_invalid_token() => {
                    debug!(path, attempt, "session token rejected");
                    if reauthenticated || !self.has_credentials() || attempt >= self.max_attempts {
                        return Err(err);
                    }
                    self.login().await.map_err(|e| Error::Authentication {
                        message: format!("re-authentication failed: {e}"),
                    })?;
                    reauthenticated = true;
                    attempt += 1;
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    debug!(path, attempt, error = %err, "retrying API call");
                    self.backoff(attempt).await?;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a call whose payload is irrelevant beyond the status check.
    pub async fn get_unit(&self, path: &str, params: &QueryParams) -> Result<(), Error> {
        let _payload: serde::de::IgnoredAny = self.get_json(path, params).await?;
        Ok(())
    }

    /// Execute `POST /api/{path}` with an urlencoded form body.
    ///
    /// Uploads are sent exactly once, outside the retry loop; the
    /// then-current token still rides along as a query parameter and the
    /// response goes through the same envelope decoding.
    pub async fn post_form<T>(
        &self,
        path: &str,
        params: &QueryParams,
        form: &[(&str, &str)],
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.authenticate().await?;
        let request = self.apply_query(self.http.post(self.api_url(path)), params);
        let response = request.form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Self::decode_payload(Self::decode_response(status, body)?)
    }

    /// Execute `POST /api/{path}` with a single-file multipart body.
    ///
    /// The file travels in a part named `file`; like form posts, multipart
    /// uploads are never replayed.
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        params: &QueryParams,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.authenticate().await?;
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .apply_query(self.http.post(self.api_url(path)), params)
            .multipart(form);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Self::decode_payload(Self::decode_response(status, body)?)
    }

    /// `GET /api/user/login` with the configured credentials.
    ///
    /// On success the token cell is replaced. This is the cell's only
    /// writer; see the struct docs for what that means under concurrency.
    async fn login(&self) -> Result<(), Error> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Err(Error::Authentication {
                message: "no username and password configured".to_owned(),
            });
        };

        let response = self
            .http
            .get(self.api_url("user/login"))
            .query(&[
                ("user", username.as_str()),
                ("pass", password.expose_secret()),
                ("includeInfo", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed with HTTP {}: {body}", status.as_u16()),
            });
        }

        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        if login.token.is_empty() {
            let message = if login.error_message.is_empty() {
                "login response carried no token".to_owned()
            } else {
                login.error_message
            };
            return Err(Error::Authentication { message });
        }

        debug!(
            username = %login.username,
            display_name = %login.display_name,
            "authenticated with DNS server"
        );
        self.store_token(login.token);
        Ok(())
    }

    /// Ensure a token is on hand: a stored token wins, otherwise
    /// credentials are exchanged for one.
    async fn authenticate(&self) -> Result<(), Error> {
        if self.current_token().is_some() {
            return Ok(());
        }
        if self.has_credentials() {
            return self.login().await;
        }
        Err(Error::Authentication {
            message: "no token or credentials available".to_owned(),
        })
    }

    async fn attempt_get(&self, path: &str, params: &QueryParams) -> Result<Option<Value>, Error> {
        let request = self.apply_query(self.http.get(self.api_url(path)), params);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Self::decode_response(status, body)
    }

    fn decode_response(status: reqwest::StatusCode, body: String) -> Result<Option<Value>, Error> {
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        envelope::decode(&body)
    }

    fn decode_payload<T>(payload: Option<Value>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let value = payload.unwrap_or(Value::Null);
        T::deserialize(&value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }

    fn apply_query(
        &self,
        mut request: reqwest::RequestBuilder,
        params: &QueryParams,
    ) -> reqwest::RequestBuilder {
        for (key, value) in params {
            request = request.query(&[(key.as_str(), value.as_str())]);
        }
        if let Some(token) = self.current_token() {
            request = request.query(&[("token", token.as_str())]);
        }
        request
    }

    /// Linear backoff of `attempt` seconds, cut short by cancellation.
    async fn backoff(&self, attempt: u32) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(Duration::from_secs(u64::from(attempt))) => Ok(()),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{path}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}
