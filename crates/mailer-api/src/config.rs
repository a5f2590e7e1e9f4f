use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use url::Url;

/// API base used until `/env` has been loaded, or when it omits `API_URL`.
pub const DEFAULT_API_BASE: &str = "https://mailer-api.vibioh.fr";

/// Path of the environment endpoint, resolved against the origin.
pub const ENV_PATH: &str = "/env";

pub const API_URL_KEY: &str = "API_URL";

/// Flat mapping of environment-provided settings.
pub type ConfigObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Uninitialized,
    Loaded,
}

/// Handle on the process configuration.
///
/// Clones share the same underlying object, which is written at most once.
/// Pass the handle to whatever needs it instead of reaching for a global.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    origin: Url,
    http: Client,
    context: Arc<OnceLock<ConfigObject>>,
}

impl ConfigStore {
    pub fn new(origin: Url, http: Client) -> Self {
        Self {
            origin,
            http,
            context: Arc::new(OnceLock::new()),
        }
    }

    /// A store that is already `Loaded` with `env`.
    #[cfg(test)]
    pub(crate) fn preloaded(origin: Url, http: Client, env: ConfigObject) -> Self {
        let store = Self::new(origin, http);
        let _ = store.context.set(env);
        store
    }

    pub fn env_url(&self) -> Result<Url> {
        self.origin
            .join(ENV_PATH)
            .with_context(|| format!("Invalid configuration origin: {}", self.origin))
    }

    /// Fetches `/env` and stores the returned object.
    ///
    /// No retry. On any failure the store keeps whatever it held before and
    /// the error is returned to the caller; readers keep falling back to
    /// the defaults.
    pub async fn initialize(&self) -> Result<()> {
        let url = self.env_url()?;
        log::debug!("Fetching configuration from {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch configuration from {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Configuration request to {} failed with status {}",
                url,
                status
            ));
        }

        let value: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse configuration from {}", url))?;
        let Value::Object(env) = value else {
            return Err(anyhow!("Configuration from {} is not a JSON object", url));
        };

        if self.context.set(env).is_err() {
            log::warn!("Configuration already loaded, ignoring response from {}", url);
        } else {
            log::info!("Successfully loaded configuration from {}", url);
        }
        Ok(())
    }

    pub fn state(&self) -> ConfigState {
        if self.context.get().is_some() {
            ConfigState::Loaded
        } else {
            ConfigState::Uninitialized
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == ConfigState::Loaded
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get()?.get(key)
    }

    /// The configured API base address, or [`DEFAULT_API_BASE`].
    ///
    /// A missing, empty, or non-string `API_URL` falls back as well.
    pub fn api_base(&self) -> String {
        self.get(API_URL_KEY)
            .and_then(Value::as_str)
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string()
    }
}
