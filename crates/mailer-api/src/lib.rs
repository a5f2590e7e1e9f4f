use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

mod config;
mod templates;

#[cfg(test)]
mod test_server;

pub use config::{ConfigObject, ConfigState, ConfigStore, API_URL_KEY, DEFAULT_API_BASE, ENV_PATH};
pub use templates::{RawResponse, TemplateClient, RENDER_PATH};

/// Builds the shared HTTP client and the two API handles wired to it.
///
/// `origin` is the address `/env` is resolved against.
pub fn connect(origin: &str) -> Result<(ConfigStore, TemplateClient)> {
    let origin =
        Url::parse(origin).with_context(|| format!("Invalid configuration origin: {}", origin))?;
    let http = Client::builder()
        .user_agent(concat!("mailer-editor/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let config = ConfigStore::new(origin, http.clone());
    let templates = TemplateClient::new(config.clone(), http);
    Ok((config, templates))
}
