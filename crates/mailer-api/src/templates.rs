use anyhow::{anyhow, Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ConfigStore;

/// Listing endpoint, appended verbatim to the API base.
pub const RENDER_PATH: &str = "/render/";

/// Undecoded response of the mailer API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Items { items: Vec<String> },
    Results { results: Vec<String> },
    Bare(Vec<String>),
}

impl RawResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).context("Response body is not valid JSON")
    }

    /// Template names, from `{"items": [...]}`, the older
    /// `{"results": [...]}` envelope, or a bare array.
    pub fn template_names(&self) -> Result<Vec<String>> {
        let listing: Listing =
            serde_json::from_str(&self.body).context("Response body is not a template listing")?;
        Ok(match listing {
            Listing::Items { items } => items,
            Listing::Results { results } => results,
            Listing::Bare(names) => names,
        })
    }
}

/// Read-only client for the template endpoints of the mailer API.
#[derive(Debug, Clone)]
pub struct TemplateClient {
    config: ConfigStore,
    http: Client,
}

impl TemplateClient {
    pub fn new(config: ConfigStore, http: Client) -> Self {
        Self { config, http }
    }

    /// Target of [`list_templates`](Self::list_templates), resolved against
    /// the API base at call time.
    pub fn render_url(&self) -> String {
        format!("{}{}", self.config.api_base(), RENDER_PATH)
    }

    /// Lists the available templates.
    ///
    /// One GET, no retry. The body is passed through untouched; transport
    /// errors and non-2xx statuses are returned as errors.
    pub async fn list_templates(&self) -> Result<RawResponse> {
        let url = self.render_url();
        log::debug!("Listing templates from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to list templates from {}", url))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read template listing from {}", url))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Template listing at {} failed with status {}: {}",
                url,
                status,
                body
            ));
        }

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
