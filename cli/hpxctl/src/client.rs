//! HTTP client for a running xApp.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::CliError;

#[derive(Debug, Clone)]
pub struct XappClient {
    client: reqwest::Client,
    base_url: String,
}

/// Problem+json body returned by the xApp on errors.
#[derive(Debug, Deserialize)]
struct ProblemBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    detail: String,
}

impl XappClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(response).await
    }

    /// Post a raw message payload for the given message type.
    pub async fn post_message<T: DeserializeOwned>(
        &self,
        message_type: u32,
        payload: String,
    ) -> Result<T, CliError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/messages/{message_type}")))
            .body(payload)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CliError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ProblemBody>(&text) {
            Ok(problem) => Err(CliError::api(status.as_u16(), problem.code, problem.detail)),
            Err(_) => Err(CliError::api(status.as_u16(), "unknown", text)),
        }
    }
}
