//! Access tokens for calls to the managed queue and object store

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Source of bearer tokens for outbound service calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

const METADATA_ENDPOINT: &str = "http://metadata.google.internal";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Token provider backed by the instance metadata server.
///
/// Available inside the hosting runtime; local runs use
/// [`StaticTokenProvider`] or no provider at all.
pub struct MetadataTokenProvider {
    client: Client,
    endpoint: Url,
}

impl MetadataTokenProvider {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(METADATA_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    fn token_url(&self) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/computeMetadata/v1/instance/service-accounts/default/token")
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .get(self.token_url())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PipelineError::TokenRequest { source: e })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::TokenStatus {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::TokenRequest { source: e })?;

        Ok(token.access_token)
    }
}

/// Fixed-token provider for tests and local development.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
