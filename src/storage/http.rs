//! HTTP client for the object store's media-download endpoint

use crate::auth::TokenProvider;
use crate::error::{PipelineError, Result};
use crate::storage::{ObjectStore, StoredObject};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::debug;
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com/storage/v1";

/// Object store client speaking the blob service's JSON API.
pub struct HttpObjectStore {
    client: Client,
    endpoint: Url,
    token: Option<Arc<dyn TokenProvider>>,
}

impl HttpObjectStore {
    /// Client against the production endpoint, unauthenticated.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client against a custom endpoint (emulator, test server).
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
            token: None,
        })
    }

    /// Attach a token provider for authenticated fetches.
    pub fn with_token_provider(mut self, token: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(token);
        self
    }

    fn media_url(&self, bucket: &str, path: &str) -> String {
        // The object name is a single URL component; slashes in the path must
        // be percent-encoded.
        let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/b/{bucket}/o/{encoded}?alt=media")
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, bucket: &str, path: &str) -> Result<StoredObject> {
        let url = self.media_url(bucket, path);

        let mut request = self.client.get(&url);
        if let Some(provider) = &self.token {
            let token = provider.access_token().await?;
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| PipelineError::FetchError {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PipelineError::ObjectNotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(PipelineError::HttpStatusError {
                url,
                status: status.as_u16(),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| PipelineError::FetchError {
                url: url.clone(),
                source: e,
            })?
            .to_vec();

        debug!("Fetched {} bytes from gs://{}/{}", content.len(), bucket, path);

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            content,
        })
    }
}
