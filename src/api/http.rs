//! reqwest implementation of the marketplace API

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{parse_create_response, parse_thumbnails, ApiError, CreatedListing, ListingApi, Thumbnails};
use crate::config::ApiConfig;
use crate::submission::ListingPayload;

/// Marketplace backend over HTTP
pub struct HttpListingApi {
    client: Client,
    base_url: String,
    thumbnails_path: String,
    listings_path: String,
    token: Option<String>,
}

impl HttpListingApi {
    /// Build a client from config; the bearer token is read from `config.token_env`
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("anuncio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let token = env::var(&config.token_env)
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            debug!(env = %config.token_env, "No API token configured");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            thumbnails_path: config.thumbnails_path.clone(),
            listings_path: config.listings_path.clone(),
            token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ListingApi for HttpListingApi {
    async fn fetch_thumbnails(&self) -> Result<Thumbnails, ApiError> {
        let url = self.url(&self.thumbnails_path);
        debug!(url = %url, "Fetching service thumbnails");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ApiError::network(&self.thumbnails_path, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(&self.thumbnails_path, e.to_string()))?;

        parse_thumbnails(&self.thumbnails_path, status, &body)
    }

    async fn create_listing(&self, payload: ListingPayload) -> Result<CreatedListing, ApiError> {
        let url = self.url(&self.listings_path);
        let photo_count = payload.photos.len();
        let form = payload
            .into_form()
            .map_err(|e| ApiError::invalid_payload(e.to_string()))?;

        info!(url = %url, photos = photo_count, "Submitting listing");

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::network(&self.listings_path, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(&self.listings_path, e.to_string()))?;

        let result = parse_create_response(&self.listings_path, status, &body);
        match &result {
            Ok(created) => info!(id = %created.id, "Listing created"),
            Err(e) => warn!(status, error = %e, "Listing submission failed"),
        }
        result
    }
}
