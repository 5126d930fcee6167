use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Proxy, StatusCode};
use url::Url;

use super::models::{ApiErrorBody, ImageRecord, SearchRequest, SearchResponse};
use crate::config::AppConfig;
use crate::{Error, Result};

const SEARCH_PATH: &str = "search/photos";

/// Client for the photo search endpoint.
///
/// Every call to [`ImageFetcher::fetch`] issues exactly one request; there is
/// no retry, pagination or caching.
pub struct ImageFetcher {
    client: Client,
    base_url: Url,
}

impl ImageFetcher {
    /// Create a fetcher from the `[unsplash]` configuration section
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(
            config.unsplash.request_timeout_secs,
            &config.unsplash.proxy_url,
        )?;
        Self::with_client(client, &config.unsplash.api_base_url)
    }

    /// Create a fetcher with an existing HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        // A trailing slash makes `join` append instead of replacing the last segment
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        Ok(Self { client, base_url })
    }

    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .user_agent(concat!("parallax/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = proxy_url.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for photo search");
        }

        builder.build().map_err(Error::Network)
    }

    fn build_headers(credential: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("Accept-Version", HeaderValue::from_static("v1"));

        let mut auth =
            HeaderValue::from_str(&format!("Client-ID {}", credential)).map_err(|_| {
                Error::InvalidRequest("API credential contains invalid characters".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Full search URL for a request
    pub fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| Error::Config(format!("Invalid API base URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("query", request.query())
            .append_pair("per_page", &request.page_size().to_string());

        Ok(url)
    }

    /// Run the search and return the photos in server order
    pub async fn fetch(&self, request: &SearchRequest) -> Result<Vec<ImageRecord>> {
        let url = self.search_url(request)?;
        let headers = Self::build_headers(request.credential())?;

        tracing::info!(
            "Searching photos: query={:?} per_page={}",
            request.query(),
            request.page_size()
        );

        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let records = parse_search_response(status, &body)?;
        tracing::info!("Search returned {} photos", records.len());

        Ok(records)
    }
}

/// Map a search response (status + body) to records or a typed error
pub fn parse_search_response(status: StatusCode, body: &Bytes) -> Result<Vec<ImageRecord>> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .map(|e| e.errors.join("; "))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::warn!("Photo search failed with HTTP {}: {}", status.as_u16(), message);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| Error::Decode(e.to_string()))?;

    Ok(response.results.into_iter().map(ImageRecord::from).collect())
}
