//! YouTube Data API v3 metadata provider

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::YouTubeConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::FetchedMetadata;
use crate::sources::MetadataProvider;
use crate::utils::url::UrlUtils;

/// Longest error body excerpt kept in `ProviderError::Http`
const MAX_ERROR_BODY: usize = 256;

/// Looks up video titles and channel names through `videos.list`
pub struct YouTubeMetadataProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    channel_title: String,
}

impl YouTubeMetadataProvider {
    /// Create a provider whose HTTP client gives up after `request_timeout`
    pub fn new(config: &YouTubeConfig, request_timeout: Duration) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }

    fn videos_url(&self, external_id: &str, api_key: &str) -> ProviderResult<Url> {
        let mut url = Url::parse(&format!("{}/videos", self.base_url)).map_err(|e| {
            ProviderError::Decode {
                message: format!("Invalid provider base URL '{}': {e}", self.base_url),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("id", external_id)
            .append_pair("key", api_key)
            .append_pair("part", "snippet");
        Ok(url)
    }

    fn retry_after(response: &reqwest::Response) -> Option<u64> {
        response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    /// Pick the first usable snippet out of a `videos.list` body
    fn extract(external_id: &str, body: VideoListResponse) -> ProviderResult<FetchedMetadata> {
        body.items
            .into_iter()
            .find_map(|item| item.snippet)
            .map(|snippet| FetchedMetadata {
                title: snippet.title,
                attribution: snippet.channel_title,
            })
            .ok_or_else(|| ProviderError::NotFound {
                external_id: external_id.to_string(),
            })
    }
}

#[async_trait]
impl MetadataProvider for YouTubeMetadataProvider {
    async fn fetch(&self, external_id: &str) -> ProviderResult<FetchedMetadata> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let url = self.videos_url(external_id, api_key)?;

        debug!(
            "Fetching video details: {}",
            UrlUtils::redact_query_param(url.as_str(), "key")
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::RateLimited {
                retry_after: Self::retry_after(&response),
            });
        }

        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: VideoListResponse = response.json().await.map_err(|e| ProviderError::Decode {
            message: e.to_string(),
        })?;

        Self::extract(external_id, body)
    }
}
