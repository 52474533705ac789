use crate::config::{ApiKey, Settings};
use crate::domain::apod::ApodRecord;
use crate::domain::neo::NeoFeed;
use crate::ingest::error::UpstreamError;
use crate::time::window::DateWindow;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

const APOD_PATH: &str = "/planetary/apod";
const NEO_FEED_PATH: &str = "/neo/rest/v1/feed";

// Upper bound on how much of a failing body ends up in error messages.
const BODY_SNIPPET_CHARS: usize = 512;

#[async_trait::async_trait]
pub trait SpaceDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_apod(&self) -> Result<ApodRecord>;

    async fn fetch_neo_feed(&self, window: DateWindow) -> Result<NeoFeed>;

    /// Follows an opaque `links.next` / `links.previous` URL as-is.
    async fn fetch_neo_link(&self, url: &str) -> Result<NeoFeed>;
}

#[derive(Debug, Clone)]
pub struct NasaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
}

impl NasaClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_nasa_api_key()?;
        Self::new(
            settings.nasa_base_url(),
            api_key,
            Duration::from_secs(settings.nasa_timeout_secs()),
        )
    }

    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build NASA http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apod_request(&self) -> reqwest::RequestBuilder {
        self.http.get(self.url(APOD_PATH)).query(&[
            ("concept_tags", "true"),
            ("api_key", self.api_key.expose()),
        ])
    }

    fn feed_request(&self, window: DateWindow) -> reqwest::RequestBuilder {
        self.http.get(self.url(NEO_FEED_PATH)).query(&[
            ("start_date", window.start_param().as_str()),
            ("end_date", window.end_param().as_str()),
            ("api_key", self.api_key.expose()),
        ])
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        // Request urls carry the api key; keep them out of error messages.
        let res = request
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("{endpoint} request failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read {endpoint} response body"))?;

        if !status.is_success() {
            return Err(UpstreamError {
                endpoint,
                status: status.as_u16(),
                body: snippet(&text),
            }
            .into());
        }

        serde_json::from_str::<T>(&text).with_context(|| {
            format!(
                "{endpoint} response has an unexpected shape: {}",
                snippet(&text)
            )
        })
    }
}

#[async_trait::async_trait]
impl SpaceDataClient for NasaClient {
    fn provider_name(&self) -> &'static str {
        "nasa_open_api"
    }

    async fn fetch_apod(&self) -> Result<ApodRecord> {
        let apod: ApodRecord = self.get_json("apod", self.apod_request()).await?;
        tracing::debug!(date = %apod.date, media_type = ?apod.media_type, "fetched apod");
        Ok(apod)
    }

    async fn fetch_neo_feed(&self, window: DateWindow) -> Result<NeoFeed> {
        let feed: NeoFeed = self
            .get_json("neo_feed", self.feed_request(window))
            .await?;
        tracing::debug!(%window, element_count = feed.element_count, "fetched neo feed");
        Ok(feed)
    }

    async fn fetch_neo_link(&self, url: &str) -> Result<NeoFeed> {
        let feed: NeoFeed = self.get_json("neo_link", self.http.get(url)).await?;
        tracing::debug!(element_count = feed.element_count, "followed neo feed link");
        Ok(feed)
    }
}

// Redacts before truncating so a cut-off key is never partially kept.
fn snippet(text: &str) -> String {
    let redacted = redact_api_keys(text);
    let mut chars = redacted.chars();
    let head: String = chars.by_ref().take(BODY_SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Replaces every `api_key=<value>` with `api_key=***`. Feed bodies embed
/// their pagination links, and those carry the key.
pub fn redact_api_keys(text: &str) -> String {
    const MARKER: &str = "api_key=";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(MARKER) {
        let (head, tail) = rest.split_at(pos + MARKER.len());
        out.push_str(head);
        out.push_str("***");
        let end = tail
            .find(|c: char| matches!(c, '&' | '"' | '\'' | '<' | '>' | '#') || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}
