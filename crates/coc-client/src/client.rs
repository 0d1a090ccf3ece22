//! Clash of Clans HTTP client.

use crate::error::CocError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Default retry configuration
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;
const DEFAULT_MAX_BACKOFF_MS: u64 = 5000;

/// Clash of Clans API client.
///
/// The API token is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct CocClient {
    client: Client,
    base_url: String,
    token: SecretString,
    max_retries: u32,
}

impl CocClient {
    /// Create a new Clash of Clans client.
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CocError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override how many times transient failures are retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fetch a clan by tag.
    #[instrument(skip(self))]
    pub async fn clan(&self, tag: &str) -> Result<Clan, CocError> {
        self.get(&format!("/clans/{}", encode(tag)), tag).await
    }

    /// Fetch a player by tag.
    #[instrument(skip(self))]
    pub async fn player(&self, tag: &str) -> Result<Player, CocError> {
        self.get(&format!("/players/{}", encode(tag)), tag).await
    }

    /// Fetch the member list of a clan.
    #[instrument(skip(self))]
    pub async fn clan_members(&self, tag: &str) -> Result<Vec<ClanMember>, CocError> {
        self.get::<ListResponse<ClanMember>>(&format!("/clans/{}/members", encode(tag)), tag)
            .await
            .map(|r| r.items)
    }

    /// Fetch the current war of a clan.
    #[instrument(skip(self))]
    pub async fn current_war(&self, tag: &str) -> Result<ClanWar, CocError> {
        self.get(&format!("/clans/{}/currentwar", encode(tag)), tag)
            .await
    }

    /// Fetch the war log of a clan, newest first.
    #[instrument(skip(self))]
    pub async fn war_log(&self, tag: &str) -> Result<Vec<WarLogEntry>, CocError> {
        self.get::<ListResponse<WarLogEntry>>(&format!("/clans/{}/warlog", encode(tag)), tag)
            .await
            .map(|r| r.items)
    }

    /// Fetch capital raid seasons of a clan, newest first.
    #[instrument(skip(self))]
    pub async fn capital_raid_seasons(
        &self,
        tag: &str,
    ) -> Result<Vec<CapitalRaidSeason>, CocError> {
        self.get::<ListResponse<CapitalRaidSeason>>(
            &format!("/clans/{}/capitalraidseasons", encode(tag)),
            tag,
        )
        .await
        .map(|r| r.items)
    }

    /// GET with automatic retry and exponential backoff.
    ///
    /// Retries transient errors (network issues, rate limits) up to
    /// `max_retries` times. Everything else is returned immediately.
    async fn get<T: DeserializeOwned>(&self, path: &str, tag: &str) -> Result<T, CocError> {
        let mut backoff_ms = DEFAULT_INITIAL_BACKOFF_MS;
        let mut attempt = 0;

        loop {
            match self.get_once(path, tag).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Request to {} failed (attempt {}): {}", path, attempt, e);
                    sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = (backoff_ms * 2).min(DEFAULT_MAX_BACKOFF_MS);
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str, tag: &str) -> Result<T, CocError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Accept", "application/json")
            .send()
            .await?;

        self.handle_response(response, tag).await
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        tag: &str,
    ) -> Result<T, CocError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!(
                "Response body: {}",
                body.chars().take(200).collect::<String>()
            );
            serde_json::from_str(&body).map_err(CocError::from)
        } else {
            Err(self.extract_error(response, tag).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response, tag: &str) -> CocError {
        let status = response.status();
        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .message
            .or(body.reason)
            .unwrap_or_else(|| "Unknown error".into());

        match status {
            StatusCode::NOT_FOUND => CocError::NotFound(tag.to_string()),
            StatusCode::FORBIDDEN => {
                warn!("Access denied: {}", message);
                CocError::AccessDenied(message)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate limit exceeded");
                CocError::RateLimit
            }
            StatusCode::SERVICE_UNAVAILABLE => CocError::Maintenance,
            _ => CocError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
