use crate::config::TmdbConfig;
use crate::models::season::SeasonResponse;
use crate::services::ports::MetadataSource;
use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("zplex/0.1")
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    pub async fn get_season(&self, tmdb_id: i32, season_number: i32) -> Result<SeasonResponse> {
        let url = format!("{}/tv/{}/season/{}", self.base_url, tmdb_id, season_number);
        debug!(tmdb_id, season_number, "Fetching season from TMDB");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .send()
            .await
            .context("Failed to connect to TMDB")?;

        if response.status() == StatusCode::NOT_FOUND {
            bail!("Season {season_number} of show {tmdb_id} not found on TMDB");
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("TMDB API error: {status} - {body}");
        }

        let season: SeasonResponse = response
            .json()
            .await
            .context("Failed to parse TMDB season response")?;

        Ok(season)
    }
}

#[async_trait::async_trait]
impl MetadataSource for TmdbClient {
    async fn get_season(&self, tmdb_id: i32, season_number: i32) -> Result<SeasonResponse> {
        Self::get_season(self, tmdb_id, season_number).await
    }
}
