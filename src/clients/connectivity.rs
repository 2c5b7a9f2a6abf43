use crate::config::LibraryConfig;
use crate::services::ports::Connectivity;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Reachability check against a lightweight probe URL.
#[derive(Clone)]
pub struct HttpConnectivity {
    client: Client,
    probe_url: String,
}

impl HttpConnectivity {
    pub fn new(config: &LibraryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(
                config.connectivity_timeout_seconds,
            )))
            .build()
            .context("Failed to build connectivity probe client")?;

        Ok(Self {
            client,
            probe_url: config.connectivity_probe_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Connectivity for HttpConnectivity {
    async fn is_online(&self) -> bool {
        match self.client.head(&self.probe_url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Connectivity probe failed");
                false
            }
        }
    }
}

/// Fixed answer, for forcing offline mode.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait::async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}
