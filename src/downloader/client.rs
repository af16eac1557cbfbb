// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Shared HTTP client. Requests are made once; failures go straight back to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for large downloads
            .user_agent(concat!("DeadlockModDaemon/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body; non-success statuses are errors
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        debug!(url = %url, "Requesting JSON");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Unexpected status {} from {}", status, url);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    /// Stream the body of `url` into `output_path`, removing the partial file on failure
    pub async fn download(&self, url: &str, output_path: &Path) -> anyhow::Result<u64> {
        info!(url = %url, path = %output_path.display(), "Starting download");

        match self.download_once(url, output_path).await {
            Ok(written) => {
                info!(url = %url, path = %output_path.display(), bytes = written, "Download completed");
                Ok(written)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(output_path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!(error = %cleanup, path = %output_path.display(), "Failed to remove partial download");
                    }
                }
                Err(e)
            }
        }
    }

    async fn download_once(&self, url: &str, output_path: &Path) -> anyhow::Result<u64> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let mut file = tokio::fs::File::create(output_path)
            .await
            .with_context(|| format!("Failed to create '{}'", output_path.display()))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}
