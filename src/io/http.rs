use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use super::ChunkSource;
use anyhow::{Result, bail};

/// Streaming HTTP source for remote ZIP files
///
/// Unlike a Range based reader this needs a single plain GET: the archive is
/// decoded while the response body arrives.
pub struct HttpSource {
    response: Response,
    content_length: Option<u64>,
    transferred_bytes: u64,
}

impl HttpSource {
    /// Start a GET request, retrying connection failures up to 10 times
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_retry(url, 10).await
    }

    pub async fn connect_with_retry(url: &str, max_retry: u32) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        let mut retry_count = 0;
        let response = loop {
            match client.get(url).send().await {
                Ok(resp) => break resp,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= max_retry {
                        bail!("Max retries exceeded");
                    }
                    log::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if !response.status().is_success() {
            bail!("HTTP request failed with status: {}", response.status());
        }

        Ok(Self {
            content_length: response.content_length(),
            response,
            transferred_bytes: 0,
        })
    }

    /// Body size announced by the server, if any
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

#[async_trait]
impl ChunkSource for HttpSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(bytes) = self.response.chunk().await? else {
            return Ok(None);
        };

        self.transferred_bytes += bytes.len() as u64;
        Ok(Some(bytes.to_vec()))
    }

    fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes
    }
}
