use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::ReadAt;
use anyhow::{Context, Result, bail};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 10;
const RETRY_STEP: Duration = Duration::from_millis(500);

/// Archive hosted on an HTTP server that honours `Range` requests.
///
/// Only the central directory and the entries actually decoded are
/// transferred, never the whole file.
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
    transferred_bytes: AtomicU64,
}

impl HttpRangeReader {
    /// Probe the URL with a HEAD request: it must advertise byte ranges
    /// and a Content-Length.
    pub async fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_client(client, url).await
    }

    /// Same as [`new`](Self::new) with a caller-configured client.
    pub async fn with_client(client: Client, url: String) -> Result<Self> {
        let size = probe(&client, &url).await?;
        debug!(%url, size, "remote archive opened");

        Ok(Self {
            client,
            url,
            size,
            transferred_bytes: AtomicU64::new(0),
        })
    }

    /// Total bytes received so far
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    /// One GET for `first..=last`, retried on connect errors and timeouts.
    async fn fetch_range(&self, first: u64, last: u64) -> Result<Vec<u8>> {
        let range = format!("bytes={}-{}", first, last);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let sent = self
                .client
                .get(&self.url)
                .header(header::RANGE, &range)
                .send()
                .await;

            match sent {
                Ok(resp) if resp.status() == StatusCode::PARTIAL_CONTENT => {
                    let body = resp
                        .bytes()
                        .await
                        .with_context(|| format!("Reading {} of {}", range, self.url))?;
                    return Ok(body.to_vec());
                }
                Ok(resp) => bail!("Range request {} failed with status: {}", range, resp.status()),
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, max = MAX_ATTEMPTS, error = %e, %range, "retrying range request");
                    tokio::time::sleep(RETRY_STEP * attempt).await;
                }
                Err(e) => return Err(e).with_context(|| format!("Range request {} failed", range)),
            }
        }
    }
}

async fn probe(client: &Client, url: &str) -> Result<u64> {
    let resp = client.head(url).send().await?;
    if !resp.status().is_success() {
        bail!("HTTP request failed with status: {}", resp.status());
    }

    let headers = resp.headers();
    let ranged = headers
        .get(header::ACCEPT_RANGES)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("bytes"));
    if !ranged {
        bail!("Remote server does not support Range requests");
    }

    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .context("Remote server did not return Content-Length")
}

#[async_trait]
impl ReadAt for HttpRangeReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || offset >= self.size {
            return Ok(0);
        }

        let last = (offset + buf.len() as u64 - 1).min(self.size - 1);
        let wanted = (last - offset + 1) as usize;
        let mut received = 0;

        // Servers may answer with less than asked; keep going from where
        // the previous chunk stopped.
        while received < wanted {
            let chunk = self.fetch_range(offset + received as u64, last).await?;
            if chunk.is_empty() {
                bail!("Remote server returned an empty range");
            }
            let n = chunk.len().min(wanted - received);
            buf[received..received + n].copy_from_slice(&chunk[..n]);
            received += n;
            self.transferred_bytes.fetch_add(n as u64, Ordering::Relaxed);
        }

        Ok(received)
    }

    fn size(&self) -> u64 {
        self.size
    }
}
