//! Downloading videos given as URLs.
//!
//! A URL input is streamed to disk in the download cache before decoding
//! starts; later runs with the same URL reuse the cached file.

mod cache;

pub use cache::{default_cache_dir, CacheEntry, DownloadCache};

use futures_util::{Stream, StreamExt};
use std::path::PathBuf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors that can occur while downloading a video.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether an input names a remote video rather than a local file.
pub fn is_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Downloads videos into a [`DownloadCache`].
pub struct VideoFetcher {
    http_client: reqwest::Client,
    cache: DownloadCache,
}

impl VideoFetcher {
    pub fn new(cache: DownloadCache) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            cache,
        }
    }

    pub fn cache(&self) -> &DownloadCache {
        &self.cache
    }

    /// Return a local path for `url`, downloading it if it is not cached.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if let Some(path) = self.cache.get(url) {
            log::info!("Using cached download {}", path.display());
            return Ok(path);
        }

        self.download(url).await
    }

    /// Stream `url` to the cache without holding the whole file in memory.
    ///
    /// The body goes to a `.part` file that is renamed only once complete, so
    /// an interrupted download is never mistaken for a cached video.
    pub async fn download(&self, url: &str) -> Result<PathBuf, FetchError> {
        tokio::fs::create_dir_all(self.cache.cache_dir()).await?;

        log::info!("Downloading video from: {}", url);
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let partial = self.cache.partial_path_for(url);
        let mut file = tokio::fs::File::create(&partial).await?;
        let result = write_body(response.bytes_stream(), &mut file).await;
        drop(file);

        let written = match result {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        log::info!("Downloaded {} bytes", written);
        Ok(self.cache.commit(url)?)
    }

    /// Blocking wrapper around [`fetch`](Self::fetch) for synchronous callers.
    pub fn fetch_blocking(&self, url: &str) -> Result<PathBuf, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.fetch(url))
    }
}

/// Copy a response body stream into `out` and flush it. Returns the number
/// of bytes written.
async fn write_body<S, B, W>(mut stream: S, out: &mut W) -> Result<u64, FetchError>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(chunk.as_ref()).await?;
        written += chunk.as_ref().len() as u64;
    }
    out.flush().await?;
    Ok(written)
}
