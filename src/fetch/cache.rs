//! DownloadCache - persistent disk cache for downloaded videos.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A cached download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// The URL the video came from, when recorded
    pub url: Option<String>,
}

/// Persistent disk cache for videos downloaded from URLs.
///
/// Files are named after a hash of their URL, so the same URL is only
/// downloaded once.
pub struct DownloadCache {
    cache_dir: PathBuf,
}

impl DownloadCache {
    /// Create a cache rooted at `cache_dir`. Does not create the directory.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Create a cache in the default directory: `~/.cache/vidscii/downloads/`.
    pub fn with_default_dir() -> Self {
        Self::new(default_cache_dir())
    }

    /// Generate a deterministic 32-character hex key for a URL.
    pub fn hash_url(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }

    /// Where the video for `url` lives (whether or not it exists yet).
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.mp4", Self::hash_url(url)))
    }

    /// Temporary path a download is streamed to before it is complete.
    pub fn partial_path_for(&self, url: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.mp4.part", Self::hash_url(url)))
    }

    fn url_path_for(&self, hash: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.url", hash))
    }

    /// Get the cached video for `url`, if it exists.
    pub fn get(&self, url: &str) -> Option<PathBuf> {
        let path = self.path_for(url);
        path.is_file().then_some(path)
    }

    /// Move a finished partial download into place and record its URL.
    pub fn commit(&self, url: &str) -> Result<PathBuf, std::io::Error> {
        let final_path = self.path_for(url);
        std::fs::rename(self.partial_path_for(url), &final_path)?;
        std::fs::write(self.url_path_for(&Self::hash_url(url)), url)?;
        Ok(final_path)
    }

    /// List cached videos, largest first.
    pub fn entries(&self) -> Result<Vec<CacheEntry>, std::io::Error> {
        let mut entries = Vec::new();

        if !self.cache_dir.exists() {
            return Ok(entries);
        }

        for entry in std::fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp4") {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let url = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|hash| std::fs::read_to_string(self.url_path_for(hash)).ok());
            entries.push(CacheEntry {
                path,
                size_bytes: metadata.len(),
                url,
            });
        }

        entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        Ok(entries)
    }

    /// Remove every cached file. Returns the number of videos removed.
    pub fn clear(&self) -> Result<usize, std::io::Error> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            let is_video = path.extension().and_then(|e| e.to_str()) == Some("mp4");
            if path.is_file() {
                std::fs::remove_file(&path)?;
                if is_video {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    /// Get the cache directory path.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

/// Default cache directory for downloads.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("vidscii")
        .join("downloads")
}
