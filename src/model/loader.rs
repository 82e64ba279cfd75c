//! Model artifact downloading and caching.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};

/// Filename the cached generator artifact is stored under.
pub const MODEL_FILENAME: &str = "cartoongan.onnx";

/// Approximate artifact size in bytes, for progress indication when the
/// server does not report a content length.
const MODEL_APPROX_SIZE: u64 = 12_000_000; // ~12 MB

/// Manages the model cache directory and downloads.
pub struct ModelCache {
    cache_dir: PathBuf,
}

impl ModelCache {
    /// Create a new model cache.
    ///
    /// Uses the platform-appropriate cache directory:
    /// - Windows: `%LOCALAPPDATA%\cartoonizer\models`
    /// - Linux: `~/.cache/cartoonizer/models`
    /// - macOS: `~/Library/Caches/cartoonizer/models`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn new() -> Result<Self> {
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        let cache_dir = base.join("cartoonizer").join("models");

        fs::create_dir_all(&cache_dir).map_err(|source| Error::CacheDir {
            path: cache_dir.clone(),
            source,
        })?;

        Ok(Self { cache_dir })
    }

    /// Get the path to the cached generator, downloading from `url` if it is
    /// not cached yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be downloaded or accessed.
    pub fn get_model_path(&self, url: &str) -> Result<PathBuf> {
        let path = self.cache_dir.join(MODEL_FILENAME);

        if !path.exists() {
            download_file(url, &path, MODEL_FILENAME)?;
        }

        Ok(path)
    }
}

/// Download a file from a URL to a path with progress indication.
fn download_file(url: &str, path: &Path, name: &str) -> Result<()> {
    tracing::info!("Downloading {name} from {url}");

    let client = reqwest::blocking::Client::new();
    let response = client.get(url).send().map_err(|source| Error::ModelDownload {
        name: name.to_string(),
        source,
    })?;

    let total_size = response.content_length().unwrap_or(MODEL_APPROX_SIZE);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {name}"));

    // Write to a temporary file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let mut downloaded = 0u64;
    let mut reader = response;

    loop {
        let mut buffer = [0u8; 8192];
        let bytes_read = std::io::Read::read(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }

    pb.finish_with_message(format!("Downloaded {name}"));

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}
