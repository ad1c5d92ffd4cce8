use super::ImageSink;
use crate::{
    Result,
    dispatch::{DataUri, is_png},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Writes each displayed image to a PNG file, replacing the previous one.
///
/// A payload that is not decodable PNG data is treated like a broken image in
/// a browser: it is logged and nothing is written. Filesystem errors are
/// returned to the caller.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSink for FileSink {
    async fn show(&self, source: &str) -> Result<()> {
        let bytes = match DataUri::parse(source).and_then(|uri| uri.decode()) {
            Ok(bytes) if is_png(&bytes) => bytes,
            Ok(bytes) => {
                warn!(
                    "Image payload decoded to {} bytes without a PNG signature, not rendering",
                    bytes.len()
                );
                return Ok(());
            }
            Err(e) => {
                warn!("Image payload could not be decoded, not rendering: {}", e);
                return Ok(());
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        debug!("Writing {} bytes to {}", bytes.len(), self.path.display());
        tokio::fs::write(&self.path, &bytes).await?;
        info!("QR image written to {}", self.path.display());

        Ok(())
    }
}
