mod file;
mod memory;

pub use file::FileSink;
pub use memory::{Display, ImageElement, MemoryPage};

use crate::Result;
use async_trait::async_trait;

/// Where the text to encode is read from when a dispatch is triggered.
pub trait InputSource: Send + Sync {
    fn value(&self) -> String;
}

/// Target that displays the returned image.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Sets the image source and makes the image visible.
    async fn show(&self, source: &str) -> Result<()>;
}
