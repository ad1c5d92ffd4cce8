use super::{ImageSink, InputSource};
use crate::Result;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageElement {
    pub src: Option<String>,
    pub display: Display,
}

/// In-process page holding the text input (`string`) and the image element (`qr_img`).
#[derive(Debug, Default)]
pub struct MemoryPage {
    input: Mutex<String>,
    image: Mutex<ImageElement>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(value: impl Into<String>) -> Self {
        let page = Self::new();
        page.set_input(value);
        page
    }

    pub fn set_input(&self, value: impl Into<String>) {
        *self.input.lock().unwrap_or_else(|e| e.into_inner()) = value.into();
    }

    pub fn image(&self) -> ImageElement {
        self.image
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl InputSource for MemoryPage {
    fn value(&self) -> String {
        self.input
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ImageSink for MemoryPage {
    async fn show(&self, source: &str) -> Result<()> {
        let mut image = self.image.lock().unwrap_or_else(|e| e.into_inner());
        image.src = Some(source.to_string());
        image.display = Display::Block;
        Ok(())
    }
}
