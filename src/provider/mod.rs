//! Image provider seam.
//!
//! `ImageProvider::generate` takes an ordered list of content parts and yields
//! exactly one image or an error. Every failure cause (transport, API status,
//! no inline image) is an `AppError`; callers only log and degrade.
pub mod gemini;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::utils::data_uri::InlineImage;

pub use gemini::GeminiClient;

/// A single generated artifact, re-encoded as a data URI for transport.
pub type GeneratedImage = InlineImage;

/// One element of a multimodal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(InlineImage),
}

impl ContentPart {
    pub fn text(s: impl Into<String>) -> Self {
        ContentPart::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(t) => Some(t),
            ContentPart::Image(_) => None,
        }
    }
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, parts: &[ContentPart]) -> AppResult<GeneratedImage>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::error::AppError;

    /// Replays a fixed script of outcomes, then fails with `NoImage`.
    pub struct ScriptedProvider {
        script: Mutex<VecDeque<Option<GeneratedImage>>>,
        delay: Option<Duration>,
        calls: Mutex<Vec<Vec<ContentPart>>>,
    }

    impl ScriptedProvider {
        pub fn new(script: Vec<Option<GeneratedImage>>) -> Self {
            ScriptedProvider {
                script: Mutex::new(script.into()),
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn slow(delay: Duration) -> Self {
            let mut p = ScriptedProvider::new(vec![Some(png())]);
            p.delay = Some(delay);
            p
        }

        pub fn calls(&self) -> Vec<Vec<ContentPart>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageProvider for ScriptedProvider {
        async fn generate(&self, parts: &[ContentPart]) -> AppResult<GeneratedImage> {
            self.calls.lock().unwrap().push(parts.to_vec());
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            let next = self.script.lock().unwrap().pop_front().flatten();
            next.ok_or(AppError::NoImage)
        }
    }

    pub fn png() -> GeneratedImage {
        InlineImage::new("image/png", vec![0x89, b'P', b'N', b'G'])
    }
}
