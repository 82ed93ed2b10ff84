//! Single-shot renderings: the final design and the live preview.
//!
//! Both degrade instead of failing. Finalize falls back to a styled
//! placeholder; preview falls back to no image at all.
use super::{call_with_timeout, GenerationPolicy};
use crate::prompt::assembler::{assemble, ReferenceImages};
use crate::provider::{GeneratedImage, ImageProvider};

pub const FINALIZE_PLACEHOLDER: &str =
    "https://placehold.co/1792x1024/4A0404/FFD700?text=Your+Custom+Saree+Design";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Generated(GeneratedImage),
    Degraded { placeholder: Option<String>, reason: String },
}

impl Rendering {
    pub fn image_url(&self) -> Option<String> {
        match self {
            Rendering::Generated(image) => Some(image.to_data_uri()),
            Rendering::Degraded { placeholder, .. } => placeholder.clone(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Rendering::Generated(_) => None,
            Rendering::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Rendering::Generated(_))
    }
}

async fn render(
    provider: &dyn ImageProvider,
    prompt: &str,
    images: Option<&ReferenceImages>,
    policy: &GenerationPolicy,
    placeholder: Option<&str>,
    label: &str,
) -> Rendering {
    let parts = assemble(prompt, images);
    tracing::info!("[{}] Sending {} content parts to image provider", label, parts.len());
    match call_with_timeout(provider, &parts, policy.call_timeout).await {
        Ok(image) => {
            tracing::info!("[{}] Image generated ({} bytes)", label, image.bytes.len());
            Rendering::Generated(image)
        }
        Err(e) => {
            tracing::error!("[{}] Generation failed: {}", label, e);
            Rendering::Degraded {
                placeholder: placeholder.map(str::to_string),
                reason: e.to_string(),
            }
        }
    }
}

pub async fn finalize(
    provider: &dyn ImageProvider,
    prompt: &str,
    images: Option<&ReferenceImages>,
    policy: &GenerationPolicy,
) -> Rendering {
    render(provider, prompt, images, policy, Some(FINALIZE_PLACEHOLDER), "FINAL").await
}

pub async fn preview(
    provider: &dyn ImageProvider,
    prompt: &str,
    images: Option<&ReferenceImages>,
    policy: &GenerationPolicy,
) -> Rendering {
    render(provider, prompt, images, policy, None, "PREVIEW").await
}
