//! Request orchestration on top of an [`ImageProvider`].
//!
//! Every generation is best-effort: failures are logged and folded into a
//! `Degraded` outcome that still carries something renderable.
pub mod motifs;
pub mod render;

use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::provider::{ContentPart, GeneratedImage, ImageProvider};

pub use motifs::{generate_motifs, motif_placeholder, MotifBatch};
pub use render::{finalize, preview, Rendering, FINALIZE_PLACEHOLDER};

/// Limits applied to every provider call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationPolicy {
    pub call_timeout: Duration,
    /// Consecutive failures after which a motif batch stops calling the provider.
    pub breaker_threshold: u32,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        GenerationPolicy { call_timeout: Duration::from_secs(90), breaker_threshold: 3 }
    }
}

pub(crate) async fn call_with_timeout(
    provider: &dyn ImageProvider,
    parts: &[ContentPart],
    timeout: Duration,
) -> AppResult<GeneratedImage> {
    match tokio::time::timeout(timeout, provider.generate(parts)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(timeout)),
    }
}
