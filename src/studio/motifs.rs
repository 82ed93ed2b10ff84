//! Motif batch generation.
//!
//! Attempts run one after another with the same prompt. Only a batch with no
//! images at all is replaced by placeholders; a partial batch is returned as is.
use super::{call_with_timeout, GenerationPolicy};
use crate::error::AppError;
use crate::provider::{ContentPart, GeneratedImage, ImageProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotifBatch {
    Generated(Vec<GeneratedImage>),
    Degraded { placeholders: Vec<String>, reason: String },
}

impl MotifBatch {
    /// Entries as transported: data URIs or placeholder URLs.
    pub fn urls(&self) -> Vec<String> {
        match self {
            MotifBatch::Generated(images) => images.iter().map(|i| i.to_data_uri()).collect(),
            MotifBatch::Degraded { placeholders, .. } => placeholders.clone(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MotifBatch::Generated(_) => None,
            MotifBatch::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// 1-indexed placeholder URL for motif `ordinal`.
pub fn motif_placeholder(ordinal: u32) -> String {
    format!("https://placehold.co/400x400/8B0000/FFD700?text=Motif+{}", ordinal)
}

pub async fn generate_motifs(
    provider: &dyn ImageProvider,
    prompt: &str,
    count: u32,
    section: &str,
    keyword: &str,
    policy: &GenerationPolicy,
) -> MotifBatch {
    let parts = [ContentPart::text(prompt)];
    let mut images = Vec::new();
    let mut consecutive_failures = 0u32;
    let mut last_error: Option<AppError> = None;
    let mut tripped: Option<AppError> = None;

    for attempt in 1..=count {
        if policy.breaker_threshold > 0 && consecutive_failures >= policy.breaker_threshold {
            tracing::warn!(
                section, keyword, skipped = count - attempt + 1,
                "Circuit open after {} consecutive failures, skipping remaining motifs", consecutive_failures
            );
            tripped = Some(AppError::CircuitOpen(consecutive_failures));
            break;
        }
        match call_with_timeout(provider, &parts, policy.call_timeout).await {
            Ok(image) => {
                tracing::debug!(section, attempt, count, "Generated motif");
                consecutive_failures = 0;
                images.push(image);
            }
            Err(e) => {
                tracing::warn!(section, attempt, count, "Motif generation failed: {}", e);
                consecutive_failures += 1;
                last_error = Some(e);
            }
        }
    }

    if images.is_empty() && count > 0 {
        let mut reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no motifs generated".to_string());
        if let Some(open) = tripped {
            reason = format!("{}; {}", reason, open);
        }
        tracing::warn!(section, keyword, "No motifs generated, using placeholder images");
        return MotifBatch::Degraded {
            placeholders: (1..=count).map(motif_placeholder).collect(),
            reason,
        };
    }

    tracing::info!("Generated {} motifs for {} with keyword: {}", images.len(), section, keyword);
    MotifBatch::Generated(images)
}
