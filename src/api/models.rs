//! JSON request and response bodies. Field names follow the web client
//! (`sareeState`, `imageUrl`).
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::assembler::ReferenceImages;
use crate::studio::{MotifBatch, Rendering};

#[derive(Debug, Deserialize)]
pub struct StatusCreate {
    pub client_name: String,
}

fn default_count() -> u32 {
    4
}

#[derive(Debug, Deserialize)]
pub struct MotifRequest {
    pub prompt: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub section: String,
    pub keyword: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MotifResponse {
    pub motifs: Vec<String>,
    pub section: String,
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MotifResponse {
    pub fn new(batch: &MotifBatch, section: String, keyword: String) -> Self {
        MotifResponse {
            motifs: batch.urls(),
            section,
            keyword,
            error: batch.error().map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub prompt: String,
    #[serde(rename = "sareeState")]
    pub saree_state: Value,
    #[serde(default)]
    pub images: Option<ReferenceImages>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub prompt: String,
    #[serde(rename = "sareeState")]
    pub saree_state: Value,
    #[serde(default)]
    pub images: Option<ReferenceImages>,
}

/// `imageUrl` is always present; it is `null` only for a degraded preview.
#[derive(Debug, Serialize, Deserialize)]
pub struct DesignResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "sareeState")]
    pub saree_state: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DesignResponse {
    pub fn new(rendering: &Rendering, saree_state: Value) -> Self {
        DesignResponse {
            image_url: rendering.image_url(),
            saree_state,
            error: rendering.error().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_motif_request_default_count() {
        let req: MotifRequest =
            serde_json::from_value(json!({"prompt": "p", "section": "border", "keyword": "temple"})).unwrap();
        assert_eq!(req.count, 4);
    }

    #[test]
    fn test_degraded_preview_serializes_null_image() {
        let rendering = Rendering::Degraded { placeholder: None, reason: "boom".into() };
        let body = serde_json::to_value(DesignResponse::new(&rendering, json!({"zari": "Gold"}))).unwrap();
        assert_eq!(body, json!({"imageUrl": null, "sareeState": {"zari": "Gold"}, "error": "boom"}));
    }

    #[test]
    fn test_generated_motifs_omit_error() {
        let batch = MotifBatch::Generated(vec![]);
        let body = serde_json::to_value(MotifResponse::new(&batch, "body".into(), "butta".into())).unwrap();
        assert_eq!(body, json!({"motifs": [], "section": "body", "keyword": "butta"}));
    }
}
