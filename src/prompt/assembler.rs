//! Multimodal content assembly.
//!
//! Order is fixed: border, body, pallu, then the prompt text. Each label
//! immediately precedes its image so the model can pair them.
use serde::{Deserialize, Serialize};

use crate::provider::ContentPart;
use crate::utils::data_uri;

pub const BORDER_LABEL: &str = "Border design reference image:";
pub const BODY_LABEL: &str = "Body design reference image:";
pub const PALLU_LABEL: &str = "Pallu design reference image:";

/// Optional reference images, each a data URI string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pallu: Option<String>,
}

impl ReferenceImages {
    fn ordered(&self) -> [(&'static str, &'static str, Option<&String>); 3] {
        [
            ("border", BORDER_LABEL, self.border.as_ref()),
            ("body", BODY_LABEL, self.body.as_ref()),
            ("pallu", PALLU_LABEL, self.pallu.as_ref()),
        ]
    }
}

pub fn assemble(prompt: &str, images: Option<&ReferenceImages>) -> Vec<ContentPart> {
    let mut parts = Vec::new();
    if let Some(images) = images {
        for (section, label, uri) in images.ordered() {
            let Some(uri) = uri else { continue };
            match data_uri::parse(uri) {
                Some(img) => {
                    parts.push(ContentPart::text(label));
                    parts.push(ContentPart::Image(img));
                }
                None => tracing::warn!(section, "Skipping malformed reference image"),
            }
        }
    }
    parts.push(ContentPart::text(prompt));
    parts
}
