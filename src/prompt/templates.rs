//! Saree prompt templates rendered through [`PromptConstructor`].
//!
//! Used by `sareectl` when no explicit prompt is given. The relay endpoints
//! forward client prompts unchanged.
use serde_json::{json, Map, Value};

use super::assembler::ReferenceImages;
use super::constructor::PromptConstructor;
use crate::error::{AppError, AppResult};

pub const SECTIONS: [&str; 3] = ["body", "border", "pallu"];

const BASE_BRIEF: &str = "Professional product photograph of a traditional Kanjeevaram silk saree, \
fully unfolded in a flat lay on a plain white background.
- Landscape orientation with a 5:1 aspect ratio showing the full length
- Continuous body with the pallu at the far right end
- Woven borders framing all four edges, motifs on the short edges facing inward
- Zari rendered as metallic thread woven into the silk, never printed or pasted
- Studio lighting, visible silk grain, wrinkle-free";

const BORDER_MOTIF: &str = "Generate ONE high-resolution border motif for a Kanjeevaram silk saree.
- Theme: {{keyword}}
- Border category: {{category}}
- Border width: {{size}} ({{inches}} inches)
- Zari: {{zari}}
Wide horizontal strip, seamless repeat, woven handloom look with metallic zari. \
No embroidery, no flat or printed textures.";

const BODY_MOTIF: &str = "Generate ONE high-resolution body pattern for a Kanjeevaram silk saree.
- Theme: {{keyword}}
- Body category: {{category}}
- Zari level: {{zari_level}}
Square 1:1 tile that repeats seamlessly across the saree body, woven handloom look. \
No embroidery, no artificial shine.";

const PALLU_MOTIF: &str = "Generate ONE high-resolution pallu design for a Kanjeevaram silk saree.
- Theme: {{keyword}}
- Pallu category: {{category}}
- Zari level: {{zari_level}}
Wide rectangle, grand and ornate, richer and denser than the body pattern, layered woven look. \
No flat illustration, no printed look.";

const DESIGN_BRIEF: &str = "{{base}}

{{heading}}:
- BODY: {{body}}
- BORDER: {{border}}
- PALLU: {{pallu}}
- ZARI: {{zari}} zari thread detailing throughout
{{references}}
{{extra}}";

const INITIAL_BRIEF: &str = "{{base}}

INITIAL DESIGN (base colors only, do not overdesign):
- BODY: plain silk body in exact color {{body}} with natural weave and grain
- BORDER: woven border in exact color {{border}}, about 2 inches wide on all four edges, \
interwoven with {{zari}} zari threads
- PALLU: solid silk pallu in exact color {{pallu}} with traditional linear {{zari}} zari lines
- ZARI: metallic and woven into the fabric, never printed or pasted
Keep the design simple. Do not introduce motifs, heavy patterns or modern elements.
{{extra}}";

/// Which rendering a design prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First preview from colors alone, before any pattern is chosen.
    Initial,
    Preview,
    Final,
}

fn section_color<'a>(state: &'a Value, section: &str) -> &'a str {
    state
        .get(section)
        .and_then(|p| p.get("color"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("natural")
}

fn motif_defaults(section: &str) -> Option<Value> {
    match section {
        "border" => Some(json!({"category": "Temple", "size": "Medium", "inches": 2, "zari": "Gold"})),
        "body" => Some(json!({"category": "Butta", "zari_level": "Medium"})),
        "pallu" => Some(json!({"category": "Grand", "zari_level": "Heavy"})),
        _ => None,
    }
}

/// Render the motif brief for `section`; `inputs` must carry `keyword` and
/// may override the section defaults.
pub fn motif_prompt(section: &str, inputs: &Value) -> AppResult<String> {
    let template = match section {
        "border" => BORDER_MOTIF,
        "body" => BODY_MOTIF,
        "pallu" => PALLU_MOTIF,
        other => return Err(AppError::InvalidInput(format!("unknown section '{}'", other))),
    };
    let mut merged = motif_defaults(section).unwrap_or_else(|| Value::Object(Map::new()));
    if let (Some(base), Some(extra)) = (merged.as_object_mut(), inputs.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    PromptConstructor::new().construct_prompt(template, &merged)
}

/// `"<section> with <pattern> pattern in <color> color"`, or
/// `"plain <color> colored <section>"` when no pattern is chosen.
pub fn describe_section(state: &Value, section: &str) -> String {
    let part = state.get(section);
    let field = |name: &str| {
        part.and_then(|p| p.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let color = section_color(state, section);
    match field("pattern") {
        Some(pattern) => format!("{} with {} pattern in {} color", section, pattern, color),
        None => format!("plain {} colored {}", color, section),
    }
}

pub fn design_prompt(
    state: &Value,
    stage: Stage,
    images: Option<&ReferenceImages>,
    extra: Option<&str>,
) -> AppResult<String> {
    let zari = state.get("zari").and_then(Value::as_str).unwrap_or("Gold");
    let heading = match stage {
        Stage::Initial => {
            let inputs = json!({
                "base": BASE_BRIEF,
                "body": section_color(state, "body"),
                "border": section_color(state, "border"),
                "pallu": section_color(state, "pallu"),
                "zari": zari,
                "extra": extra.unwrap_or(""),
            });
            let rendered = PromptConstructor::new().construct_prompt(INITIAL_BRIEF, &inputs)?;
            return Ok(rendered.trim_end().to_string());
        }
        Stage::Preview => "SPECIFIC DESIGN DETAILS",
        Stage::Final => "FINAL DESIGN SPECIFICATIONS",
    };
    let mut references = Vec::new();
    if let Some(images) = images {
        for (section, present) in [
            ("body", images.body.is_some()),
            ("border", images.border.is_some()),
            ("pallu", images.pallu.is_some()),
        ] {
            if present {
                references.push(format!("- Use the provided {} reference image as the design for the {}", section, section));
            }
        }
    }
    let inputs = json!({
        "base": BASE_BRIEF,
        "heading": heading,
        "body": describe_section(state, "body"),
        "border": describe_section(state, "border"),
        "pallu": describe_section(state, "pallu"),
        "zari": zari,
        "references": references.join("\n"),
        "extra": extra.unwrap_or(""),
    });
    let rendered = PromptConstructor::new().construct_prompt(DESIGN_BRIEF, &inputs)?;
    Ok(rendered.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motif_prompt_uses_keyword_and_defaults() {
        let p = motif_prompt("border", &json!({"keyword": "Peacock"})).unwrap();
        assert!(p.contains("Theme: Peacock"));
        assert!(p.contains("Medium (2 inches)"));
        assert!(p.contains("Zari: Gold"));
    }

    #[test]
    fn test_motif_prompt_inputs_override_defaults() {
        let p = motif_prompt("pallu", &json!({"keyword": "Elephant", "zari_level": "Light"})).unwrap();
        assert!(p.contains("Zari level: Light"));
    }

    #[test]
    fn test_motif_prompt_requires_keyword_and_known_section() {
        assert!(motif_prompt("body", &json!({})).is_err());
        assert!(motif_prompt("blouse", &json!({"keyword": "x"})).is_err());
    }

    #[test]
    fn test_describe_section() {
        let state = json!({
            "body": {"color": "#8B0000", "pattern": "Paisley"},
            "border": {"color": "#FFD700", "pattern": ""},
        });
        assert_eq!(describe_section(&state, "body"), "body with Paisley pattern in #8B0000 color");
        assert_eq!(describe_section(&state, "border"), "plain #FFD700 colored border");
        assert_eq!(describe_section(&state, "pallu"), "plain natural colored pallu");
    }

    #[test]
    fn test_design_prompt_mentions_references_and_extra() {
        let state = json!({"zari": "Silver", "pallu": {"color": "green", "pattern": "Mandala"}});
        let images = ReferenceImages { pallu: Some("data:image/png;base64,AQID".into()), ..Default::default() };
        let p = design_prompt(&state, Stage::Final, Some(&images), Some("Add a peacock.")).unwrap();
        assert!(p.contains("FINAL DESIGN SPECIFICATIONS"));
        assert!(p.contains("PALLU: pallu with Mandala pattern in green color"));
        assert!(p.contains("ZARI: Silver"));
        assert!(p.contains("reference image as the design for the pallu"));
        assert!(!p.contains("design for the body"));
        assert!(p.ends_with("Add a peacock."));
    }

    #[test]
    fn test_initial_prompt_uses_colors_only() {
        let state = json!({
            "body": {"color": "#8B0000", "pattern": "Paisley"},
            "border": {"color": "#FFD700"},
            "zari": "Copper",
        });
        let p = design_prompt(&state, Stage::Initial, None, None).unwrap();
        assert!(p.contains("INITIAL DESIGN"));
        assert!(p.contains("plain silk body in exact color #8B0000"));
        assert!(p.contains("woven border in exact color #FFD700"));
        assert!(p.contains("solid silk pallu in exact color natural"));
        assert!(p.contains("Copper zari threads"));
        assert!(!p.contains("Paisley"));
        assert!(p.ends_with("modern elements."));
    }
}
