//! Prompt templating with simple `{{placeholder}}` substitution.
//!
//! Given a text `template` and an `inputs` object, replaces every `{{ key }}`
//! occurrence with `inputs[key]`. Strings are inserted verbatim, other JSON
//! values in their serialized form.
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConstructor;

impl PromptConstructor {
    pub fn new() -> Self {
        PromptConstructor
    }

    pub fn construct_prompt(&self, template: &str, inputs: &Value) -> AppResult<String> {
        if !inputs.is_object() {
            return Err(AppError::PromptConstruction("inputs must be a JSON object".to_string()));
        }

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                AppError::PromptConstruction("unterminated placeholder".to_string())
            })?;
            let key = after[..end].trim();
            let replacement = inputs.get(key).ok_or_else(|| {
                AppError::PromptConstruction(format!("Missing input for placeholder: {}", key))
            })?;
            match replacement {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
