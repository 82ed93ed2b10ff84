//! Saree design relay library
//!
//! Modules:
//! - `api`: Axum HTTP handlers, wire models and router setup used by the server.
//! - `provider`: Image provider seam and the Gemini REST client.
//! - `prompt`: Multimodal content assembly and `{{placeholder}}` prompt templates.
//! - `studio`: Motif batches and finalize/preview renderings with fallbacks.
//! - `status`: Append-only status log (SQLite and in-memory stores).
//! - `utils`: Data-URI codec and dotted-path state helpers.
//! - `shutdown`: Ctrl-C / SIGTERM future for graceful server shutdown.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `GeminiClient`,
//! `ImageProvider`, `PromptConstructor`, `StatusStore`.
pub mod api;
pub mod config;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod shutdown;
pub mod status;
pub mod studio;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use prompt::constructor::PromptConstructor;
pub use provider::{GeminiClient, ImageProvider};
pub use status::StatusStore;
