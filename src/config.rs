//! Env-driven configuration for the relay and the CLI.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Defaults are provided for convenience during development.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::studio::GenerationPolicy;

pub const DEFAULT_IMAGE_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: String,
    pub database_url: String,
    pub db_name: String,
    pub image_api_key: Option<String>,
    pub image_api_url: String,
    pub image_model: String,
    pub cors_origins: Vec<String>,
    pub provider_timeout: Duration,
    pub breaker_threshold: u32,
    pub motif_max_count: u32,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> AppResult<Self> {
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "saree_studio".to_string());
        if db_name.trim().is_empty() {
            return Err(AppError::Config("DB_NAME must not be empty".to_string()));
        }
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("sqlite://{}.db?mode=rwc", db_name));

        let image_api_key = env::var("GOOGLE_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            api_port: env::var("API_PORT").unwrap_or_else(|_| "8001".to_string()),
            database_url,
            db_name,
            image_api_key,
            image_api_url: env::var("IMAGE_API_URL").unwrap_or_else(|_| DEFAULT_IMAGE_API_URL.to_string()),
            image_model: env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
            provider_timeout: Duration::from_secs(env_number("PROVIDER_TIMEOUT_SECS", 90)),
            breaker_threshold: env_number("MOTIF_BREAKER_THRESHOLD", 3),
            motif_max_count: env_number("MOTIF_MAX_COUNT", 12),
        })
    }

    pub fn generation_policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            call_timeout: self.provider_timeout,
            breaker_threshold: self.breaker_threshold,
        }
    }

    pub fn print_env_vars(&self) {
        let key = match &self.image_api_key {
            Some(k) => format!("<set, {} chars>", k.len()),
            None => "<unset>".to_string(),
        };
        tracing::info!("API_HOST: {}", self.api_host);
        tracing::info!("API_PORT: {}", self.api_port);
        tracing::info!("DATABASE_URL: {}", self.database_url);
        tracing::info!("DB_NAME: {}", self.db_name);
        tracing::info!("GOOGLE_API_KEY: {}", key);
        tracing::info!("IMAGE_API_URL: {}", self.image_api_url);
        tracing::info!("IMAGE_MODEL: {}", self.image_model);
        tracing::info!("CORS_ORIGINS: {}", self.cors_origins.join(","));
        tracing::info!("PROVIDER_TIMEOUT_SECS: {}", self.provider_timeout.as_secs());
        tracing::info!("MOTIF_BREAKER_THRESHOLD: {}", self.breaker_threshold);
        tracing::info!("MOTIF_MAX_COUNT: {}", self.motif_max_count);
    }
}

/// Split a comma-separated origin list, dropping blanks. An empty list means `*`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

fn env_number<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} '{}', falling back to {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
