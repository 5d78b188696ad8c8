//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) yields
//! the stock setup: the vision preview model, a 350 token reply cap and a 250 ms
//! preview debounce.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MentorError, MentorResult};

pub const DEFAULT_MODEL: &str = "gpt-4-vision-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 350;
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Settings shared by the session controller and the preview compositor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MentorConfig {
    /// Model identifier sent with every completion request.
    pub model: String,

    /// Reply length cap sent as `max_tokens`.
    pub max_tokens: u32,

    /// Base URL of the chat-completion API, without the `/chat/completions` suffix.
    pub api_base_url: String,

    /// Quiescence window before the preview is recomposed.
    pub debounce_ms: u64,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl MentorConfig {
    /// Creates a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder: Set API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: Set debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> MentorResult<Self> {
        let config: MentorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML config file.
    pub fn load(path: &Path) -> MentorResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Full URL of the chat-completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }

    fn validate(&self) -> MentorResult<()> {
        if self.model.trim().is_empty() {
            return Err(MentorError::config("model must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(MentorError::config("max_tokens must be greater than zero"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(MentorError::config("api_base_url must not be empty"));
        }
        Ok(())
    }
}
