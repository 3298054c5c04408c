//! Model selection from flags and environment.

use crate::cli::Provider;
use anyhow::{Result, anyhow};
use periodic_core::Llm;
use periodic_model::gemini::DEFAULT_GEMINI_MODEL;
use periodic_model::ollama::DEFAULT_OLLAMA_MODEL;
use periodic_model::{GeminiConfig, GeminiModel, OllamaConfig, OllamaModel};
use std::sync::Arc;

/// Sampling temperature for chat.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub enum ModelConfig {
    Ollama(OllamaConfig),
    Gemini(GeminiConfig),
}

impl ModelConfig {
    /// Resolves provider settings. `--model` wins over the environment.
    pub fn resolve(
        provider: Provider,
        model: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        match provider {
            Provider::Ollama => {
                let model = model
                    .or_else(|| var("OLLAMA_MODEL"))
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
                let mut config = OllamaConfig::new(model).with_temperature(DEFAULT_TEMPERATURE);
                if let Some(base_url) = var("OLLAMA_API_BASE") {
                    config = config.with_base_url(base_url);
                }
                Ok(ModelConfig::Ollama(config))
            }
            Provider::Gemini => {
                let api_key = var("GOOGLE_API_KEY").or_else(|| var("GEMINI_API_KEY")).ok_or_else(|| {
                    anyhow!("GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set")
                })?;
                let model = model
                    .or_else(|| var("GEMINI_MODEL"))
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
                let config = GeminiConfig::new(api_key, model).with_temperature(DEFAULT_TEMPERATURE);
                Ok(ModelConfig::Gemini(config))
            }
        }
    }

    pub fn from_env(provider: Provider, model: Option<String>) -> Result<Self> {
        Self::resolve(provider, model, |key| std::env::var(key).ok())
    }

    pub fn model_name(&self) -> &str {
        match self {
            ModelConfig::Ollama(config) => &config.model,
            ModelConfig::Gemini(config) => &config.model,
        }
    }

    pub fn build(self) -> Result<Arc<dyn Llm>> {
        Ok(match self {
            ModelConfig::Ollama(config) => Arc::new(OllamaModel::new(config)?),
            ModelConfig::Gemini(config) => Arc::new(GeminiModel::from_config(config)?),
        })
    }
}
