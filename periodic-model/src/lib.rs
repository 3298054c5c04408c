//! # periodic-model
//!
//! [`Llm`](periodic_core::Llm) implementations for the periodic table agent.
//!
//! - [`OllamaModel`] - local models through an Ollama runtime (default `qwen2.5`)
//! - [`GeminiModel`] - hosted Gemini models (default `gemini-2.0-flash`)
//! - [`MockLlm`] - scripted responses for tests
//!
//! Both HTTP providers retry transient failures (408, 429, 5xx, timeouts)
//! with exponential backoff, see [`RetryConfig`].
//!
//! ```rust,no_run
//! use periodic_model::{OllamaConfig, OllamaModel};
//!
//! let model = OllamaModel::new(OllamaConfig::new("qwen2.5")).unwrap();
//! ```

pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod retry;

pub use gemini::{GeminiConfig, GeminiModel};
pub use mock::MockLlm;
pub use ollama::{OllamaConfig, OllamaModel};
pub use retry::RetryConfig;
