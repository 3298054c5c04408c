//! Local models served by an Ollama runtime (`/api/chat`).

mod client;
mod config;
pub mod convert;

pub use client::OllamaModel;
pub use config::{DEFAULT_OLLAMA_MODEL, OLLAMA_API_BASE, OllamaConfig};
