//! Hosted Gemini models over the Generative Language REST API.

mod client;
mod config;
pub mod convert;

pub use client::GeminiModel;
pub use config::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE, GeminiConfig};
