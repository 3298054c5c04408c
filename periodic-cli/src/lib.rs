//! # periodic-cli
//!
//! The `periodic-agent` binary: an interactive console, one-shot questions,
//! and direct calls to `get_element_info` without a model.
//!
//! ```bash
//! # Interactive console against a local Ollama (default qwen2.5)
//! periodic-agent
//!
//! # Hosted Gemini
//! GOOGLE_API_KEY=... periodic-agent --provider gemini ask "铁的原子量是多少？"
//!
//! # No model at all
//! periodic-agent lookup 铁 --show-context
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod console;
pub mod lookup;

pub use agent::build_agent;
pub use cli::{Cli, Commands, Provider};
pub use config::ModelConfig;
pub use console::{ChatSession, run_console};
pub use lookup::run_lookup;
