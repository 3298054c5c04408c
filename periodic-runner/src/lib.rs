//! # periodic-runner
//!
//! Agent execution runtime.
//!
//! - [`Runner`] - runs an agent against a stored session and persists every event
//! - [`RunnerConfig`] - services the runner binds together
//! - [`InvocationContext`] - the context one run hands to its agent
//!
//! ```rust,ignore
//! let runner = Runner::new(RunnerConfig {
//!     app_name: "periodic".to_string(),
//!     agent,
//!     session_service,
//!     artifact_service: Some(artifact_service),
//!     run_config: RunConfig::default(),
//! })?;
//!
//! let mut events = runner.run("user-1".into(), "session-1".into(), question).await?;
//! ```

mod context;
mod runner;

pub use context::InvocationContext;
pub use runner::{Runner, RunnerConfig};
