//! # periodic-core
//!
//! Core traits and types shared by the periodic table agent crates.
//!
//! - [`Agent`] / [`InvocationContext`] - running an agent over a session
//! - [`Tool`] / [`ToolContext`] - callable capabilities and what they can reach
//! - [`Session`] / [`State`] / [`DeltaState`] - conversation state
//! - [`Artifacts`] - named binary outputs
//! - [`TaskScheduler`] - fire-and-forget side effects
//! - [`Llm`] - model providers
//! - [`PeriodicError`] / [`Result`] - unified error handling
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait Tool: Send + Sync {
//!     fn name(&self) -> &str;
//!     fn description(&self) -> &str;
//!     async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
//! }
//! ```

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod model;
pub mod scheduler;
pub mod tool;
pub mod types;

pub use agent::{Agent, EventStream, InvocationContext, RunConfig};
pub use context::{
    Artifacts, DeltaState, MAX_STATE_KEY_LEN, MapState, ReadonlyContext, Session, State,
    validate_state_key,
};
pub use error::{PeriodicError, Result};
pub use event::{Event, EventActions};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
pub use scheduler::{BackgroundTask, RuntimeScheduler, TaskScheduler};
pub use tool::{Tool, ToolContext};
pub use types::{Content, FunctionResponseData, MAX_INLINE_DATA_SIZE, Part};
