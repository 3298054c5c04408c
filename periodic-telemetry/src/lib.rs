//! # periodic-telemetry
//!
//! Structured logging for the periodic table agent, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust
//! use periodic_telemetry::{init_telemetry, info, instrument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("periodic-agent")?;
//!
//!     #[instrument]
//!     async fn lookup() {
//!         info!("looking up");
//!     }
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{LogFormat, TelemetryConfig, init, init_telemetry, level_for_verbosity};
pub use spans::*;
