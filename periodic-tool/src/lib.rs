//! # periodic-tool
//!
//! Tools for the periodic table agent.
//!
//! - [`get_element_info`] - element lookup by symbol or Chinese name
//! - [`element_info_tool`] - the lookup registered as a [`FunctionTool`]
//!
//! ```rust
//! use periodic_tool::get_element_info;
//!
//! let info = get_element_info("Fe", None);
//! assert_eq!(info.message(), "铁（Iron），原子序数：26，原子量：55.845");
//! ```

pub mod element_info;
mod function_tool;
pub mod schema;

pub use element_info::{ElementInfo, ElementInfoArgs, element_info_tool, get_element_info};
pub use function_tool::FunctionTool;
pub use periodic_core::{Tool, ToolContext};
