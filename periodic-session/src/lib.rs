//! # periodic-session
//!
//! Session storage for the periodic table agent.
//!
//! Sessions handed out by [`InMemorySessionService`] are live: every holder
//! of the same session sees the same state bag, so writes made by a tool are
//! visible to the runner and to later turns without copying.

pub mod inmemory;
pub mod service;

pub use inmemory::InMemorySessionService;
pub use periodic_core::{Event, EventActions, Session, State};
pub use service::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
