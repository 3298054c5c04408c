//! # periodic-artifact
//!
//! Named, versioned binary outputs ([`periodic_core::Part`]) scoped to an
//! app, user and session. Names prefixed with `user:` are shared by all
//! sessions of the same user.

pub mod inmemory;
pub mod scoped;
pub mod service;

pub use inmemory::InMemoryArtifactService;
pub use scoped::ScopedArtifacts;
pub use service::{
    ArtifactScope, ArtifactService, DeleteRequest, LoadRequest, SaveRequest, validate_file_name,
};
