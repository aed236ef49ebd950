//! Core abstractions for the screen relay.
//!
//! This crate provides the stateful heart of the relay:
//! - `SessionId` - validated agent-chosen session identifiers
//! - `SessionRecord` - per-session state (last seen, frame file, metadata)
//! - `SessionRegistry` - concurrent in-memory session map
//!
//! Sessions are intentionally ephemeral: records live in memory for the
//! process lifetime and are never persisted or expired.

pub mod registry;
pub mod session;

pub use registry::{RegistryError, SessionRegistry};
pub use session::{SessionId, SessionRecord};
