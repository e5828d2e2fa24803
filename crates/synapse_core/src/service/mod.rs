//! Root-path based use-case operations.
//!
//! # Responsibility
//! - Expose vault commands to the CLI by vault root path.
//! - Emit one timed status event per operation.

pub mod network_service;
