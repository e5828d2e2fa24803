//! Lazy note graph over a vault directory.
//!
//! # Responsibility
//! - Resolve keys to nodes and enumerate entries per kind.
//! - Parse and rewrite link markers inside note text.
//! - Keep links consistent across link insertion and rekeying.
//!
//! # Invariants
//! - The filesystem is the only source of truth; nothing is cached.
//! - Mutations are sequential file writes without rollback.

pub mod error;
pub mod links;
pub mod network;
pub mod node;
pub mod traverse;

pub use error::{NetworkError, NetworkResult};
pub use network::{topic_neighbors, Network};
pub use node::{LinkTarget, Node, NoteNode};
pub use traverse::traverse;
