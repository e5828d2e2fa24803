//! Identity model for vault entries.
//!
//! # Responsibility
//! - Define the typed key grammar shared by notes and attachments.
//! - Map keys to filesystem paths and back.
//!
//! # Invariants
//! - A key maps to exactly one path under the vault root.
//! - `key_to_path(path_to_key(p)) == p` for every enumerated path.

pub mod key;
