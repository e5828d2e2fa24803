//! Core graph model for synapse note vaults.
//! This crate is the single source of truth for link and vault invariants.

pub mod check;
pub mod config;
pub mod graph;
pub mod logging;
pub mod model;
pub mod service;

pub use check::{CheckFlow, CheckReport, CheckRule, Validator, ValidatorError};
pub use config::{ConfigError, SynapseConfig};
pub use graph::{
    topic_neighbors, traverse, LinkTarget, Network, NetworkError, NetworkResult, Node, NoteNode,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LogTarget};
pub use model::key::{key_to_path, path_to_key, Key, KeyError, NodeKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
