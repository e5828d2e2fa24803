//! Vault use-cases addressed by root directory.
//!
//! # Responsibility
//! - Provide the public command surface: check, fix, lookup, link, rekey.
//! - Emit `event=<op> module=service status=start|ok|error duration_ms=..`
//!   lines for every call.
//!
//! # Invariants
//! - Every call builds a fresh `Network`; nothing survives between calls.
//! - Errors are returned unchanged after being logged.

use crate::check::{CheckReport, Validator};
use crate::graph::error::{NetworkError, NetworkResult};
use crate::graph::network::Network;
use crate::graph::node::Node;
use crate::model::key::{path_to_key, Key};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Failure messages from the standard rules.
pub fn check(root: impl AsRef<Path>) -> NetworkResult<Vec<String>> {
    Ok(check_report(root)?.failures)
}

/// Full report from the standard rules, including abort information.
pub fn check_report(root: impl AsRef<Path>) -> NetworkResult<CheckReport> {
    let network = Network::new(root.as_ref());
    logged("check", || Validator::standard().run(&network))
}

/// Writes missing back-links between notes. Returns the number written.
pub fn fix_bidirectional_links(root: impl AsRef<Path>) -> NetworkResult<usize> {
    let network = Network::new(root.as_ref());
    logged("fix_bidirectional_links", || {
        network.fix_bidirectional_links()
    })
}

/// Resolves `key` under `root`.
///
/// # Errors
/// - `NotFound` when the key does not resolve.
pub fn lookup(root: impl AsRef<Path>, key: &str) -> NetworkResult<Node> {
    let network = Network::new(root.as_ref());
    logged("lookup", || network.lookup(key))
}

/// Links note `from_key` to `to_key`, with a reverse link when the target is
/// a note.
///
/// # Errors
/// - `NotFound` when either key does not resolve.
/// - `NotANote` when `from_key` names an attachment.
pub fn add_link(root: impl AsRef<Path>, from_key: &str, to_key: &str) -> NetworkResult<()> {
    let network = Network::new(root.as_ref());
    logged("add_link", || network.lookup_note(from_key)?.add_link(to_key))
}

/// Moves `old_key` to `new_key` and rewrites links. Returns the moved node.
pub fn rekey(root: impl AsRef<Path>, old_key: &str, new_key: &str) -> NetworkResult<Node> {
    let network = Network::new(root.as_ref());
    logged("rekey", || {
        let mut node = network.lookup(old_key)?;
        node.rekey(new_key)?;
        Ok(node)
    })
}

/// Key for a filesystem path.
///
/// A relative path is resolved against the process working directory when
/// that lands under `root`, and against `root` otherwise. The path does not
/// need to exist, so rename destinations can be converted.
pub fn key_for_path(root: impl AsRef<Path>, path: impl AsRef<Path>) -> NetworkResult<Key> {
    let root = root.as_ref();
    let cwd = std::env::current_dir().ok();
    let absolute = resolve_path(root, cwd.as_deref(), path.as_ref());
    path_to_key(root, &absolute).map_err(NetworkError::from)
}

fn resolve_path(root: &Path, cwd: Option<&Path>, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match cwd.map(|cwd| cwd.join(path)) {
        Some(from_cwd) if from_cwd.starts_with(root) => from_cwd,
        _ => root.join(path),
    }
}

fn logged<T>(operation: &'static str, run: impl FnOnce() -> NetworkResult<T>) -> NetworkResult<T> {
    let started_at = Instant::now();
    info!("event={operation} module=service status=start");

    match run() {
        Ok(value) => {
            info!(
                "event={operation} module=service status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            error!(
                "event={operation} module=service status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                error_code(&err)
            );
            Err(err)
        }
    }
}

fn error_code(err: &NetworkError) -> &'static str {
    match err {
        NetworkError::NotFound { .. } => "not_found",
        NetworkError::Io { .. } => "io_failed",
        NetworkError::Scan { .. } => "scan_failed",
        NetworkError::InvalidRekey { .. } => "invalid_rekey",
        NetworkError::NotANote { .. } => "not_a_note",
        NetworkError::InvalidKey(_) => "invalid_key",
    }
}

#[cfg(test)]
mod tests {
    use super::{error_code, key_for_path, resolve_path};
    use crate::graph::error::NetworkError;
    use std::path::{Path, PathBuf};

    #[test]
    fn key_for_path_resolves_relative_paths_against_root() {
        let root = Path::new("/vault");
        assert_eq!(
            key_for_path(root, "thought/foo.md").expect("relative note path"),
            "thought:foo"
        );
        assert_eq!(
            key_for_path(root, "./bar.md").expect("dotted relative path"),
            "bar"
        );
        assert_eq!(
            key_for_path(root, "/vault/image/a/b.png").expect("absolute image path"),
            "image:a/b.png"
        );
    }

    #[test]
    fn resolve_path_prefers_cwd_when_it_lands_under_root() {
        let root = Path::new("/home/me/vault");
        let cwd = Path::new("/home/me");

        assert_eq!(
            resolve_path(root, Some(cwd), Path::new("vault/thought/a.md")),
            PathBuf::from("/home/me/vault/thought/a.md")
        );
        assert_eq!(
            resolve_path(root, Some(cwd), Path::new("thought/a.md")),
            PathBuf::from("/home/me/vault/thought/a.md")
        );
        assert_eq!(
            resolve_path(root, Some(root), Path::new("thought/a.md")),
            PathBuf::from("/home/me/vault/thought/a.md")
        );
        assert_eq!(
            resolve_path(root, None, Path::new("b.md")),
            PathBuf::from("/home/me/vault/b.md")
        );
    }

    #[test]
    fn key_for_path_rejects_paths_outside_root() {
        let err = key_for_path("/vault", "/tmp/foo.md").expect_err("foreign path");
        assert!(matches!(err, NetworkError::InvalidKey(_)));
        assert_eq!(error_code(&err), "invalid_key");
    }
}
