//! Filesystem-backed note network.
//!
//! # Responsibility
//! - Enumerate vault entries per kind by scanning category directories.
//! - Resolve keys to nodes and run graph-wide repair and validation passes.
//!
//! # Invariants
//! - No graph state is cached; every call re-scans or re-reads the disk.
//! - A key is enumerated only if `key_to_path(key)` is exactly the scanned
//!   path, so every enumerated key resolves.
//! - Category directories are scanned non-recursively.

use crate::check::Validator;
use crate::graph::error::{NetworkError, NetworkResult};
use crate::graph::node::{Node, NoteNode};
use crate::graph::traverse::traverse;
use crate::model::key::{key_to_path, path_to_key, Key, NodeKind, NOTE_SUFFIX};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Note graph rooted at one vault directory.
///
/// Cloning is cheap; clones share the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    root: Arc<Path>,
}

impl Network {
    /// Creates a network over `root`. The directory is not touched until a
    /// query runs.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::from(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every key in the vault: topics, thoughts, journal, projects, images,
    /// files, raw.
    pub fn iterate(&self) -> NetworkResult<Vec<Key>> {
        let mut keys = Vec::new();
        for kind in NodeKind::ALL {
            keys.extend(self.keys_of_kind(kind)?);
        }
        Ok(keys)
    }

    /// Keys of one kind in directory iteration order.
    ///
    /// A missing category directory yields no keys. Files whose path cannot
    /// be expressed as a key of `kind` are skipped with a warning.
    ///
    /// # Errors
    /// - `Scan` when the category directory exists but cannot be listed.
    pub fn keys_of_kind(&self, kind: NodeKind) -> NetworkResult<Vec<Key>> {
        let dir = match kind.directory() {
            Some(subdir) => self.root.join(subdir),
            None => self.root.to_path_buf(),
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let scan_error = |source| NetworkError::Scan {
            dir: dir.clone(),
            source,
        };
        let mut keys = Vec::new();
        for entry in fs::read_dir(&dir).map_err(scan_error)? {
            let path = entry.map_err(scan_error)?.path();
            if !path.is_file() {
                continue;
            }
            if kind.is_note() && !path.to_string_lossy().ends_with(NOTE_SUFFIX) {
                continue;
            }

            match path_to_key(&self.root, &path) {
                Ok(key) if key.kind() == kind && key_to_path(&self.root, &key) == path => {
                    keys.push(key);
                }
                Ok(_) => {
                    warn!(
                        "event=network_scan module=graph status=skip kind={kind} reason=ambiguous_key"
                    );
                }
                Err(err) => {
                    warn!(
                        "event=network_scan module=graph status=skip kind={kind} reason=invalid_key error={err}"
                    );
                }
            }
        }

        debug!(
            "event=network_scan module=graph status=ok kind={kind} count={}",
            keys.len()
        );
        Ok(keys)
    }

    /// Nodes of one kind, freshly enumerated.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> NetworkResult<Vec<Node>> {
        Ok(self
            .keys_of_kind(kind)?
            .into_iter()
            .map(|key| Node::new(self.clone(), key))
            .collect())
    }

    /// All notes: topics, thoughts, journal, projects.
    pub fn notes(&self) -> NetworkResult<Vec<NoteNode>> {
        let mut notes = Vec::new();
        for kind in NodeKind::NOTES {
            notes.extend(self.notes_of_kind(kind)?);
        }
        Ok(notes)
    }

    pub fn topics(&self) -> NetworkResult<Vec<NoteNode>> {
        self.notes_of_kind(NodeKind::Topic)
    }

    pub fn thoughts(&self) -> NetworkResult<Vec<NoteNode>> {
        self.notes_of_kind(NodeKind::Thought)
    }

    pub fn journal(&self) -> NetworkResult<Vec<NoteNode>> {
        self.notes_of_kind(NodeKind::Journal)
    }

    pub fn projects(&self) -> NetworkResult<Vec<NoteNode>> {
        self.notes_of_kind(NodeKind::Project)
    }

    pub fn images(&self) -> NetworkResult<Vec<Node>> {
        self.nodes_of_kind(NodeKind::Image)
    }

    pub fn files(&self) -> NetworkResult<Vec<Node>> {
        self.nodes_of_kind(NodeKind::File)
    }

    pub fn raw(&self) -> NetworkResult<Vec<Node>> {
        self.nodes_of_kind(NodeKind::Raw)
    }

    /// All attachments: images, files, raw.
    pub fn attachments(&self) -> NetworkResult<Vec<Node>> {
        let mut nodes = Vec::new();
        for kind in NodeKind::ATTACHMENTS {
            nodes.extend(self.nodes_of_kind(kind)?);
        }
        Ok(nodes)
    }

    /// Whether `key` resolves to an existing path. Malformed keys are absent.
    pub fn contains(&self, key: &str) -> bool {
        Key::parse(key)
            .map(|key| key.to_path(&self.root).exists())
            .unwrap_or(false)
    }

    /// Resolves `key` to a node.
    ///
    /// Attachment keys may name a directory under their category.
    ///
    /// # Errors
    /// - `NotFound` when the key is malformed or its path does not exist.
    pub fn lookup(&self, key: &str) -> NetworkResult<Node> {
        let not_found = || NetworkError::NotFound {
            key: key.to_string(),
        };
        let parsed = Key::parse(key).map_err(|_| not_found())?;
        if !parsed.to_path(&self.root).exists() {
            return Err(not_found());
        }
        Ok(Node::new(self.clone(), parsed))
    }

    /// Resolves `key` to a note.
    ///
    /// # Errors
    /// - `NotFound` as for [`Network::lookup`].
    /// - `NotANote` when the key names an attachment.
    pub fn lookup_note(&self, key: &str) -> NetworkResult<NoteNode> {
        self.lookup(key)?.into_note()
    }

    /// Adds a back-link wherever a note links to another note that does not
    /// link back. Returns the number of back-links written.
    ///
    /// A second run on an unchanged vault writes nothing.
    pub fn fix_bidirectional_links(&self) -> NetworkResult<usize> {
        let mut added = 0;
        for u in self.notes()? {
            for v in u.neighbors()? {
                let Some(v) = v.as_note() else {
                    continue;
                };
                if !v.has_neighbor(&u)? {
                    v.add_link(&u)?;
                    added += 1;
                }
            }
        }

        info!("event=fix_bidirectional_links module=graph status=ok added={added}");
        Ok(added)
    }

    /// Runs the standard validation rules and returns failure messages.
    pub fn check(&self) -> NetworkResult<Vec<String>> {
        Ok(Validator::standard().run(self)?.failures)
    }

    /// Key pairs for every topic-to-topic link, in topic enumeration order.
    pub fn topic_edges(&self) -> NetworkResult<Vec<(Key, Key)>> {
        let mut edges = Vec::new();
        for topic in self.topics()? {
            for neighbor in topic_neighbors(&topic)? {
                edges.push((topic.key().clone(), neighbor.key().clone()));
            }
        }
        Ok(edges)
    }

    /// Topics reachable from `start` over topic-to-topic links, start included.
    pub fn reachable_topics(&self, start: &NoteNode) -> NetworkResult<Vec<Key>> {
        let mut reached = Vec::new();
        traverse(start.as_node().clone(), topic_neighbors, |node| {
            reached.push(node.key().clone())
        })?;
        Ok(reached)
    }

    fn notes_of_kind(&self, kind: NodeKind) -> NetworkResult<Vec<NoteNode>> {
        self.nodes_of_kind(kind)?
            .into_iter()
            .map(Node::into_note)
            .collect()
    }
}

/// Topic-kind neighbors of `node`; attachments have none.
pub fn topic_neighbors(node: &Node) -> NetworkResult<Vec<Node>> {
    let Some(note) = node.as_note() else {
        return Ok(Vec::new());
    };
    Ok(note
        .neighbors()?
        .into_iter()
        .filter(|neighbor| neighbor.kind() == NodeKind::Topic)
        .collect())
}
