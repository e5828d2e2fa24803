//! Vault entries and their link-bearing capability.
//!
//! # Responsibility
//! - Expose identity, kind, path and raw contents of one vault entry.
//! - Provide link parsing, link insertion and rekeying for notes.
//!
//! # Invariants
//! - Nodes are cheap handles; every property that touches the filesystem
//!   re-reads it.
//! - Only note kinds can become a `NoteNode`, so attachments have no link API.
//! - Rekey validates the destination before writing anything.

use crate::graph::error::{NetworkError, NetworkResult};
use crate::graph::links::{extract_links, insert_link, rewrite_links};
use crate::graph::network::Network;
use crate::model::key::{Key, NodeKind};
use log::{debug, info};
use std::fmt::{Display, Formatter};
use std::fs;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::PathBuf;

/// One addressable vault entry: a note or an opaque attachment.
///
/// Equality and hashing compare keys only, so two spellings of one path
/// are the same node.
#[derive(Debug, Clone)]
pub struct Node {
    network: Network,
    key: Key,
}

impl Node {
    pub(crate) fn new(network: Network, key: Key) -> Self {
        Self { network, key }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.key.kind()
    }

    pub fn is_note(&self) -> bool {
        self.kind().is_note()
    }

    /// Network this node was resolved from.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Backing path derived from the key.
    pub fn path(&self) -> PathBuf {
        self.key.to_path(self.network.root())
    }

    /// Reads the full backing file.
    ///
    /// # Errors
    /// - `Io` wrapped with this key when the file cannot be read.
    pub fn contents(&self) -> NetworkResult<String> {
        fs::read_to_string(self.path()).map_err(|err| NetworkError::io(self.key.as_str(), err))
    }

    /// Notes whose successors include this node.
    ///
    /// Full network scan on every call; there is no reverse index.
    pub fn predecessors(&self) -> NetworkResult<Vec<NoteNode>> {
        let mut predecessors = Vec::new();
        for note in self.network.notes()? {
            if note.successors()?.iter().any(|successor| successor == self) {
                predecessors.push(note);
            }
        }
        Ok(predecessors)
    }

    /// Link-bearing view of this node, when it is a note.
    pub fn as_note(&self) -> Option<NoteNode> {
        self.is_note().then(|| NoteNode(self.clone()))
    }

    /// Converts into the link-bearing view.
    ///
    /// # Errors
    /// - `NotANote` for attachment kinds.
    pub fn into_note(self) -> NetworkResult<NoteNode> {
        if self.is_note() {
            Ok(NoteNode(self))
        } else {
            Err(NetworkError::NotANote {
                key: self.key.to_string(),
            })
        }
    }

    /// Moves this entry to `new_key` and rewrites links pointing at it.
    ///
    /// Notes may move between note kinds; attachments must keep their kind.
    /// After success this handle carries `new_key`; other handles holding the
    /// old key are stale.
    ///
    /// # Errors
    /// - `InvalidRekey` when `new_key` is malformed, crosses the note/attachment
    ///   boundary, changes an attachment's kind, or already exists.
    /// - `NotFound` when this handle no longer has a backing file.
    /// - `Io`/lookup errors from predecessor rewrites or the move itself.
    ///   Writes completed before the failure are kept.
    pub fn rekey(&mut self, new_key: &str) -> NetworkResult<()> {
        let target = self.validate_rekey(new_key)?;
        if target == self.key {
            self.key = target;
            return Ok(());
        }

        let old_path = self.path();
        let new_path = target.to_path(self.network.root());

        let addresses_self =
            |link: &str| Key::parse(link).map_or(false, |key| key == self.key);
        let predecessors = self.predecessors()?;
        for predecessor in &predecessors {
            let contents = predecessor.contents()?;
            predecessor.write_contents(&rewrite_links(
                &contents,
                addresses_self,
                target.as_str(),
            ))?;
        }

        if let Some(parent) = new_path.parent() {
            fs::create_dir_all(parent).map_err(|err| NetworkError::io(target.as_str(), err))?;
        }
        fs::rename(&old_path, &new_path).map_err(|err| NetworkError::io(self.key.as_str(), err))?;

        info!(
            "event=node_rekey module=graph status=ok from_kind={} to_kind={} rewritten_predecessors={}",
            self.kind(),
            target.kind(),
            predecessors.len()
        );
        self.key = target;
        Ok(())
    }

    fn validate_rekey(&self, new_key: &str) -> NetworkResult<Key> {
        let target = Key::parse(new_key)
            .map_err(|err| NetworkError::invalid_rekey(self.key.as_str(), err.to_string()))?;

        if self.is_note() && !target.kind().is_note() {
            return Err(NetworkError::invalid_rekey(
                self.key.as_str(),
                "cannot re-key a note to be a non-note",
            ));
        }
        if !self.is_note() && target.kind() != self.kind() {
            return Err(NetworkError::invalid_rekey(
                self.key.as_str(),
                "cannot change type with rekey",
            ));
        }
        if !self.path().exists() {
            return Err(NetworkError::NotFound {
                key: self.key.to_string(),
            });
        }
        if target != self.key && target.to_path(self.network.root()).exists() {
            return Err(NetworkError::invalid_rekey(
                self.key.as_str(),
                format!("\"{target}\" already exists"),
            ));
        }

        Ok(target)
    }

    fn write_contents(&self, contents: &str) -> NetworkResult<()> {
        fs::write(self.path(), contents).map_err(|err| NetworkError::io(self.key.as_str(), err))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.key, f)
    }
}

/// Target accepted by [`NoteNode::add_link`]: a key to resolve, or a node
/// that is already resolved.
#[derive(Debug, Clone, Copy)]
pub enum LinkTarget<'a> {
    Key(&'a str),
    Node(&'a Node),
}

impl<'a> From<&'a str> for LinkTarget<'a> {
    fn from(value: &'a str) -> Self {
        Self::Key(value)
    }
}

impl<'a> From<&'a String> for LinkTarget<'a> {
    fn from(value: &'a String) -> Self {
        Self::Key(value.as_str())
    }
}

impl<'a> From<&'a Key> for LinkTarget<'a> {
    fn from(value: &'a Key) -> Self {
        Self::Key(value.as_str())
    }
}

impl<'a> From<&'a Node> for LinkTarget<'a> {
    fn from(value: &'a Node) -> Self {
        Self::Node(value)
    }
}

impl<'a> From<&'a NoteNode> for LinkTarget<'a> {
    fn from(value: &'a NoteNode) -> Self {
        Self::Node(&value.0)
    }
}

/// Link-bearing view over a note node (topic, thought, journal, project).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteNode(Node);

impl NoteNode {
    pub fn as_node(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    /// Link keys in order of appearance, duplicates included.
    pub fn links(&self) -> NetworkResult<Vec<String>> {
        Ok(extract_links(&self.contents()?))
    }

    /// Links resolved through the owning network.
    ///
    /// # Errors
    /// - `NotFound` for the first link that does not resolve.
    pub fn successors(&self) -> NetworkResult<Vec<Node>> {
        self.links()?
            .iter()
            .map(|key| self.network().lookup(key))
            .collect()
    }

    /// Alias of [`NoteNode::successors`].
    pub fn neighbors(&self) -> NetworkResult<Vec<Node>> {
        self.successors()
    }

    /// Whether `node` is among this note's neighbors.
    pub fn has_neighbor(&self, node: &Node) -> NetworkResult<bool> {
        Ok(self.neighbors()?.iter().any(|neighbor| neighbor == node))
    }

    /// Adds a link to `target` in the section for the target's kind.
    ///
    /// When the target is a note that does not link back yet, one reverse
    /// link is written into the target as well.
    ///
    /// # Errors
    /// - `NotFound` when a key target does not resolve.
    /// - `Io` when either file cannot be read or written. The forward link
    ///   stays written if the reverse write fails.
    pub fn add_link<'a>(&self, target: impl Into<LinkTarget<'a>>) -> NetworkResult<()> {
        let target = match target.into() {
            LinkTarget::Key(key) => self.network().lookup(key)?,
            LinkTarget::Node(node) => node.clone(),
        };

        self.write_link(&target)?;

        if let Some(target_note) = target.as_note() {
            if !target_note.has_neighbor(self)? {
                target_note.write_link(self)?;
                debug!(
                    "event=link_add module=graph status=ok direction=reverse kind={}",
                    self.kind()
                );
            }
        }
        Ok(())
    }

    /// Renames this note; see [`Node::rekey`].
    pub fn rekey(&mut self, new_key: &str) -> NetworkResult<()> {
        self.0.rekey(new_key)
    }

    fn write_link(&self, target: &Node) -> NetworkResult<()> {
        let contents = self.contents()?;
        self.write_contents(&insert_link(&contents, target.kind(), target.key().as_str()))?;
        debug!(
            "event=link_add module=graph status=ok direction=forward kind={}",
            target.kind()
        );
        Ok(())
    }
}

impl Deref for NoteNode {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<Node> for NoteNode {
    fn eq(&self, other: &Node) -> bool {
        self.0 == *other
    }
}

impl PartialEq<NoteNode> for Node {
    fn eq(&self, other: &NoteNode) -> bool {
        *self == other.0
    }
}

impl Display for NoteNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
