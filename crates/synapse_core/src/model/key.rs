//! Typed keys and the key/path codec.
//!
//! # Responsibility
//! - Parse `<kind>:<name>` and bare topic keys into a typed `Key`.
//! - Convert keys to vault paths and vault paths back to keys.
//!
//! # Invariants
//! - Note kinds are never nested; their files always carry the `.md` suffix.
//! - Keys that address the same path compare equal.
//! - Attachment names keep their own suffix and may contain `/` (or `:`) to
//!   address nested files.
//! - A key never contains a `..` segment, so every derived path stays under
//!   the vault root.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// File suffix carried by every note file on disk.
pub const NOTE_SUFFIX: &str = ".md";

const KIND_SEPARATOR: char = ':';
const NAME_SEPARATORS: [char; 2] = [':', '/'];

/// Category of a vault entry, derived from the first key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Bare-named note stored directly under the root.
    Topic,
    Thought,
    Journal,
    Project,
    Image,
    File,
    /// Opaque plain-text attachment (todo lists, exports).
    Raw,
}

impl NodeKind {
    /// Every kind in vault enumeration order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Topic,
        NodeKind::Thought,
        NodeKind::Journal,
        NodeKind::Project,
        NodeKind::Image,
        NodeKind::File,
        NodeKind::Raw,
    ];

    /// Note kinds in vault enumeration order.
    pub const NOTES: [NodeKind; 4] = [
        NodeKind::Topic,
        NodeKind::Thought,
        NodeKind::Journal,
        NodeKind::Project,
    ];

    /// Attachment kinds in vault enumeration order.
    pub const ATTACHMENTS: [NodeKind; 3] = [NodeKind::Image, NodeKind::File, NodeKind::Raw];

    /// Stable key prefix and directory name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Thought => "thought",
            Self::Journal => "journal",
            Self::Project => "project",
            Self::Image => "image",
            Self::File => "file",
            Self::Raw => "raw",
        }
    }

    /// Parses a key prefix. Returns `None` for unknown prefixes.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "topic" => Some(Self::Topic),
            "thought" => Some(Self::Thought),
            "journal" => Some(Self::Journal),
            "project" => Some(Self::Project),
            "image" => Some(Self::Image),
            "file" => Some(Self::File),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }

    /// Whether entries of this kind are markdown notes that carry links.
    pub fn is_note(self) -> bool {
        matches!(
            self,
            Self::Topic | Self::Thought | Self::Journal | Self::Project
        )
    }

    /// Section title used for links pointing at this kind, e.g. `Thoughts`.
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Topic => "Topics",
            Self::Thought => "Thoughts",
            Self::Journal => "Journals",
            Self::Project => "Projects",
            Self::Image => "Images",
            Self::File => "Files",
            Self::Raw => "Raws",
        }
    }

    /// Directory scanned for this kind, relative to the vault root.
    ///
    /// Topics live directly in the root.
    pub fn directory(self) -> Option<&'static str> {
        match self {
            Self::Topic => None,
            other => Some(other.as_str()),
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key grammar and codec errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key string is empty.
    Empty,
    /// Prefix before the first `:` is not a known kind.
    UnknownKind { key: String, kind: String },
    /// Kind prefix is present but the name after it is empty.
    EmptyName(String),
    /// Note names may not contain path separators.
    NestedNote(String),
    /// Key contains a `..` segment.
    ParentSegment(String),
    /// Path is not located under the vault root.
    OutsideRoot(PathBuf),
    /// Path component cannot be represented as UTF-8.
    NonUtf8Path(PathBuf),
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "key must not be empty"),
            Self::UnknownKind { key, kind } => {
                write!(f, "unknown kind `{kind}` in key `{key}`")
            }
            Self::EmptyName(key) => write!(f, "key `{key}` has an empty name"),
            Self::NestedNote(key) => write!(f, "note key `{key}` must not be nested"),
            Self::ParentSegment(key) => write!(f, "key `{key}` must not contain `..`"),
            Self::OutsideRoot(path) => {
                write!(f, "path `{}` is not inside the vault root", path.display())
            }
            Self::NonUtf8Path(path) => write!(f, "path `{}` is not valid UTF-8", path.display()),
        }
    }
}

impl Error for KeyError {}

/// Typed identifier of one vault entry.
///
/// Equality, ordering and hashing use the canonical spelling, so every key
/// that addresses the same path compares equal: `image:dir:foo.png` equals
/// `image:dir/foo.png`, and `foo.md` equals `foo`. `foo` and `topic:foo`
/// address distinct paths and stay distinct. Comparison against `str`
/// uses the raw text.
#[derive(Debug, Clone)]
pub struct Key {
    raw: String,
    kind: NodeKind,
    name_start: usize,
    canonical: String,
}

impl Key {
    /// Parses and validates a key string.
    ///
    /// # Errors
    /// - `Empty` / `EmptyName` for missing text.
    /// - `UnknownKind` when the prefix is not a known kind.
    /// - `NestedNote` when a note name contains `/` or `:`.
    /// - `ParentSegment` when any name segment is `..`.
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        if value.is_empty() {
            return Err(KeyError::Empty);
        }

        let (kind, name_start) = match value.split_once(KIND_SEPARATOR) {
            None => (NodeKind::Topic, 0),
            Some((prefix, _)) => {
                let kind = NodeKind::parse(prefix).ok_or_else(|| KeyError::UnknownKind {
                    key: value.to_string(),
                    kind: prefix.to_string(),
                })?;
                (kind, prefix.len() + KIND_SEPARATOR.len_utf8())
            }
        };

        let name = &value[name_start..];
        if name.is_empty() {
            return Err(KeyError::EmptyName(value.to_string()));
        }
        if kind.is_note() && name.contains(NAME_SEPARATORS) {
            return Err(KeyError::NestedNote(value.to_string()));
        }
        if name.split(NAME_SEPARATORS).any(|segment| segment == "..") {
            return Err(KeyError::ParentSegment(value.to_string()));
        }

        let canonical = canonical_form(value, kind, name_start);
        if canonical.len() == name_start {
            return Err(KeyError::EmptyName(value.to_string()));
        }
        Ok(Self {
            raw: value.to_string(),
            kind,
            name_start,
            canonical,
        })
    }

    /// Full key text as written in links.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Name part after the kind prefix (the whole key for bare topics).
    pub fn name(&self) -> &str {
        &self.raw[self.name_start..]
    }

    /// Spelling shared by every key that addresses the same path.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether the key spells its kind explicitly.
    pub fn has_prefix(&self) -> bool {
        self.name_start > 0
    }

    /// Path of this key under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        key_to_path(root, self)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Key::parse(&raw).map_err(de::Error::custom)
    }
}

/// Maps a key to its path under `root`.
///
/// - Bare keys resolve directly under `root`.
/// - Prefixed keys resolve under `root/<kind>`, with each `:` or `/` in the
///   name becoming a directory separator.
/// - Note kinds get the `.md` suffix appended unless the name already ends
///   with it.
pub fn key_to_path(root: &Path, key: &Key) -> PathBuf {
    let mut path = root.to_path_buf();
    if key.has_prefix() {
        path.push(key.kind().as_str());
    }

    if key.kind().is_note() {
        let name = key.name();
        if name.ends_with(NOTE_SUFFIX) {
            path.push(name);
        } else {
            path.push(format!("{name}{NOTE_SUFFIX}"));
        }
        return path;
    }

    for segment in key
        .name()
        .split(NAME_SEPARATORS)
        .filter(|segment| !segment.is_empty())
    {
        path.push(segment);
    }
    path
}

/// Maps a path under `root` back to its key.
///
/// # Errors
/// - `OutsideRoot` when `path` does not start with `root` or contains `..`.
/// - `NestedNote` for note paths deeper than one directory level.
/// - Any `Key::parse` error for the derived key text.
pub fn path_to_key(root: &Path, path: &Path) -> Result<Key, KeyError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| KeyError::OutsideRoot(path.to_path_buf()))?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(
                part.to_str()
                    .ok_or_else(|| KeyError::NonUtf8Path(path.to_path_buf()))?,
            ),
            Component::CurDir => {}
            _ => return Err(KeyError::OutsideRoot(path.to_path_buf())),
        }
    }

    match segments.as_slice() {
        [] => Err(KeyError::Empty),
        [file_name] => Key::parse(strip_note_suffix(file_name)),
        [prefix, rest @ ..] => {
            let kind = NodeKind::parse(prefix).ok_or_else(|| KeyError::UnknownKind {
                key: segments.join("/"),
                kind: (*prefix).to_string(),
            })?;
            let name = if kind.is_note() {
                if rest.len() > 1 {
                    return Err(KeyError::NestedNote(segments.join("/")));
                }
                strip_note_suffix(rest.first().copied().unwrap_or_default()).to_string()
            } else {
                rest.join("/")
            };
            Key::parse(&format!("{kind}{KIND_SEPARATOR}{name}"))
        }
    }
}

fn strip_note_suffix(file_name: &str) -> &str {
    file_name.strip_suffix(NOTE_SUFFIX).unwrap_or(file_name)
}

/// Notes drop the `.md` suffix; attachment names use `/` between non-empty
/// segments. The kind prefix is kept as written, since `foo` and
/// `topic:foo` address different paths.
fn canonical_form(raw: &str, kind: NodeKind, name_start: usize) -> String {
    let (prefix, name) = raw.split_at(name_start);
    if kind.is_note() {
        return format!("{prefix}{}", strip_note_suffix(name));
    }
    let segments: Vec<&str> = name
        .split(NAME_SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("{prefix}{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::{key_to_path, path_to_key, Key, KeyError, NodeKind};
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    #[test]
    fn bare_key_is_topic() {
        let key = Key::parse("rust").expect("bare key should parse");
        assert_eq!(key.kind(), NodeKind::Topic);
        assert_eq!(key.name(), "rust");
        assert!(!key.has_prefix());
    }

    #[test]
    fn prefixed_key_splits_kind_and_name() {
        let key = Key::parse("journal:2021-10-12").expect("journal key should parse");
        assert_eq!(key.kind(), NodeKind::Journal);
        assert_eq!(key.name(), "2021-10-12");
        assert_eq!(key.as_str(), "journal:2021-10-12");
    }

    #[test]
    fn attachment_names_may_nest() {
        let key = Key::parse("image:a/b/c/foo.png").expect("nested image should parse");
        assert_eq!(key.kind(), NodeKind::Image);
        assert_eq!(key.name(), "a/b/c/foo.png");
    }

    #[test]
    fn parse_rejects_invalid_keys() {
        assert_eq!(Key::parse(""), Err(KeyError::Empty));
        assert!(matches!(
            Key::parse("video:cat.mp4"),
            Err(KeyError::UnknownKind { kind, .. }) if kind == "video"
        ));
        assert!(matches!(
            Key::parse("thought:"),
            Err(KeyError::EmptyName(_))
        ));
        assert!(matches!(
            Key::parse("thought:a/b"),
            Err(KeyError::NestedNote(_))
        ));
        assert!(matches!(
            Key::parse("thought:a:b"),
            Err(KeyError::NestedNote(_))
        ));
        assert!(matches!(
            Key::parse("raw:../secrets"),
            Err(KeyError::ParentSegment(_))
        ));
    }

    #[test]
    fn note_paths_get_md_suffix() {
        let root = Path::new("/vault");
        let topic = Key::parse("foo").expect("topic");
        let thought = Key::parse("thought:v1.2 plan").expect("thought");

        assert_eq!(key_to_path(root, &topic), PathBuf::from("/vault/foo.md"));
        assert_eq!(
            key_to_path(root, &thought),
            PathBuf::from("/vault/thought/v1.2 plan.md")
        );
    }

    #[test]
    fn attachment_paths_keep_suffix_and_nesting() {
        let root = Path::new("/vault");
        let slashed = Key::parse("image:dir/foo.png").expect("image");
        let coloned = Key::parse("file:dir:foo.pdf").expect("file");
        let bare = Key::parse("raw:todo").expect("raw");

        assert_eq!(
            key_to_path(root, &slashed),
            PathBuf::from("/vault/image/dir/foo.png")
        );
        assert_eq!(
            key_to_path(root, &coloned),
            PathBuf::from("/vault/file/dir/foo.pdf")
        );
        assert_eq!(key_to_path(root, &bare), PathBuf::from("/vault/raw/todo"));
    }

    #[test]
    fn path_to_key_strips_note_suffix_only_for_notes() {
        let root = Path::new("/vault");
        let topic = path_to_key(root, Path::new("/vault/foo.md")).expect("topic path");
        let thought =
            path_to_key(root, Path::new("/vault/thought/baz.md")).expect("thought path");
        let raw = path_to_key(root, Path::new("/vault/raw/notes.md")).expect("raw path");
        let image =
            path_to_key(root, Path::new("/vault/image/a/b/foo.png")).expect("image path");

        assert_eq!(topic, "foo");
        assert_eq!(thought, "thought:baz");
        assert_eq!(raw, "raw:notes.md");
        assert_eq!(image, "image:a/b/foo.png");
    }

    #[test]
    fn path_to_key_rejects_foreign_and_nested_note_paths() {
        let root = Path::new("/vault");
        assert!(matches!(
            path_to_key(root, Path::new("/elsewhere/foo.md")),
            Err(KeyError::OutsideRoot(_))
        ));
        assert!(matches!(
            path_to_key(root, Path::new("/vault/thought/a/b.md")),
            Err(KeyError::NestedNote(_))
        ));
        assert!(matches!(
            path_to_key(root, Path::new("/vault/misc/b.txt")),
            Err(KeyError::UnknownKind { .. })
        ));
    }

    #[test]
    fn codec_round_trips_enumerable_paths() {
        let root = Path::new("/vault");
        for relative in [
            "foo.md",
            "thought/baz.md",
            "journal/2021-10-12.md",
            "project/my new project.md",
            "image/foo.png",
            "file/something.pdf",
            "raw/todo.today",
            "raw/no_suffix",
        ] {
            let path = root.join(relative);
            let key = path_to_key(root, &path).expect("enumerable path should map to key");
            assert_eq!(key_to_path(root, &key), path, "round trip for {relative}");
        }
    }

    #[test]
    fn spellings_of_one_path_compare_equal() {
        let coloned = Key::parse("image:dir:foo.png").expect("coloned image");
        let slashed = Key::parse("image:dir/foo.png").expect("slashed image");
        let doubled = Key::parse("image:dir//foo.png").expect("doubled slash");
        assert_eq!(coloned, slashed);
        assert_eq!(doubled, slashed);
        assert_eq!(coloned.canonical(), "image:dir/foo.png");
        assert_eq!(coloned.as_str(), "image:dir:foo.png");

        let keys: HashSet<Key> = [coloned, slashed, doubled].into_iter().collect();
        assert_eq!(keys.len(), 1);

        let bare = Key::parse("foo").expect("topic");
        let suffixed = Key::parse("foo.md").expect("suffixed topic");
        let prefixed = Key::parse("topic:foo").expect("prefixed topic");
        assert_eq!(bare, suffixed);
        assert_ne!(bare, prefixed);
    }

    #[test]
    fn note_names_already_ending_in_md_keep_one_suffix() {
        let root = Path::new("/vault");
        let topic = Key::parse("foo.md").expect("suffixed topic");
        let thought = Key::parse("thought:bar.md").expect("suffixed thought");

        assert_eq!(key_to_path(root, &topic), PathBuf::from("/vault/foo.md"));
        assert_eq!(
            key_to_path(root, &thought),
            PathBuf::from("/vault/thought/bar.md")
        );
    }

    #[test]
    fn names_without_segments_are_empty() {
        assert!(matches!(Key::parse("image:/"), Err(KeyError::EmptyName(_))));
        assert!(matches!(Key::parse("file:::"), Err(KeyError::EmptyName(_))));
        assert!(matches!(Key::parse(".md"), Err(KeyError::EmptyName(_))));
    }

    #[test]
    fn kind_section_titles_are_capitalized_plurals() {
        assert_eq!(NodeKind::Thought.section_title(), "Thoughts");
        assert_eq!(NodeKind::Topic.section_title(), "Topics");
        assert_eq!(NodeKind::Raw.section_title(), "Raws");
    }
}
