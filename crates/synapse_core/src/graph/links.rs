//! Link marker parsing and section rewriting over raw note text.
//!
//! # Responsibility
//! - Extract `[[key]]` targets in order of appearance.
//! - Insert link lines into `## :<Kinds>:` sections.
//! - Rewrite link markers when a key changes, whatever spelling they use.
//!
//! # Invariants
//! - Functions here are pure text transforms; callers own all file I/O.
//! - Text outside the touched line is preserved byte for byte.

use crate::model::key::NodeKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[.*?\]\]").expect("valid link marker regex"));

/// Returns link targets in order of appearance, duplicates included.
///
/// Matching is non-greedy and line-bound: `[[a]] [[b]]` yields `a` then `b`.
pub fn extract_links(contents: &str) -> Vec<String> {
    LINK_RE
        .find_iter(contents)
        .map(|found| link_target(found.as_str()).to_string())
        .collect()
}

/// Link marker text for `key`.
pub fn link_marker(key: &str) -> String {
    format!("[[{key}]]")
}

/// Section header collecting links to entries of `kind`.
pub fn section_header(kind: NodeKind) -> String {
    format!("## :{}:", kind.section_title())
}

/// Inserts `- [[key]]` as the first entry of the section for `kind`.
///
/// When the section is missing, a blank line, the header and the link line
/// are appended at the end of the text.
pub fn insert_link(contents: &str, kind: NodeKind, key: &str) -> String {
    let header = section_header(kind);
    let link_line = format!("- {}", link_marker(key));
    let mut lines: Vec<&str> = contents.split('\n').collect();

    match lines.iter().position(|line| line.trim_end() == header) {
        Some(index) => lines.insert(index + 1, link_line.as_str()),
        None => {
            lines.push("");
            lines.push(header.as_str());
            lines.push(link_line.as_str());
        }
    }

    lines.join("\n")
}

/// Replaces every link marker whose target satisfies `matches` with
/// `[[new_key]]`. Other markers and surrounding text are left untouched.
pub fn rewrite_links(contents: &str, matches: impl Fn(&str) -> bool, new_key: &str) -> String {
    let replacement = link_marker(new_key);
    LINK_RE
        .replace_all(contents, |found: &Captures<'_>| {
            let marker = &found[0];
            if matches(link_target(marker)) {
                replacement.clone()
            } else {
                marker.to_string()
            }
        })
        .into_owned()
}

fn link_target(marker: &str) -> &str {
    marker.trim_matches(|c| c == '[' || c == ']')
}
