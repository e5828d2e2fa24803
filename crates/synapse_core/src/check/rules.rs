//! Standard vault rules, in run order.

use crate::check::{CheckFlow, CheckRule};
use crate::graph::error::NetworkResult;
use crate::graph::network::{topic_neighbors, Network};
use crate::graph::traverse::traverse;
use crate::model::key::{Key, NodeKind};
use std::collections::HashSet;

/// The six standard rules. Link existence runs first because every later
/// rule resolves links.
pub fn standard_rules() -> Vec<CheckRule> {
    vec![
        CheckRule::new("links_exist", links_exist),
        CheckRule::new(
            "links_between_notes_are_bidirectional",
            links_between_notes_are_bidirectional,
        ),
        CheckRule::new("projects_link_to_topics", projects_link_to_topics),
        CheckRule::new(
            "thoughts_link_to_topics_or_projects",
            thoughts_link_to_topics_or_projects,
        ),
        CheckRule::new("attachments_have_predecessor", attachments_have_predecessor),
        CheckRule::new("topics_are_connected", topics_are_connected),
    ]
}

/// Aborts the run when any link is dangling, including failures recorded by
/// earlier rules.
pub fn links_exist(network: &Network, failures: &mut Vec<String>) -> NetworkResult<CheckFlow> {
    for note in network.notes()? {
        for key in note.links()? {
            if !network.contains(&key) {
                failures.push(format!(
                    "Link to nonexistant \"{key}\" in \"{}\"",
                    note.key()
                ));
            }
        }
    }

    if failures.is_empty() {
        Ok(CheckFlow::Continue)
    } else {
        Ok(CheckFlow::Abort)
    }
}

pub fn links_between_notes_are_bidirectional(
    network: &Network,
    failures: &mut Vec<String>,
) -> NetworkResult<CheckFlow> {
    for u in network.notes()? {
        for v in u.neighbors()? {
            let Some(v) = v.as_note() else {
                continue;
            };
            if !v.has_neighbor(&u)? {
                failures.push(format!(
                    "Link from \"{}\" to \"{}\" is not bidirectional.",
                    u.key(),
                    v.key()
                ));
            }
        }
    }
    Ok(CheckFlow::Continue)
}

pub fn projects_link_to_topics(
    network: &Network,
    failures: &mut Vec<String>,
) -> NetworkResult<CheckFlow> {
    for project in network.projects()? {
        let linked = project
            .neighbors()?
            .iter()
            .any(|neighbor| neighbor.kind() == NodeKind::Topic);
        if !linked {
            failures.push(format!("No topics linked in \"{}\".", project.key()));
        }
    }
    Ok(CheckFlow::Continue)
}

pub fn thoughts_link_to_topics_or_projects(
    network: &Network,
    failures: &mut Vec<String>,
) -> NetworkResult<CheckFlow> {
    for thought in network.thoughts()? {
        let linked = thought
            .neighbors()?
            .iter()
            .any(|neighbor| matches!(neighbor.kind(), NodeKind::Topic | NodeKind::Project));
        if !linked {
            failures.push(format!(
                "No topics or projects linked in \"{}\".",
                thought.key()
            ));
        }
    }
    Ok(CheckFlow::Continue)
}

pub fn attachments_have_predecessor(
    network: &Network,
    failures: &mut Vec<String>,
) -> NetworkResult<CheckFlow> {
    for node in network.attachments()? {
        if node.predecessors()?.is_empty() {
            failures.push(format!("\"{}\" has no predecessor.", node.key()));
        }
    }
    Ok(CheckFlow::Continue)
}

/// Walks topic-to-topic links from the first enumerated topic and reports
/// one topic the walk did not reach. A vault without topics passes.
pub fn topics_are_connected(
    network: &Network,
    failures: &mut Vec<String>,
) -> NetworkResult<CheckFlow> {
    let topics = network.topics()?;
    let Some(root) = topics.first() else {
        return Ok(CheckFlow::Continue);
    };

    let mut visited: HashSet<Key> = HashSet::new();
    traverse(root.as_node().clone(), topic_neighbors, |node| {
        visited.insert(node.key().clone());
    })?;

    if let Some(unvisited) = topics.iter().find(|topic| !visited.contains(topic.key())) {
        failures.push(format!(
            "Topic \"{}\" not connected to \"{}\"",
            unvisited.key(),
            root.key()
        ));
    }
    Ok(CheckFlow::Continue)
}
