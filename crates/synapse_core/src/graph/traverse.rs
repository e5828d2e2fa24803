//! Generic graph walk over vault nodes.

use crate::graph::error::NetworkResult;
use crate::graph::node::Node;
use crate::model::key::Key;
use std::collections::HashSet;

/// Visits every node reachable from `start` through `neighbors`.
///
/// Each key is visited at most once, `start` first. The work list is LIFO,
/// so the walk behaves depth-first. Errors from `neighbors` stop the walk.
pub fn traverse<N, V>(start: Node, mut neighbors: N, mut visit: V) -> NetworkResult<()>
where
    N: FnMut(&Node) -> NetworkResult<Vec<Node>>,
    V: FnMut(&Node),
{
    let mut visited: HashSet<Key> = HashSet::from([start.key().clone()]);
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        visit(&node);
        for next in neighbors(&node)? {
            if visited.insert(next.key().clone()) {
                stack.push(next);
            }
        }
    }

    Ok(())
}
