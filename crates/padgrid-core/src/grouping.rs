//! Regrouping flat child lists into synthetic folders
//!
//! Some host collections are flat (hundreds of presets in one list) but carry
//! a secondary attribute such as the pack they came from. Grouping by that
//! attribute gives the grid an extra level to page through.

use crate::node::BrowseNode;
use std::collections::BTreeMap;

/// Group name for loadable items that carry no source
pub const UNKNOWN_SOURCE: &str = "Other";

/// Partition loadable nodes into groups keyed by `key_fn`
///
/// Non-loadable nodes are dropped. Groups come back sorted by key; items keep
/// their original relative order inside a group.
pub fn group_by<F>(nodes: &[BrowseNode], key_fn: F) -> Vec<BrowseNode>
where
    F: Fn(&BrowseNode) -> String,
{
    let mut groups: BTreeMap<String, Vec<BrowseNode>> = BTreeMap::new();

    for node in nodes.iter().filter(|n| n.is_loadable()) {
        groups.entry(key_fn(node)).or_default().push(node.clone());
    }

    groups
        .into_iter()
        .map(|(key, children)| BrowseNode::group(key, children))
        .collect()
}

/// Rebuild `node` with its direct children grouped by source
pub fn group_by_source(node: &BrowseNode) -> BrowseNode {
    let groups = group_by(node.children(), |child| {
        child.source().unwrap_or(UNKNOWN_SOURCE).to_string()
    });

    log::debug!(
        "group_by_source: '{}' -> {} group(s) from {} item(s)",
        node.name(),
        groups.len(),
        node.children().len()
    );

    BrowseNode::category(node.name(), groups)
}
