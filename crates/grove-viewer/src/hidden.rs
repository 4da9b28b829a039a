//! Hidden nodes and the bookmark list derived from them

use std::collections::BTreeSet;

use grove_core::NodeRef;
use serde::Serialize;

/// What a toggle request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToggleOutcome {
    Hidden,
    Restored,
    /// Unknown node, or a node hidden only as part of another entry.
    Ignored,
}

/// One hide operation: the node the user clicked plus everything it took
/// with it.
#[derive(Debug, Clone, PartialEq)]
struct HiddenEntry {
    root: NodeRef,
    label: String,
    nodes: BTreeSet<NodeRef>,
}

/// A row in the "hidden" list. Indices are positions in the current list
/// and are re-derived on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub index: usize,
    pub label: String,
    pub node: NodeRef,
}

/// Hidden nodes, grouped by the hide operation that removed them. A node
/// stays hidden while any entry still covers it.
#[derive(Debug, Clone, Default)]
pub struct HiddenSet {
    entries: Vec<HiddenEntry>,
}

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_hidden(&self, node: &NodeRef) -> bool {
        self.entries.iter().any(|e| e.nodes.contains(node))
    }

    /// Whether `node` was hidden directly, not as a descendant.
    pub fn is_root(&self, node: &NodeRef) -> bool {
        self.entries.iter().any(|e| &e.root == node)
    }

    /// Record a hide of `root` covering `covered` as well. Hiding a node
    /// that already heads an entry is a no-op.
    pub fn hide(&mut self, root: NodeRef, label: String, covered: Vec<NodeRef>) -> bool {
        if self.is_root(&root) {
            return false;
        }
        let mut nodes: BTreeSet<NodeRef> = covered.into_iter().collect();
        nodes.insert(root.clone());
        tracing::debug!("Hiding {} ({} nodes)", root, nodes.len());
        self.entries.push(HiddenEntry { root, label, nodes });
        true
    }

    /// Undo the hide headed by `root`.
    pub fn restore(&mut self, root: &NodeRef) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.root != root);
        self.entries.len() != before
    }

    /// Root of the bookmark at `index`.
    pub fn root_at(&self, index: usize) -> Option<&NodeRef> {
        self.entries.get(index).map(|e| &e.root)
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| Bookmark {
                index,
                label: e.label.clone(),
                node: e.root.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
