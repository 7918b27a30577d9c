use serde::{Deserialize, Serialize};

/// A node of a document's table of contents, as reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub label: String,
    pub page: Option<u32>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>, page: Option<u32>) -> Self {
        Self { label: label.into(), page, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub label: String,
    pub page: Option<u32>,
    pub depth: usize,
}

impl OutlineEntry {
    pub fn is_navigable(&self) -> bool {
        self.page.is_some()
    }
}

/// Depth-first, parent before children, siblings in document order.
pub fn flatten_outline(nodes: &[OutlineNode]) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut stack: Vec<(&OutlineNode, usize)> = nodes.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        entries.push(OutlineEntry { label: node.label.clone(), page: node.page, depth });
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    entries
}
