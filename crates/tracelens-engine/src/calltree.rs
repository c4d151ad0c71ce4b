use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracelens_types::CallRecord;

/// Function name given to the synthetic root when the hierarchy has more
/// than one top-level call.
pub const SYNTHETIC_ROOT_NAME: &str = "<program>";

/// One call in the reconstructed tree.
#[derive(Debug, Clone)]
pub struct CallNode {
    pub id: String,
    pub function_name: String,
    pub arguments: Vec<Value>,
    pub return_value: Option<Value>,
    pub start_step: usize,
    pub end_step: usize,
    /// Path length from the tree root
    pub depth: usize,
    children: Vec<usize>,
    synthetic: bool,
}

impl CallNode {
    /// Whether the timeline cursor at `position` falls inside this call.
    pub fn is_active_at(&self, position: usize) -> bool {
        self.start_step <= position && position <= self.end_step
    }

    /// True only for the synthetic root inserted over multiple top-level
    /// calls.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Rooted call tree rebuilt from the flat pre-order record list.
///
/// Arena construction: all nodes are allocated first, then children link to
/// parents by index lookup, so no shared mutable back-references are needed.
#[derive(Debug, Clone)]
pub struct CallTree {
    nodes: Vec<CallNode>,
    root: usize,
    record_count: usize,
}

impl CallTree {
    /// Build the tree, preserving the relative emission order of children.
    ///
    /// Fails with [`Error::OrphanCall`] when a parent does not resolve to an
    /// earlier record, and with [`Error::CallRangeEscapesParent`] when a
    /// child's step range is not contained in its parent's; no partial tree
    /// is returned in either case.
    pub fn build(records: &[CallRecord]) -> Result<Self> {
        let mut nodes: Vec<CallNode> = Vec::with_capacity(records.len() + 1);
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        let mut roots: Vec<usize> = Vec::new();

        for record in records {
            nodes.push(CallNode {
                id: record.id.clone(),
                function_name: record.function_name.clone(),
                arguments: record.arguments.clone(),
                return_value: record.return_value.clone(),
                start_step: record.start_step,
                end_step: record.end_step,
                depth: 0,
                children: Vec::new(),
                synthetic: false,
            });
            by_id.insert(record.id.as_str(), nodes.len() - 1);
        }

        for (index, record) in records.iter().enumerate() {
            let Some(parent_id) = record.parent_id.as_deref() else {
                roots.push(index);
                continue;
            };
            // Pre-order invariant: the parent must already have appeared
            let parent = match by_id.get(parent_id) {
                Some(&parent) if parent < index => parent,
                _ => {
                    return Err(Error::OrphanCall {
                        id: record.id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                }
            };
            if record.start_step < nodes[parent].start_step
                || record.end_step > nodes[parent].end_step
            {
                return Err(Error::CallRangeEscapesParent {
                    id: record.id.clone(),
                });
            }
            nodes[parent].children.push(index);
        }

        let record_count = records.len();
        let root = match roots.as_slice() {
            [only] => *only,
            _ => {
                let start_step = roots.iter().map(|&r| nodes[r].start_step).min().unwrap_or(0);
                let end_step = roots.iter().map(|&r| nodes[r].end_step).max().unwrap_or(0);
                nodes.push(CallNode {
                    id: SYNTHETIC_ROOT_NAME.to_string(),
                    function_name: SYNTHETIC_ROOT_NAME.to_string(),
                    arguments: Vec::new(),
                    return_value: None,
                    start_step,
                    end_step,
                    depth: 0,
                    children: roots,
                    synthetic: true,
                });
                nodes.len() - 1
            }
        };

        let mut tree = Self {
            nodes,
            root,
            record_count,
        };
        tree.assign_depths();
        Ok(tree)
    }

    fn assign_depths(&mut self) {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            self.nodes[index].depth = depth;
            for &child in &self.nodes[index].children.clone() {
                stack.push((child, depth + 1));
            }
        }
    }

    pub fn root(&self) -> &CallNode {
        &self.nodes[self.root]
    }

    /// Number of real (non-synthetic) calls in the tree.
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn children_of(&self, node: &CallNode) -> impl Iterator<Item = &CallNode> {
        node.children.iter().map(|&child| &self.nodes[child])
    }

    /// Lazy, restartable pre-order traversal starting at the root.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// The chain of active calls from the root down to the deepest call
    /// whose step range contains `position` - how the recursion-tree view
    /// stays synchronized with the linear timeline. The synthetic root is
    /// never part of the chain.
    pub fn active_path(&self, position: usize) -> Vec<&CallNode> {
        let mut path = Vec::new();
        let root = &self.nodes[self.root];
        let root_slot = [self.root];
        let mut candidates: &[usize] = if root.synthetic {
            &root.children
        } else {
            &root_slot
        };

        'descend: loop {
            for &index in candidates {
                let node = &self.nodes[index];
                if node.is_active_at(position) {
                    path.push(node);
                    candidates = &node.children;
                    continue 'descend;
                }
            }
            break;
        }
        path
    }
}

/// Pre-order node iterator; restartable via [`CallTree::iter`].
pub struct PreOrder<'a> {
    tree: &'a CallTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a CallNode;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree.nodes[index];
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}
