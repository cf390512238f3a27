//! A binary search tree over author keys.
//!
//! The tree is unbalanced on purpose: it is built from an author's
//! collaborators in sorted order, which makes it a right-leaning chain.
//! Only the in-order sequence is observable, and that is always sorted.
//! All operations walk the tree iteratively so a chain of any length is
//! safe to build, traverse and drop.

use crate::error::Result;
use crate::graph::CollabGraph;
use std::cmp::Ordering;
use std::fmt;

struct TreeNode {
    key: String,
    left: Link,
    right: Link,
}

type Link = Option<Box<TreeNode>>;

impl TreeNode {
    fn new(key: String) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
        })
    }
}

/// Unbalanced BST of author keys.
#[derive(Default)]
pub struct SortedNameTree {
    root: Link,
    len: usize,
}

impl SortedNameTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by inserting the keys in ascending order.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();

        let mut tree = Self::new();
        for key in keys {
            tree.insert(key);
        }
        tree
    }

    /// Inserts a key. Equal keys go to the right subtree.
    pub fn insert(&mut self, key: impl Into<String>) {
        let key = key.into();
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(TreeNode::new(key));
        self.len += 1;
    }

    /// Removes one occurrence of `key`.
    ///
    /// Leaves and single-child nodes are spliced out; a node with two
    /// children takes the key of its in-order successor. Returns false and
    /// leaves the tree untouched if the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let mut link = &mut self.root;
        loop {
            let ordering = match link.as_deref() {
                Some(node) => key.cmp(node.key.as_str()),
                None => return false,
            };
            if ordering == Ordering::Equal {
                break;
            }
            let Some(node) = link else {
                return false;
            };
            link = if ordering == Ordering::Less {
                &mut node.left
            } else {
                &mut node.right
            };
        }

        let Some(mut node) = link.take() else {
            return false;
        };

        *link = match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                if let Some(successor) = take_min(&mut right) {
                    node.key = successor;
                }
                node.left = Some(left);
                node.right = right;
                Some(node)
            }
        };

        self.len -= 1;
        true
    }

    /// Returns true if the key is in the tree.
    pub fn contains(&self, key: &str) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Keys in sorted order.
    pub fn inorder(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack: Vec<&TreeNode> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                keys.push(node.key.clone());
                current = node.right.as_deref();
            }
        }

        keys
    }

    /// Number of edges on the longest root-to-leaf path, 0 for a single
    /// node or an empty tree.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&TreeNode, usize)> =
            self.root.as_deref().map(|n| (n, 0)).into_iter().collect();

        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let children = [node.left.as_deref(), node.right.as_deref()];
            for child in children.into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        deepest
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl Drop for SortedNameTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl fmt::Debug for SortedNameTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedNameTree")
            .field("len", &self.len)
            .field("keys", &self.inorder())
            .finish()
    }
}

/// Detaches the smallest key of a subtree, splicing its right child
/// into its place. Returns `None` for an empty subtree.
fn take_min(link: &mut Link) -> Option<String> {
    let mut link = link;
    while link.as_ref().is_some_and(|node| node.left.is_some()) {
        link = &mut link.as_mut()?.left;
    }

    let node = link.take()?;
    let TreeNode { key, right, .. } = *node;
    *link = right;
    Some(key)
}

/// Builds the sorted tree of an author's collaborators.
pub fn neighbor_tree(graph: &CollabGraph, author: &str) -> Result<SortedNameTree> {
    let id = graph.resolve(author)?;
    Ok(SortedNameTree::from_keys(graph.neighbor_names(id)))
}
