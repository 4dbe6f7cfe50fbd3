//! Prefix-code tree model and construction.
//!
//! Trees are built with a fixed merge order rather than a min-heap reduction:
//! symbols are queued by descending frequency, the two tail nodes are merged,
//! and the merged node goes back in at the head. The resulting shapes are
//! reproducible for identical inputs, which the on-disk format depends on.

use std::collections::VecDeque;

use crate::codes::CodeTable;
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
    },
    Internal {
        /// Postorder number, set by [`HuffmanTree::number_nodes`].
        number: Option<usize>,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// A leaf carrying `symbol`.
    pub fn leaf(symbol: u8) -> Self {
        Node::Leaf { symbol }
    }

    /// An unnumbered internal node over `left` and `right`.
    pub fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            number: None,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn number(&self) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { number, .. } => *number,
        }
    }

    /// Number of internal nodes in this subtree, self included.
    pub fn internal_count(&self) -> usize {
        let mut pending = vec![self];
        let mut count = 0;
        while let Some(node) = pending.pop() {
            if let Some((left, right)) = node.children() {
                count += 1;
                pending.push(left);
                pending.push(right);
            }
        }
        count
    }

    /// Left and right child of an internal node.
    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some((left, right)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build a tree whose leaves are exactly the symbols of `freq`.
    ///
    /// A single-symbol table yields an internal root with two leaves for that
    /// symbol, so the symbol still gets a one-bit code.
    pub fn build(freq: &FrequencyTable) -> Result<Self> {
        if freq.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        // front = highest frequency
        let mut queue: VecDeque<Node> = freq
            .by_descending_count()
            .into_iter()
            .map(|(symbol, _)| Node::leaf(symbol))
            .collect();

        if queue.len() == 1 {
            let symbol = freq.symbols().next().ok_or(CodecError::EmptyInput)?;
            return Ok(Self::from_root(Node::internal(
                Node::leaf(symbol),
                Node::leaf(symbol),
            )));
        }

        loop {
            let first = queue.pop_back().ok_or(CodecError::EmptyInput)?;
            let Some(second) = queue.pop_back() else {
                return Ok(Self::from_root(first));
            };
            queue.push_front(Node::internal(first, second));
        }
    }

    /// Wrap an existing node as a tree.
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Assign postorder numbers (left subtree, right subtree, self) to every
    /// internal node, starting at 0. Re-numbering an already numbered tree
    /// gives the same numbers.
    pub fn number_nodes(&mut self) {
        // a subtree numbered from `base` covers base..base + its internal count,
        // and its own root takes the last number of that range
        let mut pending: Vec<(&mut Node, usize)> = vec![(&mut self.root, 0)];
        while let Some((node, base)) = pending.pop() {
            if let Node::Internal {
                number,
                left,
                right,
            } = node
            {
                let left_count = left.internal_count();
                *number = Some(base + left_count + right.internal_count());
                pending.push((&mut **right, base + left_count));
                pending.push((&mut **left, base));
            }
        }
    }

    /// True when every internal node carries a postorder number.
    pub fn is_numbered(&self) -> bool {
        self.postorder()
            .iter()
            .all(|(node, _)| node.is_leaf() || node.number().is_some())
    }

    /// All nodes with their depth, in postorder. Leaves come out left to right.
    pub fn postorder(&self) -> Vec<(&Node, usize)> {
        let mut pending = vec![(&self.root, 0usize)];
        let mut out = Vec::new();
        while let Some((node, depth)) = pending.pop() {
            out.push((node, depth));
            if let Some((left, right)) = node.children() {
                pending.push((left, depth + 1));
                pending.push((right, depth + 1));
            }
        }
        // self, right, left reversed is left, right, self
        out.reverse();
        out
    }

    pub fn internal_count(&self) -> usize {
        self.root.internal_count()
    }

    /// Leaf symbols with their depth, left to right.
    pub fn leaf_depths(&self) -> Vec<(u8, usize)> {
        self.postorder()
            .into_iter()
            .filter_map(|(node, depth)| node.symbol().map(|s| (s, depth)))
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_depths().len()
    }

    /// Replace every leaf symbol, visiting leaves left to right. The shape
    /// and the postorder numbers are untouched.
    pub fn map_leaves<F>(&mut self, mut f: F)
    where
        F: FnMut(u8) -> u8,
    {
        let mut pending: Vec<&mut Node> = vec![&mut self.root];
        while let Some(node) = pending.pop() {
            match node {
                Node::Leaf { symbol } => *symbol = f(*symbol),
                Node::Internal { left, right, .. } => {
                    pending.push(right);
                    pending.push(left);
                }
            }
        }
    }

    /// Weighted average code length in bits per symbol for `freq`.
    pub fn avg_length(&self, freq: &FrequencyTable) -> Result<f64> {
        Ok(CodeTable::from_tree(self)?.avg_length(freq))
    }
}
