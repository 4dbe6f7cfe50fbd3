//! Tree (de)serialization as a postorder list of 4-byte node records.
//!
//! One record per internal node, in postorder, so the root is always the last
//! record. Each side of a record is a tag byte (`0` leaf, `1` internal)
//! followed by a value byte: the leaf symbol, or the child's postorder number.

use crate::error::{CodecError, Result};
use crate::tree::{HuffmanTree, Node};

pub const RECORD_LEN: usize = 4;

/// Most internal nodes the 1-byte header count can describe.
pub const MAX_NODES: usize = u8::MAX as usize;

const TAG_LEAF: u8 = 0;
const TAG_INTERNAL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Leaf(u8),
    /// Postorder number of an internal child.
    Internal(u8),
}

impl Child {
    fn to_bytes(self) -> [u8; 2] {
        match self {
            Child::Leaf(symbol) => [TAG_LEAF, symbol],
            Child::Internal(number) => [TAG_INTERNAL, number],
        }
    }

    fn from_bytes(tag: u8, value: u8) -> Result<Self> {
        match tag {
            TAG_LEAF => Ok(Child::Leaf(value)),
            TAG_INTERNAL => Ok(Child::Internal(value)),
            other => Err(CodecError::MalformedTree(format!(
                "invalid child tag {other}"
            ))),
        }
    }

    fn of(node: &Node) -> Result<Self> {
        match node {
            Node::Leaf { symbol } => Ok(Child::Leaf(*symbol)),
            Node::Internal { number, .. } => number
                .and_then(|n| u8::try_from(n).ok())
                .map(Child::Internal)
                .ok_or_else(|| {
                    CodecError::MalformedTree("internal node without a postorder number".into())
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    pub left: Child,
    pub right: Child,
}

impl NodeRecord {
    pub fn new(left: Child, right: Child) -> Self {
        Self { left, right }
    }

    pub fn to_bytes(self) -> [u8; RECORD_LEN] {
        let [lt, lv] = self.left.to_bytes();
        let [rt, rv] = self.right.to_bytes();
        [lt, lv, rt, rv]
    }

    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Result<Self> {
        Ok(Self {
            left: Child::from_bytes(bytes[0], bytes[1])?,
            right: Child::from_bytes(bytes[2], bytes[3])?,
        })
    }
}

/// Postorder records for a numbered tree.
pub fn serialize_tree(tree: &HuffmanTree) -> Result<Vec<NodeRecord>> {
    if tree.root().is_leaf() {
        return Err(CodecError::MalformedTree(
            "a bare leaf root cannot be serialized".into(),
        ));
    }
    let count = tree.internal_count();
    if count > MAX_NODES {
        return Err(CodecError::HeaderOverflow(count));
    }

    tree.postorder()
        .into_iter()
        .filter_map(|(node, _)| node.children())
        .map(|(left, right)| -> Result<NodeRecord> {
            Ok(NodeRecord::new(Child::of(left)?, Child::of(right)?))
        })
        .collect()
}

/// Rebuild a tree from postorder records. The result is numbered.
///
/// Completed subtrees wait on a stack; an internal reference takes the top
/// of the stack (right side first) and must carry the referenced number.
pub fn deserialize_tree(records: &[NodeRecord]) -> Result<HuffmanTree> {
    if records.is_empty() {
        return Err(CodecError::MalformedTree("empty node list".into()));
    }
    if records.len() > MAX_NODES {
        return Err(CodecError::HeaderOverflow(records.len()));
    }

    let mut built: Vec<Node> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let right = resolve(record.right, &mut built, index)?;
        let left = resolve(record.left, &mut built, index)?;
        built.push(Node::Internal {
            number: Some(index),
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    match (built.pop(), built.is_empty()) {
        (Some(root), true) => Ok(HuffmanTree::from_root(root)),
        _ => Err(CodecError::MalformedTree(format!(
            "{} subtrees were never attached to the root",
            built.len()
        ))),
    }
}

fn resolve(child: Child, built: &mut Vec<Node>, index: usize) -> Result<Node> {
    match child {
        Child::Leaf(symbol) => Ok(Node::leaf(symbol)),
        Child::Internal(number) => {
            let node = built.pop().ok_or_else(|| {
                CodecError::MalformedTree(format!(
                    "record {index} references node {number} but no subtree is pending"
                ))
            })?;
            if node.number() != Some(number as usize) {
                return Err(CodecError::MalformedTree(format!(
                    "record {index} references node {number}, pending subtree is {:?}",
                    node.number()
                )));
            }
            Ok(node)
        }
    }
}

/// Flatten records into the on-disk node list.
pub fn records_to_bytes(records: &[NodeRecord]) -> Vec<u8> {
    records.iter().flat_map(|r| r.to_bytes()).collect()
}

/// Split an on-disk node list into records.
pub fn bytes_to_records(buf: &[u8]) -> Result<Vec<NodeRecord>> {
    if buf.len() % RECORD_LEN != 0 {
        return Err(CodecError::MalformedTree(format!(
            "node list of {} bytes is not a multiple of {RECORD_LEN}",
            buf.len()
        )));
    }
    buf.chunks_exact(RECORD_LEN)
        .map(|chunk| NodeRecord::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeTable;
    use crate::frequency::FrequencyTable;

    fn pair(a: u8, b: u8) -> Node {
        Node::internal(Node::leaf(a), Node::leaf(b))
    }

    fn numbered(root: Node) -> HuffmanTree {
        let mut tree = HuffmanTree::from_root(root);
        tree.number_nodes();
        tree
    }

    #[test]
    fn test_single_record() {
        let tree = numbered(pair(3, 2));
        let records = serialize_tree(&tree).unwrap();
        assert_eq!(records_to_bytes(&records), vec![0, 3, 0, 2]);
    }

    #[test]
    fn test_internal_reference() {
        let tree = numbered(Node::internal(pair(3, 2), Node::leaf(5)));
        let records = serialize_tree(&tree).unwrap();
        assert_eq!(records_to_bytes(&records), vec![0, 3, 0, 2, 1, 0, 0, 5]);
    }

    #[test]
    fn test_unnumbered_tree_rejected() {
        let tree = HuffmanTree::from_root(Node::internal(pair(3, 2), Node::leaf(5)));
        assert!(matches!(
            serialize_tree(&tree),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_bytes_to_records() {
        let records = bytes_to_records(&[0, 1, 0, 2]).unwrap();
        assert_eq!(records, vec![NodeRecord::new(Child::Leaf(1), Child::Leaf(2))]);
        assert!(bytes_to_records(&[0, 1, 0]).is_err());
        assert!(bytes_to_records(&[0, 1, 7, 2]).is_err());
    }

    #[test]
    fn test_deserialize_postorder() {
        let records = vec![
            NodeRecord::new(Child::Leaf(5), Child::Leaf(7)),
            NodeRecord::new(Child::Leaf(10), Child::Leaf(12)),
            NodeRecord::new(Child::Internal(0), Child::Internal(1)),
        ];
        let tree = deserialize_tree(&records).unwrap();
        assert_eq!(tree, numbered(Node::internal(pair(5, 7), pair(10, 12))));
    }

    #[test]
    fn test_roundtrip_preserves_codes() {
        let freq = FrequencyTable::from_bytes(b"she sells sea shells by the sea shore");
        let mut tree = HuffmanTree::build(&freq).unwrap();
        tree.number_nodes();
        let bytes = records_to_bytes(&serialize_tree(&tree).unwrap());
        let rebuilt = deserialize_tree(&bytes_to_records(&bytes).unwrap()).unwrap();
        assert_eq!(rebuilt, tree);
        assert_eq!(
            CodeTable::from_tree(&rebuilt).unwrap(),
            CodeTable::from_tree(&tree).unwrap()
        );
    }

    #[test]
    fn test_bad_reference_number() {
        let records = vec![
            NodeRecord::new(Child::Leaf(5), Child::Leaf(7)),
            NodeRecord::new(Child::Leaf(10), Child::Leaf(12)),
            NodeRecord::new(Child::Internal(0), Child::Internal(0)),
        ];
        assert!(matches!(
            deserialize_tree(&records),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_missing_child() {
        let records = vec![NodeRecord::new(Child::Internal(0), Child::Leaf(1))];
        assert!(matches!(
            deserialize_tree(&records),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_dangling_subtree() {
        let records = vec![
            NodeRecord::new(Child::Leaf(1), Child::Leaf(2)),
            NodeRecord::new(Child::Leaf(3), Child::Leaf(4)),
        ];
        assert!(matches!(
            deserialize_tree(&records),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_empty_list() {
        assert!(matches!(
            deserialize_tree(&[]),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_header_overflow() {
        // 257 leaves need 256 internal nodes
        let mut root = Node::leaf(0);
        for i in 0..256u32 {
            root = Node::internal(root, Node::leaf((i % 256) as u8));
        }
        let tree = numbered(root);
        assert!(matches!(
            serialize_tree(&tree),
            Err(CodecError::HeaderOverflow(256))
        ));
    }
}
