//! Symbol to bit-string code tables derived from a tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// A variable-length code, first bit first. `false` = 0 = left.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, other: &Code) -> bool {
        self.0.starts_with(&other.0)
    }

    fn pushed(&self, bit: bool) -> Code {
        let mut bits = self.0.clone();
        bits.push(bit);
        Code(bits)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Code(bits)
    }
}

impl FromStr for Code {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::MalformedTree(format!(
                    "invalid bit character {other:?} in code"
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Code)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walk `tree` depth first, 0 for left and 1 for right.
    ///
    /// When a symbol sits on more than one leaf (the single-symbol tree), the
    /// leftmost leaf's code is kept.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let Some((left, right)) = tree.root().children() else {
            return Err(CodecError::MalformedTree(
                "a bare leaf root has no code".into(),
            ));
        };

        let mut codes = BTreeMap::new();
        let mut pending: Vec<(&Node, Code)> = vec![
            (right, Code::default().pushed(true)),
            (left, Code::default().pushed(false)),
        ];
        while let Some((node, code)) = pending.pop() {
            match node {
                Node::Leaf { symbol } => {
                    codes.entry(*symbol).or_insert(code);
                }
                Node::Internal { left, right, .. } => {
                    pending.push((&**right, code.pushed(true)));
                    pending.push((&**left, code.pushed(false)));
                }
            }
        }

        Ok(Self { codes })
    }

    /// Build a table from explicit codes, e.g. `[(0, "0"), (1, "10")]`.
    pub fn from_strings<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, &'a str)>,
    {
        let codes = pairs
            .into_iter()
            .map(|(symbol, bits)| -> Result<(u8, Code)> { Ok((symbol, bits.parse()?)) })
            .collect::<Result<BTreeMap<u8, Code>>>()?;
        Ok(Self { codes })
    }

    /// Code for `symbol`, if the tree has a leaf for it.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// No code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        // after a lexicographic sort a prefix always sits right before an extension
        codes.sort_by(|a, b| a.bits().cmp(b.bits()));
        codes.windows(2).all(|w| !w[1].starts_with(w[0]))
    }

    /// Total encoded bits for a stream with the counts in `freq`.
    pub fn total_bits(&self, freq: &FrequencyTable) -> u64 {
        freq.iter().fold(0u64, |acc, (symbol, count)| {
            let len = self.get(symbol).map_or(0, Code::len) as u64;
            acc.saturating_add(len.saturating_mul(count))
        })
    }

    /// Weighted average code length, bits per symbol.
    pub fn avg_length(&self, freq: &FrequencyTable) -> f64 {
        let total = freq.total();
        if total == 0 {
            return 0.0;
        }
        self.total_bits(freq) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(tree: &HuffmanTree) -> Vec<(u8, String)> {
        CodeTable::from_tree(tree)
            .unwrap()
            .iter()
            .map(|(s, c)| (s, c.to_string()))
            .collect()
    }

    #[test]
    fn test_two_leaves() {
        let tree = HuffmanTree::from_root(Node::internal(Node::leaf(3), Node::leaf(2)));
        assert_eq!(codes_of(&tree), vec![(2, "1".to_string()), (3, "0".to_string())]);
    }

    #[test]
    fn test_built_tree_codes() {
        let freq = FrequencyTable::from_pairs([(2, 6), (3, 4)]);
        let tree = HuffmanTree::build(&freq).unwrap();
        let codes = CodeTable::from_tree(&tree).unwrap();
        let two = codes.get(2).unwrap().to_string();
        let three = codes.get(3).unwrap().to_string();
        assert!((two == "1" && three == "0") || (two == "0" && three == "1"));
    }

    #[test]
    fn test_nested_codes() {
        let tree = HuffmanTree::from_root(Node::internal(
            Node::internal(Node::leaf(3), Node::leaf(2)),
            Node::leaf(9),
        ));
        assert_eq!(
            codes_of(&tree),
            vec![(2, "01".to_string()), (3, "00".to_string()), (9, "1".to_string())]
        );
    }

    #[test]
    fn test_single_symbol_code() {
        let freq = FrequencyTable::from_pairs([(5, 10)]);
        let tree = HuffmanTree::build(&freq).unwrap();
        let codes = CodeTable::from_tree(&tree).unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(5).unwrap().to_string(), "0");
    }

    #[test]
    fn test_bare_leaf_root() {
        let tree = HuffmanTree::from_root(Node::leaf(7));
        assert!(matches!(
            CodeTable::from_tree(&tree),
            Err(CodecError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_prefix_free() {
        let freq = FrequencyTable::from_bytes(b"mississippi river banks");
        let tree = HuffmanTree::build(&freq).unwrap();
        let codes = CodeTable::from_tree(&tree).unwrap();
        assert_eq!(codes.len(), freq.len());
        assert!(codes.is_prefix_free());

        let bad = CodeTable::from_strings([(0, "0"), (1, "01")]).unwrap();
        assert!(!bad.is_prefix_free());
    }

    #[test]
    fn test_invalid_code_string() {
        assert!("0121".parse::<Code>().is_err());
    }

    #[test]
    fn test_total_bits_saturates() {
        let codes = CodeTable::from_strings([(0, "0"), (1, "1")]).unwrap();
        let freq = FrequencyTable::from_pairs([(0, u64::MAX), (1, u64::MAX)]);
        assert_eq!(codes.total_bits(&freq), u64::MAX);
    }

    #[test]
    fn test_weighted_length() {
        let codes = CodeTable::from_strings([(0, "0"), (1, "10"), (2, "11")]).unwrap();
        let freq = FrequencyTable::from_pairs([(0, 2), (1, 1), (2, 1)]);
        assert_eq!(codes.total_bits(&freq), 6);
        assert!((codes.avg_length(&freq) - 1.5).abs() < 1e-9);
    }
}
