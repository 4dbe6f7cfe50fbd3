//! Shape-preserving leaf reassignment.

use std::collections::BTreeSet;

use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Move the most frequent symbols to the shallowest leaves without touching
/// the branching structure of `tree`.
///
/// Leaf positions are taken by ascending depth (left to right within a
/// depth) and paired with symbols by descending count. For a fixed shape this
/// pairing minimizes the weighted average code length.
pub fn improve_tree(tree: &mut HuffmanTree, freq: &FrequencyTable) -> Result<()> {
    let leaves = tree.leaf_depths();
    let tree_symbols: BTreeSet<u8> = leaves.iter().map(|&(s, _)| s).collect();
    let table_symbols: BTreeSet<u8> = freq.symbols().collect();
    if tree_symbols != table_symbols {
        return Err(CodecError::SymbolSetMismatch {
            tree_symbols: tree_symbols.len(),
            table_symbols: table_symbols.len(),
        });
    }
    if leaves.len() != tree_symbols.len() {
        // the single-symbol tree: one internal node over two copies of the symbol
        if leaves.len() == 2 && tree_symbols.len() == 1 {
            return Ok(());
        }
        return Err(CodecError::MalformedTree(format!(
            "{} leaves carry only {} distinct symbols",
            leaves.len(),
            tree_symbols.len()
        )));
    }

    let mut positions: Vec<(usize, usize)> = leaves
        .iter()
        .enumerate()
        .map(|(index, &(_, depth))| (index, depth))
        .collect();
    positions.sort_by_key(|&(_, depth)| depth);

    let mut assigned = vec![0u8; leaves.len()];
    for (&(index, _), (symbol, _)) in positions.iter().zip(freq.by_descending_count()) {
        assigned[index] = symbol;
    }

    let mut next = assigned.into_iter();
    tree.map_leaves(|old| next.next().unwrap_or(old));
    Ok(())
}
