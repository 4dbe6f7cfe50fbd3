//! Frequency analysis over byte streams.

/// Occurrence counts per byte value.
///
/// Only symbols that were actually observed have an entry. Entries keep the
/// order in which their symbol was first seen; the tree builder relies on that
/// order to break frequency ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<(u8, u64)>,
    slots: [Option<u8>; 256],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: Vec::new(),
            slots: [None; 256],
        }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &b in data {
            table.add(b, 1);
        }
        table
    }

    /// Build a table from explicit `(symbol, count)` pairs, in the given order.
    ///
    /// Repeated symbols accumulate; zero counts still create an entry.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            table.add(symbol, count);
        }
        table
    }

    fn add(&mut self, symbol: u8, count: u64) {
        match self.slots[symbol as usize] {
            Some(idx) => {
                let entry = &mut self.counts[idx as usize].1;
                *entry = entry.saturating_add(count);
            }
            None => {
                // at most 256 entries, so the index always fits
                self.slots[symbol as usize] = Some(self.counts.len() as u8);
                self.counts.push((symbol, count));
            }
        }
    }

    /// Count for `symbol`, 0 when it never occurred.
    pub fn get(&self, symbol: u8) -> u64 {
        self.slots[symbol as usize]
            .map(|idx| self.counts[idx as usize].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.slots[symbol as usize].is_some()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts.iter().map(|&(s, _)| s)
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, &(_, c)| acc.saturating_add(c))
    }

    /// Symbols by descending count. Ties keep table order, which is what a
    /// left-to-right max-scan over the table yields when only a strictly
    /// larger count replaces the current maximum.
    pub fn by_descending_count(&self) -> Vec<(u8, u64)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &(_, c) in &self.counts {
            if c > 0 {
                let p = c as f64 / len;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_exact() {
        let table = FrequencyTable::from_bytes(&[65, 66, 67, 66]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(65), 1);
        assert_eq!(table.get(66), 2);
        assert_eq!(table.get(67), 1);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_absent_symbols() {
        let table = FrequencyTable::from_bytes(b"aaa");
        assert!(!table.contains(b'b'));
        assert_eq!(table.get(b'b'), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn test_first_seen_order() {
        let table = FrequencyTable::from_bytes(b"cabca");
        let symbols: Vec<u8> = table.symbols().collect();
        assert_eq!(symbols, vec![b'c', b'a', b'b']);
    }

    #[test]
    fn test_descending_keeps_tie_order() {
        let table = FrequencyTable::from_pairs([(9, 3), (4, 5), (7, 3), (1, 5)]);
        assert_eq!(table.by_descending_count(), vec![(4, 5), (1, 5), (9, 3), (7, 3)]);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let table = FrequencyTable::from_pairs([(1, u64::MAX), (1, 5), (2, u64::MAX)]);
        assert_eq!(table.get(1), u64::MAX);
        assert_eq!(table.total(), u64::MAX);
    }

    #[test]
    fn test_entropy_uniform() {
        let table = FrequencyTable::from_bytes(&[0, 1, 2, 3]);
        assert!((table.entropy() - 2.0).abs() < 1e-9);
        let single = FrequencyTable::from_bytes(&[42u8; 100]);
        assert!(single.entropy() < 0.01, "single symbol should have ~0 entropy");
    }
}
