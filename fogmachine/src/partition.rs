//! Splitting perimeter rays into per-node batches.

use std::ops::Range;

/// Index ranges of `batches` contiguous, near-equal slices of `len` items.
///
/// The first `len % batches` ranges hold one extra item. A batch count of
/// zero is treated as one. When there are more batches than items the
/// trailing ranges are empty.
pub fn batch_ranges(len: usize, batches: usize) -> Vec<Range<usize>> {
    let batches = batches.max(1);
    let base = len / batches;
    let remainder = len % batches;

    let mut start = 0;
    (0..batches)
        .map(|i| {
            let size = base + usize::from(i < remainder);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Split `targets` into one batch per node.
///
/// Batch 0 belongs to the local node, batch `i + 1` to the `i`-th peer.
pub fn partition<T: Clone>(targets: &[T], nodes: usize) -> Vec<Vec<T>> {
    batch_ranges(targets.len(), nodes)
        .into_iter()
        .map(|range| targets[range].to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_node_gets_everything() {
        let batches = partition(&[1, 2, 3, 4, 5], 1);
        assert_eq!(batches, vec![vec![1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_zero_nodes_treated_as_one() {
        assert_eq!(partition(&[1, 2, 3], 0), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_remainder_goes_to_first_batches() {
        let batches = partition(&(0..10).collect::<Vec<_>>(), 3);
        assert_eq!(
            batches,
            vec![vec![0, 1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
        );
    }

    #[test]
    fn test_more_nodes_than_targets() {
        let batches = partition(&['a', 'b'], 4);
        assert_eq!(batches, vec![vec!['a'], vec!['b'], vec![], vec![]]);
    }

    proptest! {
        #[test]
        fn prop_batches_cover_targets_exactly_once(len in 0usize..500, nodes in 0usize..600) {
            let targets: Vec<usize> = (0..len).collect();
            let batches = partition(&targets, nodes);

            prop_assert_eq!(batches.len(), nodes.max(1));
            let flattened: Vec<usize> = batches.iter().flatten().copied().collect();
            prop_assert_eq!(flattened, targets);

            let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
            let max = sizes.iter().copied().max().unwrap_or(0);
            let min = sizes.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
            prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
