// File: src/core/popularity.rs
use crate::core::encoder::EncodedTransactions;
use crate::core::types::ItemId;

/// Item ids ordered by descending transaction count; ties keep catalog order.
pub fn rank_by_popularity(encoded: &EncodedTransactions) -> Vec<(ItemId, usize)> {
    let mut counts: Vec<(ItemId, usize)> = (0..encoded.catalog().len())
        .map(|id| (id, encoded.count_containing(&[id])))
        .collect();
    // Stable sort, so equal counts stay in catalog order.
    counts.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
    counts
}
