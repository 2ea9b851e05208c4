// File: src/core/apriori.rs
use crate::core::encoder::EncodedTransactions;
use crate::core::types::{ItemId, Itemset};
use crate::error::ModelError;
use std::collections::HashSet;

/// Levelwise frequent-itemset miner with anti-monotone pruning.
pub struct AprioriMiner {
    min_support: f64,
}

impl AprioriMiner {
    pub fn new(min_support: f64) -> Result<Self, ModelError> {
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(ModelError::InvalidThreshold {
                name: "min_support",
                value: min_support,
            });
        }
        Ok(Self { min_support })
    }

    /// Returns every itemset with support >= `min_support`, level by level,
    /// each level in catalog order.
    pub fn mine(&self, encoded: &EncodedTransactions) -> Vec<Itemset> {
        let total = encoded.transaction_count();

        let mut level: Vec<Itemset> = (0..encoded.catalog().len())
            .filter_map(|id| self.measure(encoded, vec![id], total))
            .collect();
        // Only frequent single items can extend a frequent set.
        let extensions: Vec<ItemId> = level.iter().map(|set| set.items[0]).collect();

        let mut frequent = Vec::new();
        let mut size = 1;
        while !level.is_empty() {
            tracing::debug!(size, survivors = level.len(), "apriori level complete");

            let survivors: HashSet<&[ItemId]> =
                level.iter().map(|set| set.items.as_slice()).collect();
            let mut next = Vec::new();
            for set in &level {
                let last = set.items[set.items.len() - 1];
                for &ext in extensions.iter().filter(|&&id| id > last) {
                    let mut candidate = set.items.clone();
                    candidate.push(ext);
                    if !all_subsets_frequent(&candidate, &survivors) {
                        continue;
                    }
                    if let Some(found) = self.measure(encoded, candidate, total) {
                        next.push(found);
                    }
                }
            }

            frequent.append(&mut level);
            level = next;
            size += 1;
        }
        frequent
    }

    fn measure(
        &self,
        encoded: &EncodedTransactions,
        items: Vec<ItemId>,
        total: usize,
    ) -> Option<Itemset> {
        let count = encoded.count_containing(&items);
        let support = count as f64 / total as f64;
        (support >= self.min_support).then_some(Itemset {
            items,
            count,
            support,
        })
    }
}

/// True when dropping any one item from `candidate` yields a surviving set.
fn all_subsets_frequent(candidate: &[ItemId], survivors: &HashSet<&[ItemId]>) -> bool {
    let mut subset = Vec::with_capacity(candidate.len() - 1);
    (0..candidate.len()).all(|skip| {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &id)| id),
        );
        survivors.contains(subset.as_slice())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Transaction;

    fn encoded(rows: &[&[&str]]) -> EncodedTransactions {
        let txs: Vec<Transaction> = rows
            .iter()
            .map(|r| Transaction::new(r.iter().copied()))
            .collect();
        EncodedTransactions::encode(&txs).unwrap()
    }

    #[test]
    fn rejects_out_of_range_support() {
        assert!(AprioriMiner::new(0.0).is_err());
        assert!(AprioriMiner::new(1.5).is_err());
        assert!(AprioriMiner::new(f64::NAN).is_err());
        assert!(AprioriMiner::new(1.0).is_ok());
    }

    #[test]
    fn finds_frequent_pairs() {
        let data = encoded(&[&["A", "B", "C"], &["A", "B"], &["A", "C"], &["B", "C"]]);
        let sets = AprioriMiner::new(0.5).unwrap().mine(&data);
        let items: Vec<Vec<ItemId>> = sets.iter().map(|s| s.items.clone()).collect();
        assert_eq!(
            items,
            vec![vec![0], vec![1], vec![2], vec![0, 1], vec![0, 2], vec![1, 2]]
        );
        assert!(sets.iter().all(|s| s.count == data.count_containing(&s.items)));
    }

    #[test]
    fn prunes_candidates_with_infrequent_subsets() {
        let data = encoded(&[&["A", "B", "C"], &["A", "B"], &["A", "C"], &["B", "C"]]);
        // {A,B,C} appears once: below 0.5 and never reported.
        let sets = AprioriMiner::new(0.5).unwrap().mine(&data);
        assert!(sets.iter().all(|s| s.len() < 3));
        let all = AprioriMiner::new(0.25).unwrap().mine(&data);
        assert!(all.iter().any(|s| s.items == vec![0, 1, 2]));
    }

    #[test]
    fn threshold_above_every_item_yields_nothing() {
        let data = encoded(&[&["A"], &["B"]]);
        assert!(AprioriMiner::new(1.0).unwrap().mine(&data).is_empty());
    }

    #[test]
    fn subset_check_requires_every_subset() {
        let a: &[ItemId] = &[0, 1];
        let b: &[ItemId] = &[0, 2];
        let survivors: HashSet<&[ItemId]> = [a, b].into_iter().collect();
        assert!(!all_subsets_frequent(&[0, 1, 2], &survivors));
        let c: &[ItemId] = &[1, 2];
        let survivors: HashSet<&[ItemId]> = [a, b, c].into_iter().collect();
        assert!(all_subsets_frequent(&[0, 1, 2], &survivors));
    }
}
