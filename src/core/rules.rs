// File: src/core/rules.rs
use crate::core::types::{ItemId, Itemset, Rule};
use crate::error::{ModelError, RuleError};
use std::collections::HashMap;

/// Derives confidence rules from already-mined itemsets without rescanning
/// the transaction matrix.
pub struct RuleGenerator {
    min_confidence: f64,
}

impl RuleGenerator {
    pub fn new(min_confidence: f64) -> Result<Self, ModelError> {
        if !(min_confidence > 0.0 && min_confidence <= 1.0) {
            return Err(ModelError::InvalidThreshold {
                name: "min_confidence",
                value: min_confidence,
            });
        }
        Ok(Self { min_confidence })
    }

    /// Splits every itemset of size >= 2 into each non-empty antecedent and
    /// its complement. Output follows itemset order, then partition order
    /// (antecedent bitmask over the itemset's items, ascending).
    pub fn generate(&self, itemsets: &[Itemset]) -> Result<Vec<Rule>, RuleError> {
        let known: HashMap<&[ItemId], &Itemset> = itemsets
            .iter()
            .map(|set| (set.items.as_slice(), set))
            .collect();

        let mut rules = Vec::new();
        for set in itemsets.iter().filter(|set| set.len() >= 2) {
            let full_mask =
                partition_mask(set.len()).ok_or(RuleError::TooLarge { len: set.len() })?;
            for mask in 1..full_mask {
                let (antecedent, consequent) = split(&set.items, mask);
                // Every subset of a frequent itemset is itself frequent.
                let (Some(ante), Some(cons)) = (
                    known.get(antecedent.as_slice()),
                    known.get(consequent.as_slice()),
                ) else {
                    continue;
                };

                let confidence = set.count as f64 / ante.count as f64;
                if confidence < self.min_confidence {
                    continue;
                }
                let lift = confidence / cons.support;
                rules.push(Rule::new(
                    antecedent,
                    consequent,
                    set.support,
                    confidence,
                    lift,
                )?);
            }
        }
        tracing::debug!(rules = rules.len(), "rule generation complete");
        Ok(rules)
    }
}

/// All-ones mask over `len` items; `None` once `len` exceeds the 63 bits
/// a `u64` partition counter can walk.
fn partition_mask(len: usize) -> Option<u64> {
    if len >= u64::BITS as usize {
        return None;
    }
    Some((1u64 << len) - 1)
}

fn split(items: &[ItemId], mask: u64) -> (Vec<ItemId>, Vec<ItemId>) {
    let (ante, cons): (Vec<_>, Vec<_>) = items
        .iter()
        .enumerate()
        .partition(|&(bit, _)| mask & (1 << bit) != 0);
    (
        ante.into_iter().map(|(_, &id)| id).collect(),
        cons.into_iter().map(|(_, &id)| id).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[ItemId], count: usize, total: usize) -> Itemset {
        Itemset {
            items: items.to_vec(),
            count,
            support: count as f64 / total as f64,
        }
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        assert!(RuleGenerator::new(0.0).is_err());
        assert!(RuleGenerator::new(1.01).is_err());
        assert!(RuleGenerator::new(0.5).is_ok());
    }

    #[test]
    fn single_items_yield_no_rules() {
        let sets = vec![set(&[0], 5, 10), set(&[1], 4, 10)];
        let rules = RuleGenerator::new(0.1).unwrap().generate(&sets).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn pair_produces_both_directions() {
        let sets = vec![set(&[0], 4, 10), set(&[1], 3, 10), set(&[0, 1], 3, 10)];
        let rules = RuleGenerator::new(0.5).unwrap().generate(&sets).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].antecedent(), &[0]);
        assert_eq!(rules[0].consequent(), &[1]);
        assert!((rules[0].confidence - 0.75).abs() < 1e-12);
        assert!((rules[0].lift - 0.75 / 0.3).abs() < 1e-12);
        assert_eq!(rules[1].antecedent(), &[1]);
        assert_eq!(rules[1].confidence, 1.0);
    }

    #[test]
    fn filters_by_confidence() {
        let sets = vec![set(&[0], 8, 10), set(&[1], 2, 10), set(&[0, 1], 2, 10)];
        let rules = RuleGenerator::new(0.5).unwrap().generate(&sets).unwrap();
        // {0}->{1} has 0.25, only {1}->{0} survives.
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].antecedent(), &[1]);
    }

    #[test]
    fn partition_mask_stops_at_word_size() {
        assert_eq!(partition_mask(2), Some(0b11));
        assert_eq!(partition_mask(63), Some(u64::MAX >> 1));
        assert_eq!(partition_mask(64), None);
    }

    #[test]
    fn oversized_itemset_is_an_error() {
        let items: Vec<ItemId> = (0..64).collect();
        let sets = vec![set(&items, 1, 1)];
        assert_eq!(
            RuleGenerator::new(0.5).unwrap().generate(&sets),
            Err(RuleError::TooLarge { len: 64 })
        );
    }

    #[test]
    fn triple_considers_multi_item_consequents() {
        let sets = vec![
            set(&[0], 2, 4),
            set(&[1], 2, 4),
            set(&[2], 2, 4),
            set(&[0, 1], 2, 4),
            set(&[0, 2], 2, 4),
            set(&[1, 2], 2, 4),
            set(&[0, 1, 2], 2, 4),
        ];
        let rules = RuleGenerator::new(1.0).unwrap().generate(&sets).unwrap();
        let from_triple: Vec<_> = rules
            .iter()
            .filter(|r| r.antecedent().len() + r.consequent().len() == 3)
            .collect();
        assert_eq!(from_triple.len(), 6);
        assert!(from_triple
            .iter()
            .any(|r| r.antecedent() == [0] && r.consequent() == [1, 2]));
    }
}
