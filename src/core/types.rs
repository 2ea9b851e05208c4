// src/core/types.rs
use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column index of an item in the catalog of one model snapshot.
pub type ItemId = usize;

/// One recorded shopping basket. Items are deduplicated on construction
/// and kept in lexicographic order; the set is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Transaction {
    items: BTreeSet<String>,
}

impl Transaction {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<String>> for Transaction {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<Transaction> for Vec<String> {
    fn from(tx: Transaction) -> Self {
        tx.items.into_iter().collect()
    }
}

/// A frequent itemset as discovered by the miner.
#[derive(Debug, Clone, PartialEq)]
pub struct Itemset {
    /// Catalog indices, strictly ascending.
    pub items: Vec<ItemId>,
    /// Number of transactions containing every item.
    pub count: usize,
    /// `count / total transactions`.
    pub support: f64,
}

impl Itemset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A directional association rule `antecedent -> consequent`.
///
/// Both sides are non-empty, disjoint and sorted. Construction goes through
/// [`Rule::new`] so a malformed partition can never reach the query path.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: Vec<ItemId>,
    consequent: Vec<ItemId>,
    /// Support of `antecedent ∪ consequent`.
    pub support: f64,
    /// `support(antecedent ∪ consequent) / support(antecedent)`.
    pub confidence: f64,
    /// `confidence / support(consequent)`.
    pub lift: f64,
}

impl Rule {
    pub fn new(
        mut antecedent: Vec<ItemId>,
        mut consequent: Vec<ItemId>,
        support: f64,
        confidence: f64,
        lift: f64,
    ) -> Result<Self, RuleError> {
        if antecedent.is_empty() || consequent.is_empty() {
            return Err(RuleError::EmptyPart);
        }
        antecedent.sort_unstable();
        antecedent.dedup();
        consequent.sort_unstable();
        consequent.dedup();
        if let Some(&item) = antecedent
            .iter()
            .find(|id| consequent.binary_search(id).is_ok())
        {
            return Err(RuleError::Overlap { item });
        }
        Ok(Self {
            antecedent,
            consequent,
            support,
            confidence,
            lift,
        })
    }

    pub fn antecedent(&self) -> &[ItemId] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &[ItemId] {
        &self.consequent
    }
}

/// Where a recommendation's score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Score is the best confidence among matching rules.
    Rule,
    /// No rule applied; score is the configured neutral fallback.
    Popularity,
}

/// A single ranked suggestion returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: String,
    pub score: f64,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_dedups_items() {
        let tx = Transaction::new(["Milk", "Bread", "Milk"]);
        assert_eq!(tx.len(), 2);
        assert_eq!(tx.items().collect::<Vec<_>>(), vec!["Bread", "Milk"]);
    }

    #[test]
    fn transaction_deserializes_from_plain_list() {
        let tx: Transaction = serde_json::from_str(r#"["Eggs","Bread","Eggs"]"#).unwrap();
        assert!(tx.contains("Eggs"));
        assert_eq!(tx.len(), 2);
    }

    #[test]
    fn rule_rejects_empty_side() {
        assert!(matches!(
            Rule::new(vec![], vec![1], 0.2, 1.0, 1.0),
            Err(RuleError::EmptyPart)
        ));
        assert!(matches!(
            Rule::new(vec![0], vec![], 0.2, 1.0, 1.0),
            Err(RuleError::EmptyPart)
        ));
    }

    #[test]
    fn rule_rejects_overlap() {
        assert!(matches!(
            Rule::new(vec![0, 2], vec![2, 3], 0.2, 1.0, 1.0),
            Err(RuleError::Overlap { item: 2 })
        ));
    }

    #[test]
    fn rule_sorts_its_sides() {
        let rule = Rule::new(vec![3, 1], vec![2], 0.2, 0.5, 1.0).unwrap();
        assert_eq!(rule.antecedent(), &[1, 3]);
        assert_eq!(rule.consequent(), &[2]);
    }
}
