// File: src/core/encoder.rs
use crate::core::types::{ItemId, Transaction};
use crate::error::ModelError;
use std::collections::{BTreeSet, HashMap};

/// One-hot view of a transaction history: `matrix[row][col]` is true iff
/// transaction `row` contains catalog item `col`.
#[derive(Debug, Clone)]
pub struct EncodedTransactions {
    catalog: Vec<String>,
    index: HashMap<String, ItemId>,
    matrix: Vec<Vec<bool>>,
}

impl EncodedTransactions {
    /// Builds the catalog (sorted, distinct item names) and the presence matrix.
    pub fn encode(transactions: &[Transaction]) -> Result<Self, ModelError> {
        if transactions.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let catalog: Vec<String> = transactions
            .iter()
            .flat_map(|tx| tx.items())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let index: HashMap<String, ItemId> = catalog
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let matrix = transactions
            .iter()
            .map(|tx| {
                let mut row = vec![false; catalog.len()];
                for item in tx.items() {
                    row[index[item]] = true;
                }
                row
            })
            .collect();

        Ok(Self {
            catalog,
            index,
            matrix,
        })
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn matrix(&self) -> &[Vec<bool>] {
        &self.matrix
    }

    pub fn item_name(&self, id: ItemId) -> &str {
        &self.catalog[id]
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.index.get(name).copied()
    }

    pub fn transaction_count(&self) -> usize {
        self.matrix.len()
    }

    /// Number of rows containing every item in `items`. Scans the whole matrix.
    pub fn count_containing(&self, items: &[ItemId]) -> usize {
        self.matrix
            .iter()
            .filter(|row| items.iter().all(|&id| row[id]))
            .count()
    }

    pub fn support(&self, items: &[ItemId]) -> f64 {
        self.count_containing(items) as f64 / self.transaction_count() as f64
    }
}
