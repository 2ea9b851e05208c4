// File: src/dataset.rs
use crate::core::types::Transaction;
use crate::error::DatasetError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The bundled ten-basket grocery history.
pub fn grocery_transactions() -> Vec<Transaction> {
    let rows: [&[&str]; 10] = [
        &["Bread", "Milk", "Butter"],
        &["Bread", "Diaper", "Beer", "Eggs"],
        &["Milk", "Diaper", "Beer", "Cola", "Chips"],
        &["Bread", "Milk", "Diaper", "Beer", "Eggs"],
        &["Bread", "Milk", "Diaper", "Cola"],
        &["Fruits", "Vegetables", "Milk"],
        &["Bread", "Butter", "Jam", "Eggs"],
        &["Cola", "Chips", "Chocolate"],
        &["Beer", "Chips", "Nuts"],
        &["Fruits", "Chocolate", "Ice Cream"],
    ];
    rows.iter()
        .map(|row| Transaction::new(row.iter().copied()))
        .collect()
}

/// Reads a JSON array of baskets, e.g. `[["Bread","Milk"],["Eggs"]]`.
pub fn load_json(path: &Path) -> Result<Vec<Transaction>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let transactions: Vec<Transaction> = serde_json::from_reader(BufReader::new(file))?;
    if transactions.is_empty() {
        return Err(DatasetError::Empty);
    }
    tracing::info!(path = %path.display(), transactions = transactions.len(), "dataset loaded");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_dataset_has_ten_baskets() {
        let txs = grocery_transactions();
        assert_eq!(txs.len(), 10);
        assert_eq!(txs.iter().filter(|t| t.contains("Bread")).count(), 5);
    }

    #[test]
    fn loads_json_baskets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["Bread","Milk"],["Eggs","Eggs"]]"#).unwrap();
        let txs = load_json(file.path()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].len(), 1);
    }

    #[test]
    fn rejects_empty_and_malformed_files() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(load_json(empty.path()), Err(DatasetError::Empty)));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"Bread": 1}}"#).unwrap();
        assert!(matches!(load_json(bad.path()), Err(DatasetError::Parse(_))));
    }
}
