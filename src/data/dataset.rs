//! Sample collection abstraction

use crate::error::{AdversarioError, Result};

/// An ordered, indexable, finite collection of fixed-width samples.
///
/// Loaders read the collection through this trait only; splitting never
/// copies or reorders the underlying data.
pub trait Dataset {
    /// Number of samples in the collection
    fn len(&self) -> usize;

    /// Whether the collection is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of a single sample's feature row
    fn sample_dim(&self) -> usize;

    /// Retrieve the feature row at `index`
    fn get(&self, index: usize) -> Vec<f32>;
}

/// In-memory dataset of uniform feature rows.
#[derive(Debug, Clone)]
pub struct RowDataset {
    rows: Vec<Vec<f32>>,
    dim: usize,
}

impl RowDataset {
    /// Build a dataset from feature rows, validating uniform width.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        for row in &rows {
            if row.len() != dim {
                return Err(AdversarioError::ShapeMismatch {
                    expected: vec![dim],
                    actual: vec![row.len()],
                });
            }
        }
        Ok(Self { rows, dim })
    }
}

impl Dataset for RowDataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn sample_dim(&self) -> usize {
        self.dim
    }

    fn get(&self, index: usize) -> Vec<f32> {
        self.rows[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_dataset_basic() {
        let ds = RowDataset::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sample_dim(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.get(1), vec![3.0, 4.0]);
    }

    #[test]
    fn test_row_dataset_empty() {
        let ds = RowDataset::new(Vec::new()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.sample_dim(), 0);
    }

    #[test]
    fn test_row_dataset_rejects_ragged_rows() {
        let err = RowDataset::new(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, AdversarioError::ShapeMismatch { .. }));
    }
}
