use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

/// Immutable movie catalog plus its precomputed pairwise similarity matrix.
///
/// Both artifacts are produced offline by an external pipeline and loaded once
/// at startup; every query afterwards is a pure in-memory read.
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    /// Derived title -> position map. Duplicate titles keep the first
    /// occurrence (known limitation, logged at load).
    by_title: HashMap<String, usize>,
    similarity: Vec<Vec<f32>>,
}

impl CatalogIndex {
    /// Builds an index from already-deserialized artifacts, validating that
    /// the matrix is square and aligned with the catalog.
    pub fn new(entries: Vec<CatalogEntry>, similarity: Vec<Vec<f32>>) -> AppResult<Self> {
        if similarity.len() != entries.len() {
            return Err(AppError::DataLoad(format!(
                "Similarity matrix has {} rows for {} catalog entries",
                similarity.len(),
                entries.len()
            )));
        }

        for (position, row) in similarity.iter().enumerate() {
            if row.len() != entries.len() {
                return Err(AppError::DataLoad(format!(
                    "Similarity row {} has {} columns, expected {}",
                    position,
                    row.len(),
                    entries.len()
                )));
            }
        }

        let mut by_title = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if by_title.contains_key(&entry.title) {
                tracing::warn!(title = %entry.title, position, "Duplicate catalog title, keeping first occurrence");
                continue;
            }
            by_title.insert(entry.title.clone(), position);
        }

        Ok(Self {
            entries,
            by_title,
            similarity,
        })
    }

    /// Loads the catalog and similarity artifacts from JSON files.
    ///
    /// Any failure here is a `DataLoad` error; the caller decides whether to
    /// halt or keep the process alive in degraded mode.
    pub fn load(catalog_path: &Path, similarity_path: &Path) -> AppResult<Self> {
        let catalog_json = std::fs::read_to_string(catalog_path).map_err(|e| {
            AppError::DataLoad(format!(
                "Failed to read catalog artifact {}: {}",
                catalog_path.display(),
                e
            ))
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&catalog_json).map_err(|e| {
            AppError::DataLoad(format!(
                "Malformed catalog artifact {}: {}",
                catalog_path.display(),
                e
            ))
        })?;

        let similarity_json = std::fs::read_to_string(similarity_path).map_err(|e| {
            AppError::DataLoad(format!(
                "Failed to read similarity artifact {}: {}",
                similarity_path.display(),
                e
            ))
        })?;
        let similarity: Vec<Vec<f32>> = serde_json::from_str(&similarity_json).map_err(|e| {
            AppError::DataLoad(format!(
                "Malformed similarity artifact {}: {}",
                similarity_path.display(),
                e
            ))
        })?;

        let index = Self::new(entries, similarity)?;

        tracing::info!(
            titles = index.len(),
            catalog = %catalog_path.display(),
            "Catalog loaded"
        );

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All titles in catalog order
    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.title.clone()).collect()
    }

    /// Top-k most similar catalog entries to `title`, highest score first.
    ///
    /// The queried entry itself is excluded. Ties are broken by catalog
    /// position, ascending. Returns fewer than `k` entries only when the
    /// catalog is smaller than `k + 1`.
    pub fn neighbors(&self, title: &str, k: usize) -> AppResult<Vec<(CatalogEntry, f32)>> {
        if k < 1 {
            return Err(AppError::InvalidInput(
                "Neighbor count must be at least 1".to_string(),
            ));
        }

        let position = *self.by_title.get(title).ok_or_else(|| {
            AppError::NotFound(format!("Title '{}' not in catalog", title))
        })?;

        let row = &self.similarity[position];

        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(i, score)| (i, *score))
            .collect();

        // Stable sort: equal scores keep position-ascending order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| (self.entries[i].clone(), score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, external_id: i64) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            external_id,
        }
    }

    fn three_movie_index() -> CatalogIndex {
        CatalogIndex::new(
            vec![entry("Movie A", 1), entry("Movie B", 2), entry("Movie C", 3)],
            vec![
                vec![1.0, 0.9, 0.3],
                vec![0.9, 1.0, 0.5],
                vec![0.3, 0.5, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_top_neighbor_excludes_self() {
        let index = three_movie_index();
        let neighbors = index.neighbors("Movie A", 1).unwrap();

        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].0.title, "Movie B");
        assert_eq!(neighbors[0].1, 0.9);
    }

    #[test]
    fn test_neighbors_sorted_descending() {
        let index = three_movie_index();
        let neighbors = index.neighbors("Movie A", 2).unwrap();

        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0.title, "Movie B");
        assert_eq!(neighbors[1].0.title, "Movie C");
        assert!(neighbors[0].1 >= neighbors[1].1);
    }

    #[test]
    fn test_neighbors_is_deterministic() {
        let index = three_movie_index();
        let first = index.neighbors("Movie B", 2).unwrap();
        let second = index.neighbors("Movie B", 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_broken_by_catalog_position() {
        let index = CatalogIndex::new(
            vec![
                entry("Query", 1),
                entry("First Twin", 2),
                entry("Second Twin", 3),
            ],
            vec![
                vec![1.0, 0.5, 0.5],
                vec![0.5, 1.0, 0.1],
                vec![0.5, 0.1, 1.0],
            ],
        )
        .unwrap();

        let neighbors = index.neighbors("Query", 2).unwrap();
        assert_eq!(neighbors[0].0.title, "First Twin");
        assert_eq!(neighbors[1].0.title, "Second Twin");
    }

    #[test]
    fn test_k_larger_than_catalog_returns_all_others() {
        let index = three_movie_index();
        let neighbors = index.neighbors("Movie C", 10).unwrap();
        assert_eq!(neighbors.len(), 2);
    }

    #[test]
    fn test_unknown_title_is_not_found_error() {
        let index = three_movie_index();
        let result = index.neighbors("Nonexistent Movie", 5);

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_zero_k_is_invalid_input() {
        let index = three_movie_index();
        let result = index.neighbors("Movie A", 0);

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_titles_keep_first_occurrence() {
        let index = CatalogIndex::new(
            vec![entry("Twin", 1), entry("Twin", 2), entry("Other", 3)],
            vec![
                vec![1.0, 0.2, 0.8],
                vec![0.2, 1.0, 0.4],
                vec![0.8, 0.4, 1.0],
            ],
        )
        .unwrap();

        // Lookup resolves to position 0, so its best neighbor is "Other".
        let neighbors = index.neighbors("Twin", 1).unwrap();
        assert_eq!(neighbors[0].0.title, "Other");
        assert_eq!(neighbors[0].1, 0.8);
    }

    #[test]
    fn test_row_count_mismatch_is_data_load_error() {
        let result = CatalogIndex::new(
            vec![entry("Movie A", 1), entry("Movie B", 2)],
            vec![vec![1.0, 0.5]],
        );
        assert!(matches!(result, Err(AppError::DataLoad(_))));
    }

    #[test]
    fn test_ragged_matrix_is_data_load_error() {
        let result = CatalogIndex::new(
            vec![entry("Movie A", 1), entry("Movie B", 2)],
            vec![vec![1.0, 0.5], vec![0.5]],
        );
        assert!(matches!(result, Err(AppError::DataLoad(_))));
    }

    #[test]
    fn test_titles_preserve_catalog_order() {
        let index = three_movie_index();
        assert_eq!(index.titles(), vec!["Movie A", "Movie B", "Movie C"]);
    }
}
