use tracing::warn;

use crate::errors::EngineError;

/// One nearest-neighbour result: catalog position and raw inner-product similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub similarity: f32,
}

/// Nearest-neighbour search over the catalog embeddings.
pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    /// At most `k` hits, highest similarity first.
    fn search(&self, query: &[f32], k: usize) -> Vec<Hit>;
}

/// Exhaustive inner-product index over row-major contiguous vectors.
#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self, EngineError> {
        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(EngineError::ArtifactUnavailable(
                "cannot build an index without vectors".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * dimension);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(EngineError::ArtifactUnavailable(format!(
                    "vector {i} has {} values, expected {dimension}",
                    row.len()
                )));
            }
            data.extend(row);
        }

        Ok(Self { dimension, data })
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorIndex for FlatIpIndex {
    fn name(&self) -> &'static str {
        "flat-inner-product"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<Hit> {
        if query.len() != self.dimension {
            warn!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                self.dimension
            );
            return Vec::new();
        }

        let mut hits: Vec<Hit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(index, row)| Hit {
                index,
                similarity: inner_product(query, row),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.index.cmp(&b.index))
        });
        hits.truncate(k);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatIpIndex {
        FlatIpIndex::new(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.6, 0.8],
            vec![1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_search_orders_by_similarity_then_position() {
        let hits = index().search(&[1.0, 0.0], 3);
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 3, 2]);
        assert_eq!(hits[0].similarity, 1.0);
    }

    #[test]
    fn test_k_larger_than_index() {
        let idx = index();
        assert_eq!(idx.search(&[0.0, 1.0], 100).len(), idx.len());
    }

    #[test]
    fn test_wrong_query_dimension_returns_nothing() {
        assert!(index().search(&[1.0, 0.0, 0.0], 5).is_empty());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(FlatIpIndex::new(vec![vec![1.0, 0.0], vec![1.0]]).is_err());
        assert!(FlatIpIndex::new(Vec::new()).is_err());
    }
}
