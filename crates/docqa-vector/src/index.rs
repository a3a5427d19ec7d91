//! Flat (exhaustive) vector index.
//!
//! Every query is scored against every stored vector. Results are ordered by
//! descending similarity; entries with equal scores keep their insertion order.

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use tracing::trace;

/// A stored vector together with its payload.
#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    vector: Vec<f32>,
}

/// A single search result borrowed from the index.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a, T> {
    /// The payload stored alongside the vector.
    pub item: &'a T,
    /// Similarity score (higher is more similar).
    pub score: f32,
    /// Insertion position of the entry.
    pub position: usize,
}

/// In-memory index over `(payload, vector)` pairs.
#[derive(Debug, Clone)]
pub struct FlatIndex<T> {
    entries: Vec<Entry<T>>,
    dimensions: Option<usize>,
    metric: DistanceMetric,
}

impl<T> Default for FlatIndex<T> {
    fn default() -> Self {
        Self::new(DistanceMetric::default())
    }
}

impl<T> FlatIndex<T> {
    /// Create an empty index using the given metric. The dimensionality is
    /// fixed by the first inserted vector.
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            entries: Vec::new(),
            dimensions: None,
            metric,
        }
    }

    /// Build an index from `(payload, vector)` pairs in one pass.
    ///
    /// # Errors
    ///
    /// Fails on the first vector that is empty, contains non-finite values,
    /// or whose length differs from the first vector.
    pub fn build<I>(pairs: I, metric: DistanceMetric) -> Result<Self>
    where
        I: IntoIterator<Item = (T, Vec<f32>)>,
    {
        let mut index = Self::new(metric);
        for (item, vector) in pairs {
            index.insert(item, vector)?;
        }
        Ok(index)
    }

    /// Append a vector with its payload.
    pub fn insert(&mut self, item: T, vector: Vec<f32>) -> Result<()> {
        validate_vector(&vector)?;

        match self.dimensions {
            Some(expected) if expected != vector.len() => {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            Some(_) => {}
            None => self.dimensions = Some(vector.len()),
        }

        self.entries.push(Entry { item, vector });
        Ok(())
    }

    /// Return the `k` entries most similar to `query`, nearest first.
    ///
    /// Searching an empty index returns no hits. `k` larger than the index
    /// size returns every entry.
    pub fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_, T>>> {
        if k == 0 {
            return Err(Error::InvalidSearch("k must be > 0".to_string()));
        }

        let Some(dimensions) = self.dimensions else {
            return Ok(Vec::new());
        };

        validate_vector(query)?;
        if query.len() != dimensions {
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit<'_, T>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| SearchHit {
                item: &entry.item,
                score: self.metric.similarity(query, &entry.vector),
                position,
            })
            .collect();

        // sort_by is stable: ties stay in insertion order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        trace!(
            candidates = self.entries.len(),
            returned = hits.len(),
            metric = %self.metric,
            "Flat index search"
        );

        Ok(hits)
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of stored vectors, once known.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Metric used for ranking.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }
}

fn validate_vector(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::InvalidVector("vector is empty".to_string()));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidVector(
            "vector contains NaN or infinite values".to_string(),
        ));
    }
    Ok(())
}
