//! Exact nearest-neighbour search over an embedding matrix.

use std::cmp::Ordering;

use clap::ValueEnum;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use crate::error::{LinkError, Result};

/// Similarity metric used to rank vocabulary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Metric {
    /// Cosine similarity, higher is closer.
    #[default]
    Cosine,
    /// Squared Euclidean distance, lower is closer.
    L2,
}

impl Metric {
    /// Ordering that puts the better of two scores first.
    fn rank(self, a: f32, b: f32) -> Ordering {
        match self {
            Self::Cosine => b.total_cmp(&a),
            Self::L2 => a.total_cmp(&b),
        }
    }
}

/// A scored row of the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: usize,
    pub score: f32,
}

/// Brute-force index storing every row.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    metric: Metric,
    rows: Array2<f32>,
}

impl FlatIndex {
    pub fn build(metric: Metric, matrix: &Array2<f32>) -> Self {
        debug!(?metric, rows = matrix.nrows(), "building search index");
        let mut rows = matrix.to_owned();
        if metric == Metric::Cosine {
            for mut row in rows.axis_iter_mut(Axis(0)) {
                let norm = row.dot(&row).sqrt();
                if norm > 0.0 {
                    row.mapv_inplace(|v| v / norm);
                }
            }
        }
        Self { metric, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    pub fn dims(&self) -> usize {
        self.rows.ncols()
    }

    /// Return up to `k` best rows for `query`, best first.
    ///
    /// Equal scores are ordered by ascending row id.
    pub fn search(&self, query: ArrayView1<'_, f32>, k: usize) -> Result<Vec<Hit>> {
        if query.len() != self.dims() {
            return Err(LinkError::Dimension {
                expected: self.dims(),
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.score_all(query);
        let mut hits: Vec<Hit> = scores
            .iter()
            .enumerate()
            .map(|(id, &score)| Hit { id, score })
            .collect();

        let metric = self.metric;
        let order = |a: &Hit, b: &Hit| metric.rank(a.score, b.score).then(a.id.cmp(&b.id));
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, order);
            hits.truncate(k);
        }
        hits.sort_unstable_by(order);
        Ok(hits)
    }

    fn score_all(&self, query: ArrayView1<'_, f32>) -> Array1<f32> {
        match self.metric {
            Metric::Cosine => {
                let norm = query.dot(&query).sqrt();
                if norm > 0.0 {
                    self.rows.dot(&query.mapv(|v| v / norm))
                } else {
                    Array1::zeros(self.len())
                }
            }
            Metric::L2 => self
                .rows
                .axis_iter(Axis(0))
                .map(|row| {
                    row.iter()
                        .zip(query.iter())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum::<f32>()
                })
                .collect(),
        }
    }
}
