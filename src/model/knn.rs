//! K-nearest-neighbours classifier
//!
//! Inference only: the artifact carries the labelled samples and `k`.
//! Brute-force Euclidean search is plenty for the handful of samples an
//! iris-style artifact holds.

use crate::errors::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnClassifier {
    pub k: usize,
    pub samples: Vec<Vec<f64>>,
    pub labels: Vec<String>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl KnnClassifier {
    pub fn new(k: usize, samples: Vec<Vec<f64>>, labels: Vec<String>) -> ModelResult<Self> {
        let mut model = Self {
            k,
            samples,
            labels,
            feature_names: Vec::new(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&mut self) -> ModelResult<()> {
        if self.k == 0 {
            return Err(ModelError::shape("knn model needs k >= 1"));
        }
        if self.samples.is_empty() {
            return Err(ModelError::shape("knn model has no samples"));
        }
        if self.samples.len() != self.labels.len() {
            return Err(ModelError::shape(format!(
                "knn model has {} samples but {} labels",
                self.samples.len(),
                self.labels.len()
            )));
        }

        let width = self.samples[0].len();
        if width == 0 {
            return Err(ModelError::shape("knn model has no features"));
        }
        if let Some(row) = self.samples.iter().position(|s| s.len() != width) {
            return Err(ModelError::shape(format!(
                "sample {row} has {} values, expected {width}",
                self.samples[row].len()
            )));
        }

        self.feature_names = super::resolve_feature_names(&self.feature_names, width)?;
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.samples.first().map(Vec::len).unwrap_or(0)
    }

    /// Distinct labels in first-seen order
    pub fn classes(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for label in &self.labels {
            if !seen.contains(label) {
                seen.push(label.clone());
            }
        }
        seen
    }

    /// Majority vote among the `k` closest samples. A tied vote goes to the
    /// label whose nearest member is closest to the query.
    pub fn predict(&self, features: &[f64]) -> ModelResult<String> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ModelError::FeatureCount {
                expected,
                actual: features.len(),
            });
        }
        super::ensure_finite(features, "feature")?;

        let mut ranked: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(idx, sample)| (squared_distance(sample, features), idx))
            .collect();
        // Huge but finite inputs can still overflow the squared distance.
        if let Some((_, idx)) = ranked.iter().find(|(d, _)| !d.is_finite()) {
            return Err(ModelError::non_finite(format!("distance to sample {idx}")));
        }
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        // (label, votes) in order of the nearest member
        let mut votes: Vec<(&str, usize)> = Vec::new();
        for (_, idx) in ranked.iter().take(self.k.min(ranked.len())) {
            let label = self.labels[*idx].as_str();
            match votes.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => votes.push((label, 1)),
            }
        }

        if votes.is_empty() {
            return Err(ModelError::shape("knn model has no samples"));
        }

        let mut best = 0;
        for (idx, (_, count)) in votes.iter().enumerate().skip(1) {
            if *count > votes[best].1 {
                best = idx;
            }
        }

        Ok(votes[best].0.to_string())
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
