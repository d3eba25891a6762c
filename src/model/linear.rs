use crate::errors::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Multinomial logistic classifier: one weight row and intercept per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<String>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl LinearClassifier {
    pub fn new(
        classes: Vec<String>,
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> ModelResult<Self> {
        let mut model = Self {
            classes,
            weights,
            intercepts,
            feature_names: Vec::new(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Check that classes, weight rows and intercepts line up, and fill in
    /// default feature names when the artifact has none.
    pub fn validate(&mut self) -> ModelResult<()> {
        if self.classes.is_empty() {
            return Err(ModelError::shape("linear model has no classes"));
        }
        if self.weights.len() != self.classes.len() {
            return Err(ModelError::shape(format!(
                "linear model has {} classes but {} weight rows",
                self.classes.len(),
                self.weights.len()
            )));
        }
        if self.intercepts.len() != self.classes.len() {
            return Err(ModelError::shape(format!(
                "linear model has {} classes but {} intercepts",
                self.classes.len(),
                self.intercepts.len()
            )));
        }

        let width = self.weights[0].len();
        if width == 0 {
            return Err(ModelError::shape("linear model has no features"));
        }
        if let Some(row) = self.weights.iter().position(|w| w.len() != width) {
            return Err(ModelError::shape(format!(
                "weight row {row} has {} columns, expected {width}",
                self.weights[row].len()
            )));
        }

        self.feature_names = super::resolve_feature_names(&self.feature_names, width)?;
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    /// Raw per-class scores: `intercept + sum(weight_i * feature_i)`
    pub fn scores(&self, features: &[f64]) -> ModelResult<Vec<f64>> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ModelError::FeatureCount {
                expected,
                actual: features.len(),
            });
        }
        super::ensure_finite(features, "feature")?;

        Ok(self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| bias + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }

    pub fn predict(&self, features: &[f64]) -> ModelResult<String> {
        let scores = self.scores(features)?;
        super::ensure_finite(&scores, "score for class")?;

        // Ties keep the lowest class index.
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = idx;
            }
        }

        Ok(self.classes[best].clone())
    }
}
