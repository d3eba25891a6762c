//! Classifier artifacts and the `Predictor` capability the web layer calls
//!
//! An artifact is a JSON document tagged by `"algorithm"`. It is read once at
//! start-up into a [`ModelHandle`], which is immutable afterwards and shared
//! by every request.

pub mod knn;
pub mod linear;

use crate::errors::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use knn::KnnClassifier;
pub use linear::LinearClassifier;

/// Feature names assumed for a four-column artifact that does not name its
/// columns.
pub const IRIS_FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Anything that turns a single feature vector into a label.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> ModelResult<String>;

    fn n_features(&self) -> usize;

    fn feature_names(&self) -> &[String];

    fn classes(&self) -> Vec<String>;

    fn algorithm(&self) -> &'static str;
}

impl Predictor for LinearClassifier {
    fn predict(&self, features: &[f64]) -> ModelResult<String> {
        LinearClassifier::predict(self, features)
    }

    fn n_features(&self) -> usize {
        LinearClassifier::n_features(self)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn algorithm(&self) -> &'static str {
        "linear"
    }
}

impl Predictor for KnnClassifier {
    fn predict(&self, features: &[f64]) -> ModelResult<String> {
        KnnClassifier::predict(self, features)
    }

    fn n_features(&self) -> usize {
        KnnClassifier::n_features(self)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> Vec<String> {
        KnnClassifier::classes(self)
    }

    fn algorithm(&self) -> &'static str {
        "knn"
    }
}

/// On-disk artifact format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearClassifier),
    Knn(KnnClassifier),
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::parse("model artifact", e))
    }

    /// Validate shapes and hand back the predictor.
    pub fn into_predictor(self) -> ModelResult<Box<dyn Predictor>> {
        match self {
            ModelArtifact::Linear(mut model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            ModelArtifact::Knn(mut model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Fails on the first NaN or infinity, naming it `"{context} {index}"`.
pub(crate) fn ensure_finite(values: &[f64], context: &str) -> ModelResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(ModelError::non_finite(format!("{context} {idx}"))),
        None => Ok(()),
    }
}

/// Use the artifact's names when given, otherwise the iris names for a
/// four-column model and `feature_N` for anything else.
pub(crate) fn resolve_feature_names(names: &[String], width: usize) -> ModelResult<Vec<String>> {
    if !names.is_empty() {
        if names.len() != width {
            return Err(ModelError::shape(format!(
                "artifact names {} features but has {width} columns",
                names.len()
            )));
        }
        if let Some(blank) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(ModelError::shape(format!("feature name {blank} is empty")));
        }
        return Ok(names.to_vec());
    }

    if width == IRIS_FEATURES.len() {
        Ok(IRIS_FEATURES.iter().map(|n| n.to_string()).collect())
    } else {
        Ok((0..width).map(|i| format!("feature_{i}")).collect())
    }
}

/// Process-wide, read-only model loaded once at start-up.
pub struct ModelHandle {
    predictor: Box<dyn Predictor>,
    fingerprint: String,
    source: Option<PathBuf>,
}

impl ModelHandle {
    /// Read and validate the artifact at `path`. Any failure here is meant to
    /// stop the process before it serves anything.
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| ModelError::io(format!("read {}", path.display()), e))?;

        let mut handle = Self::from_bytes(&bytes)?;
        handle.source = Some(path.to_path_buf());

        info!(
            "Loaded {} model from {} ({} features, fingerprint {})",
            handle.algorithm(),
            path.display(),
            handle.n_features(),
            handle.short_fingerprint()
        );
        Ok(handle)
    }

    pub fn from_bytes(bytes: &[u8]) -> ModelResult<Self> {
        let predictor = ModelArtifact::from_slice(bytes)?.into_predictor()?;
        let digest = Sha256::digest(bytes);

        Ok(Self {
            predictor,
            fingerprint: format!("{digest:x}"),
            source: None,
        })
    }

    /// Wrap an already-built predictor; the fingerprint is derived from its
    /// algorithm and schema since there are no artifact bytes.
    pub fn from_predictor(predictor: impl Predictor + 'static) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(predictor.algorithm().as_bytes());
        for name in predictor.feature_names() {
            hasher.update(name.as_bytes());
        }
        for class in predictor.classes() {
            hasher.update(class.as_bytes());
        }

        Self {
            predictor: Box::new(predictor),
            fingerprint: format!("{:x}", hasher.finalize()),
            source: None,
        }
    }

    /// Predict one sample.
    pub fn predict(&self, features: &[f64]) -> ModelResult<String> {
        let label = self.predictor.predict(features)?;
        debug!("Model {} predicted {label:?}", self.short_fingerprint());
        Ok(label)
    }

    pub fn n_features(&self) -> usize {
        self.predictor.n_features()
    }

    pub fn feature_names(&self) -> &[String] {
        self.predictor.feature_names()
    }

    pub fn classes(&self) -> Vec<String> {
        self.predictor.classes()
    }

    pub fn algorithm(&self) -> &'static str {
        self.predictor.algorithm()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12.min(self.fingerprint.len())]
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("algorithm", &self.algorithm())
            .field("n_features", &self.n_features())
            .field("fingerprint", &self.fingerprint)
            .field("source", &self.source)
            .finish()
    }
}
