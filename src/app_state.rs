use crate::config::AppConfig;
use crate::errors::FeatureError;
use crate::features::{FeatureVector, FieldBinding};
use crate::model::ModelHandle;
use crate::render::{FieldView, PageRenderer};
use tracing::{debug, warn};

pub const INVALID_INPUT_TEXT: &str = "Please input valid numbers.";
pub const PREDICTION_FAILED_TEXT: &str = "Unable to make a prediction for the given input.";

/// What a submission turned into
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Predicted(String),
    InvalidInput(FeatureError),
    ModelFailed(String),
}

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub model: ModelHandle,
    pub renderer: PageRenderer,
    pub field_binding: FieldBinding,
    pub debug: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, model: ModelHandle) -> Result<Self, minijinja::Error> {
        Ok(Self {
            model,
            renderer: PageRenderer::new()?,
            field_binding: config.field_binding,
            debug: config.debug,
        })
    }

    /// Parse the submission and, only if every value is a number, ask the
    /// model for a label.
    pub fn submit(&self, fields: &[(String, String)]) -> Outcome {
        let features =
            match FeatureVector::from_form(fields, self.model.feature_names(), self.field_binding) {
                Ok(v) => v,
                Err(e) => {
                    debug!("Rejected submission with {} fields: {e}", fields.len());
                    return Outcome::InvalidInput(e);
                }
            };

        match self.model.predict(features.as_slice()) {
            Ok(label) => Outcome::Predicted(label),
            Err(e) => {
                warn!("Prediction failed for {} features: {e}", features.len());
                Outcome::ModelFailed(e.to_string())
            }
        }
    }

    pub fn outcome_text(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Predicted(label) => format!("Predicted species: {label}"),
            Outcome::InvalidInput(_) => INVALID_INPUT_TEXT.to_string(),
            Outcome::ModelFailed(detail) if self.debug => {
                format!("{PREDICTION_FAILED_TEXT} ({detail})")
            }
            Outcome::ModelFailed(_) => PREDICTION_FAILED_TEXT.to_string(),
        }
    }

    /// Inputs for the form, pre-filled from a previous submission when given.
    pub fn field_views(&self, submitted: &[(String, String)]) -> Vec<FieldView> {
        self.model
            .feature_names()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = match self.field_binding {
                    FieldBinding::ByName => submitted
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v.as_str()),
                    FieldBinding::Positional => submitted.get(idx).map(|(_, v)| v.as_str()),
                };
                FieldView::new(name, value.unwrap_or_default())
            })
            .collect()
    }

    pub fn render_page(
        &self,
        submitted: &[(String, String)],
        prediction_text: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.renderer.render(
            &self.field_views(submitted),
            prediction_text,
            self.model.algorithm(),
            self.model.short_fingerprint(),
        )
    }
}
