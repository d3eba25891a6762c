//! Turning submitted form fields into a feature vector

use crate::errors::FeatureError;
use serde::{Deserialize, Serialize};

/// How submitted form fields map onto the model's feature positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBinding {
    /// Look each feature up by its name; extra fields are ignored.
    #[default]
    ByName,
    /// Take values in submission order and discard the names.
    Positional,
}

impl std::str::FromStr for FieldBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "by_name" | "name" => Ok(FieldBinding::ByName),
            "positional" | "position" => Ok(FieldBinding::Positional),
            other => Err(format!("unknown field binding: {other}")),
        }
    }
}

/// Ordered numeric input for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Parse form fields. Every value must parse as a float; the first one
    /// that does not aborts the whole vector.
    pub fn from_form(
        fields: &[(String, String)],
        feature_names: &[String],
        binding: FieldBinding,
    ) -> Result<Self, FeatureError> {
        let values = match binding {
            FieldBinding::Positional => fields
                .iter()
                .map(|(name, raw)| parse_value(name, raw))
                .collect::<Result<Vec<_>, _>>()?,
            FieldBinding::ByName => feature_names
                .iter()
                .map(|feature| {
                    let raw = fields
                        .iter()
                        .find(|(name, _)| name == feature)
                        .map(|(_, raw)| raw)
                        .ok_or_else(|| FeatureError::MissingField {
                            field: feature.clone(),
                        })?;
                    parse_value(feature, raw)
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Surrounding whitespace is tolerated; `nan` and `inf` parse like any other
/// float and are left for the model to refuse.
pub fn parse_value(field: &str, raw: &str) -> Result<f64, FeatureError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FeatureError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}
