//! HTML page rendering
//!
//! A single template serves both routes; `prediction_text` is only set after
//! a submission.

use minijinja::{context, Environment};
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub value: String,
}

impl FieldView {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            label: humanize(name),
            value: value.into(),
        }
    }
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        fields: &[FieldView],
        prediction_text: Option<&str>,
        algorithm: &str,
        fingerprint: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(context! {
            fields => fields,
            prediction_text => prediction_text,
            algorithm => algorithm,
            fingerprint => fingerprint,
        })
    }
}

/// `petal_length` -> `Petal length`
pub fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
