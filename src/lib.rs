//! Library root for the `irisweb` crate
//! Serves an HTML form, validates the submitted measurements and renders the
//! species predicted by a classifier loaded once at start-up.

// Core error handling
pub mod api_errors;
pub mod errors;

// Model artifacts and inference
pub mod model;

// Form handling & rendering
pub mod features;
pub mod render;

// Configuration & CLI
pub mod cli;
pub mod config;
pub mod logging;

// Web server interface
pub mod app_state;
pub mod web;


pub use app_state::{AppState, Outcome};
pub use model::{ModelHandle, Predictor};
