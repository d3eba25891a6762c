use crate::api_errors::AppError;
use crate::app_state::AppState;
use axum::{
    extract::{Form, State},
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router: the form page, the prediction endpoint and a health probe
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[axum::debug_handler]
async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    Ok(Html(state.render_page(&[], None)?))
}

// Fields arrive as ordered pairs so positional binding can see submission order.
#[axum::debug_handler]
async fn predict(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let outcome = state.submit(&fields);
    let text = state.outcome_text(&outcome);
    Ok(Html(state.render_page(&fields, Some(&text))?))
}

async fn healthz() -> &'static str {
    "ok"
}
