use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use crate::{
    services::dashboard::{DashboardRequest, DashboardResponse},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", post(render_dashboard))
}

async fn render_dashboard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DashboardRequest>,
) -> Json<DashboardResponse> {
    let start = std::time::Instant::now();
    let response = state.dashboard.render(&request).await;
    tracing::info!(
        "Dashboard rendered in {:?}: {} rows, {} messages",
        start.elapsed(),
        response.row_count,
        response.messages.len()
    );
    Json(response)
}
