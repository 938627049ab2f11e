use std::sync::Arc;

use axum::{
    routing::post,
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use log::{debug, info};

use crate::api::models::ExportRequest;
use crate::api::response;
use crate::export;
use crate::models::{ScrapeOutcome, ScrapeRequest};
use crate::progress::ProgressFn;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/scrape", post(scrape_handler))
        .route("/api/export", post(export_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn scrape_handler(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> impl IntoResponse {
    info!("Processing scrape request for URL: {}", req.url);

    let on_progress: ProgressFn = Arc::new(|p| debug!("progress {:.0}%", p));
    let outcome = state.client.scrape_url(&req.url, Some(on_progress)).await;

    match outcome {
        ScrapeOutcome::Failure { error } => response::error(StatusCode::BAD_GATEWAY, error),
        success => {
            info!("Scrape completed with {} records", success.records().len());
            response::success(success)
        }
    }
}

async fn export_handler(Json(req): Json<ExportRequest>) -> Response {
    if req.records.is_empty() {
        return response::error::<()>(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Nothing to export: the record list is empty".to_string(),
        )
        .into_response();
    }

    match export::build_workbook(&req.records) {
        Ok(bytes) => {
            let file_name = export::export_file_name();
            info!("Serving spreadsheet {} ({} records)", file_name, req.records.len());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, export::XLSX_MIME.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}
