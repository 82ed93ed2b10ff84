//! Axum request handlers for the HTTP API.
//!
//! Generation handlers always answer 200; callers check `error` and for a
//! null or placeholder image. Status handlers propagate store faults.
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::extract::ApiJson;
use crate::api::models::{
    DesignResponse, FinalizeRequest, MotifRequest, MotifResponse, PreviewRequest, StatusCreate,
};
use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};
use crate::status::StatusRecord;
use crate::studio;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

pub async fn create_status(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<StatusCreate>,
) -> AppResult<Json<StatusRecord>> {
    let record = state.store.create(&input.client_name).await?;
    tracing::debug!(id = %record.id, client = %record.client_name, "Recorded status check");
    Ok(Json(record))
}

pub async fn list_status(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<StatusRecord>>> {
    state.store.list().await.map(Json)
}

pub async fn generate_motifs(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MotifRequest>,
) -> AppResult<Json<MotifResponse>> {
    if req.count > state.motif_max_count {
        return Err(AppError::InvalidInput(format!(
            "count must be at most {}, got {}",
            state.motif_max_count, req.count
        )));
    }
    let batch = studio::generate_motifs(
        state.provider.as_ref(),
        &req.prompt,
        req.count,
        &req.section,
        &req.keyword,
        &state.policy,
    )
    .await;
    Ok(Json(MotifResponse::new(&batch, req.section, req.keyword)))
}

pub async fn finalize_design(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FinalizeRequest>,
) -> Json<DesignResponse> {
    let rendering = studio::finalize(
        state.provider.as_ref(),
        &req.prompt,
        req.images.as_ref(),
        &state.policy,
    )
    .await;
    Json(DesignResponse::new(&rendering, req.saree_state))
}

pub async fn generate_saree_preview(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PreviewRequest>,
) -> Json<DesignResponse> {
    let rendering = studio::preview(
        state.provider.as_ref(),
        &req.prompt,
        req.images.as_ref(),
        &state.policy,
    )
    .await;
    Json(DesignResponse::new(&rendering, req.saree_state))
}
