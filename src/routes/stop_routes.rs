use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::dto::{NewStop, StopChanges};
use crate::models::RecommendedStop;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub fn create_stop_router() -> Router<AppState> {
    Router::new()
        .route("/stops", post(create_stop))
        .route(
            "/stops/:id",
            get(get_stop).put(update_stop).delete(delete_stop),
        )
        .route("/routes/:id/stops", get(list_stops_by_route))
}

async fn create_stop(
    State(state): State<AppState>,
    Json(request): Json<NewStop>,
) -> AppResult<(StatusCode, Json<RecommendedStop>)> {
    request.validate()?;
    let stop = state.stops.create(&state.request_context(), &request).await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

async fn get_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecommendedStop>> {
    state
        .stops
        .get_by_id(&state.request_context(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Stop", id))
}

async fn list_stops_by_route(
    State(state): State<AppState>,
    Path(route_id): Path<i64>,
) -> AppResult<Json<Vec<RecommendedStop>>> {
    let stops = state
        .stops
        .get_by_route_id(&state.request_context(), route_id)
        .await?;
    Ok(Json(stops))
}

async fn update_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StopChanges>,
) -> AppResult<Json<RecommendedStop>> {
    request.validate()?;
    state
        .stops
        .update(&state.request_context(), id, &request)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Stop", id))
}

async fn delete_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let deleted = state.stops.delete(&state.request_context(), id).await?;
    Ok(Json(json!({
        "message": "Stop deleted successfully",
        "deleted": deleted
    })))
}
