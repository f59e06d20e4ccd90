use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::dto::{NearbyQuery, NewRoute, RouteChanges};
use crate::models::Route;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/routes", post(create_route))
        .route("/routes/nearby", get(get_nearby_routes))
        .route(
            "/routes/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<NewRoute>,
) -> AppResult<(StatusCode, Json<Route>)> {
    request.validate()?;
    let route = state.routes.create(&state.request_context(), &request).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Route>> {
    state
        .routes
        .get_by_id(&state.request_context(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Route", id))
}

async fn get_nearby_routes(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<Route>>> {
    query.validate()?;
    let distance = query
        .distance
        .unwrap_or(state.config.default_nearby_distance_m);

    let routes = state
        .routes
        .get_nearby(&state.request_context(), query.lat, query.lng, distance)
        .await?;
    Ok(Json(routes))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RouteChanges>,
) -> AppResult<Json<Route>> {
    request.validate()?;
    state
        .routes
        .update(&state.request_context(), id, &request)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Route", id))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let deleted = state.routes.delete(&state.request_context(), id).await?;
    Ok(Json(json!({
        "message": "Route deleted successfully",
        "deleted": deleted
    })))
}
