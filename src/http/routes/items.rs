use axum::{extract::{Path, State}, routing::{get, post}, Json, Router};

use crate::{
    application::item_service::ItemService,
    domain::item::{CreateItem, Item, UpdateItem},
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<S: ItemService> { pub service: S }

pub fn router<S: ItemService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/items", post(create_item::<S>).get(list_items::<S>))
        .route("/items/:id", get(get_item::<S>).put(update_item::<S>))
        .with_state(state)
}

async fn list_items<S: ItemService>(State(state): State<AppState<S>>) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.service.list().await.map_err(ApiError::internal)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn create_item<S: ItemService>(State(state): State<AppState<S>>, Json(payload): Json<CreateItem>) -> Result<Json<Item>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::bad_request("text must not be empty"));
    }
    let item = state.service.create(payload).await.map_err(ApiError::internal)?;
    tracing::info!(id = item.id, "created item");
    Ok(Json(item))
}

async fn get_item<S: ItemService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let item = state.service.get(id).await.map_err(ApiError::internal)?;
    item.map(Json).ok_or_else(ApiError::not_found)
}

async fn update_item<S: ItemService>(State(state): State<AppState<S>>, Path(id): Path<String>, Json(payload): Json<UpdateItem>) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let updated = state.service.update(id, payload).await.map_err(ApiError::internal)?;
    updated.map(Json).ok_or_else(ApiError::not_found)
}

fn parse_id(s: &str) -> Result<i32, ApiError> {
    s.parse().map_err(|_| ApiError::bad_request("invalid id"))
}
