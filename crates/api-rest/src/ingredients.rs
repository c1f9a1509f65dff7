//! `/api/ingredients` endpoints. Ingredients hold no references, so nothing is expanded.

use crate::{ApiError, AppState};
use api_shared::MessageRes;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use catalog_core::{Document, Ingredient};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ingredients", get(list_ingredients).post(create_ingredient))
        .route(
            "/api/ingredients/:id",
            get(get_ingredient)
                .put(update_ingredient)
                .delete(delete_ingredient),
        )
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    responses(
        (status = 200, description = "All ingredients", body = [Ingredient]),
        (status = 500, description = "Storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let ingredients = state
        .catalog
        .ingredients
        .list()
        .await
        .map_err(ApiError::server)?;
    Ok(Json(ingredients))
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = Ingredient,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Body rejected", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn create_ingredient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Ingredient>), ApiError> {
    let Json(input) = payload?;
    let ingredient = state
        .catalog
        .ingredients
        .create(input)
        .await
        .map_err(ApiError::client)?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = String, Path, description = "Ingredient identifier")),
    responses(
        (status = 200, description = "Ingredient", body = Ingredient),
        (status = 404, description = "Ingredient not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>, ApiError> {
    let ingredient = state
        .catalog
        .ingredients
        .get(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(ingredient))
}

#[utoipa::path(
    put,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = String, Path, description = "Ingredient identifier")),
    request_body = Ingredient,
    responses(
        (status = 200, description = "Ingredient after the update", body = Ingredient),
        (status = 404, description = "Ingredient not found", body = MessageRes),
        (status = 400, description = "Body or identifier rejected", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Ingredient>, ApiError> {
    let Json(input) = payload?;
    let ingredient = state
        .catalog
        .ingredients
        .update(&id, input)
        .await
        .map_err(ApiError::client)?;
    Ok(Json(ingredient))
}

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = String, Path, description = "Ingredient identifier")),
    responses(
        (status = 200, description = "Ingredient deleted", body = MessageRes),
        (status = 404, description = "Ingredient not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
/// Delete an ingredient. Recipes and links referencing it keep the dangling identifier.
#[axum::debug_handler]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state
        .catalog
        .ingredients
        .delete(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(MessageRes::deleted(Ingredient::ENTITY)))
}
