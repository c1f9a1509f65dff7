//! `/api/recipes` endpoints. Reads expand each recipe's ingredients.

use crate::{ApiError, AppState};
use api_shared::MessageRes;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use catalog_core::{Document, PopulatedRecipe, Recipe};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes with ingredients expanded", body = [PopulatedRecipe]),
        (status = 500, description = "Storage fault", body = MessageRes)
    )
)]
/// List every recipe, replacing ingredient identifiers with the ingredient records.
#[axum::debug_handler]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopulatedRecipe>>, ApiError> {
    let recipes = state.catalog.recipes.list().await.map_err(ApiError::server)?;
    Ok(Json(recipes))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = Recipe,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Body rejected", body = MessageRes)
    )
)]
/// Create a recipe.
///
/// Unknown fields are dropped and `_id`, `createdAt` and `updatedAt` are assigned by the
/// server.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not a JSON object or a field has the wrong type.
#[axum::debug_handler]
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let Json(input) = payload?;
    let recipe = state
        .catalog
        .recipes
        .create(input)
        .await
        .map_err(ApiError::client)?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe with ingredients expanded", body = PopulatedRecipe),
        (status = 404, description = "Recipe not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedRecipe>, ApiError> {
    let recipe = state
        .catalog
        .recipes
        .get(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(recipe))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe identifier")),
    request_body = Recipe,
    responses(
        (status = 200, description = "Recipe after the update", body = Recipe),
        (status = 404, description = "Recipe not found", body = MessageRes),
        (status = 400, description = "Body or identifier rejected", body = MessageRes)
    )
)]
/// Update the fields present in the body; all others keep their values.
#[axum::debug_handler]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Json(input) = payload?;
    let recipe = state
        .catalog
        .recipes
        .update(&id, input)
        .await
        .map_err(ApiError::client)?;
    Ok(Json(recipe))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageRes),
        (status = 404, description = "Recipe not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
/// Delete a recipe. Recipe-ingredient links that point at it are left in place.
#[axum::debug_handler]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state
        .catalog
        .recipes
        .delete(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(MessageRes::deleted(Recipe::ENTITY)))
}
