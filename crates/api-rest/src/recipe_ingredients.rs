//! `/api/recipe-ingredients` endpoints. Reads expand both the recipe and the ingredient
//! reference; writes never check that either exists.

use crate::{ApiError, AppState};
use api_shared::MessageRes;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use catalog_core::{Document, PopulatedRecipeIngredient, RecipeIngredient};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipe-ingredients",
            get(list_recipe_ingredients).post(create_recipe_ingredient),
        )
        .route(
            "/api/recipe-ingredients/:id",
            get(get_recipe_ingredient)
                .put(update_recipe_ingredient)
                .delete(delete_recipe_ingredient),
        )
}

#[utoipa::path(
    get,
    path = "/api/recipe-ingredients",
    tag = "recipe-ingredients",
    responses(
        (status = 200, description = "All links with recipe and ingredient expanded", body = [PopulatedRecipeIngredient]),
        (status = 500, description = "Storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn list_recipe_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopulatedRecipeIngredient>>, ApiError> {
    let links = state
        .catalog
        .recipe_ingredients
        .list()
        .await
        .map_err(ApiError::server)?;
    Ok(Json(links))
}

#[utoipa::path(
    post,
    path = "/api/recipe-ingredients",
    tag = "recipe-ingredients",
    request_body = RecipeIngredient,
    responses(
        (status = 201, description = "Link created", body = RecipeIngredient),
        (status = 400, description = "Body rejected", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn create_recipe_ingredient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeIngredient>), ApiError> {
    let Json(input) = payload?;
    let link = state
        .catalog
        .recipe_ingredients
        .create(input)
        .await
        .map_err(ApiError::client)?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[utoipa::path(
    get,
    path = "/api/recipe-ingredients/{id}",
    tag = "recipe-ingredients",
    params(("id" = String, Path, description = "RecipeIngredient identifier")),
    responses(
        (status = 200, description = "Link with recipe and ingredient expanded", body = PopulatedRecipeIngredient),
        (status = 404, description = "RecipeIngredient not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_recipe_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedRecipeIngredient>, ApiError> {
    let link = state
        .catalog
        .recipe_ingredients
        .get(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(link))
}

#[utoipa::path(
    put,
    path = "/api/recipe-ingredients/{id}",
    tag = "recipe-ingredients",
    params(("id" = String, Path, description = "RecipeIngredient identifier")),
    request_body = RecipeIngredient,
    responses(
        (status = 200, description = "Link after the update", body = RecipeIngredient),
        (status = 404, description = "RecipeIngredient not found", body = MessageRes),
        (status = 400, description = "Body or identifier rejected", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn update_recipe_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeIngredient>, ApiError> {
    let Json(input) = payload?;
    let link = state
        .catalog
        .recipe_ingredients
        .update(&id, input)
        .await
        .map_err(ApiError::client)?;
    Ok(Json(link))
}

#[utoipa::path(
    delete,
    path = "/api/recipe-ingredients/{id}",
    tag = "recipe-ingredients",
    params(("id" = String, Path, description = "RecipeIngredient identifier")),
    responses(
        (status = 200, description = "Link deleted", body = MessageRes),
        (status = 404, description = "RecipeIngredient not found", body = MessageRes),
        (status = 500, description = "Malformed identifier or storage fault", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_recipe_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state
        .catalog
        .recipe_ingredients
        .delete(&id)
        .await
        .map_err(ApiError::server)?;
    Ok(Json(MessageRes::deleted(RecipeIngredient::ENTITY)))
}
