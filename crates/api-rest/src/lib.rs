//! # API REST
//!
//! REST API implementation for the recipe catalog.
//!
//! Handles:
//! - HTTP endpoints with axum, one module per collection
//! - Mapping catalog errors to status codes and `{"message": ...}` bodies
//! - OpenAPI documentation served at `/api-docs/openapi.json`
//! - CORS (any origin)
//!
//! Uses `catalog-core` for all data operations and `api-shared` for common response types.

#![warn(rust_2018_idioms)]

mod error;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;

pub use error::ApiError;

use api_shared::{HealthRes, HealthService, MessageRes};
use axum::{extract::State, response::Json, routing::get, Router};
use catalog_core::{
    CatalogService, Ingredient, PopulatedRecipe, PopulatedRecipeIngredient, Recipe,
    RecipeIngredient,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// Application state shared across REST API handlers.
///
/// Holds the catalog services, which share a single document-store handle opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        ingredients::list_ingredients,
        ingredients::create_ingredient,
        ingredients::get_ingredient,
        ingredients::update_ingredient,
        ingredients::delete_ingredient,
        recipe_ingredients::list_recipe_ingredients,
        recipe_ingredients::create_recipe_ingredient,
        recipe_ingredients::get_recipe_ingredient,
        recipe_ingredients::update_recipe_ingredient,
        recipe_ingredients::delete_recipe_ingredient,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        Recipe,
        PopulatedRecipe,
        Ingredient,
        RecipeIngredient,
        PopulatedRecipeIngredient,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router with CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(recipes::router())
        .merge(ingredients::router())
        .merge(recipe_ingredients::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
