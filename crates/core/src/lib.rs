//! # Catalog Core
//!
//! Core data operations for the recipe catalog.
//!
//! This crate contains the entities, the file-backed document store and the per-collection
//! repository services:
//! - Recipe, Ingredient and RecipeIngredient records with optional, typed fields
//! - Sharded JSON document storage under the configured data directory
//! - One-level reference expansion on read
//!
//! **No API concerns**: HTTP routing, status codes and CORS belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use catalog_id::{DocumentId, IdError};
pub use config::CoreConfig;
pub use document::Document;
pub use error::{CatalogError, CatalogResult};
pub use models::{Ingredient, PopulatedRecipe, PopulatedRecipeIngredient, Recipe, RecipeIngredient};
pub use repositories::ingredients::IngredientService;
pub use repositories::recipe_ingredients::RecipeIngredientService;
pub use repositories::recipes::RecipeService;
pub use store::DocumentStore;

/// The three repository services, sharing one store handle.
#[derive(Clone, Debug)]
pub struct CatalogService {
    pub recipes: RecipeService,
    pub ingredients: IngredientService,
    pub recipe_ingredients: RecipeIngredientService,
}

impl CatalogService {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            recipes: RecipeService::new(store.clone()),
            ingredients: IngredientService::new(store.clone()),
            recipe_ingredients: RecipeIngredientService::new(store),
        }
    }
}
