//! Ingredient collection. Ingredients hold no references, so nothing is expanded.

use super::shared;
use crate::error::CatalogResult;
use crate::models::Ingredient;
use crate::store::DocumentStore;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct IngredientService {
    store: DocumentStore,
}

impl IngredientService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Ingredient>> {
        self.store.find_all::<Ingredient>().await
    }

    pub async fn create(&self, input: Value) -> CatalogResult<Ingredient> {
        shared::create(&self.store, input).await
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Ingredient> {
        shared::get(&self.store, id).await
    }

    pub async fn update(&self, id: &str, input: Value) -> CatalogResult<Ingredient> {
        shared::update(&self.store, id, input).await
    }

    /// Deletes an ingredient. Recipes and recipe-ingredients that reference it keep the
    /// dangling identifier.
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        shared::delete::<Ingredient>(&self.store, id).await
    }
}
