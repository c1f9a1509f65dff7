//! Recipe collection.
//!
//! Reads expand `ingredients` one level: each identifier is replaced by the stored
//! [`Ingredient`]. Identifiers with no matching ingredient are dropped from the expanded list;
//! the stored recipe keeps them.

use super::shared;
use crate::error::CatalogResult;
use crate::models::{Ingredient, PopulatedRecipe, Recipe};
use crate::store::DocumentStore;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct RecipeService {
    store: DocumentStore,
}

impl RecipeService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> CatalogResult<Vec<PopulatedRecipe>> {
        let recipes = self.store.find_all::<Recipe>().await?;

        let mut populated = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            populated.push(self.populate(recipe).await?);
        }
        Ok(populated)
    }

    /// Creates a recipe; `createdAt` and `updatedAt` are both set to now.
    pub async fn create(&self, input: Value) -> CatalogResult<Recipe> {
        shared::create(&self.store, input).await
    }

    pub async fn get(&self, id: &str) -> CatalogResult<PopulatedRecipe> {
        let recipe: Recipe = shared::get(&self.store, id).await?;
        self.populate(recipe).await
    }

    /// Applies a partial update and refreshes `updatedAt`. The result is not expanded.
    pub async fn update(&self, id: &str, input: Value) -> CatalogResult<Recipe> {
        shared::update(&self.store, id, input).await
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        shared::delete::<Recipe>(&self.store, id).await
    }

    async fn populate(&self, recipe: Recipe) -> CatalogResult<PopulatedRecipe> {
        let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
        for id in &recipe.ingredients {
            let resolved = shared::resolve::<Ingredient>(&self.store, Some(*id)).await?;
            if let Some(ingredient) = resolved {
                ingredients.push(ingredient);
            }
        }
        Ok(recipe.populate(ingredients))
    }
}
