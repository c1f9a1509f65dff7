//! Recipe-ingredient collection.
//!
//! Reads expand both `recipeId` and `ingredientId`; a reference that is unset or points at a
//! missing record expands to `None`. Creating or updating a link never checks that the
//! referenced records exist.

use super::shared;
use crate::error::CatalogResult;
use crate::models::{Ingredient, PopulatedRecipeIngredient, Recipe, RecipeIngredient};
use crate::store::DocumentStore;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct RecipeIngredientService {
    store: DocumentStore,
}

impl RecipeIngredientService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> CatalogResult<Vec<PopulatedRecipeIngredient>> {
        let links = self.store.find_all::<RecipeIngredient>().await?;

        let mut populated = Vec::with_capacity(links.len());
        for link in links {
            populated.push(self.populate(link).await?);
        }
        Ok(populated)
    }

    pub async fn create(&self, input: Value) -> CatalogResult<RecipeIngredient> {
        shared::create(&self.store, input).await
    }

    pub async fn get(&self, id: &str) -> CatalogResult<PopulatedRecipeIngredient> {
        let link: RecipeIngredient = shared::get(&self.store, id).await?;
        self.populate(link).await
    }

    pub async fn update(&self, id: &str, input: Value) -> CatalogResult<RecipeIngredient> {
        shared::update(&self.store, id, input).await
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        shared::delete::<RecipeIngredient>(&self.store, id).await
    }

    async fn populate(&self, link: RecipeIngredient) -> CatalogResult<PopulatedRecipeIngredient> {
        let recipe = shared::resolve::<Recipe>(&self.store, link.recipe_id).await?;
        let ingredient = shared::resolve::<Ingredient>(&self.store, link.ingredient_id).await?;
        Ok(link.populate(recipe, ingredient))
    }
}
