//! Catalog entities as stored in the document store and returned over the API.
//!
//! Every client-settable attribute is optional: the catalog enforces types, not presence.
//! Reference fields hold [`DocumentId`]s on disk; the `Populated*` variants carry the expanded
//! records returned by read operations.

use crate::constants::{INGREDIENTS_DIR_NAME, RECIPES_DIR_NAME, RECIPE_INGREDIENTS_DIR_NAME};
use crate::document::{id_list, lenient_number, lenient_string, string_list, Document};
use catalog_id::DocumentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A recipe with its ingredient references stored as identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id", default)]
    #[schema(value_type = String)]
    pub id: DocumentId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub meal_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "id_list")]
    #[schema(value_type = Vec<String>)]
    pub ingredients: Vec<DocumentId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub prep_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cook_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub servings: Option<f64>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Recipe {
    const ENTITY: &'static str = "Recipe";
    const COLLECTION: &'static str = RECIPES_DIR_NAME;
    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "type",
        "country",
        "image",
        "mealType",
        "description",
        "ingredients",
        "instructions",
        "prepTime",
        "cookTime",
        "totalTime",
        "servings",
        "tags",
        "rating",
    ];

    fn id(&self) -> DocumentId {
        self.id
    }

    fn on_create(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn on_update(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Recipe {
    /// Replaces the ingredient identifiers with the records they resolved to.
    pub fn populate(self, ingredients: Vec<Ingredient>) -> PopulatedRecipe {
        PopulatedRecipe {
            id: self.id,
            name: self.name,
            kind: self.kind,
            country: self.country,
            image: self.image,
            meal_type: self.meal_type,
            description: self.description,
            ingredients,
            instructions: self.instructions,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time,
            servings: self.servings,
            tags: self.tags,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A recipe as returned by list/get, with its ingredients expanded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRecipe {
    #[serde(rename = "_id")]
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub country: Option<String>,
    pub image: Option<String>,
    pub meal_type: Vec<String>,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Option<String>,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub total_time: Option<f64>,
    pub servings: Option<f64>,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    #[serde(rename = "_id", default)]
    #[schema(value_type = String)]
    pub id: DocumentId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl Document for Ingredient {
    const ENTITY: &'static str = "Ingredient";
    const COLLECTION: &'static str = INGREDIENTS_DIR_NAME;
    const WRITABLE_FIELDS: &'static [&'static str] = &["name", "category"];

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// Association between a recipe and an ingredient with a per-use quantity.
///
/// Independent of [`Recipe::ingredients`]; the two are never synchronised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(rename = "_id", default)]
    #[schema(value_type = String)]
    pub id: DocumentId,
    #[schema(value_type = Option<String>)]
    pub recipe_id: Option<DocumentId>,
    #[schema(value_type = Option<String>)]
    pub ingredient_id: Option<DocumentId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
}

impl Document for RecipeIngredient {
    const ENTITY: &'static str = "RecipeIngredient";
    const COLLECTION: &'static str = RECIPE_INGREDIENTS_DIR_NAME;
    const WRITABLE_FIELDS: &'static [&'static str] =
        &["recipeId", "ingredientId", "quantity", "unit"];

    fn id(&self) -> DocumentId {
        self.id
    }
}

impl RecipeIngredient {
    /// Replaces both references with the records they resolved to (`None` when dangling).
    pub fn populate(
        self,
        recipe: Option<Recipe>,
        ingredient: Option<Ingredient>,
    ) -> PopulatedRecipeIngredient {
        PopulatedRecipeIngredient {
            id: self.id,
            recipe_id: recipe,
            ingredient_id: ingredient,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

/// A recipe-ingredient as returned by list/get, with both references expanded.
///
/// The expanded recipe keeps its own ingredient list as identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRecipeIngredient {
    #[serde(rename = "_id")]
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub recipe_id: Option<Recipe>,
    pub ingredient_id: Option<Ingredient>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}
