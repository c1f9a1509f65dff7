//! Document trait and input shaping shared by every collection.
//!
//! Request bodies arrive as loosely typed JSON. Before anything reaches the store, the body is
//! narrowed to the entity's writable fields and type-checked by deserialising it into the entity
//! struct. Unknown keys are dropped; server-owned keys (`_id`, timestamps) are never taken from
//! the client.

use crate::{CatalogError, CatalogResult};
use catalog_id::DocumentId;
use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record type stored in its own collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity name used in client-facing messages (`"Recipe not found"`).
    const ENTITY: &'static str;

    /// Collection directory name under the data directory.
    const COLLECTION: &'static str;

    /// JSON keys a client may set on create or update.
    const WRITABLE_FIELDS: &'static [&'static str];

    fn id(&self) -> DocumentId;

    /// Hook run once when a document is first created.
    fn on_create(&mut self, _now: DateTime<Utc>) {}

    /// Hook run after an update has been applied.
    fn on_update(&mut self, _now: DateTime<Utc>) {}
}

/// Builds a new document from a client-supplied body.
///
/// A fresh identifier is allocated through the entity's `_id` default.
///
/// # Errors
///
/// - [`CatalogError::InvalidInput`] if `input` is not a JSON object.
/// - [`CatalogError::InvalidDocument`] if a writable field has the wrong type.
pub fn new_document<T: Document>(input: Value, now: DateTime<Utc>) -> CatalogResult<T> {
    let fields = writable_fields::<T>(input)?;
    let mut document: T = from_fields::<T>(fields)?;
    document.on_create(now);
    Ok(document)
}

/// Applies a partial update to `current`, returning the updated document.
///
/// Writable keys present in `input` replace the stored values (`null` clears them); keys that
/// are absent keep their prior values.
///
/// # Errors
///
/// Same as [`new_document`], plus [`CatalogError::Serialization`] if `current` cannot be
/// converted to JSON.
pub fn apply_update<T: Document>(
    current: &T,
    input: Value,
    now: DateTime<Utc>,
) -> CatalogResult<T> {
    let fields = writable_fields::<T>(input)?;

    let mut merged = match serde_json::to_value(current).map_err(CatalogError::Serialization)? {
        Value::Object(map) => map,
        other => {
            return Err(CatalogError::InvalidInput(format!(
                "stored {} is not a JSON object: {}",
                T::ENTITY,
                other
            )))
        }
    };
    merged.extend(fields);

    let mut document: T = from_fields::<T>(merged)?;
    document.on_update(now);
    Ok(document)
}

fn writable_fields<T: Document>(input: Value) -> CatalogResult<Map<String, Value>> {
    let Value::Object(fields) = input else {
        return Err(CatalogError::InvalidInput(format!(
            "{} body must be a JSON object",
            T::ENTITY
        )));
    };

    Ok(fields
        .into_iter()
        .filter(|(key, _)| T::WRITABLE_FIELDS.contains(&key.as_str()))
        .collect())
}

fn from_fields<T: Document>(fields: Map<String, Value>) -> CatalogResult<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|source| {
        CatalogError::InvalidDocument {
            entity: T::ENTITY,
            source,
        }
    })
}

// Field casting. Request bodies often come from form-style clients that send every value as
// a string, or numbers where text is expected. Values that have an obvious representation of
// the declared type are converted; anything else is rejected.

/// `Option<f64>` field: accepts a number, a numeric string or a boolean. `null` and blank
/// strings are `None`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("number {} is out of range", n))),
        Value::Bool(b) => Ok(Some(if b { 1.0 } else { 0.0 })),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&s), &"a number")),
        other => Err(D::Error::invalid_type(unexpected(&other), &"a number")),
    }
}

/// `Option<String>` field: accepts a string, a number or a boolean.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    cast_string(Value::deserialize(deserializer)?)
}

/// `Vec<String>` field: `null` is empty, a lone scalar becomes a one-element list, and each
/// element is cast like [`lenient_string`]. `null` elements are dropped.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    list_items(Value::deserialize(deserializer)?)
        .into_iter()
        .filter_map(|item| cast_string(item).transpose())
        .collect()
}

/// `Vec<DocumentId>` field: same list shaping as [`string_list`], each element must be a
/// canonical identifier.
pub(crate) fn id_list<'de, D>(deserializer: D) -> Result<Vec<DocumentId>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut ids = Vec::new();
    for item in list_items(Value::deserialize(deserializer)?) {
        match item {
            Value::Null => {}
            Value::String(s) => ids.push(DocumentId::parse(&s).map_err(D::Error::custom)?),
            other => return Err(D::Error::invalid_type(unexpected(&other), &"an identifier")),
        }
    }
    Ok(ids)
}

fn cast_string<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::invalid_type(unexpected(&other), &"a string")),
    }
}

fn list_items(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        scalar => vec![scalar],
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe};
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_document_assigns_id_and_keeps_known_fields() {
        let ingredient: Ingredient = new_document(
            json!({"name": "Flour", "category": "Baking", "colour": "white"}),
            fixed_now(),
        )
        .expect("new_document should succeed");

        assert!(DocumentId::is_canonical(&ingredient.id.to_string()));
        assert_eq!(ingredient.name.as_deref(), Some("Flour"));
        assert_eq!(ingredient.category.as_deref(), Some("Baking"));

        let stored = serde_json::to_value(&ingredient).unwrap();
        assert!(stored.get("colour").is_none(), "unknown keys are dropped");
    }

    #[test]
    fn test_new_document_ignores_client_supplied_id_and_timestamps() {
        let client_id = "550e8400e29b41d4a716446655440000";
        let recipe: Recipe = new_document(
            json!({
                "_id": client_id,
                "name": "Soup",
                "createdAt": "1999-01-01T00:00:00Z",
                "updatedAt": "1999-01-01T00:00:00Z"
            }),
            fixed_now(),
        )
        .unwrap();

        assert_ne!(recipe.id.to_string(), client_id);
        assert_eq!(recipe.created_at, fixed_now());
        assert_eq!(recipe.updated_at, fixed_now());
    }

    #[test]
    fn test_new_document_rejects_non_object_body() {
        let err = new_document::<Ingredient>(json!(["Flour"]), fixed_now()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert_eq!(err.to_string(), "invalid input: Ingredient body must be a JSON object");
    }

    #[test]
    fn test_new_document_rejects_mistyped_field() {
        let err = new_document::<Recipe>(json!({"prepTime": "ten minutes"}), fixed_now())
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::InvalidDocument {
                entity: "Recipe",
                ..
            }
        ));
        assert!(err.to_string().starts_with("Recipe validation failed"));
    }

    #[test]
    fn test_new_document_casts_numeric_strings() {
        let recipe: Recipe = new_document(
            json!({"prepTime": "15", "servings": " 4 ", "rating": "4.5", "cookTime": ""}),
            fixed_now(),
        )
        .expect("castable values should be accepted");

        assert_eq!(recipe.prep_time, Some(15.0));
        assert_eq!(recipe.servings, Some(4.0));
        assert_eq!(recipe.rating, Some(4.5));
        assert_eq!(recipe.cook_time, None);
    }

    #[test]
    fn test_new_document_rejects_non_numeric_string_for_number() {
        let err = new_document::<Recipe>(json!({"prepTime": "an hour"}), fixed_now())
            .unwrap_err();
        assert!(err.to_string().contains("an hour"));

        let err = new_document::<Recipe>(json!({"rating": [5]}), fixed_now()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDocument { .. }));
    }

    #[test]
    fn test_new_document_casts_scalars_to_strings() {
        let ingredient: Ingredient =
            new_document(json!({"name": 42, "category": true}), fixed_now()).unwrap();
        assert_eq!(ingredient.name.as_deref(), Some("42"));
        assert_eq!(ingredient.category.as_deref(), Some("true"));

        let err = new_document::<Ingredient>(json!({"name": {"en": "Salt"}}), fixed_now())
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDocument { .. }));
    }

    #[test]
    fn test_new_document_wraps_single_value_in_list() {
        let egg = DocumentId::new();
        let recipe: Recipe = new_document(
            json!({"tags": "quick", "mealType": ["lunch", 2, null], "ingredients": egg.to_string()}),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(recipe.tags, vec!["quick"]);
        assert_eq!(recipe.meal_type, vec!["lunch", "2"]);
        assert_eq!(recipe.ingredients, vec![egg]);
    }

    #[test]
    fn test_new_document_rejects_malformed_reference() {
        let err = new_document::<Recipe>(json!({"ingredients": ["not-an-id"]}), fixed_now())
            .unwrap_err();
        assert!(err.to_string().contains("invalid identifier"));
    }

    #[test]
    fn test_apply_update_changes_only_present_fields() {
        let original: Ingredient =
            new_document(json!({"name": "Flour", "category": "Baking"}), fixed_now()).unwrap();

        let updated = apply_update(&original, json!({"category": "Pantry"}), fixed_now()).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name.as_deref(), Some("Flour"));
        assert_eq!(updated.category.as_deref(), Some("Pantry"));
    }

    #[test]
    fn test_apply_update_null_clears_field() {
        let original: Recipe = new_document(
            json!({"name": "Stew", "tags": ["winter"], "rating": 4.5}),
            fixed_now(),
        )
        .unwrap();

        let updated =
            apply_update(&original, json!({"tags": null, "rating": null}), fixed_now()).unwrap();

        assert!(updated.tags.is_empty());
        assert_eq!(updated.rating, None);
        assert_eq!(updated.name.as_deref(), Some("Stew"));
    }

    #[test]
    fn test_apply_update_cannot_change_id() {
        let original: Ingredient = new_document(json!({"name": "Salt"}), fixed_now()).unwrap();
        let other_id = DocumentId::new().to_string();

        let updated = apply_update(&original, json!({"_id": other_id}), fixed_now()).unwrap();
        assert_eq!(updated.id, original.id);
    }
}
