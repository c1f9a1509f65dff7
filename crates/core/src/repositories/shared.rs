//! Shared repository operations.
//!
//! Create, get, update and delete behave identically for every collection; only listing and
//! reference expansion differ per entity, so those live in the per-entity services.

use crate::document::{apply_update, new_document, Document};
use crate::error::{CatalogError, CatalogResult};
use crate::store::DocumentStore;
use catalog_id::DocumentId;
use chrono::Utc;
use serde_json::Value;

/// Builds a document from `input`, assigns it a fresh identifier and stores it.
pub(crate) async fn create<T: Document>(store: &DocumentStore, input: Value) -> CatalogResult<T> {
    let document: T = new_document(input, Utc::now())?;
    store.save(&document).await?;
    Ok(document)
}

/// Fetches a document by its client-supplied identifier.
///
/// # Errors
///
/// - [`CatalogError::InvalidId`] if `id` is not canonical.
/// - [`CatalogError::NotFound`] if no such document exists.
pub(crate) async fn get<T: Document>(store: &DocumentStore, id: &str) -> CatalogResult<T> {
    let id = DocumentId::parse(id)?;
    store
        .find_by_id::<T>(&id)
        .await?
        .ok_or(CatalogError::NotFound { entity: T::ENTITY })
}

/// Applies `input` to an existing document and returns its new state.
///
/// The read and the write happen under the document's lock, so a concurrent delete either
/// wins (and this returns `NotFound`) or removes the updated document.
pub(crate) async fn update<T: Document>(
    store: &DocumentStore,
    id: &str,
    input: Value,
) -> CatalogResult<T> {
    let id = DocumentId::parse(id)?;
    let now = Utc::now();
    store
        .find_and_update::<T, _>(&id, |current| apply_update(&current, input, now))
        .await?
        .ok_or(CatalogError::NotFound { entity: T::ENTITY })
}

/// Removes a document permanently. Referencing documents are left untouched.
pub(crate) async fn delete<T: Document>(store: &DocumentStore, id: &str) -> CatalogResult<()> {
    let id = DocumentId::parse(id)?;
    if store.delete_by_id::<T>(&id).await? {
        Ok(())
    } else {
        Err(CatalogError::NotFound { entity: T::ENTITY })
    }
}

/// Resolves an optional reference, yielding `None` when it is unset or dangling.
///
/// A referenced document that cannot be parsed is treated as dangling, matching how
/// [`DocumentStore::find_all`] skips it.
pub(crate) async fn resolve<T: Document>(
    store: &DocumentStore,
    id: Option<DocumentId>,
) -> CatalogResult<Option<T>> {
    let Some(id) = id else {
        return Ok(None);
    };

    match store.find_by_id::<T>(&id).await {
        Err(CatalogError::Deserialization(e)) => {
            tracing::warn!("skipping unparseable {} {}: {}", T::ENTITY, id, e);
            Ok(None)
        }
        other => other,
    }
}
