//! File-backed document store.
//!
//! Each collection lives in its own directory under the configured data directory. Documents
//! are stored as pretty-printed JSON in a sharded layout:
//!
//! ```text
//! <data_dir>/
//!   recipes/
//!     <s1>/
//!       <s2>/
//!         <id>/
//!           document.json
//!   ingredients/...
//!   recipe_ingredients/...
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the identifier.
//!
//! All I/O goes through `tokio::fs`, so request handlers never block the runtime.
//!
//! Writes to one document are serialised by a per-document lock, so a read-modify-write
//! ([`DocumentStore::find_and_update`]) and a delete of the same document cannot interleave.
//! Saves of different documents run concurrently. Emptied shard directories are pruned on
//! delete when no save is in flight.

use crate::config::CoreConfig;
use crate::constants::{
    DOCUMENT_FILENAME, DOCUMENT_TEMP_SUFFIX, INGREDIENTS_DIR_NAME, RECIPES_DIR_NAME,
    RECIPE_INGREDIENTS_DIR_NAME,
};
use crate::document::Document;
use crate::error::{CatalogError, CatalogResult};
use catalog_id::DocumentId;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

type LockKey = (&'static str, DocumentId);

/// Handle to the document store, opened once at startup and cloned into each service.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    cfg: Arc<CoreConfig>,
    /// One write lock per document currently being written or deleted.
    locks: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
    /// Held shared while a save creates shard directories; taken exclusively to prune them.
    shards: Arc<RwLock<()>>,
}

/// Exclusive write access to one document. The lock entry is dropped with the last holder.
struct DocumentLock {
    key: LockKey,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl DocumentStore {
    /// Opens the store, creating the data directory and every collection directory if missing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::StorageDirCreation`] if a directory cannot be created.
    pub async fn open(cfg: Arc<CoreConfig>) -> CatalogResult<Self> {
        for collection in [
            RECIPES_DIR_NAME,
            INGREDIENTS_DIR_NAME,
            RECIPE_INGREDIENTS_DIR_NAME,
        ] {
            tokio::fs::create_dir_all(cfg.collection_dir(collection))
                .await
                .map_err(CatalogError::StorageDirCreation)?;
        }

        tracing::info!(
            "document store ready at {}",
            cfg.data_dir().display()
        );

        Ok(Self {
            cfg,
            locks: Arc::new(DashMap::new()),
            shards: Arc::new(RwLock::new(())),
        })
    }

    async fn lock<T: Document>(&self, id: &DocumentId) -> DocumentLock {
        let key = (T::COLLECTION, *id);
        let lock = self.locks.entry(key).or_default().clone();
        let guard = lock.lock_owned().await;
        DocumentLock {
            key,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    fn document_dir<T: Document>(&self, id: &DocumentId) -> PathBuf {
        id.sharded_dir(&self.cfg.collection_dir(T::COLLECTION))
    }

    /// Returns every document in the collection of `T`, in directory order.
    ///
    /// A missing collection directory yields an empty list. Document files that cannot be
    /// parsed are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::StoreRead`] or [`CatalogError::FileRead`] on any other I/O
    /// failure.
    pub async fn find_all<T: Document>(&self) -> CatalogResult<Vec<T>> {
        let collection_dir = self.cfg.collection_dir(T::COLLECTION);
        let mut documents = Vec::new();

        for s1 in read_subdirs(&collection_dir).await? {
            for s2 in read_subdirs(&s1).await? {
                for document_dir in read_subdirs(&s2).await? {
                    let path = document_dir.join(DOCUMENT_FILENAME);

                    let contents = match tokio::fs::read_to_string(&path).await {
                        Ok(contents) => contents,
                        // Removed between listing and reading, or never fully written.
                        Err(e) if e.kind() == ErrorKind::NotFound => continue,
                        Err(e) => return Err(CatalogError::FileRead(e)),
                    };

                    match serde_json::from_str::<T>(&contents) {
                        Ok(document) => documents.push(document),
                        Err(e) => {
                            tracing::warn!(
                                "failed to parse {}: {} - {}",
                                T::ENTITY,
                                path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(documents)
    }

    /// Looks up a single document by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::FileRead`] or [`CatalogError::Deserialization`] if the document
    /// exists but cannot be read.
    pub async fn find_by_id<T: Document>(&self, id: &DocumentId) -> CatalogResult<Option<T>> {
        let path = self.document_dir::<T>(id).join(DOCUMENT_FILENAME);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(CatalogError::Deserialization),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::FileRead(e)),
        }
    }

    /// Inserts or replaces a document.
    ///
    /// The JSON is written to a uniquely named temporary file and renamed over
    /// `document.json`, so readers see either the old or the new document, never a partial one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Serialization`], [`CatalogError::StorageDirCreation`] or
    /// [`CatalogError::FileWrite`].
    pub async fn save<T: Document>(&self, document: &T) -> CatalogResult<()> {
        let _lock = self.lock::<T>(&document.id()).await;
        self.write_document(document).await
    }

    /// Reads a document, applies `update` and writes the result back as one step.
    ///
    /// Returns `Ok(None)` without calling `update` if the document does not exist. No other
    /// save or delete of the same document can run in between.
    ///
    /// # Errors
    ///
    /// Returns any error from `update`, plus the errors of [`Self::find_by_id`] and
    /// [`Self::save`].
    pub async fn find_and_update<T, F>(
        &self,
        id: &DocumentId,
        update: F,
    ) -> CatalogResult<Option<T>>
    where
        T: Document,
        F: FnOnce(T) -> CatalogResult<T>,
    {
        let _lock = self.lock::<T>(id).await;

        let Some(current) = self.find_by_id::<T>(id).await? else {
            return Ok(None);
        };
        let updated = update(current)?;
        self.write_document(&updated).await?;
        Ok(Some(updated))
    }

    async fn write_document<T: Document>(&self, document: &T) -> CatalogResult<()> {
        let json = serde_json::to_vec_pretty(document).map_err(CatalogError::Serialization)?;
        let _shards = self.shards.read().await;

        let document_dir = self.document_dir::<T>(&document.id());
        tokio::fs::create_dir_all(&document_dir)
            .await
            .map_err(CatalogError::StorageDirCreation)?;

        let path = document_dir.join(DOCUMENT_FILENAME);
        let temp_path = document_dir.join(format!(
            "{}.{}.{}",
            DOCUMENT_FILENAME,
            DocumentId::new(),
            DOCUMENT_TEMP_SUFFIX
        ));

        tokio::fs::write(&temp_path, json)
            .await
            .map_err(CatalogError::FileWrite)?;
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(CatalogError::FileWrite(e));
        }

        Ok(())
    }

    /// Permanently removes a document.
    ///
    /// Returns `false` if no document with that identifier exists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::FileDelete`] if the document directory cannot be removed.
    pub async fn delete_by_id<T: Document>(&self, id: &DocumentId) -> CatalogResult<bool> {
        let _lock = self.lock::<T>(id).await;
        let document_dir = self.document_dir::<T>(id);

        if !tokio::fs::try_exists(document_dir.join(DOCUMENT_FILENAME))
            .await
            .map_err(CatalogError::FileRead)?
        {
            return Ok(false);
        }

        match tokio::fs::remove_dir_all(&document_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(CatalogError::FileDelete(e)),
        }

        self.prune_shards(&document_dir).await;
        Ok(true)
    }

    /// Removes the `<s2>` and `<s1>` directories above `document_dir` once they are empty.
    ///
    /// Skipped while any save is creating directories; a later delete in the same shard
    /// picks up what is left.
    async fn prune_shards(&self, document_dir: &Path) {
        let Ok(_shards) = self.shards.try_write() else {
            return;
        };

        for dir in document_dir.ancestors().skip(1).take(2) {
            match tokio::fs::remove_dir(dir).await {
                Ok(()) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::DirectoryNotEmpty | ErrorKind::NotFound
                    ) =>
                {
                    return;
                }
                Err(e) => {
                    tracing::debug!("failed to prune {}: {}", dir.display(), e);
                    return;
                }
            }
        }
    }
}

/// Lists the sub-directories of `dir`; a missing directory has none.
async fn read_subdirs(dir: &Path) -> CatalogResult<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CatalogError::StoreRead(e)),
    };

    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(CatalogError::StoreRead)? {
        let file_type = entry.file_type().await.map_err(CatalogError::StoreRead)?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        }
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe};
    use std::fs;
    use tempfile::TempDir;

    fn test_cfg(data_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed"))
    }

    async fn open_store(temp_dir: &TempDir) -> DocumentStore {
        DocumentStore::open(test_cfg(temp_dir.path()))
            .await
            .expect("open should succeed")
    }

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            id: DocumentId::new(),
            name: Some(name.to_string()),
            category: Some("Pantry".to_string()),
        }
    }

    #[tokio::test]
    async fn test_open_creates_collection_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("nested").join("data");

        DocumentStore::open(test_cfg(&data_dir))
            .await
            .expect("open should succeed");

        assert!(data_dir.join(RECIPES_DIR_NAME).is_dir());
        assert!(data_dir.join(INGREDIENTS_DIR_NAME).is_dir());
        assert!(data_dir.join(RECIPE_INGREDIENTS_DIR_NAME).is_dir());
    }

    #[tokio::test]
    async fn test_open_fails_when_data_dir_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        fs::write(&data_dir, "not a directory").unwrap();

        let err = DocumentStore::open(test_cfg(&data_dir))
            .await
            .expect_err("open should fail");
        assert!(matches!(err, CatalogError::StorageDirCreation(_)));
    }

    #[tokio::test]
    async fn test_save_writes_sharded_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let salt = ingredient("Salt");

        store.save(&salt).await.expect("save should succeed");

        let document_dir = salt
            .id
            .sharded_dir(&temp_dir.path().join(INGREDIENTS_DIR_NAME));
        let files: Vec<_> = fs::read_dir(&document_dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec![DOCUMENT_FILENAME.to_string()], "no temp files left");

        let contents = fs::read_to_string(document_dir.join(DOCUMENT_FILENAME)).unwrap();
        let stored: Ingredient = serde_json::from_str(&contents).unwrap();
        assert_eq!(stored, salt);
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips_and_misses() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let sugar = ingredient("Sugar");
        store.save(&sugar).await.unwrap();

        let found = store.find_by_id::<Ingredient>(&sugar.id).await.unwrap();
        assert_eq!(found, Some(sugar.clone()));

        let missing = store
            .find_by_id::<Ingredient>(&DocumentId::new())
            .await
            .unwrap();
        assert_eq!(missing, None);

        let wrong_collection = store.find_by_id::<Recipe>(&sugar.id).await.unwrap();
        assert_eq!(wrong_collection, None);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let mut butter = ingredient("Butter");
        store.save(&butter).await.unwrap();

        butter.category = Some("Dairy".to_string());
        store.save(&butter).await.unwrap();

        let found = store
            .find_by_id::<Ingredient>(&butter.id)
            .await
            .unwrap()
            .expect("document should exist");
        assert_eq!(found.category.as_deref(), Some("Dairy"));
        assert_eq!(store.find_all::<Ingredient>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_returns_every_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;

        for name in ["Eggs", "Milk", "Flour"] {
            store.save(&ingredient(name)).await.unwrap();
        }

        let mut names: Vec<String> = store
            .find_all::<Ingredient>()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|i| i.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Eggs", "Flour", "Milk"]);
    }

    #[tokio::test]
    async fn test_find_all_skips_unparseable_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        store.save(&ingredient("Valid")).await.unwrap();

        let broken_dir = DocumentId::new().sharded_dir(&temp_dir.path().join(INGREDIENTS_DIR_NAME));
        fs::create_dir_all(&broken_dir).unwrap();
        fs::write(broken_dir.join(DOCUMENT_FILENAME), "{ not json").unwrap();

        let all = store.find_all::<Ingredient>().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name.as_deref(), Some("Valid"));
    }

    #[tokio::test]
    async fn test_find_all_empty_when_collection_dir_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        fs::remove_dir_all(temp_dir.path().join(RECIPES_DIR_NAME)).unwrap();

        assert!(store.find_all::<Recipe>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_fails_when_collection_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let collection_dir = temp_dir.path().join(RECIPES_DIR_NAME);
        fs::remove_dir_all(&collection_dir).unwrap();
        fs::write(&collection_dir, "oops").unwrap();

        let err = store.find_all::<Recipe>().await.expect_err("should fail");
        assert!(matches!(err, CatalogError::StoreRead(_)));
    }

    #[tokio::test]
    async fn test_delete_by_id_removes_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let oil = ingredient("Oil");
        store.save(&oil).await.unwrap();

        assert!(store.delete_by_id::<Ingredient>(&oil.id).await.unwrap());
        assert_eq!(store.find_by_id::<Ingredient>(&oil.id).await.unwrap(), None);
        assert!(!store.delete_by_id::<Ingredient>(&oil.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_id_prunes_empty_shard_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let collection_dir = temp_dir.path().join(INGREDIENTS_DIR_NAME);
        let vinegar = ingredient("Vinegar");
        store.save(&vinegar).await.unwrap();

        assert!(store.delete_by_id::<Ingredient>(&vinegar.id).await.unwrap());

        assert!(collection_dir.is_dir());
        assert_eq!(fs::read_dir(&collection_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_id_keeps_shard_dirs_in_use() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let collection_dir = temp_dir.path().join(INGREDIENTS_DIR_NAME);

        let first = ingredient("Cumin");
        let id = first.id.to_string();
        // Same `<s1>/<s2>` shard as `first`.
        let neighbour_id = format!("{}{}", &id[..4], &DocumentId::new().to_string()[4..]);
        let neighbour = Ingredient {
            id: DocumentId::parse(&neighbour_id).unwrap(),
            ..ingredient("Coriander")
        };
        store.save(&first).await.unwrap();
        store.save(&neighbour).await.unwrap();

        assert!(store.delete_by_id::<Ingredient>(&first.id).await.unwrap());

        let shard = collection_dir.join(&id[0..2]).join(&id[2..4]);
        assert!(shard.is_dir());
        assert_eq!(
            store.find_by_id::<Ingredient>(&neighbour.id).await.unwrap(),
            Some(neighbour)
        );
    }

    #[tokio::test]
    async fn test_find_and_update_misses_without_calling_update() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;

        let result = store
            .find_and_update::<Ingredient, _>(&DocumentId::new(), |_| {
                panic!("update must not run for a missing document")
            })
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(store.find_all::<Ingredient>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_and_update_does_not_recreate_deleted_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;
        let salt = ingredient("Salt");
        store.save(&salt).await.unwrap();

        assert!(store.delete_by_id::<Ingredient>(&salt.id).await.unwrap());

        let result = store
            .find_and_update::<Ingredient, _>(&salt.id, |mut current| {
                current.name = Some("Sea salt".to_string());
                Ok(current)
            })
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(store.find_by_id::<Ingredient>(&salt.id).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_and_delete_never_resurrects() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir).await;

        for _ in 0..50 {
            let salt = ingredient("Salt");
            store.save(&salt).await.unwrap();

            let updater = store.clone();
            let update = tokio::spawn(async move {
                updater
                    .find_and_update::<Ingredient, _>(&salt.id, |mut current| {
                        current.name = Some("Sea salt".to_string());
                        Ok(current)
                    })
                    .await
            });
            let deleter = store.clone();
            let delete =
                tokio::spawn(async move { deleter.delete_by_id::<Ingredient>(&salt.id).await });

            update.await.unwrap().expect("update should not fail");
            let deleted = delete.await.unwrap().expect("delete should not fail");

            assert!(deleted);
            assert_eq!(store.find_by_id::<Ingredient>(&salt.id).await.unwrap(), None);
        }

        assert!(store.locks.is_empty(), "lock entries are released");
    }
}
