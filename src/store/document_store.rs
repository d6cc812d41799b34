//! Document store over a single JSON file
//!
//! The store keeps no collection in memory between calls. Every operation is
//! load -> scan/mutate -> optional save, so each call observes the file as it
//! was when the call started.
//!
//! Reads take no lock. Mutations are serialized through one async writer lock
//! per store, which makes the title check and the append of `insert_new` a
//! single load cycle. Writers from outside this process are detected by
//! fingerprinting the loaded bytes and re-checking them right before the
//! rename; a mismatch fails the write with `Conflict` rather than dropping the
//! other writer's update. The window between that re-check and the rename is
//! not covered.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

use super::errors::{StoreError, StoreResult};
use super::file::{self, Fingerprint};
use super::record::{Collection, Record};

/// Persistence abstraction over one backing file.
pub struct DocumentStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl DocumentStore {
    /// Create a store over `path`. Nothing is read until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty collection if it is missing.
    ///
    /// Returns `true` if a file was created.
    pub async fn init(&self) -> StoreResult<bool> {
        let _guard = self.writer.lock().await;
        file::create_if_missing(&self.path).await
    }

    /// Read the whole backing file and parse it as a collection.
    ///
    /// # Errors
    ///
    /// - `IoFailure` if the file cannot be read
    /// - `CorruptData` if it does not hold a well-formed collection
    pub async fn load(&self) -> StoreResult<Collection> {
        file::read_collection(&self.path)
            .await
            .map(|(collection, _)| collection)
    }

    /// Returns the full collection.
    pub async fn find_all(&self) -> StoreResult<Collection> {
        self.load().await
    }

    /// Returns the first record whose `id` matches.
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Record> {
        self.load()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::not_found_id(id))
    }

    /// Returns the first record whose scalar member `field` equals `value`.
    pub async fn find_by_field(&self, field: &str, value: &Value) -> StoreResult<Record> {
        let collection = self.load().await?;
        position_by_field(&collection, field, value)
            .map(|index| collection[index].clone())
            .ok_or_else(|| StoreError::not_found_field(field, value))
    }

    /// Returns every record whose list member `field` contains `value`,
    /// compared case-insensitively.
    ///
    /// An empty match set is reported as `NotFound` rather than an empty
    /// success, so the routing layer can answer 404 for a list query.
    pub async fn find_by_collection_field(
        &self,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Record>> {
        let found: Vec<Record> = self
            .load()
            .await?
            .into_iter()
            .filter(|record| record.list_contains_ignore_case(field, value))
            .collect();

        if found.is_empty() {
            return Err(StoreError::not_found_in_collection(field, value));
        }
        Ok(found)
    }

    /// Append `record` unless a record with the same title exists.
    ///
    /// The caller supplies the id. Returns the inserted record unchanged.
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the title is taken; the supplied record is dropped.
    pub async fn insert_new(&self, record: Record) -> StoreResult<Record> {
        self.mutate(move |collection| {
            let title = Value::String(record.title.clone());
            if position_by_field(collection, "title", &title).is_some() {
                return Err(StoreError::duplicate_entry(&record.title));
            }
            collection.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// Replace the record with the same id wholesale.
    ///
    /// No field-level merge happens here; members missing from `record` are
    /// gone after the save.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has `record.id`.
    pub async fn persist_entry(&self, record: Record) -> StoreResult<Record> {
        self.mutate(move |collection| {
            let index = position_by_id(collection, &record.id)
                .ok_or_else(|| StoreError::not_found_id(&record.id))?;
            collection[index] = record.clone();
            Ok(record)
        })
        .await
    }

    /// Rewrite the record with the given id through `apply`, in one locked
    /// load cycle.
    ///
    /// `apply` receives the stored record and returns its replacement; the
    /// stored id is kept whatever `apply` sets `id` to. Because the read
    /// and the write happen under the writer lock, concurrent updates of the
    /// same record are applied one after the other instead of overwriting
    /// each other.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has that id, or whatever `apply` returns. Either
    /// way the file is left untouched.
    pub async fn update_entry<E, F>(&self, id: &str, apply: F) -> Result<Record, E>
    where
        F: FnOnce(Record) -> Result<Record, E>,
        E: From<StoreError>,
    {
        self.mutate(|collection| {
            let index =
                position_by_id(collection, id).ok_or_else(|| StoreError::not_found_id(id))?;
            let mut updated = apply(collection[index].clone())?;
            updated.id = id.to_string();
            collection[index] = updated.clone();
            Ok(updated)
        })
        .await
    }

    /// Remove the record with the given id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has that id.
    pub async fn delete_entry_by_id(&self, id: &str) -> StoreResult<()> {
        self.mutate(|collection| {
            let index =
                position_by_id(collection, id).ok_or_else(|| StoreError::not_found_id(id))?;
            collection.remove(index);
            Ok(())
        })
        .await
    }

    /// Overwrite the backing file with `collection`.
    pub async fn save(&self, collection: &[Record]) -> StoreResult<()> {
        let _guard = self.writer.lock().await;
        file::write_collection(&self.path, collection).await
    }

    pub(crate) async fn load_with_fingerprint(&self) -> StoreResult<(Collection, Fingerprint)> {
        file::read_collection(&self.path).await
    }

    /// Save only if the file still holds the bytes `loaded_from` describes.
    ///
    /// Callers must hold the writer lock.
    pub(crate) async fn save_if_unchanged(
        &self,
        collection: &[Record],
        loaded_from: Fingerprint,
    ) -> StoreResult<()> {
        if file::read_fingerprint(&self.path).await? != loaded_from {
            return Err(StoreError::conflict(&self.path));
        }
        file::write_collection(&self.path, collection).await
    }

    async fn mutate<T, E, F>(&self, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut Collection) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.writer.lock().await;
        let (mut collection, loaded_from) = self.load_with_fingerprint().await?;
        let outcome = apply(&mut collection)?;
        self.save_if_unchanged(&collection, loaded_from).await?;
        Ok(outcome)
    }
}

fn position_by_id(collection: &[Record], id: &str) -> Option<usize> {
    collection.iter().position(|record| record.id == id)
}

fn position_by_field(collection: &[Record], field: &str, value: &Value) -> Option<usize> {
    collection
        .iter()
        .position(|record| record.field_equals(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    async fn empty_store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("movies.json"));
        store.init().await.unwrap();
        (dir, store)
    }

    fn movie(id: &str, title: &str, genres: &[&str]) -> Record {
        Record::new(id, title).with_field("genre", json!(genres))
    }

    #[tokio::test]
    async fn test_find_by_field_exact_match() {
        let (_dir, store) = empty_store().await;
        store.insert_new(movie("1", "Alien", &["Sci-Fi"])).await.unwrap();

        let found = store.find_by_field("title", &json!("Alien")).await.unwrap();
        assert_eq!(found.id, "1");

        let err = store.find_by_field("title", &json!("ALIEN")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_collection_field_skips_records_without_list() {
        let (_dir, store) = empty_store().await;
        store.insert_new(Record::new("1", "Untagged")).await.unwrap();
        store.insert_new(movie("2", "Heat", &["Crime"])).await.unwrap();

        let found = store.find_by_collection_field("genre", "crime").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");
    }

    #[tokio::test]
    async fn test_persist_entry_replaces_wholesale() {
        let (_dir, store) = empty_store().await;
        store
            .insert_new(movie("1", "Alien", &["Sci-Fi"]).with_field("year", 1979))
            .await
            .unwrap();

        store.persist_entry(Record::new("1", "Aliens")).await.unwrap();

        let stored = store.find_by_id("1").await.unwrap();
        assert_eq!(stored.title, "Aliens");
        assert!(stored.fields.is_empty());
    }

    #[tokio::test]
    async fn test_persist_unknown_id_leaves_file_alone() {
        let (_dir, store) = empty_store().await;
        store.insert_new(movie("1", "Alien", &[])).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store.persist_entry(Record::new("2", "Heat")).await.unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::NotFound);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_external_write_is_a_conflict() {
        let (_dir, store) = empty_store().await;
        let _guard = store.writer.lock().await;
        let (mut collection, loaded_from) = store.load_with_fingerprint().await.unwrap();

        // Another process rewrites the file after our load
        file::write_collection(store.path(), &[Record::new("x", "Heat")])
            .await
            .unwrap();

        collection.push(Record::new("1", "Alien"));
        let err = store
            .save_if_unchanged(&collection, loaded_from)
            .await
            .unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::Conflict);
        let (on_disk, _) = file::read_collection(store.path()).await.unwrap();
        assert_eq!(on_disk, vec![Record::new("x", "Heat")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_writes_too() {
        let (_dir, store) = empty_store().await;
        std::fs::write(store.path(), "[{\"id\": ").unwrap();

        let err = store.insert_new(Record::new("1", "Alien")).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::CorruptData);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[{\"id\": ");
    }

    #[tokio::test]
    async fn test_update_entry_keeps_id() {
        let (_dir, store) = empty_store().await;
        store.insert_new(movie("1", "Alien", &["Sci-Fi"])).await.unwrap();

        let updated = store
            .update_entry("1", |record| {
                Ok::<_, StoreError>(Record::new("other", record.title).with_field("rate", 9))
            })
            .await
            .unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(store.find_by_id("1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_entry_rejection_leaves_file_alone() {
        let (_dir, store) = empty_store().await;
        store.insert_new(movie("1", "Alien", &["Sci-Fi"])).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store
            .update_entry("1", |_| Err(StoreError::duplicate_entry("Alien")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::DuplicateEntry);

        let err = store
            .update_entry("9", |record| Ok::<_, StoreError>(record))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_of_one_record_both_apply() {
        let (_dir, store) = empty_store().await;
        store.insert_new(movie("1", "Alien", &["Sci-Fi"])).await.unwrap();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = ["rate", "director"]
            .into_iter()
            .map(|field| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .update_entry("1", |record| {
                            Ok::<_, StoreError>(record.with_field(field, "set"))
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.find_by_id("1").await.unwrap();
        assert_eq!(stored.fields["rate"], "set");
        assert_eq!(stored.fields["director"], "set");
    }
}
