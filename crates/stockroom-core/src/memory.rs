//! In-memory item store.
//!
//! Backs the server when no database is configured and serves as the base
//! for test doubles. Items live in a `BTreeMap` so listings come back in id
//! order, matching what a database scan by primary key returns.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::AppError;
use crate::models::{Item, ItemId, NewItem};
use crate::traits::ItemStore;

/// Thread-safe, clonable in-memory implementation of [`ItemStore`].
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryItemStore {
    items: Arc<RwLock<BTreeMap<ItemId, Item>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given items.
    ///
    /// Ids are assigned in order starting at 1.
    pub fn with_items(items: impl IntoIterator<Item = NewItem>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.items.write() {
            for new_item in items {
                let id = store.allocate_id();
                map.insert(id, new_item.into_item(id));
            }
        }
        store
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns true if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of an item without going through the async API.
    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.items.read().ok().and_then(|m| m.get(&id).cloned())
    }

    fn allocate_id(&self) -> ItemId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<ItemId, Item>>, AppError> {
        self.items
            .read()
            .map_err(|_| AppError::Generic("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<ItemId, Item>>, AppError> {
        self.items
            .write()
            .map_err(|_| AppError::Generic("in-memory store lock poisoned".to_string()))
    }
}

impl ItemStore for InMemoryItemStore {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, AppError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, AppError> {
        let mut items = self.write()?;
        let id = self.allocate_id();
        let created = item.clone().into_item(id);
        items.insert(id, created.clone());
        Ok(created)
    }

    async fn save(&self, item: &Item) -> Result<Item, AppError> {
        let mut items = self.write()?;
        match items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(item.clone())
            }
            None => Err(AppError::ItemNotFound(item.id)),
        }
    }

    async fn delete_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        Ok(self.write()?.remove(&id).is_some())
    }

    async fn find_all_ids(&self) -> Result<Vec<ItemId>, AppError> {
        Ok(self.read()?.keys().copied().collect())
    }

    async fn exists_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        Ok(self.read()?.contains_key(&id))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
