//! Runtime selection of the item store backend.

use stockroom_core::traits::ItemStore;
use stockroom_core::{AppError, InMemoryItemStore, Item, ItemId, NewItem};
use stockroom_db::ItemRepository;

/// Item store chosen at startup.
///
/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store
/// that loses its contents on restart.
#[derive(Clone)]
pub enum ItemStoreEnum {
    Postgres(ItemRepository),
    InMemory(InMemoryItemStore),
}

impl ItemStoreEnum {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "in-memory",
        }
    }
}

impl ItemStore for ItemStoreEnum {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        match self {
            Self::Postgres(s) => s.find_all().await,
            Self::InMemory(s) => s.find_all().await,
        }
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, AppError> {
        match self {
            Self::Postgres(s) => s.find_by_id(id).await,
            Self::InMemory(s) => s.find_by_id(id).await,
        }
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, AppError> {
        match self {
            Self::Postgres(s) => s.insert(item).await,
            Self::InMemory(s) => s.insert(item).await,
        }
    }

    async fn save(&self, item: &Item) -> Result<Item, AppError> {
        match self {
            Self::Postgres(s) => s.save(item).await,
            Self::InMemory(s) => s.save(item).await,
        }
    }

    async fn delete_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        match self {
            Self::Postgres(s) => s.delete_by_id(id).await,
            Self::InMemory(s) => s.delete_by_id(id).await,
        }
    }

    async fn find_all_ids(&self) -> Result<Vec<ItemId>, AppError> {
        match self {
            Self::Postgres(s) => s.find_all_ids().await,
            Self::InMemory(s) => s.find_all_ids().await,
        }
    }

    async fn exists_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        match self {
            Self::Postgres(s) => s.exists_by_id(id).await,
            Self::InMemory(s) => s.exists_by_id(id).await,
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        match self {
            Self::Postgres(s) => s.health_check().await,
            Self::InMemory(s) => s.health_check().await,
        }
    }
}
