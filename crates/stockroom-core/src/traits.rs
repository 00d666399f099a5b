//! Trait definitions for external dependencies.
//!
//! This module defines the storage abstraction the services depend on,
//! enabling:
//!
//! - **Testability**: In-memory and fault-injecting implementations for tests
//! - **Flexibility**: Different backends (PostgreSQL, in-memory)
//! - **Decoupling**: The batch processor doesn't depend on a specific database
//!
//! # Example
//!
//! ```
//! use stockroom_core::traits::ItemStore;
//! use stockroom_core::{AppError, Item};
//!
//! // Business logic uses traits, not concrete types
//! async fn first_item<S: ItemStore>(store: &S) -> Result<Option<Item>, AppError> {
//!     let ids = store.find_all_ids().await?;
//!     match ids.first() {
//!         Some(id) => store.find_by_id(*id).await,
//!         None => Ok(None),
//!     }
//! }
//! ```

use std::future::Future;

use crate::AppError;
use crate::models::{Item, ItemId, NewItem};

/// Store for item persistence and retrieval.
///
/// Implementations must be safe for concurrent calls on independent keys;
/// callers add no locking of their own around store operations.
pub trait ItemStore: Send + Sync + Clone + 'static {
    /// Returns every stored item.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Item>, AppError>> + Send;

    /// Looks up an item by identifier.
    ///
    /// Returns `Ok(None)` when no item has this id.
    fn find_by_id(&self, id: ItemId)
    -> impl Future<Output = Result<Option<Item>, AppError>> + Send;

    /// Creates an item and returns it with its newly assigned identifier.
    fn insert(&self, item: &NewItem) -> impl Future<Output = Result<Item, AppError>> + Send;

    /// Replaces all fields of an existing item in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ItemNotFound`] if no item has `item.id`.
    fn save(&self, item: &Item) -> impl Future<Output = Result<Item, AppError>> + Send;

    /// Deletes an item. Returns true if a row was removed.
    fn delete_by_id(&self, id: ItemId) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Returns the identifiers of every stored item.
    fn find_all_ids(&self) -> impl Future<Output = Result<Vec<ItemId>, AppError>> + Send;

    /// Returns true if an item with this identifier exists.
    fn exists_by_id(&self, id: ItemId) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Checks that the backend is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}
