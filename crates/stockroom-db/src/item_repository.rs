//! Item repository for PostgreSQL.

use sqlx::{PgPool, Pool, Postgres};
use stockroom_core::error::AppError;
use stockroom_core::models::{Item, ItemId, NewItem};

/// Column list for SELECT queries. Must remain a const literal to ensure SQL safety
/// since format!() bypasses sqlx compile-time validation.
const ITEM_COLUMNS: &str = "id, name, description, status, email";

/// Repository for item persistence in PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use stockroom_db::ItemRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/stockroom")
///     .await?;
///
/// let repo = ItemRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ItemRepository {
    pool: Pool<Postgres>,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns every item ordered by id.
    pub async fn list_all(&self) -> Result<Vec<Item>, AppError> {
        let query = format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(items)
    }

    /// Retrieves an item by id.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, AppError> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        let result = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result)
    }

    /// Inserts a new item. The id comes from the `BIGSERIAL` sequence.
    pub async fn insert(&self, new_item: &NewItem) -> Result<Item, AppError> {
        let query = format!(
            r#"
            INSERT INTO items (name, description, status, email)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(&new_item.name)
            .bind(&new_item.description)
            .bind(&new_item.status)
            .bind(&new_item.email)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(item)
    }

    /// Replaces every column of an existing item in a single statement.
    ///
    /// Returns [`AppError::ItemNotFound`] if no row has `item.id`.
    pub async fn update(&self, item: &Item) -> Result<Item, AppError> {
        let query = format!(
            r#"
            UPDATE items
            SET name = $2, description = $3, status = $4, email = $5
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(&item.status)
            .bind(&item.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?
            .ok_or(AppError::ItemNotFound(item.id))
    }

    /// Deletes an item. Returns true if a row was removed.
    pub async fn delete(&self, id: ItemId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns every item id in ascending order.
    pub async fn list_ids(&self) -> Result<Vec<ItemId>, AppError> {
        let ids: Vec<(ItemId,)> = sqlx::query_as("SELECT id FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    pub async fn exists(&self, id: ItemId) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::DatabaseError)?;

        Ok(exists)
    }

    /// Checks database connectivity by executing a simple query.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(())
    }
}

// =============================================================================
// Trait Implementation: ItemStore
// =============================================================================

impl stockroom_core::traits::ItemStore for ItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        ItemRepository::list_all(self).await
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, AppError> {
        ItemRepository::get(self, id).await
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, AppError> {
        ItemRepository::insert(self, item).await
    }

    async fn save(&self, item: &Item) -> Result<Item, AppError> {
        ItemRepository::update(self, item).await
    }

    async fn delete_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        ItemRepository::delete(self, id).await
    }

    async fn find_all_ids(&self) -> Result<Vec<ItemId>, AppError> {
        ItemRepository::list_ids(self).await
    }

    async fn exists_by_id(&self, id: ItemId) -> Result<bool, AppError> {
        ItemRepository::exists(self, id).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        ItemRepository::health_check(self).await
    }
}
