//! Stockroom DB - Database repository layer for PostgreSQL
//!
//! This crate provides the repository pattern for item persistence.
//!
//! # Overview
//!
//! The main component is [`ItemRepository`], a PostgreSQL implementation of
//! [`stockroom_core::ItemStore`].
//!
//! The `items` table is provisioned outside the application:
//!
//! ```sql
//! CREATE TABLE items (
//!     id          BIGSERIAL PRIMARY KEY,
//!     name        VARCHAR(50) NOT NULL,
//!     description VARCHAR(200),
//!     status      VARCHAR NOT NULL,
//!     email       VARCHAR
//! );
//! ```

mod item_repository;

pub use item_repository::ItemRepository;
