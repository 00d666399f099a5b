//! Domain models for items.

use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationErrors};

/// Storage-assigned item identifier.
pub type ItemId = i64;

/// Status label written by the batch processor.
pub const PROCESSED_STATUS: &str = "PROCESSED";

/// A persisted item.
///
/// The `id` is assigned by the store on creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub email: Option<String>,
}

impl Item {
    /// Sets the status to [`PROCESSED_STATUS`].
    pub fn mark_processed(&mut self) {
        self.status = PROCESSED_STATUS.to_string();
    }

    pub fn is_processed(&self) -> bool {
        self.status == PROCESSED_STATUS
    }
}

/// Item contents without an identifier.
///
/// Used both for creation and for full-replace updates, where the target id
/// comes from the request path rather than the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub email: Option<String>,
}

impl NewItem {
    /// Creates a payload with only the required fields set.
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: status.into(),
            email: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Checks every field constraint, collecting all violations.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate_item(self)
    }

    /// Attaches an identifier, producing the full item.
    ///
    /// Used for replace-style updates where the id is forced onto the payload.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            email: self.email,
        }
    }
}
