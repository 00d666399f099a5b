//! Request DTOs for API endpoints.

use serde::Deserialize;
use utoipa::ToSchema;

use stockroom_core::NewItem;

/// Request body for creating or replacing an item.
///
/// Missing `name` or `status` deserialize as empty strings so they are
/// reported as validation errors rather than parse errors.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ItemRequest {
    /// Item name (required, max 50 characters)
    #[serde(default)]
    #[schema(example = "Widget")]
    pub name: String,

    /// Optional description (max 200 characters)
    #[serde(default)]
    #[schema(example = "A small widget")]
    pub description: Option<String>,

    /// Free-text status label (required)
    #[serde(default)]
    #[schema(example = "NEW")]
    pub status: String,

    /// Optional contact email
    #[serde(default)]
    #[schema(example = "owner@example.com")]
    pub email: Option<String>,
}

impl From<ItemRequest> for NewItem {
    fn from(req: ItemRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            email: req.email,
        }
    }
}
