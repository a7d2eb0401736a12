use serde::{Deserialize, Serialize};

/// Catalog category used to classify products. Read-only reference data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Human-readable name of the category.
    pub name: String,
    /// URL-friendly name.
    #[serde(default)]
    pub slug: Option<String>,
    /// Illustration shown next to the category.
    #[serde(default)]
    pub image: Option<String>,
    /// Raw ISO-8601 creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub creation_at: Option<String>,
}
