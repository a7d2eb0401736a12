use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category reference embedded in a product record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductCategory {
    /// Identifier of the category.
    pub id: i32,
    /// Display name of the category.
    pub name: String,
}

/// Product record as returned by the remote catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier.
    pub id: i32,
    /// Human-readable title of the product.
    pub title: String,
    /// Unit price.
    pub price: f64,
    /// Longer description shown in the table.
    #[serde(default)]
    pub description: String,
    /// Category the product belongs to, when the catalog sends one.
    #[serde(default)]
    pub category: Option<ProductCategory>,
    /// Image URLs; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Raw ISO-8601 creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub creation_at: Option<String>,
    /// Raw ISO-8601 timestamp of the last update.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    /// Primary image of the product, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Parsed creation timestamp, or `None` when it is absent or malformed.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_at.as_deref().and_then(parse_timestamp)
    }
}

/// Payload sent to the catalog when creating or updating a product.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: i32,
    pub images: Vec<String>,
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC and
/// a bare date is taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn product_deserializes_catalog_payload() {
        let payload = r#"{
            "id": 4,
            "title": "Handmade Fresh Table",
            "slug": "handmade-fresh-table",
            "price": 687,
            "description": "Andy shoes are designed to keeping in mind durability",
            "category": {
                "id": 5,
                "name": "Others",
                "image": "https://placehold.co/600x400",
                "slug": "others"
            },
            "images": ["https://placehold.co/600x400"],
            "creationAt": "2024-03-01T10:15:00.000Z",
            "updatedAt": "2024-03-02T08:00:00.000Z"
        }"#;

        let product: Product = serde_json::from_str(payload).expect("valid product");

        assert_eq!(product.id, 4);
        assert_eq!(product.price, 687.0);
        assert_eq!(product.category.as_ref().map(|c| c.name.as_str()), Some("Others"));
        assert_eq!(product.primary_image(), Some("https://placehold.co/600x400"));
        assert_eq!(
            product.created_at(),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).single()
        );
    }

    #[test]
    fn product_accepts_created_at_alias_and_missing_fields() {
        let payload = r#"{"id": 1, "title": "Bare", "price": 3.5, "createdAt": "2024-01-05"}"#;

        let product: Product = serde_json::from_str(payload).expect("valid product");

        assert!(product.images.is_empty());
        assert!(product.category.is_none());
        assert_eq!(
            product.created_at(),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).single()
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-40T00:00:00Z").is_none());
    }

    #[test]
    fn draft_serializes_with_catalog_field_names() {
        let draft = ProductDraft {
            title: "Lamp".to_string(),
            price: 25.0,
            description: "Desk lamp".to_string(),
            category_id: 3,
            images: vec!["https://i.imgur.com/lamp.png".to_string()],
        };

        let value = serde_json::to_value(&draft).expect("serializable");

        assert_eq!(value["categoryId"], 3);
        assert_eq!(value["images"][0], "https://i.imgur.com/lamp.png");
    }
}
