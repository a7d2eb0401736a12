use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::domain::category::Category;
use crate::domain::product::{Product, ProductDraft};

pub mod category;
pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Catalog repository backed by the remote REST API.
pub struct HttpRepository {
    client: reqwest::Client, // reqwest::Client is cheap to clone
    base_url: String,
}

impl HttpRepository {
    /// Create a repository for the catalog described by `config`.
    pub fn new(config: &CatalogConfig) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success response into a [`RepositoryError`].
async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(RepositoryError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Read-only product operations.
///
/// `list_products` returns at most `limit` records, so anything filtered
/// client-side over its result is bounded by that window.
#[async_trait]
pub trait ProductReader: Send + Sync {
    async fn list_products(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Product>>;
    /// Case-insensitive title substring search over the whole catalog.
    async fn search_products_by_title(&self, title: &str) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
#[async_trait]
pub trait ProductWriter: Send + Sync {
    async fn create_product(&self, draft: &ProductDraft) -> RepositoryResult<Product>;
    async fn update_product(
        &self,
        product_id: i32,
        draft: &ProductDraft,
    ) -> RepositoryResult<Product>;
    async fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only category operations.
#[async_trait]
pub trait CategoryReader: Send + Sync {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}
