use async_trait::async_trait;

use crate::domain::product::{Product, ProductDraft};
use crate::repository::{
    HttpRepository, ProductReader, ProductWriter, RepositoryResult, ensure_success, read_json,
};

#[async_trait]
impl ProductReader for HttpRepository {
    async fn list_products(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Product>> {
        let response = self
            .client
            .get(self.url("/products"))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;

        read_json(response).await
    }

    async fn search_products_by_title(&self, title: &str) -> RepositoryResult<Vec<Product>> {
        let response = self
            .client
            .get(self.url("/products"))
            .query(&[("title", title)])
            .send()
            .await?;

        read_json(response).await
    }
}

#[async_trait]
impl ProductWriter for HttpRepository {
    async fn create_product(&self, draft: &ProductDraft) -> RepositoryResult<Product> {
        let response = self
            .client
            .post(self.url("/products"))
            .json(draft)
            .send()
            .await?;

        read_json(response).await
    }

    async fn update_product(
        &self,
        product_id: i32,
        draft: &ProductDraft,
    ) -> RepositoryResult<Product> {
        let response = self
            .client
            .put(self.url(&format!("/products/{product_id}")))
            .json(draft)
            .send()
            .await?;

        read_json(response).await
    }

    async fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/products/{product_id}")))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
