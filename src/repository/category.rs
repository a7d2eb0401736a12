use async_trait::async_trait;

use crate::domain::category::Category;
use crate::repository::{CategoryReader, HttpRepository, RepositoryResult, read_json};

#[async_trait]
impl CategoryReader for HttpRepository {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let response = self.client.get(self.url("/categories")).send().await?;
        read_json(response).await
    }
}
