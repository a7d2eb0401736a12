use async_trait::async_trait;
use mockall::mock;

use super::{CategoryReader, ProductReader, ProductWriter, RepositoryResult};
use crate::domain::{
    category::Category,
    product::{Product, ProductDraft},
};
use crate::notify::{Notifier, Severity};

mock! {
    pub ProductReader {}

    #[async_trait]
    impl ProductReader for ProductReader {
        async fn list_products(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Product>>;
        async fn search_products_by_title(&self, title: &str) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    #[async_trait]
    impl ProductWriter for ProductWriter {
        async fn create_product(&self, draft: &ProductDraft) -> RepositoryResult<Product>;
        async fn update_product(&self, product_id: i32, draft: &ProductDraft) -> RepositoryResult<Product>;
        async fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    #[async_trait]
    impl CategoryReader for CategoryReader {
        async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }
}

mock! {
    pub Notifier {}

    impl Notifier for Notifier {
        fn notify(&self, severity: Severity, message: &str);
    }
}

/// Repository assembled from the individual trait mocks.
pub struct FakeRepo {
    pub product_reader: MockProductReader,
    pub product_writer: MockProductWriter,
    pub category_reader: MockCategoryReader,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self {
            product_reader: MockProductReader::new(),
            product_writer: MockProductWriter::new(),
            category_reader: MockCategoryReader::new(),
        }
    }
}

#[async_trait]
impl ProductReader for FakeRepo {
    async fn list_products(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Product>> {
        self.product_reader.list_products(offset, limit).await
    }

    async fn search_products_by_title(&self, title: &str) -> RepositoryResult<Vec<Product>> {
        self.product_reader.search_products_by_title(title).await
    }
}

#[async_trait]
impl ProductWriter for FakeRepo {
    async fn create_product(&self, draft: &ProductDraft) -> RepositoryResult<Product> {
        self.product_writer.create_product(draft).await
    }

    async fn update_product(
        &self,
        product_id: i32,
        draft: &ProductDraft,
    ) -> RepositoryResult<Product> {
        self.product_writer.update_product(product_id, draft).await
    }

    async fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        self.product_writer.delete_product(product_id).await
    }
}

#[async_trait]
impl CategoryReader for FakeRepo {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.category_reader.list_categories().await
    }
}
