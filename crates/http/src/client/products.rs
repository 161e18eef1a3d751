//! Product API client methods

use super::{ApiClient, ApiError};
use crate::query::FilterSet;
use crate::types::{Page, Product, ProductDraft, ProductFilters, ProductId, ProductPatch};
use reqwest::Method;

const PRODUCTS_PATH: &str = "/api/v1/products";

impl ApiClient {
    /// List products matching `filters`
    pub async fn list_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Page<Product>, ApiError> {
        let query = filters.to_query();
        let request = self
            .request(Method::GET, &format!("{PRODUCTS_PATH}/"))
            .query(query.pairs());
        self.execute(request).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let request = self.request(Method::GET, &format!("{PRODUCTS_PATH}/{id}/"));
        self.execute(request).await
    }

    pub async fn create_product(&self, product: &ProductDraft) -> Result<Product, ApiError> {
        let request = self
            .request(Method::POST, &format!("{PRODUCTS_PATH}/"))
            .json(product);
        self.execute(request).await
    }

    /// Partially update a product; unset fields are left alone
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("{PRODUCTS_PATH}/{id}/"))
            .json(patch);
        self.execute(request).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("{PRODUCTS_PATH}/{id}/"));
        self.execute_empty(request).await
    }
}
