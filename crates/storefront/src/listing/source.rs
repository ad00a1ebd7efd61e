use std::sync::Arc;

use powermarket_catalog::{Catalog, Category, Product, ProductId};
use powermarket_core::DomainError;
use powermarket_sales::{Cart, Order};

use crate::error::StorefrontResult;
use crate::storage::{KeyValueStore, ORDERS_KEY, load_json};

/// Where a listing gets its unshaped items from.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    type Item: Clone + Send + Sync;

    async fn candidates(&self) -> StorefrontResult<Vec<Self::Item>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    All,
    Category(Category),
    BestSellers,
    NewArrivals,
}

#[derive(Debug, Clone)]
pub struct CatalogSource {
    catalog: Arc<Catalog>,
    scope: CatalogScope,
}

impl CatalogSource {
    pub fn new(catalog: Arc<Catalog>, scope: CatalogScope) -> Self {
        Self { catalog, scope }
    }
}

#[async_trait::async_trait]
impl CandidateSource for CatalogSource {
    type Item = Product;

    async fn candidates(&self) -> StorefrontResult<Vec<Product>> {
        Ok(match self.scope {
            CatalogScope::All => self.catalog.products().to_vec(),
            CatalogScope::Category(category) => self.catalog.by_category(category),
            CatalogScope::BestSellers => self.catalog.best_sellers(),
            CatalogScope::NewArrivals => self.catalog.new_arrivals(),
        })
    }
}

/// Products that complement a cart: same categories, not already in it.
/// An empty cart gets the best sellers.
#[derive(Debug, Clone)]
pub struct RecommendationSource {
    catalog: Arc<Catalog>,
    categories: Vec<Category>,
    exclude: Vec<ProductId>,
}

impl RecommendationSource {
    pub fn for_cart(catalog: Arc<Catalog>, cart: &Cart) -> Self {
        Self {
            catalog,
            categories: cart.categories(),
            exclude: cart.product_ids(),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for RecommendationSource {
    type Item = Product;

    async fn candidates(&self) -> StorefrontResult<Vec<Product>> {
        Ok(self.catalog.complementary(&self.categories, &self.exclude))
    }
}

#[derive(Debug, Clone)]
pub struct RelatedSource {
    catalog: Arc<Catalog>,
    product_id: ProductId,
}

impl RelatedSource {
    pub fn new(catalog: Arc<Catalog>, product_id: ProductId) -> Self {
        Self { catalog, product_id }
    }
}

#[async_trait::async_trait]
impl CandidateSource for RelatedSource {
    type Item = Product;

    async fn candidates(&self) -> StorefrontResult<Vec<Product>> {
        let product = self
            .catalog
            .find(self.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", self.product_id)))?;
        Ok(self.catalog.related(product))
    }
}

/// The persisted order list, read fresh on every load.
#[derive(Clone)]
pub struct OrderHistorySource {
    store: Arc<dyn KeyValueStore>,
}

impl OrderHistorySource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl CandidateSource for OrderHistorySource {
    type Item = Order;

    async fn candidates(&self) -> StorefrontResult<Vec<Order>> {
        let orders: Option<Vec<Order>> = load_json(self.store.as_ref(), ORDERS_KEY)?;
        Ok(orders.unwrap_or_default())
    }
}
