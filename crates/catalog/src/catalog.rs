//! The product catalog: immutable reference data plus the queries every
//! listing page starts from.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;

use powermarket_core::Entity;

use crate::category::CategoryInfo;
use crate::product::{Category, Product, ProductId};

const SEED_DOCUMENT: &str = include_str!("../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not valid JSON or a product failed validation.
    #[error("malformed catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    #[error("duplicate category entry: {0}")]
    DuplicateCategory(Category),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    categories: Vec<CategoryInfo>,
    products: Vec<Product>,
}

/// Products and category metadata, in document order.
///
/// Shared behind an `Arc` by the storefront and never mutated after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<CategoryInfo>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, categories: Vec<CategoryInfo>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(*product.id()) {
                return Err(CatalogError::DuplicateProduct(*product.id()));
            }
        }

        let mut seen = HashSet::new();
        for info in &categories {
            if !seen.insert(info.slug) {
                return Err(CatalogError::DuplicateCategory(info.slug));
            }
        }

        Ok(Self { products, categories })
    }

    pub fn from_json(document: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(document)?;
        Self::new(doc.products, doc.categories)
    }

    /// The built-in storefront catalog.
    pub fn seeded() -> Result<Self, CatalogError> {
        let catalog = Self::from_json(SEED_DOCUMENT)?;
        info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    pub fn featured_categories(&self) -> Vec<CategoryInfo> {
        self.categories.iter().filter(|c| c.featured).cloned().collect()
    }

    pub fn other_categories(&self) -> Vec<CategoryInfo> {
        self.categories.iter().filter(|c| !c.featured).cloned().collect()
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| *p.id() == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<Product> {
        self.select(|p| p.category() == category)
    }

    pub fn best_sellers(&self) -> Vec<Product> {
        self.select(Product::is_best_seller)
    }

    pub fn new_arrivals(&self) -> Vec<Product> {
        self.select(Product::is_new)
    }

    /// Other products in the same category as `product`.
    pub fn related(&self, product: &Product) -> Vec<Product> {
        let id = product.id_typed();
        let category = product.category();
        self.select(|p| p.category() == category && p.id_typed() != id)
    }

    /// Products from any of `categories` that are not in `exclude`.
    ///
    /// With no categories this falls back to the best sellers, still
    /// honouring `exclude`.
    pub fn complementary(&self, categories: &[Category], exclude: &[ProductId]) -> Vec<Product> {
        if categories.is_empty() {
            return self.select(|p| p.is_best_seller() && !exclude.contains(&p.id_typed()));
        }
        self.select(|p| categories.contains(&p.category()) && !exclude.contains(&p.id_typed()))
    }

    fn select(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products.iter().filter(|p| keep(*p)).cloned().collect()
    }
}
