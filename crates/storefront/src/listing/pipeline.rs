use chrono::{DateTime, Utc};

use powermarket_catalog::{FilterCriteria, Product, RawFilters, SearchTerm, SortKey, filter_and_sort, search};
use powermarket_core::UserId;
use powermarket_sales::{Order, OrderFilter, order_history};

use crate::view::{OrderSummary, ProductCard};

/// Turns raw candidates into the ordered sequence to paginate, and each
/// paginated item into a view model.
pub trait Pipeline: Send {
    type Item: Clone + Send + Sync;
    type View;

    fn shape(&self, candidates: &[Self::Item]) -> Vec<Self::Item>;
    fn view(&self, item: &Self::Item) -> Self::View;
}

/// Controls of a searchable product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub text: Option<SearchTerm>,
    pub filters: RawFilters,
    pub sort: SortKey,
}

impl ProductQuery {
    pub fn with_text(raw: &str) -> Self {
        Self {
            text: SearchTerm::parse(raw),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductPipeline {
    /// Candidates are shown in catalog order, untouched.
    Curated,
    /// Text search, then filter and sort.
    Searchable(ProductQuery),
}

impl ProductPipeline {
    pub fn query(&self) -> Option<&ProductQuery> {
        match self {
            ProductPipeline::Curated => None,
            ProductPipeline::Searchable(query) => Some(query),
        }
    }

    pub fn query_mut(&mut self) -> Option<&mut ProductQuery> {
        match self {
            ProductPipeline::Curated => None,
            ProductPipeline::Searchable(query) => Some(query),
        }
    }
}

impl Pipeline for ProductPipeline {
    type Item = Product;
    type View = ProductCard;

    fn shape(&self, candidates: &[Product]) -> Vec<Product> {
        let ProductPipeline::Searchable(query) = self else {
            return candidates.to_vec();
        };
        let criteria = FilterCriteria::from_raw(&query.filters);
        match &query.text {
            Some(term) => filter_and_sort(&search(candidates, term), &criteria, query.sort),
            None => filter_and_sort(candidates, &criteria, query.sort),
        }
    }

    fn view(&self, product: &Product) -> ProductCard {
        ProductCard::from(product)
    }
}

/// Controls of the order-history listing. `as_of` anchors the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub filter: OrderFilter,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPipeline {
    pub user_id: UserId,
    pub query: OrderQuery,
}

impl Pipeline for OrderPipeline {
    type Item = Order;
    type View = OrderSummary;

    fn shape(&self, candidates: &[Order]) -> Vec<Order> {
        order_history(candidates, self.user_id, &self.query.filter, self.query.as_of)
    }

    fn view(&self, order: &Order) -> OrderSummary {
        OrderSummary::from(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powermarket_catalog::Catalog;

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id_typed().0).collect()
    }

    #[test]
    fn curated_keeps_catalog_order() {
        let catalog = Catalog::seeded().unwrap();
        let shaped = ProductPipeline::Curated.shape(&catalog.best_sellers());
        assert_eq!(ids(&shaped), ids(&catalog.best_sellers()));
    }

    #[test]
    fn searchable_applies_text_before_filters() {
        let catalog = Catalog::seeded().unwrap();
        let pipeline = ProductPipeline::Searchable(ProductQuery {
            text: SearchTerm::parse("control"),
            filters: RawFilters {
                max_price: "2000".into(),
                ..RawFilters::default()
            },
            sort: SortKey::PriceAsc,
        });

        let shaped = pipeline.shape(catalog.products());
        assert_eq!(ids(&shaped), vec![6, 3, 4]);
        assert_eq!(pipeline.view(&shaped[0]).id, 6);
    }
}
