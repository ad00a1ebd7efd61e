//! Ready-made listings for each screen section, sized from the config.

use chrono::{DateTime, Utc};
use tracing::debug;

use powermarket_catalog::{Category, ProductId, RawFilters, SearchTerm, SortKey};
use powermarket_core::UserId;
use powermarket_sales::{Cart, OrderFilter};

use super::pipeline::{OrderPipeline, OrderQuery, ProductPipeline, ProductQuery};
use super::source::{
    CandidateSource, CatalogScope, CatalogSource, OrderHistorySource, RecommendationSource,
    RelatedSource,
};
use super::{Listing, ListingContext, ListingResult};
use crate::session::Session;
use crate::view::{OrderSummary, ProductCard};

pub type ProductListing<S> = Listing<S, ProductPipeline>;
pub type OrderListing = Listing<OrderHistorySource, OrderPipeline>;

impl<S> Listing<S, ProductPipeline>
where
    S: CandidateSource<Item = powermarket_catalog::Product>,
{
    /// Replace the facet and price filters. Back to page 1.
    pub async fn set_filters(&mut self, filters: RawFilters) -> &ListingResult<ProductCard> {
        self.refine(|p| with_query(p, |q| q.filters = filters), true).await
    }

    /// Replace the free-text query. Back to page 1.
    pub async fn set_search_text(&mut self, raw: &str) -> &ListingResult<ProductCard> {
        let text = SearchTerm::parse(raw);
        self.refine(|p| with_query(p, |q| q.text = text), true).await
    }

    /// Change the order. The current page is kept.
    pub async fn set_sort(&mut self, sort: impl Into<SortKey>) -> &ListingResult<ProductCard> {
        let sort = sort.into();
        self.refine(|p| with_query(p, |q| q.sort = sort), false).await
    }
}

fn with_query(pipeline: &mut ProductPipeline, change: impl FnOnce(&mut ProductQuery)) {
    match pipeline.query_mut() {
        Some(query) => change(query),
        None => debug!("curated listing ignores query controls"),
    }
}

impl Listing<OrderHistorySource, OrderPipeline> {
    /// Replace the status/period filter. Back to page 1.
    pub async fn set_order_filter(&mut self, filter: OrderFilter) -> &ListingResult<OrderSummary> {
        self.refine(|p| p.query.filter = filter, true).await
    }
}

impl Session {
    fn catalog_listing(
        &self,
        context: ListingContext,
        scope: CatalogScope,
        pipeline: ProductPipeline,
        page_size: usize,
    ) -> ProductListing<CatalogSource> {
        Listing::new(
            context,
            CatalogSource::new(self.catalog().clone(), scope),
            pipeline,
            page_size,
        )
    }

    pub fn best_sellers_listing(&self) -> ProductListing<CatalogSource> {
        self.catalog_listing(
            ListingContext::LandingBestSellers,
            CatalogScope::BestSellers,
            ProductPipeline::Curated,
            self.config().landing_best_sellers,
        )
    }

    pub fn new_arrivals_listing(&self) -> ProductListing<CatalogSource> {
        self.catalog_listing(
            ListingContext::LandingNewArrivals,
            CatalogScope::NewArrivals,
            ProductPipeline::Curated,
            self.config().landing_new_arrivals,
        )
    }

    pub fn category_listing(&self, category: Category) -> ProductListing<CatalogSource> {
        self.catalog_listing(
            ListingContext::Category(category),
            CatalogScope::Category(category),
            ProductPipeline::Searchable(ProductQuery::default()),
            self.config().category_page_size,
        )
    }

    /// Search results over the whole catalog for `raw_query`. A blank query
    /// lists everything.
    pub fn search_listing(&self, raw_query: &str) -> ProductListing<CatalogSource> {
        self.catalog_listing(
            ListingContext::Search,
            CatalogScope::All,
            ProductPipeline::Searchable(ProductQuery::with_text(raw_query)),
            self.config().search_page_size,
        )
    }

    pub fn recommendations_listing(&self, cart: &Cart) -> ProductListing<RecommendationSource> {
        Listing::new(
            ListingContext::CartRecommendations,
            RecommendationSource::for_cart(self.catalog().clone(), cart),
            ProductPipeline::Curated,
            self.config().recommendations_limit,
        )
    }

    pub fn related_listing(&self, product_id: ProductId) -> ProductListing<RelatedSource> {
        Listing::new(
            ListingContext::Related(product_id),
            RelatedSource::new(self.catalog().clone(), product_id),
            ProductPipeline::Curated,
            self.config().related_limit,
        )
    }

    pub fn order_history_listing(&self, user_id: UserId, filter: OrderFilter, as_of: DateTime<Utc>) -> OrderListing {
        Listing::new(
            ListingContext::OrderHistory,
            OrderHistorySource::new(self.store().clone()),
            OrderPipeline {
                user_id,
                query: OrderQuery { filter, as_of },
            },
            self.config().order_history_page_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::listing::ListingPhase;
    use crate::storage::InMemoryStore;
    use powermarket_catalog::Catalog;

    fn session(config: StorefrontConfig) -> Session {
        Session::new(
            Arc::new(Catalog::seeded().unwrap()),
            Arc::new(InMemoryStore::new()),
            config,
        )
    }

    fn ids(result: &ListingResult<ProductCard>) -> Vec<u32> {
        result.page.items.iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn category_listing_filters_and_sorts() {
        let session = session(StorefrontConfig::default());
        let mut listing = session.category_listing(Category::Elementales);
        assert_eq!(listing.phase(), ListingPhase::Idle);

        let result = listing.load().await;
        assert_eq!(result.page.total_items, 6);
        assert_eq!(result.phase, ListingPhase::DisplayingResults);

        let result = listing.set_sort("rating").await;
        assert_eq!(ids(result), vec![5, 1, 4, 2, 3, 6]);

        let result = listing
            .set_filters(RawFilters {
                rarity: "mythic".into(),
                ..RawFilters::default()
            })
            .await;
        assert_eq!(result.phase, ListingPhase::DisplayingEmpty);
        assert!(result.controls.is_empty());
    }

    #[tokio::test]
    async fn sort_keeps_page_and_filters_reset_it() {
        let config = StorefrontConfig {
            search_page_size: 4,
            ..StorefrontConfig::default()
        };
        let session = session(config);
        let mut listing = session.search_listing("");

        let result = listing.go_to_page(3).await;
        assert_eq!(result.page.total_pages, 4);
        assert_eq!(result.page.items.len(), 4);

        listing.set_sort(SortKey::PriceDesc).await;
        assert_eq!(listing.page(), 3);

        listing.set_filters(RawFilters::default()).await;
        assert_eq!(listing.page(), 1);

        listing.go_to_page(2).await;
        listing.set_search_text("vuelo").await;
        assert_eq!(listing.page(), 1);
    }

    #[tokio::test]
    async fn search_text_narrows_candidates() {
        let session = session(StorefrontConfig::default());
        let mut listing = session.search_listing("vuelo");
        let result = listing.load().await;
        assert_eq!(ids(result), vec![4, 12]);

        let result = listing.set_search_text("zzz").await;
        assert_eq!(result.phase, ListingPhase::DisplayingEmpty);
    }

    #[tokio::test]
    async fn curated_listings_are_capped_by_config() {
        let session = session(StorefrontConfig::default());
        let mut best = session.best_sellers_listing();
        assert_eq!(best.load().await.page.items.len(), 8);

        let mut related = session.related_listing(ProductId(8));
        assert_eq!(ids(related.load().await), vec![7, 9]);

        let mut missing = session.related_listing(ProductId(404));
        assert_eq!(missing.load().await.phase, ListingPhase::DisplayingEmpty);
    }

    #[tokio::test]
    async fn stale_ticket_is_ignored() {
        let session = session(StorefrontConfig::default());
        let catalog = Catalog::seeded().unwrap();
        let mut listing = session.search_listing("");

        let stale = listing.begin();
        let current = listing.begin();
        assert!(!listing.complete(stale, catalog.best_sellers()));
        assert_eq!(listing.phase(), ListingPhase::Loading);

        assert!(listing.complete(current, catalog.new_arrivals()));
        let result = listing.result().unwrap();
        assert_eq!(result.page.total_items, 5);
    }
}
