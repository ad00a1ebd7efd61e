use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use powermarket_catalog::Catalog;
use powermarket_storefront::{InMemoryStore, LandingView, ListingResult, ProductCard, Session, StorefrontConfig};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Demo<'a> {
    landing: LandingView,
    query: &'a str,
    search: &'a ListingResult<ProductCard>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    powermarket_observability::init();

    let query = std::env::var("POWERMARKET_QUERY").unwrap_or_else(|_| {
        tracing::debug!("POWERMARKET_QUERY not set; listing the whole catalog");
        String::new()
    });

    let catalog = Catalog::seeded().context("failed to load the seed catalog")?;
    let session = Session::new(
        Arc::new(catalog),
        Arc::new(InMemoryStore::new()),
        StorefrontConfig::from_env(),
    );

    let landing = session.landing().await;
    let mut search = session.search_listing(&query);
    let search = search.load().await;
    tracing::info!(query = %query, results = search.page.total_items, "search listed");

    let demo = Demo {
        landing,
        query: &query,
        search,
    };
    println!("{}", serde_json::to_string_pretty(&demo).context("failed to encode output")?);
    Ok(())
}
