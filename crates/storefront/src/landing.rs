use serde::Serialize;

use crate::session::Session;
use crate::view::{CategoryCard, ProductCard};

/// Sections of the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingView {
    pub featured_categories: Vec<CategoryCard>,
    pub best_sellers: Vec<ProductCard>,
    pub other_categories: Vec<CategoryCard>,
    pub new_arrivals: Vec<ProductCard>,
}

impl Session {
    pub async fn landing(&self) -> LandingView {
        let config = *self.config();

        let featured_categories = self
            .catalog()
            .featured_categories()
            .iter()
            .take(config.landing_featured_categories)
            .map(CategoryCard::from)
            .collect();
        let other_categories = self
            .catalog()
            .other_categories()
            .iter()
            .take(config.landing_other_categories)
            .map(CategoryCard::from)
            .collect();

        let best_sellers = self.best_sellers_listing().load().await.page.items.clone();
        let new_arrivals = self.new_arrivals_listing().load().await.page.items.clone();

        LandingView {
            featured_categories,
            best_sellers,
            other_categories,
            new_arrivals,
        }
    }
}
