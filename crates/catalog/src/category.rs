use serde::{Deserialize, Serialize};

use crate::product::Category;

/// Merchandising data for one category, as shown on category cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub slug: Category,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    /// Count advertised on the card; not derived from the product list.
    #[serde(default)]
    pub product_count: u32,
}
