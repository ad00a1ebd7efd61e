//! Search, filter and sort over product lists.
//!
//! All operations take a borrowed slice and return a new `Vec`; neither the
//! input list nor its products are modified.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use powermarket_core::Money;

use crate::collation::collate;
use crate::product::{Category, Product, Rarity};

/// Sentinel accepted by facet filters to mean "no constraint".
pub const ALL: &str = "all";

/// Constraint on an enumerated product attribute (category, rarity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetFilter<T> {
    /// No constraint.
    Any,
    /// Keep only items with exactly this value.
    Is(T),
    /// A concrete value that names no known variant. Matches nothing.
    Unrecognized(String),
}

impl<T> Default for FacetFilter<T> {
    fn default() -> Self {
        FacetFilter::Any
    }
}

impl<T> FacetFilter<T>
where
    T: FromStr + PartialEq + Copy,
{
    /// Parse a raw control value; empty input and `"all"` disable the filter.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL {
            return FacetFilter::Any;
        }
        match raw.parse() {
            Ok(value) => FacetFilter::Is(value),
            Err(_) => FacetFilter::Unrecognized(raw.to_string()),
        }
    }

    pub fn admits(&self, value: T) -> bool {
        match self {
            FacetFilter::Any => true,
            FacetFilter::Is(wanted) => *wanted == value,
            FacetFilter::Unrecognized(_) => false,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FacetFilter::Any)
    }
}

/// Filter values exactly as they arrive from the listing controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFilters {
    pub category: String,
    pub rarity: String,
    pub min_price: String,
    pub max_price: String,
}

impl Default for RawFilters {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            rarity: ALL.to_string(),
            min_price: String::new(),
            max_price: String::new(),
        }
    }
}

/// Conjunctive constraints applied before sorting. Every field defaults to
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: FacetFilter<Category>,
    pub rarity: FacetFilter<Rarity>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl FilterCriteria {
    /// Interpret raw control values. Price bounds that are not numbers are
    /// left unset rather than read as zero.
    pub fn from_raw(raw: &RawFilters) -> Self {
        Self {
            category: FacetFilter::parse(&raw.category),
            rarity: FacetFilter::parse(&raw.rarity),
            min_price: Money::parse(&raw.min_price),
            max_price: Money::parse(&raw.max_price),
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = FacetFilter::Is(category);
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = FacetFilter::Is(rarity);
        self
    }

    pub fn price_between(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn admits(&self, product: &Product) -> bool {
        self.category.admits(product.category())
            && self.rarity.admits(product.rarity())
            && self.min_price.is_none_or(|min| product.price() >= min)
            && self.max_price.is_none_or(|max| product.price() <= max)
    }
}

/// Listing order. Exactly one is active; unknown keys fall back to
/// [`SortKey::NameAsc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    /// Best rated first.
    Rating,
}

impl SortKey {
    pub const ALL: &'static [SortKey] = &[
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Rating => "rating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::NameAsc => "Nombre (A-Z)",
            SortKey::NameDesc => "Nombre (Z-A)",
            SortKey::PriceAsc => "Precio (Menor a Mayor)",
            SortKey::PriceDesc => "Precio (Mayor a Menor)",
            SortKey::Rating => "Mejor Valorados",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> core::cmp::Ordering {
        match self {
            SortKey::NameAsc => collate(a.name(), b.name()),
            SortKey::NameDesc => collate(b.name(), a.name()),
            SortKey::PriceAsc => a.price().cmp(&b.price()),
            SortKey::PriceDesc => b.price().cmp(&a.price()),
            SortKey::Rating => b.rating().cmp(&a.rating()),
        }
    }
}

impl From<&str> for SortKey {
    fn from(raw: &str) -> Self {
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == raw.trim())
            .unwrap_or_default()
    }
}

impl From<String> for SortKey {
    fn from(raw: String) -> Self {
        SortKey::from(raw.as_str())
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

/// Apply `criteria`, then order by `sort_key`.
///
/// The sort is stable: products that compare equal keep the order they had
/// in `items`.
pub fn filter_and_sort(items: &[Product], criteria: &FilterCriteria, sort_key: SortKey) -> Vec<Product> {
    let mut selected: Vec<Product> = items.iter().filter(|p| criteria.admits(p)).cloned().collect();
    selected.sort_by(|a, b| sort_key.compare(a, b));

    debug!(
        candidates = items.len(),
        matched = selected.len(),
        sort = sort_key.as_str(),
        "filtered and sorted products"
    );
    selected
}

/// Free-text query, normalized for case-insensitive matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// `None` when the query is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            folded: trimmed.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches when the name, description or category slug contains the
    /// term, ignoring case.
    pub fn matches(&self, product: &Product) -> bool {
        [product.name(), product.description(), product.category().slug()]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
    }
}

/// Products whose text fields contain `term`, in their original order.
pub fn search(items: &[Product], term: &SearchTerm) -> Vec<Product> {
    items.iter().filter(|p| term.matches(p)).cloned().collect()
}
