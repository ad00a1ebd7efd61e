//! Product catalog for the PowerMarket storefront.
//!
//! Holds the immutable product and category data and the pure list
//! operations the listing pages are built from: text search and
//! filter-and-sort. Pagination lives in `powermarket-core`.

pub mod catalog;
pub mod category;
pub mod collation;
pub mod product;
pub mod query;

pub use catalog::{Catalog, CatalogError};
pub use category::CategoryInfo;
pub use product::{Category, Level, Product, ProductDraft, ProductId, Rarity, Rating, UnknownSlug};
pub use query::{FacetFilter, FilterCriteria, RawFilters, SearchTerm, SortKey, filter_and_sort, search};
