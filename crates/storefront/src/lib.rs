//! PowerMarket storefront: application state, the session operations that
//! change it, and the listings and view models a renderer consumes.
//!
//! Storage is injected through [`KeyValueStore`]; the catalog is shared as
//! an immutable `Arc<Catalog>`.

pub mod config;
pub mod error;
pub mod landing;
pub mod listing;
pub mod session;
pub mod state;
pub mod storage;
pub mod view;

pub use config::StorefrontConfig;
pub use error::{StorefrontError, StorefrontResult};
pub use landing::LandingView;
pub use listing::{
    CandidateSource, Listing, ListingContext, ListingPhase, ListingResult, LoadTicket,
    OrderListing, Pipeline, ProductListing,
};
pub use session::Session;
pub use state::{AppState, CurrentUser};
pub use storage::{InMemoryStore, KeyValueStore, StorageError};
pub use view::{
    AcquiredPowerView, Badge, CartLineView, CartSummary, CategoryCard, OrderSummary, PageEntry,
    PaginationControls, ProductCard, SavedItemView, StockBadge,
};
