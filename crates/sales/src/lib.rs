//! Cart, checkout and order history for the PowerMarket storefront.
//!
//! Pure domain logic: callers pass in the catalog, the clock and the
//! persisted records, and store whatever comes back.

pub mod cart;
pub mod checkout;
pub mod history;
pub mod order;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartLine, CartTotals, ChangeQuantity,
    ClearCart, DEFAULT_TAX_BPS, ItemAdded, ItemRemoved, ItemSavedForLater, MoveToCart,
    ProductSnapshot, QuantityChanged, RemoveItem, RemoveSaved, SaveForLater, SavedItem,
    SavedItemMovedToCart, SavedItemRemoved,
};
pub use checkout::{CheckoutRequest, place_order};
pub use history::{
    AcquiredPower, MemberTier, OrderFilter, Period, ProfileStats, acquired_powers, order_history,
    profile_stats,
};
pub use order::{
    NewOrder, Order, OrderLine, OrderStatus, OrderTotals, PaymentMethod, ShippingDetails,
    ShippingMethod,
};
