use chrono::{DateTime, Utc};

/// A fact recorded by an aggregate (e.g. an item added to the cart).
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution of persisted state)
/// - named with a stable dotted type (`"sales.cart.item_added"`)
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier.
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (shopper's clock).
    fn occurred_at(&self) -> DateTime<Utc>;
}
