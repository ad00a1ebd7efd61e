//! State-changing shopper operations.
//!
//! Every operation takes the current [`AppState`], returns the next one and
//! writes the affected keys through the injected store. On error the input
//! state is dropped; callers keep their previous copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use powermarket_catalog::{Catalog, ProductId};
use powermarket_core::{Aggregate, DomainError, OrderId};
use powermarket_events::Event;
use powermarket_sales::{
    AddItem, CartCommand, ChangeQuantity, CheckoutRequest, ClearCart, MoveToCart, Order,
    ProductSnapshot, ProfileStats, RemoveItem, RemoveSaved, SaveForLater, acquired_powers,
    place_order, profile_stats,
};

use crate::config::StorefrontConfig;
use crate::error::StorefrontResult;
use crate::state::{AppState, CurrentUser};
use crate::storage::KeyValueStore;
use crate::view::{AcquiredPowerView, CartSummary};

#[derive(Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    store: Arc<dyn KeyValueStore>,
    config: StorefrontConfig,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("products", &self.catalog.products().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn KeyValueStore>, config: StorefrontConfig) -> Self {
        Self { catalog, store, config }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn load_state(&self) -> StorefrontResult<AppState> {
        Ok(AppState::load(self.store.as_ref())?)
    }

    pub fn sign_in(&self, mut state: AppState, user: CurrentUser) -> StorefrontResult<AppState> {
        info!(user_id = %user.id, "signed in");
        state.current_user = Some(user);
        state.save_user(self.store.as_ref())?;
        Ok(state)
    }

    pub fn sign_out(&self, mut state: AppState) -> StorefrontResult<AppState> {
        if let Some(user) = state.current_user.take() {
            info!(user_id = %user.id, "signed out");
        }
        state.save_user(self.store.as_ref())?;
        Ok(state)
    }

    /// Add `quantity` units of a catalog product, priced as the catalog
    /// currently lists it.
    pub fn add_to_cart(
        &self,
        state: AppState,
        product_id: ProductId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;

        self.run(
            state,
            CartCommand::AddItem(AddItem {
                product: ProductSnapshot::from(product),
                quantity,
                occurred_at: now,
            }),
        )
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn update_quantity(
        &self,
        state: AppState,
        product_id: ProductId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        self.run(
            state,
            CartCommand::ChangeQuantity(ChangeQuantity {
                product_id,
                quantity,
                occurred_at: now,
            }),
        )
    }

    pub fn remove_from_cart(
        &self,
        state: AppState,
        product_id: ProductId,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        self.run(
            state,
            CartCommand::RemoveItem(RemoveItem {
                product_id,
                occurred_at: now,
            }),
        )
    }

    pub fn save_for_later(
        &self,
        state: AppState,
        product_id: ProductId,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        self.run(
            state,
            CartCommand::SaveForLater(SaveForLater {
                product_id,
                occurred_at: now,
            }),
        )
    }

    pub fn move_to_cart(
        &self,
        state: AppState,
        product_id: ProductId,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        self.run(
            state,
            CartCommand::MoveToCart(MoveToCart {
                product_id,
                occurred_at: now,
            }),
        )
    }

    pub fn remove_saved(
        &self,
        state: AppState,
        product_id: ProductId,
        now: DateTime<Utc>,
    ) -> StorefrontResult<AppState> {
        self.run(
            state,
            CartCommand::RemoveSaved(RemoveSaved {
                product_id,
                occurred_at: now,
            }),
        )
    }

    pub fn clear_cart(&self, state: AppState, now: DateTime<Utc>) -> StorefrontResult<AppState> {
        self.run(state, CartCommand::ClearCart(ClearCart { occurred_at: now }))
    }

    /// Place an order for the whole cart and empty it.
    pub fn checkout(
        &self,
        mut state: AppState,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> StorefrontResult<(AppState, Order)> {
        let order = place_order(
            &state.cart,
            state.user_id(),
            request,
            &self.catalog,
            self.config.tax_bps,
            now,
        )?;

        state.orders.push(order.clone());
        state.save_orders(self.store.as_ref())?;

        let state = self.run(state, CartCommand::ClearCart(ClearCart { occurred_at: now }))?;
        Ok((state, order))
    }

    /// Cancel one of the signed-in user's pending orders.
    pub fn cancel_order(&self, mut state: AppState, order_id: OrderId) -> StorefrontResult<AppState> {
        let user_id = state.user_id();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id() == order_id && Some(o.user_id()) == user_id)
            .ok_or_else(|| DomainError::not_found(format!("order {order_id}")))?;

        order.cancel()?;
        info!(%order_id, "order cancelled");
        state.save_orders(self.store.as_ref())?;
        Ok(state)
    }

    pub fn cart_summary(&self, state: &AppState) -> CartSummary {
        CartSummary::build(&state.cart, self.config.tax_bps)
    }

    /// `None` when nobody is signed in.
    pub fn profile_stats(&self, state: &AppState) -> Option<ProfileStats> {
        state.user_id().map(|id| profile_stats(&state.orders, id))
    }

    /// The signed-in user's power collection, one entry per unit bought in
    /// a completed order. Empty when nobody is signed in.
    pub fn acquired_powers(&self, state: &AppState) -> Vec<AcquiredPowerView> {
        match state.user_id() {
            Some(id) => acquired_powers(&state.orders, id)
                .iter()
                .map(AcquiredPowerView::from)
                .collect(),
            None => Vec::new(),
        }
    }

    fn run(&self, mut state: AppState, command: CartCommand) -> StorefrontResult<AppState> {
        let events = state.cart.execute(&command)?;
        for event in &events {
            info!(event = event.event_type(), items = state.cart.item_count(), "cart updated");
        }
        if !events.is_empty() {
            state.save_cart(self.store.as_ref())?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CART_KEY, InMemoryStore, SAVED_ITEMS_KEY};
    use powermarket_core::UserId;
    use powermarket_sales::{OrderStatus, PaymentMethod, ShippingDetails, ShippingMethod};

    fn session() -> (Session, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let session = Session::new(
            Arc::new(Catalog::seeded().unwrap()),
            store.clone(),
            StorefrontConfig::default(),
        );
        (session, store)
    }

    fn shopper() -> CurrentUser {
        CurrentUser {
            id: UserId::new(),
            first_name: "Clark".into(),
            last_name: "Kent".into(),
            email: "clark@power.market".into(),
        }
    }

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            shipping: ShippingDetails {
                first_name: "Clark".into(),
                last_name: "Kent".into(),
                email: "clark@power.market".into(),
                phone: "987654321".into(),
                address: "Jr. Kripton 1".into(),
                city: "Arequipa".into(),
                zip: "04001".into(),
                country: "Perú".into(),
            },
            shipping_method: ShippingMethod::Express,
            payment_method: PaymentMethod::Crypto,
        }
    }

    #[test]
    fn cart_changes_are_persisted() {
        let (session, store) = session();
        let state = session.load_state().unwrap();
        let state = session.add_to_cart(state, ProductId(2), 2, Utc::now()).unwrap();
        let state = session.save_for_later(state, ProductId(2), Utc::now()).unwrap();

        assert!(store.get(CART_KEY).unwrap().is_some());
        assert!(store.get(SAVED_ITEMS_KEY).unwrap().is_some());

        let reloaded = session.load_state().unwrap();
        assert_eq!(reloaded.cart.lines(), state.cart.lines());
        assert_eq!(reloaded.cart.saved(), state.cart.saved());
    }

    #[test]
    fn unknown_product_is_not_found() {
        let (session, _) = session();
        let err = session
            .add_to_cart(AppState::default(), ProductId(999), 1, Utc::now())
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn checkout_records_order_and_clears_cart() {
        let (session, _) = session();
        let state = session.sign_in(AppState::default(), shopper()).unwrap();
        let state = session.add_to_cart(state, ProductId(11), 1, Utc::now()).unwrap();

        let (state, order) = session.checkout(state, &checkout_request(), Utc::now()).unwrap();
        assert!(state.cart.is_empty());
        assert_eq!(state.orders.len(), 1);
        assert_eq!(order.status(), OrderStatus::Completed);

        let reloaded = session.load_state().unwrap();
        assert_eq!(reloaded.orders, vec![order]);
        assert!(reloaded.cart.is_empty());

        let stats = session.profile_stats(&reloaded).unwrap();
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.units_acquired, 1);
    }

    #[test]
    fn checkout_requires_sign_in() {
        let (session, _) = session();
        let state = session
            .add_to_cart(AppState::default(), ProductId(11), 1, Utc::now())
            .unwrap();
        let err = session.checkout(state, &checkout_request(), Utc::now()).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn completed_orders_cannot_be_cancelled() {
        let (session, _) = session();
        let state = session.sign_in(AppState::default(), shopper()).unwrap();
        let state = session.add_to_cart(state, ProductId(7), 1, Utc::now()).unwrap();
        let (state, order) = session.checkout(state, &checkout_request(), Utc::now()).unwrap();

        let err = session.cancel_order(state.clone(), order.id()).unwrap_err();
        assert_eq!(err.code(), "conflict");

        let stranger = session.sign_out(state).unwrap();
        let err = session.cancel_order(stranger, order.id()).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn acquired_powers_list_each_unit_of_completed_orders() {
        let (session, _) = session();
        let state = session.sign_in(AppState::default(), shopper()).unwrap();
        let state = session.add_to_cart(state, ProductId(10), 2, Utc::now()).unwrap();
        let state = session.add_to_cart(state, ProductId(3), 1, Utc::now()).unwrap();
        let (state, order) = session.checkout(state, &checkout_request(), Utc::now()).unwrap();

        let powers = session.acquired_powers(&state);
        let names: Vec<&str> = powers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Super Fuerza Titanio", "Super Fuerza Titanio", "Dominio de la Tierra"]
        );
        assert!(powers.iter().all(|p| p.order_id == order.id().to_string()));

        let signed_out = session.sign_out(state).unwrap();
        assert!(session.acquired_powers(&signed_out).is_empty());
    }

    #[test]
    fn cart_summary_formats_totals() {
        let (session, _) = session();
        let state = session
            .add_to_cart(AppState::default(), ProductId(10), 2, Utc::now())
            .unwrap();
        let summary = session.cart_summary(&state);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal, "S/ 3,799.98");
        assert_eq!(summary.tax, "S/ 684.00");
        assert_eq!(summary.total, "S/ 4,483.98");
    }
}
