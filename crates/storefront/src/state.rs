//! The shopper's application state and how it maps onto storage keys.

use serde::{Deserialize, Serialize};
use tracing::debug;

use powermarket_core::{CartId, UserId};
use powermarket_sales::{Cart, CartLine, Order, SavedItem};

use crate::storage::{
    CART_KEY, CURRENT_USER_KEY, KeyValueStore, ORDERS_KEY, SAVED_ITEMS_KEY, StorageError, load_json,
    save_json,
};

/// Public profile of the signed-in shopper. No credentials are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Everything a session reads and writes: cart, saved items, placed
/// orders and the signed-in user.
///
/// Session operations take a state and return the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub cart: Cart,
    pub orders: Vec<Order>,
    pub current_user: Option<CurrentUser>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cart: Cart::empty(CartId::new()),
            orders: Vec::new(),
            current_user: None,
        }
    }
}

impl AppState {
    /// Read every key. Missing or corrupt documents start out empty.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        let lines: Vec<CartLine> = load_json(store, CART_KEY)?.unwrap_or_default();
        let saved: Vec<SavedItem> = load_json(store, SAVED_ITEMS_KEY)?.unwrap_or_default();
        let orders: Vec<Order> = load_json(store, ORDERS_KEY)?.unwrap_or_default();
        let current_user: Option<CurrentUser> = load_json(store, CURRENT_USER_KEY)?;

        debug!(
            cart_lines = lines.len(),
            saved_items = saved.len(),
            orders = orders.len(),
            signed_in = current_user.is_some(),
            "state loaded"
        );

        Ok(Self {
            cart: Cart::restore(CartId::new(), lines, saved),
            orders,
            current_user,
        })
    }

    pub fn save_cart<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        save_json(store, CART_KEY, self.cart.lines())?;
        save_json(store, SAVED_ITEMS_KEY, self.cart.saved())
    }

    pub fn save_orders<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        save_json(store, ORDERS_KEY, &self.orders)
    }

    pub fn save_user<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        match &self.current_user {
            Some(user) => save_json(store, CURRENT_USER_KEY, user),
            None => store.remove(CURRENT_USER_KEY),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        self.save_cart(store)?;
        self.save_orders(store)?;
        self.save_user(store)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current_user.as_ref().map(|u| u.id)
    }
}
