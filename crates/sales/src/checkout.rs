//! Turning a cart into an order record.
//!
//! No payment is settled; the order is recorded as completed straight away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use powermarket_catalog::Catalog;
use powermarket_core::{DomainError, DomainResult, OrderId, UserId};

use crate::cart::Cart;
use crate::order::{NewOrder, Order, OrderLine, OrderStatus, PaymentMethod, ShippingDetails, ShippingMethod};

/// Form data submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping: ShippingDetails,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Build a completed order from `cart`.
///
/// Fails when nobody is signed in, the cart is empty, the shipping form is
/// invalid, or a line asks for more units than the catalog currently has.
pub fn place_order(
    cart: &Cart,
    user_id: Option<UserId>,
    request: &CheckoutRequest,
    catalog: &Catalog,
    tax_bps: u32,
    now: DateTime<Utc>,
) -> DomainResult<Order> {
    let user_id = user_id.ok_or_else(|| DomainError::validation("sign in to complete the purchase"))?;
    if cart.is_empty() {
        return Err(DomainError::validation("the cart is empty"));
    }

    for line in cart.lines() {
        let product = catalog
            .find(line.product.id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", line.product.id)))?;
        if line.quantity > product.stock() {
            return Err(DomainError::invariant(format!(
                "not enough stock for {}: {} requested, {} available",
                product.name(),
                line.quantity,
                product.stock()
            )));
        }
    }

    let order = Order::new(NewOrder {
        id: OrderId::new(),
        user_id,
        lines: cart.lines().iter().map(OrderLine::from).collect(),
        shipping: request.shipping.clone(),
        shipping_method: request.shipping_method,
        payment_method: request.payment_method,
        status: OrderStatus::Completed,
        tax_bps,
        created_at: now,
    })?;

    info!(
        order_id = %order.id(),
        items = order.item_count(),
        total = %order.totals().total,
        "order placed"
    );
    Ok(order)
}
