use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use powermarket_catalog::{Category, Level, Product, ProductId, Rarity};
use powermarket_core::{Aggregate, AggregateRoot, CartId, DomainError, Money};
use powermarket_events::Event;

/// Tax applied to the cart subtotal, in basis points (18%).
pub const DEFAULT_TAX_BPS: u32 = 1800;

/// Product fields copied into the cart when the item is added.
///
/// Carts outlive catalog reloads, so lines keep the price and stock they
/// were added with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub icon: String,
    pub category: Category,
    pub rarity: Rarity,
    pub level: Level,
    pub price: Money,
    pub stock: u32,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            name: product.name().to_string(),
            icon: product.icon().to_string(),
            category: product.category(),
            rarity: product.rarity(),
            level: product.level(),
            price: product.price(),
            stock: product.stock(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// An item parked in the "save for later" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub product: ProductSnapshot,
    pub saved_at: DateTime<Utc>,
}

/// Money summary of the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Aggregate root: Cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    saved: Vec<SavedItem>,
    version: u64,
}

impl Cart {
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            saved: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a cart from persisted lines and saved items.
    pub fn restore(id: CartId, lines: Vec<CartLine>, saved: Vec<SavedItem>) -> Self {
        Self {
            id,
            lines,
            saved,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn saved(&self) -> &[SavedItem] {
        &self.saved
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    pub fn is_saved(&self, product_id: ProductId) -> bool {
        self.saved.iter().any(|s| s.product.id == product_id)
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Distinct categories in the cart, in first-added order.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.product.category) {
                seen.push(line.product.category);
            }
        }
        seen
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|l| l.product.id).collect()
    }

    pub fn totals(&self, tax_bps: u32) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = subtotal.percent_bps(tax_bps);
        CartTotals {
            item_count: self.item_count(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Set a line's quantity. Zero or negative removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Move a cart line to the saved list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveForLater {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Move a saved item back into the cart (one unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToCart {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSaved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    ChangeQuantity(ChangeQuantity),
    RemoveItem(RemoveItem),
    SaveForLater(SaveForLater),
    MoveToCart(MoveToCart),
    RemoveSaved(RemoveSaved),
    ClearCart(ClearCart),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub cart_id: CartId,
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSavedForLater {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItemMovedToCart {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItemRemoved {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityChanged(QuantityChanged),
    ItemRemoved(ItemRemoved),
    ItemSavedForLater(ItemSavedForLater),
    SavedItemMovedToCart(SavedItemMovedToCart),
    SavedItemRemoved(SavedItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "sales.cart.item_added",
            CartEvent::QuantityChanged(_) => "sales.cart.quantity_changed",
            CartEvent::ItemRemoved(_) => "sales.cart.item_removed",
            CartEvent::ItemSavedForLater(_) => "sales.cart.item_saved_for_later",
            CartEvent::SavedItemMovedToCart(_) => "sales.cart.saved_item_moved_to_cart",
            CartEvent::SavedItemRemoved(_) => "sales.cart.saved_item_removed",
            CartEvent::CartCleared(_) => "sales.cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::ItemSavedForLater(e) => e.occurred_at,
            CartEvent::SavedItemMovedToCart(e) => e.occurred_at,
            CartEvent::SavedItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => match self.line_mut(e.product.id) {
                Some(line) => line.quantity += e.quantity,
                None => self.lines.push(CartLine {
                    product: e.product.clone(),
                    quantity: e.quantity,
                    added_at: e.occurred_at,
                }),
            },
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.line_mut(e.product_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.lines.retain(|l| l.product.id != e.product_id);
            }
            CartEvent::ItemSavedForLater(e) => {
                if let Some(pos) = self.lines.iter().position(|l| l.product.id == e.product_id) {
                    let line = self.lines.remove(pos);
                    if !self.is_saved(e.product_id) {
                        self.saved.push(SavedItem {
                            product: line.product,
                            saved_at: e.occurred_at,
                        });
                    }
                }
            }
            CartEvent::SavedItemMovedToCart(e) => {
                if let Some(pos) = self.saved.iter().position(|s| s.product.id == e.product_id) {
                    let item = self.saved.remove(pos);
                    match self.line_mut(e.product_id) {
                        Some(line) => line.quantity += 1,
                        None => self.lines.push(CartLine {
                            product: item.product,
                            quantity: 1,
                            added_at: e.occurred_at,
                        }),
                    }
                }
            }
            CartEvent::SavedItemRemoved(e) => {
                self.saved.retain(|s| s.product.id != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::ChangeQuantity(cmd) => self.handle_change_quantity(cmd),
            CartCommand::RemoveItem(cmd) => Ok(self.handle_remove(cmd.product_id, cmd.occurred_at)),
            CartCommand::SaveForLater(cmd) => self.handle_save_for_later(cmd),
            CartCommand::MoveToCart(cmd) => self.handle_move_to_cart(cmd),
            CartCommand::RemoveSaved(cmd) => Ok(self.handle_remove_saved(cmd)),
            CartCommand::ClearCart(cmd) => Ok(self.handle_clear(cmd)),
        }
    }
}

impl Cart {
    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product.id == product_id)
    }

    fn require_line(&self, product_id: ProductId) -> Result<&CartLine, DomainError> {
        self.line(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id} in cart")))
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if cmd.product.stock == 0 {
            return Err(DomainError::invariant(format!(
                "{} is out of stock",
                cmd.product.name
            )));
        }

        let current = self.line(cmd.product.id).map_or(0, |l| l.quantity);
        if current.saturating_add(cmd.quantity) > cmd.product.stock {
            return Err(DomainError::invariant(format!(
                "only {} units of {} available",
                cmd.product.stock, cmd.product.name
            )));
        }

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            cart_id: self.id,
            product: cmd.product.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_quantity(&self, cmd: &ChangeQuantity) -> Result<Vec<CartEvent>, DomainError> {
        let line = self.require_line(cmd.product_id)?;

        if cmd.quantity <= 0 {
            return Ok(self.handle_remove(cmd.product_id, cmd.occurred_at));
        }

        let quantity = u32::try_from(cmd.quantity).unwrap_or(u32::MAX);
        if quantity > line.product.stock {
            return Err(DomainError::invariant(format!(
                "only {} units of {} available",
                line.product.stock, line.product.name
            )));
        }
        if quantity == line.quantity {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            cart_id: self.id,
            product_id: cmd.product_id,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, product_id: ProductId, occurred_at: DateTime<Utc>) -> Vec<CartEvent> {
        if !self.contains(product_id) {
            return Vec::new();
        }
        vec![CartEvent::ItemRemoved(ItemRemoved {
            cart_id: self.id,
            product_id,
            occurred_at,
        })]
    }

    fn handle_save_for_later(&self, cmd: &SaveForLater) -> Result<Vec<CartEvent>, DomainError> {
        self.require_line(cmd.product_id)?;
        Ok(vec![CartEvent::ItemSavedForLater(ItemSavedForLater {
            cart_id: self.id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_move_to_cart(&self, cmd: &MoveToCart) -> Result<Vec<CartEvent>, DomainError> {
        let saved = self
            .saved
            .iter()
            .find(|s| s.product.id == cmd.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {} in saved items", cmd.product_id)))?;

        let current = self.line(cmd.product_id).map_or(0, |l| l.quantity);
        if current + 1 > saved.product.stock {
            return Err(DomainError::invariant(format!(
                "only {} units of {} available",
                saved.product.stock, saved.product.name
            )));
        }

        Ok(vec![CartEvent::SavedItemMovedToCart(SavedItemMovedToCart {
            cart_id: self.id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_saved(&self, cmd: &RemoveSaved) -> Vec<CartEvent> {
        if !self.is_saved(cmd.product_id) {
            return Vec::new();
        }
        vec![CartEvent::SavedItemRemoved(SavedItemRemoved {
            cart_id: self.id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        vec![CartEvent::CartCleared(CartCleared {
            cart_id: self.id,
            occurred_at: cmd.occurred_at,
        })]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn snapshot(id: u32, price_major: u64, stock: u32) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId(id),
            name: format!("Poder {id}"),
            icon: "✨".to_string(),
            category: Category::Elementales,
            rarity: Rarity::Rare,
            level: Level::Intermediate,
            price: Money::from_major(price_major),
            stock,
        }
    }

    pub fn add(product: ProductSnapshot, quantity: u32) -> CartCommand {
        CartCommand::AddItem(AddItem {
            product,
            quantity,
            occurred_at: Utc::now(),
        })
    }

    pub fn cart_with(lines: &[(ProductSnapshot, u32)]) -> Cart {
        let mut cart = Cart::empty(CartId::new());
        for (product, quantity) in lines {
            cart.execute(&add(product.clone(), *quantity)).unwrap();
        }
        cart
    }
}
