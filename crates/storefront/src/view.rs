//! Typed view models handed to the rendering layer.
//!
//! Everything here is plain data: formatted strings, flags and counts. No
//! markup is produced.

use serde::Serialize;

use powermarket_catalog::{CategoryInfo, Product, Rating};
use powermarket_core::Page;
use powermarket_sales::{AcquiredPower, Cart, CartLine, Order};

/// Low-stock warnings start at this many units or fewer.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Badge {
    New,
    BestSeller,
    Sale { percent: u8 },
}

impl Badge {
    pub fn label(&self) -> String {
        match self {
            Badge::New => "Nuevo".to_string(),
            Badge::BestSeller => "Más Vendido".to_string(),
            Badge::Sale { percent } => format!("-{percent}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StockBadge {
    InStock,
    Low { remaining: u32 },
    SoldOut,
}

impl StockBadge {
    pub fn for_stock(stock: u32) -> Self {
        match stock {
            0 => StockBadge::SoldOut,
            n if n <= LOW_STOCK_THRESHOLD => StockBadge::Low { remaining: n },
            _ => StockBadge::InStock,
        }
    }

    pub fn label(&self) -> String {
        match self {
            StockBadge::InStock => "En stock".to_string(),
            StockBadge::Low { remaining } => format!("Últimas {remaining} unidades"),
            StockBadge::SoldOut => "Agotado".to_string(),
        }
    }
}

/// Star string followed by the numeric rating: `⭐⭐⭐⭐⭐ (4.8)`.
///
/// One star per whole point, plus one when the fraction is at least .5.
pub fn rating_text(rating: Rating) -> String {
    let stars = usize::from(rating.whole_stars()) + usize::from(rating.has_half_star());
    format!("{} ({rating})", "⭐".repeat(stars))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category_label: &'static str,
    pub badges: Vec<Badge>,
    pub rarity: &'static str,
    pub rarity_label: &'static str,
    pub level_label: &'static str,
    pub price: String,
    pub original_price: Option<String>,
    pub rating: String,
    pub stock: StockBadge,
    pub stock_label: String,
    pub can_add_to_cart: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let discount = product.discount_percent();

        let mut badges = Vec::new();
        if product.is_new() {
            badges.push(Badge::New);
        }
        if product.is_best_seller() {
            badges.push(Badge::BestSeller);
        }
        if let Some(percent) = discount {
            badges.push(Badge::Sale { percent });
        }

        let stock = StockBadge::for_stock(product.stock());
        Self {
            id: product.id_typed().0,
            name: product.name().to_string(),
            description: product.description().to_string(),
            icon: product.icon().to_string(),
            category_label: product.category().display_name(),
            badges,
            rarity: product.rarity().slug(),
            rarity_label: product.rarity().label(),
            level_label: product.level().label(),
            price: product.price().to_string(),
            original_price: discount
                .and(product.original_price())
                .map(|p| p.to_string()),
            rating: rating_text(product.rating()),
            stock,
            stock_label: stock.label(),
            can_add_to_cart: product.in_stock(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "kebab-case")]
pub enum PageEntry {
    Current(usize),
    Link(usize),
    Ellipsis,
}

/// Navigation under a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationControls {
    pub previous: Option<usize>,
    pub entries: Vec<PageEntry>,
    pub next: Option<usize>,
}

impl PaginationControls {
    /// Controls for `current` of `total_pages`. Empty when there is at most
    /// one page.
    pub fn build(current: usize, total_pages: usize) -> Self {
        if total_pages <= 1 {
            return Self::default();
        }

        let entries = (1..=total_pages)
            .filter_map(|i| {
                if i == current {
                    Some(PageEntry::Current(i))
                } else if i == 1 || i == total_pages || i.abs_diff(current) == 1 {
                    Some(PageEntry::Link(i))
                } else if i.abs_diff(current) == 2 {
                    Some(PageEntry::Ellipsis)
                } else {
                    None
                }
            })
            .collect();

        Self {
            previous: (current > 1).then(|| current - 1),
            entries,
            next: (current < total_pages).then(|| current + 1),
        }
    }

    pub fn for_page<T>(page: &Page<T>) -> Self {
        Self::build(page.page, page.total_pages)
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.entries.is_empty() && self.next.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_on: String,
    pub item_count: u32,
    pub total: String,
    pub can_cancel: bool,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            status: order.status().slug(),
            status_label: order.status().label(),
            created_on: order.created_at().format("%d/%m/%Y").to_string(),
            item_count: order.item_count(),
            total: order.totals().total.to_string(),
            can_cancel: order.is_cancellable(),
        }
    }
}

/// One owned unit in the profile's power collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquiredPowerView {
    pub product_id: u32,
    pub name: String,
    pub icon: String,
    pub rarity: &'static str,
    pub rarity_label: &'static str,
    pub level_label: &'static str,
    pub order_id: String,
    pub acquired_on: String,
}

impl From<&AcquiredPower> for AcquiredPowerView {
    fn from(power: &AcquiredPower) -> Self {
        Self {
            product_id: power.product_id.0,
            name: power.name.clone(),
            icon: power.icon.clone(),
            rarity: power.rarity.slug(),
            rarity_label: power.rarity.label(),
            level_label: power.level.label(),
            order_id: power.order_id.to_string(),
            acquired_on: power.acquired_at.format("%d/%m/%Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub slug: &'static str,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub product_count: u32,
}

impl From<&CategoryInfo> for CategoryCard {
    fn from(info: &CategoryInfo) -> Self {
        Self {
            slug: info.slug.slug(),
            name: info.name.clone(),
            description: info.description.clone(),
            icon: info.icon.clone(),
            product_count: info.product_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: u32,
    pub name: String,
    pub icon: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    /// Whether the "+" control may add another unit.
    pub can_increase: bool,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.0,
            name: line.product.name.clone(),
            icon: line.product.icon.clone(),
            unit_price: line.product.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
            can_increase: line.quantity < line.product.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemView {
    pub product_id: u32,
    pub name: String,
    pub icon: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<CartLineView>,
    pub saved: Vec<SavedItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub is_empty: bool,
}

impl CartSummary {
    pub fn build(cart: &Cart, tax_bps: u32) -> Self {
        let totals = cart.totals(tax_bps);
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            saved: cart
                .saved()
                .iter()
                .map(|s| SavedItemView {
                    product_id: s.product.id.0,
                    name: s.product.name.clone(),
                    icon: s.product.icon.clone(),
                    price: s.product.price.to_string(),
                })
                .collect(),
            item_count: totals.item_count,
            subtotal: totals.subtotal.to_string(),
            tax: totals.tax.to_string(),
            total: totals.total.to_string(),
            is_empty: cart.is_empty(),
        }
    }
}
