use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use powermarket_catalog::{Category, Level, ProductId, Rarity};
use powermarket_core::{
    DomainError, DomainResult, FieldRules, Money, OrderId, Rule, UserId, ValidationReport, validate,
};

use crate::cart::CartLine;

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: &'static [OrderStatus] =
        &[OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Cancelled];

    pub fn slug(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Completed => "Completada",
            OrderStatus::Cancelled => "Cancelada",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.slug() == raw.trim())
    }
}

/// Delivery option chosen at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Instant,
}

impl ShippingMethod {
    pub fn cost(self) -> Money {
        match self {
            ShippingMethod::Standard => Money::ZERO,
            ShippingMethod::Express => Money::from_major(99),
            ShippingMethod::Instant => Money::from_major(199),
        }
    }

    pub fn delivery_days(self) -> i64 {
        match self {
            ShippingMethod::Standard => 5,
            ShippingMethod::Express => 1,
            ShippingMethod::Instant => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Entrega Estándar (3-5 días)",
            ShippingMethod::Express => "Entrega Express (24 horas)",
            ShippingMethod::Instant => "Entrega Instantánea",
        }
    }
}

/// Payment option label. No card or wallet data is retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Qr,
    Crypto,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Tarjeta de Crédito",
            PaymentMethod::Qr => "Código QR",
            PaymentMethod::Crypto => "Cripto-Energía",
        }
    }
}

/// Delivery address and contact entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl ShippingDetails {
    const REQUIRED: [&'static str; 8] = [
        "firstName",
        "lastName",
        "email",
        "phone",
        "address",
        "city",
        "zip",
        "country",
    ];

    /// Every field is required; the email must look like `x@y.z`.
    pub fn rules() -> Vec<FieldRules> {
        Self::REQUIRED
            .iter()
            .map(|field| {
                let rules = FieldRules::new(*field).required();
                if *field == "email" { rules.rule(Rule::Email) } else { rules }
            })
            .collect()
    }

    fn value(&self, field: &str) -> Option<&str> {
        let value = match field {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "city" => &self.city,
            "zip" => &self.zip,
            "country" => &self.country,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn validate(&self) -> ValidationReport {
        validate(&Self::rules(), |field| self.value(field))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// A purchased line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub icon: String,
    pub category: Category,
    pub rarity: Rarity,
    pub level: Level,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            icon: line.product.icon.clone(),
            category: line.product.category,
            rarity: line.product.rarity,
            level: line.product.level,
            unit_price: line.product.price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Tax is charged on the subtotal only, not on shipping.
    pub fn compute(lines: &[OrderLine], shipping: Money, tax_bps: u32) -> Self {
        let subtotal: Money = lines.iter().map(OrderLine::line_total).sum();
        let tax = subtotal.percent_bps(tax_bps);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    lines: Vec<OrderLine>,
    shipping: ShippingDetails,
    shipping_method: ShippingMethod,
    payment_method: PaymentMethod,
    totals: OrderTotals,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    estimated_delivery: DateTime<Utc>,
}

/// Everything needed to create an [`Order`] record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingDetails,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub tax_bps: u32,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(new: NewOrder) -> DomainResult<Self> {
        if new.lines.is_empty() {
            return Err(DomainError::validation("an order needs at least one line"));
        }
        if new.lines.iter().any(|l| l.quantity == 0) {
            return Err(DomainError::validation("order line quantity must be positive"));
        }
        new.shipping.validate().into_result()?;

        let totals = OrderTotals::compute(&new.lines, new.shipping_method.cost(), new.tax_bps);
        let estimated_delivery = new.created_at + Duration::days(new.shipping_method.delivery_days());

        Ok(Self {
            id: new.id,
            user_id: new.user_id,
            lines: new.lines,
            shipping: new.shipping,
            shipping_method: new.shipping_method,
            payment_method: new.payment_method,
            totals,
            status: new.status,
            created_at: new.created_at,
            estimated_delivery,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn estimated_delivery(&self) -> DateTime<Utc> {
        self.estimated_delivery
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_cancellable(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if !self.is_cancellable() {
            return Err(DomainError::conflict(format!(
                "order {} is {} and cannot be cancelled",
                self.id,
                self.status.slug()
            )));
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{line, order, shipping};
    use super::*;

    #[test]
    fn totals_include_shipping_and_tax_on_subtotal() {
        let placed = Order::new(NewOrder {
            id: OrderId::new(),
            user_id: UserId::new(),
            lines: vec![line(1, 100, 2), line(2, 50, 1)],
            shipping: shipping(),
            shipping_method: ShippingMethod::Express,
            payment_method: PaymentMethod::Qr,
            status: OrderStatus::Completed,
            tax_bps: 1800,
            created_at: Utc::now(),
        })
        .unwrap();

        let totals = placed.totals();
        assert_eq!(totals.subtotal, Money::from_major(250));
        assert_eq!(totals.shipping, Money::from_major(99));
        assert_eq!(totals.tax, Money::from_major(45));
        assert_eq!(totals.total, Money::from_major(394));
        assert_eq!(placed.item_count(), 3);
    }

    #[test]
    fn estimated_delivery_follows_shipping_method() {
        let created_at = Utc::now();
        for (method, days) in [
            (ShippingMethod::Standard, 5),
            (ShippingMethod::Express, 1),
            (ShippingMethod::Instant, 0),
        ] {
            let placed = Order::new(NewOrder {
                id: OrderId::new(),
                user_id: UserId::new(),
                lines: vec![line(1, 10, 1)],
                shipping: shipping(),
                shipping_method: method,
                payment_method: PaymentMethod::Crypto,
                status: OrderStatus::Completed,
                tax_bps: 1800,
                created_at,
            })
            .unwrap();
            assert_eq!(placed.estimated_delivery() - created_at, Duration::days(days));
        }
    }

    #[test]
    fn empty_orders_are_rejected() {
        let err = Order::new(NewOrder {
            id: OrderId::new(),
            user_id: UserId::new(),
            lines: Vec::new(),
            shipping: shipping(),
            shipping_method: ShippingMethod::Standard,
            payment_method: PaymentMethod::CreditCard,
            status: OrderStatus::Completed,
            tax_bps: 1800,
            created_at: Utc::now(),
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn shipping_details_are_validated() {
        let mut details = shipping();
        details.email = "diana-at-power".into();
        details.city = " ".into();

        let report = details.validate();
        assert_eq!(report.error_for("email"), Some("Email inválido"));
        assert_eq!(report.error_for("city"), Some("city es requerido"));
        assert!(report.error_for("zip").is_none());
        assert!(shipping().validate().is_valid());
    }

    #[test]
    fn only_pending_orders_can_be_cancelled() {
        let mut pending = order(UserId::new(), OrderStatus::Pending, Utc::now());
        assert!(pending.is_cancellable());
        pending.cancel().unwrap();
        assert_eq!(pending.status(), OrderStatus::Cancelled);

        let mut completed = order(UserId::new(), OrderStatus::Completed, Utc::now());
        assert!(matches!(completed.cancel(), Err(DomainError::Conflict(_))));
        assert!(matches!(pending.cancel(), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn orders_round_trip_through_json() {
        let placed = order(UserId::new(), OrderStatus::Completed, Utc::now());
        let json = serde_json::to_string(&placed).unwrap();
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("\"paymentMethod\":\"credit-card\""));
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, placed);
    }

    #[test]
    fn status_parses_from_filter_values() {
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("all"), None);
        assert_eq!(OrderStatus::Completed.label(), "Completada");
    }
}
