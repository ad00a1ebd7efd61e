//! Order history queries and the profile summary built on them.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use powermarket_catalog::{Level, ProductId, Rarity};
use powermarket_core::{OrderId, UserId};

use crate::order::{Order, OrderStatus};

/// How far back the history should look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[default]
    All,
    LastMonth,
    LastThreeMonths,
    LastYear,
}

impl Period {
    /// Accepts the profile page's filter values; anything else means all.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "month" => Period::LastMonth,
            "3months" => Period::LastThreeMonths,
            "year" => Period::LastYear,
            _ => Period::All,
        }
    }

    /// Earliest creation time included, relative to `now`.
    ///
    /// Month arithmetic clamps to the end of the target month: one month
    /// before March 31 is the last day of February, not a date in March.
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = match self {
            Period::All => return None,
            Period::LastMonth => 1,
            Period::LastThreeMonths => 3,
            Period::LastYear => 12,
        };
        Some(now.checked_sub_months(Months::new(months)).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// `None` keeps every status.
    pub status: Option<OrderStatus>,
    pub period: Period,
}

impl OrderFilter {
    pub fn parse(status: &str, period: &str) -> Self {
        Self {
            status: OrderStatus::parse(status),
            period: Period::parse(period),
        }
    }

    fn admits(&self, order: &Order, start: Option<DateTime<Utc>>) -> bool {
        self.status.is_none_or(|s| order.status() == s)
            && start.is_none_or(|start| order.created_at() >= start)
    }
}

/// The user's orders matching `filter`, newest first.
///
/// Orders created at the same instant keep their stored order.
pub fn order_history(orders: &[Order], user_id: UserId, filter: &OrderFilter, now: DateTime<Utc>) -> Vec<Order> {
    let start = filter.period.start(now);
    let mut selected: Vec<Order> = orders
        .iter()
        .filter(|o| o.user_id() == user_id && filter.admits(o, start))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    selected
}

/// Loyalty tier earned through completed orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberTier {
    Novice,
    Intermediate,
    Advanced,
    Epic,
    Legendary,
}

impl MemberTier {
    pub fn for_completed_orders(count: usize) -> Self {
        match count {
            10.. => MemberTier::Legendary,
            5.. => MemberTier::Epic,
            3.. => MemberTier::Advanced,
            1.. => MemberTier::Intermediate,
            0 => MemberTier::Novice,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemberTier::Novice => "Novato",
            MemberTier::Intermediate => "Intermedio",
            MemberTier::Advanced => "Avanzado",
            MemberTier::Epic => "Épico",
            MemberTier::Legendary => "Legendario",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub completed_orders: usize,
    /// Units across all of the user's orders, whatever their status.
    pub units_acquired: u32,
    pub tier: MemberTier,
    pub most_recent_order: Option<OrderId>,
}

pub fn profile_stats(orders: &[Order], user_id: UserId) -> ProfileStats {
    let mine: Vec<&Order> = orders.iter().filter(|o| o.user_id() == user_id).collect();
    let completed_orders = mine.iter().filter(|o| o.status() == OrderStatus::Completed).count();

    ProfileStats {
        completed_orders,
        units_acquired: mine.iter().map(|o| o.item_count()).sum(),
        tier: MemberTier::for_completed_orders(completed_orders),
        // Latest wins; on equal timestamps the later stored order wins.
        most_recent_order: mine.iter().max_by_key(|o| o.created_at()).map(|o| o.id()),
    }
}

/// One unit of a power owned through a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquiredPower {
    pub product_id: ProductId,
    pub name: String,
    pub icon: String,
    pub rarity: Rarity,
    pub level: Level,
    pub order_id: OrderId,
    pub acquired_at: DateTime<Utc>,
}

/// Every unit bought in the user's completed orders, one entry per unit.
pub fn acquired_powers(orders: &[Order], user_id: UserId) -> Vec<AcquiredPower> {
    orders
        .iter()
        .filter(|o| o.user_id() == user_id && o.status() == OrderStatus::Completed)
        .flat_map(|order| {
            order.lines().iter().flat_map(move |line| {
                (0..line.quantity).map(move |_| AcquiredPower {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    icon: line.icon.clone(),
                    rarity: line.rarity,
                    level: line.level,
                    order_id: order.id(),
                    acquired_at: order.created_at(),
                })
            })
        })
        .collect()
}
