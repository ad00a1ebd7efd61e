//! Runtime configuration read from `POWERMARKET_*` environment variables.

use core::str::FromStr;

use tracing::warn;

use powermarket_sales::DEFAULT_TAX_BPS;

/// Page sizes and section limits for each listing context, plus the tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub search_page_size: usize,
    pub category_page_size: usize,
    pub order_history_page_size: usize,
    pub recommendations_limit: usize,
    pub related_limit: usize,
    pub landing_best_sellers: usize,
    pub landing_new_arrivals: usize,
    pub landing_featured_categories: usize,
    pub landing_other_categories: usize,
    /// Tax on the cart subtotal in basis points (`1800` = 18%).
    pub tax_bps: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            search_page_size: 12,
            category_page_size: 12,
            order_history_page_size: 5,
            recommendations_limit: 4,
            related_limit: 4,
            landing_best_sellers: 12,
            landing_new_arrivals: 6,
            landing_featured_categories: 3,
            landing_other_categories: 3,
            tax_bps: DEFAULT_TAX_BPS,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables keep their
    /// default; unparsable ones keep it too, with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            search_page_size: read(&lookup, "POWERMARKET_SEARCH_PAGE_SIZE", defaults.search_page_size),
            category_page_size: read(
                &lookup,
                "POWERMARKET_CATEGORY_PAGE_SIZE",
                defaults.category_page_size,
            ),
            order_history_page_size: read(
                &lookup,
                "POWERMARKET_ORDERS_PAGE_SIZE",
                defaults.order_history_page_size,
            ),
            recommendations_limit: read(
                &lookup,
                "POWERMARKET_RECOMMENDATIONS_LIMIT",
                defaults.recommendations_limit,
            ),
            related_limit: read(&lookup, "POWERMARKET_RELATED_LIMIT", defaults.related_limit),
            landing_best_sellers: read(
                &lookup,
                "POWERMARKET_LANDING_BEST_SELLERS",
                defaults.landing_best_sellers,
            ),
            landing_new_arrivals: read(
                &lookup,
                "POWERMARKET_LANDING_NEW_ARRIVALS",
                defaults.landing_new_arrivals,
            ),
            landing_featured_categories: read(
                &lookup,
                "POWERMARKET_LANDING_FEATURED_CATEGORIES",
                defaults.landing_featured_categories,
            ),
            landing_other_categories: read(
                &lookup,
                "POWERMARKET_LANDING_OTHER_CATEGORIES",
                defaults.landing_other_categories,
            ),
            tax_bps: read(&lookup, "POWERMARKET_TAX_BPS", defaults.tax_bps),
        }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Display + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(key, value = %raw, fallback = %default, "invalid config value; using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> StorefrontConfig {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_storefront_layout() {
        let config = config_from(&[]);
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.search_page_size, 12);
        assert_eq!(config.order_history_page_size, 5);
        assert_eq!(config.tax_bps, 1800);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("POWERMARKET_SEARCH_PAGE_SIZE", " 24 "),
            ("POWERMARKET_TAX_BPS", "1000"),
        ]);
        assert_eq!(config.search_page_size, 24);
        assert_eq!(config.tax_bps, 1000);
        assert_eq!(config.category_page_size, 12);
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("POWERMARKET_ORDERS_PAGE_SIZE", "five"),
            ("POWERMARKET_TAX_BPS", "-3"),
        ]);
        assert_eq!(config.order_history_page_size, 5);
        assert_eq!(config.tax_bps, 1800);
    }
}
