use core::str::FromStr;

use serde::{Deserialize, Serialize};

use powermarket_core::{DomainError, Entity, Money};

/// Catalog product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl ProductId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))
    }
}

/// Error returned when a slug names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownSlug {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! slug_enum {
    ($t:ident, $kind:literal, { $($variant:ident => $slug:literal),+ $(,)? }) => {
        impl $t {
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            /// Stable lowercase identifier used in URLs, filters and storage.
            pub fn slug(self) -> &'static str {
                match self {
                    $($t::$variant => $slug),+
                }
            }
        }

        impl FromStr for $t {
            type Err = UnknownSlug;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($slug => Ok($t::$variant),)+
                    other => Err(UnknownSlug { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.slug())
            }
        }
    };
}

/// Power category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Elementales,
    Mentales,
    Fisicos,
    Transformacion,
    Teleportacion,
    Especiales,
}

slug_enum!(Category, "category", {
    Elementales => "elementales",
    Mentales => "mentales",
    Fisicos => "fisicos",
    Transformacion => "transformacion",
    Teleportacion => "teleportacion",
    Especiales => "especiales",
});

impl Category {
    /// Human-facing category title.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Elementales => "Poderes Elementales",
            Category::Mentales => "Poderes Mentales",
            Category::Fisicos => "Poderes Físicos",
            Category::Transformacion => "Transformación",
            Category::Teleportacion => "Teletransportación",
            Category::Especiales => "Poderes Especiales",
        }
    }
}

/// How rare a power is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

slug_enum!(Rarity, "rarity", {
    Common => "common",
    Rare => "rare",
    Epic => "epic",
    Legendary => "legendary",
});

impl Rarity {
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Común",
            Rarity::Rare => "Raro",
            Rarity::Epic => "Épico",
            Rarity::Legendary => "Legendario",
        }
    }
}

/// Mastery level a power is sold at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "Básico")]
    Basic,
    #[serde(alias = "Intermedio")]
    Intermediate,
    #[serde(alias = "Avanzado")]
    Advanced,
    #[serde(alias = "Maestro")]
    Master,
}

slug_enum!(Level, "level", {
    Basic => "basic",
    Intermediate => "intermediate",
    Advanced => "advanced",
    Master => "master",
});

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Basic => "Básico",
            Level::Intermediate => "Intermedio",
            Level::Advanced => "Avanzado",
            Level::Master => "Maestro",
        }
    }
}

/// Average customer rating, 0.0 to 5.0 with one decimal place.
///
/// Stored as tenths so it can be ordered and compared exactly.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(u8);

impl Rating {
    pub const MAX_TENTHS: u8 = 50;

    pub fn from_tenths(tenths: u8) -> Result<Self, DomainError> {
        if tenths > Self::MAX_TENTHS {
            return Err(DomainError::validation(format!(
                "rating must be between 0 and 5 (got {})",
                f64::from(tenths) / 10.0
            )));
        }
        Ok(Self(tenths))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn whole_stars(self) -> u8 {
        self.0 / 10
    }

    pub fn has_half_star(self) -> bool {
        self.0 % 10 >= 5
    }
}

impl TryFrom<f64> for Rating {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::validation(format!("invalid rating: {value}")));
        }
        let tenths = (value * 10.0).round();
        if tenths > f64::from(Self::MAX_TENTHS) {
            return Err(DomainError::validation(format!(
                "rating must be between 0 and 5 (got {value})"
            )));
        }
        Ok(Self(tenths as u8))
    }
}

impl From<Rating> for f64 {
    fn from(value: Rating) -> Self {
        f64::from(value.0) / 10.0
    }
}

/// Shows `4.8`, and whole ratings without a fraction (`5`).
impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{}.{}", self.0 / 10, self.0 % 10)
        }
    }
}

/// Unvalidated product record, as supplied by the catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Price in soles (e.g. `2499.99`).
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub category: Category,
    pub rarity: Rarity,
    pub level: Level,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub featured: bool,
}

/// A purchasable power. Immutable reference data owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProductDraft")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    icon: String,
    price: Money,
    original_price: Option<Money>,
    category: Category,
    rarity: Rarity,
    level: Level,
    duration: String,
    stock: u32,
    rating: Rating,
    is_new: bool,
    best_seller: bool,
    featured: bool,
}

impl TryFrom<ProductDraft> for Product {
    type Error = DomainError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let price = Money::from_major_f64(draft.price)
            .filter(|p| !p.is_zero() && draft.price > 0.0)
            .ok_or_else(|| {
                DomainError::validation(format!("price must be positive (got {})", draft.price))
            })?;

        let original_price = match draft.original_price {
            None => None,
            Some(raw) => {
                let original = Money::from_major_f64(raw).ok_or_else(|| {
                    DomainError::validation(format!("invalid original price: {raw}"))
                })?;
                if original < price {
                    return Err(DomainError::invariant(
                        "original price cannot be lower than the current price",
                    ));
                }
                Some(original)
            }
        };

        Ok(Self {
            id: ProductId(draft.id),
            name: draft.name,
            description: draft.description,
            icon: draft.icon,
            price,
            original_price,
            category: draft.category,
            rarity: draft.rarity,
            level: draft.level,
            duration: draft.duration,
            stock: draft.stock,
            rating: Rating::try_from(draft.rating)?,
            is_new: draft.new,
            best_seller: draft.best_seller,
            featured: draft.featured,
        })
    }
}

impl Product {
    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn original_price(&self) -> Option<Money> {
        self.original_price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_best_seller(&self) -> bool {
        self.best_seller
    }

    pub fn is_featured(&self) -> bool {
        self.featured
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whole-percent discount against the original price, if there is one.
    ///
    /// `round((1 - price / original) * 100)`.
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price?;
        if original <= self.price {
            return None;
        }
        let original = u128::from(original.minor());
        let saved = original - u128::from(self.price.minor());
        let percent = (saved * 100 + original / 2) / original;
        Some(percent as u8)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::draft;
    use super::*;

    #[test]
    fn draft_converts_prices_to_minor_units() {
        let product = Product::try_from(ProductDraft {
            original_price: Some(2999.99),
            ..draft(1, "Control del Fuego", 2499.99)
        })
        .unwrap();

        assert_eq!(product.price(), Money::from_minor(249_999));
        assert_eq!(product.original_price(), Some(Money::from_minor(299_999)));
        assert_eq!(product.discount_percent(), Some(17));
    }

    #[test]
    fn draft_rejects_empty_name() {
        let err = Product::try_from(draft(1, "  ", 10.0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn draft_rejects_non_positive_price() {
        assert!(matches!(
            Product::try_from(draft(1, "Gratis", 0.0)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Product::try_from(draft(1, "Negativo", -3.0)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn draft_rejects_original_price_below_price() {
        let err = Product::try_from(ProductDraft {
            original_price: Some(5.0),
            ..draft(1, "Oferta rara", 10.0)
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn draft_rejects_rating_above_five() {
        let err = Product::try_from(ProductDraft {
            rating: 5.1,
            ..draft(1, "Demasiado bueno", 10.0)
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn discount_on_very_large_prices_does_not_overflow() {
        let product = Product::try_from(ProductDraft {
            original_price: Some(1e17),
            ..draft(1, "Fortuna", 1e16)
        })
        .unwrap();
        assert_eq!(product.original_price().map(Money::minor), Some(10_000_000_000_000_000_000));
        assert_eq!(product.discount_percent(), Some(90));
    }

    #[test]
    fn equal_original_price_is_not_a_discount() {
        let product = Product::try_from(ProductDraft {
            original_price: Some(10.0),
            ..draft(1, "Sin descuento", 10.0)
        })
        .unwrap();
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn rating_display_and_stars() {
        let rating = Rating::try_from(4.8).unwrap();
        assert_eq!(rating.to_string(), "4.8");
        assert_eq!(rating.whole_stars(), 4);
        assert!(rating.has_half_star());

        let perfect = Rating::try_from(5.0).unwrap();
        assert_eq!(perfect.to_string(), "5");
        assert!(!perfect.has_half_star());

        assert!(Rating::from_tenths(51).is_err());
    }

    #[test]
    fn slugs_parse_exactly() {
        assert_eq!("elementales".parse::<Category>().unwrap(), Category::Elementales);
        assert_eq!("epic".parse::<Rarity>().unwrap(), Rarity::Epic);
        assert!("Elementales".parse::<Category>().is_err());
        assert_eq!(Category::Fisicos.display_name(), "Poderes Físicos");
        assert_eq!(Rarity::Legendary.label(), "Legendario");
    }

    #[test]
    fn level_accepts_spanish_labels_from_the_catalog_document() {
        let level: Level = serde_json::from_str("\"Avanzado\"").unwrap();
        assert_eq!(level, Level::Advanced);
        let level: Level = serde_json::from_str("\"master\"").unwrap();
        assert_eq!(level, Level::Master);
    }

    #[test]
    fn product_ids_parse_from_attribute_strings() {
        assert_eq!(" 26 ".parse::<ProductId>().unwrap(), ProductId(26));
        assert!(matches!("x".parse::<ProductId>(), Err(DomainError::InvalidId(_))));
    }
}
