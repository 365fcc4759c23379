use crate::error::CartError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal places shown for prices and totals.
pub const DISPLAY_DECIMALS: u32 = 2;

/// A non-negative price, in the marketplace's base currency.
///
/// Sums are accumulated at full `Decimal` precision; rounding only happens
/// through [`Price::rounded`] or `Display`. Deserialization goes through
/// [`Price::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, CartError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CartError::Validation(format!(
                "Price must not be negative, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Adds two prices, or `None` if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Rounds to two decimals, midpoint away from zero.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = CartError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Star rating from 0 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, CartError> {
        if stars <= Self::MAX {
            Ok(Self(stars))
        } else {
            Err(CartError::Validation(format!(
                "Rating must be between 0 and {}, got {stars}",
                Self::MAX
            )))
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = CartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// An NFT placed in the cart. Read-only from the cart's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Image URLs, first one is the thumbnail.
    pub images: Vec<String>,
    pub price: Price,
    pub rating: Rating,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price, rating: Rating) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            images: Vec::new(),
            price,
            rating,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Sums item prices without intermediate rounding.
pub fn total_price(items: &[CartItem]) -> Result<Price, CartError> {
    items.iter().try_fold(Price::ZERO, |total, item| {
        total
            .checked_add(item.price)
            .ok_or_else(|| CartError::Overflow(format!("cart total overflows at item {}", item.id)))
    })
}
