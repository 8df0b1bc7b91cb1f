use std::fmt;

use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;

/// A non-negative money amount with exactly two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(BigDecimal);

impl Price {
    pub fn new(amount: BigDecimal) -> Result<Self, DomainError> {
        if amount < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "price must not be negative, got {}",
                amount
            )));
        }
        Ok(Self(round_cents(&amount)))
    }

    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        Self::new(BigDecimal::new(cents.into(), 2))
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.0
    }

    pub fn into_inner(self) -> BigDecimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<BigDecimal>()
            .map_err(|_| DomainError::InvalidInput(format!("'{}' is not a valid price", s)))?;
        Self::new(amount)
    }
}

/// Round to cents and pin the scale so `10` renders as `10.00`.
pub fn round_cents(amount: &BigDecimal) -> BigDecimal {
    amount.round(2).with_scale(2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub author: String,
    pub price: Price,
}

/// Partial update for a book; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub name: Option<String>,
    pub author: Option<String>,
    pub price: Option<Price>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.author.is_none() && self.price.is_none()
    }
}
