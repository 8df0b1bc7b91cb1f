use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "unknown order status '{}', expected PENDING, COMPLETED or CANCELLED",
                    s
                ))
            })
    }
}

/// Number of copies on a line entry; always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        match i32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(DomainError::InvalidInput(format!(
                "quantity must be a positive whole number, got {}",
                value
            ))),
        }
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub order_date: NaiveDate,
    pub status: OrderStatus,
}

/// One OrderItemBook row.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: i32,
    pub order_item_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub price_at_order: BigDecimal,
}

impl LineItem {
    pub fn subtotal(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.price_at_order
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemView {
    pub line: LineItem,
    pub book_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemView {
    pub id: i32,
    pub lines: Vec<LineItemView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Σ quantity × price_at_order over every line of every item.
    pub fn revenue(&self) -> BigDecimal {
        self.items
            .iter()
            .flat_map(|item| item.lines.iter())
            .fold(BigDecimal::zero(), |acc, l| acc + l.line.subtotal())
    }

    pub fn line_count(&self) -> usize {
        self.items.iter().map(|item| item.lines.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert_eq!(" PENDING ".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("Cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::default().to_string(), "PENDING");
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-2).is_err());
        assert!(Quantity::new(i64::from(i32::MAX) + 1).is_err());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    fn line(id: i32, quantity: i32, price: &str) -> LineItemView {
        LineItemView {
            line: LineItem {
                id,
                order_item_id: 1,
                book_id: 1,
                quantity,
                price_at_order: price.parse().unwrap(),
            },
            book_name: "Test Book".to_string(),
        }
    }

    #[test]
    fn order_revenue_sums_quantity_times_price() {
        let view = OrderView {
            order: Order {
                id: 1,
                order_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                status: OrderStatus::Completed,
            },
            items: vec![OrderItemView {
                id: 1,
                lines: vec![line(1, 2, "15.00"), line(2, 3, "10.50")],
            }],
        };

        assert_eq!(view.revenue(), "61.50".parse::<BigDecimal>().unwrap());
        assert_eq!(view.line_count(), 2);
    }
}
