use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::book::Book;
use crate::domain::errors::DomainError;
use crate::domain::order::{LineItem, Order};
use crate::schema::{books, order_item_books, order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookRow {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = books)]
pub struct NewBookRow<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub price: BigDecimal,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = books)]
pub struct BookChangeset {
    pub name: Option<String>,
    pub author: Option<String>,
    pub price: Option<BigDecimal>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            name: row.name,
            author: row.author,
            price: row.price,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub order_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub order_date: NaiveDate,
    pub status: &'a str,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| DomainError::Internal(format!("order {} has status '{}'", row.id, row.status)))?;
        Ok(Order {
            id: row.id,
            order_date: row.order_date,
            status,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_item_books)]
#[diesel(belongs_to(OrderItemRow, foreign_key = order_item_id))]
#[diesel(belongs_to(BookRow, foreign_key = book_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemBookRow {
    pub id: i32,
    pub order_item_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub price_at_order: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_item_books)]
pub struct NewOrderItemBookRow {
    pub order_item_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub price_at_order: BigDecimal,
}

impl From<OrderItemBookRow> for LineItem {
    fn from(row: OrderItemBookRow) -> Self {
        LineItem {
            id: row.id,
            order_item_id: row.order_item_id,
            book_id: row.book_id,
            quantity: row.quantity,
            price_at_order: row.price_at_order,
        }
    }
}
