use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use super::book::{Book, BookChanges, NewBook, Price};
use super::errors::DomainError;
use super::order::{LineItemView, Order, OrderStatus, OrderView, Quantity};
use super::revenue::DateRange;

pub trait BookRepository: Send + Sync + 'static {
    /// Returns the book with the same (name, author) if there is one, else
    /// inserts `book`. The flag is `true` when a row was created.
    fn get_or_create(&self, book: NewBook) -> Result<(Book, bool), DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;
    /// Lowest-id book with this exact name, whatever its author.
    fn find_by_name(&self, name: &str) -> Result<Option<Book>, DomainError>;
    fn list(&self) -> Result<Vec<Book>, DomainError>;
    fn update(&self, id: i32, changes: BookChanges) -> Result<Option<Book>, DomainError>;
    /// Removes the book and every line entry referencing it.
    fn delete(&self, id: i32) -> Result<bool, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order_date: NaiveDate, status: OrderStatus) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self) -> Result<Vec<OrderView>, DomainError>;
    fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>, DomainError>;
    /// Removes the order, its items and their line entries.
    fn delete(&self, id: i32) -> Result<bool, DomainError>;
    /// Appends a line entry to the order's single item, creating the item on
    /// first use. `price` defaults to the book's current price.
    fn add_line(
        &self,
        order_id: i32,
        book_id: i32,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<LineItemView, DomainError>;
}

pub trait RevenueRepository: Send + Sync + 'static {
    /// Σ quantity × price_at_order over completed orders dated inside
    /// `range`, optionally restricted to `order_ids`. `None` when no line
    /// entry matched.
    fn completed_revenue(
        &self,
        range: &DateRange,
        order_ids: Option<&[i32]>,
    ) -> Result<Option<BigDecimal>, DomainError>;
}

impl<T: BookRepository + ?Sized> BookRepository for Arc<T> {
    fn get_or_create(&self, book: NewBook) -> Result<(Book, bool), DomainError> {
        (**self).get_or_create(book)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Book>, DomainError> {
        (**self).find_by_name(name)
    }

    fn list(&self) -> Result<Vec<Book>, DomainError> {
        (**self).list()
    }

    fn update(&self, id: i32, changes: BookChanges) -> Result<Option<Book>, DomainError> {
        (**self).update(id, changes)
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        (**self).delete(id)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, order_date: NaiveDate, status: OrderStatus) -> Result<Order, DomainError> {
        (**self).create(order_date, status)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        (**self).list()
    }

    fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        (**self).update_status(id, status)
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        (**self).delete(id)
    }

    fn add_line(
        &self,
        order_id: i32,
        book_id: i32,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<LineItemView, DomainError> {
        (**self).add_line(order_id, book_id, quantity, price)
    }
}

impl<T: RevenueRepository + ?Sized> RevenueRepository for Arc<T> {
    fn completed_revenue(
        &self,
        range: &DateRange,
        order_ids: Option<&[i32]>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        (**self).completed_revenue(range, order_ids)
    }
}
