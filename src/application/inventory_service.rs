use chrono::{NaiveDate, Utc};

use crate::domain::book::{Book, BookChanges, NewBook, Price};
use crate::domain::errors::DomainError;
use crate::domain::order::{LineItemView, Order, OrderStatus, OrderView, Quantity};
use crate::domain::ports::{BookRepository, OrderRepository};

/// Book and order mutations. Not-found conditions come back as
/// `DomainError::BookNotFound` / `OrderNotFound` and leave the store untouched.
pub struct InventoryService<B, O> {
    books: B,
    orders: O,
}

impl<B: BookRepository, O: OrderRepository> InventoryService<B, O> {
    pub fn new(books: B, orders: O) -> Self {
        Self { books, orders }
    }

    /// Get-or-create by (name, author). The flag is `true` for a new record.
    pub fn create_book(
        &self,
        name: &str,
        author: &str,
        price: Price,
    ) -> Result<(Book, bool), DomainError> {
        let name = name.trim();
        let author = author.trim();
        if name.is_empty() || author.is_empty() {
            return Err(DomainError::InvalidInput(
                "book name and author must not be empty".to_string(),
            ));
        }

        let (book, created) = self.books.get_or_create(NewBook {
            name: name.to_string(),
            author: author.to_string(),
            price,
        })?;
        if created {
            log::info!("book {} '{}' added", book.id, book.name);
        }
        Ok((book, created))
    }

    pub fn update_book(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError> {
        if changes.name.as_deref().is_some_and(|n| n.trim().is_empty())
            || changes.author.as_deref().is_some_and(|a| a.trim().is_empty())
        {
            return Err(DomainError::InvalidInput(
                "book name and author must not be empty".to_string(),
            ));
        }

        let book = self
            .books
            .update(id, changes)?
            .ok_or(DomainError::BookNotFound(id))?;
        log::info!("book {} updated", book.id);
        Ok(book)
    }

    pub fn delete_book(&self, id: i32) -> Result<(), DomainError> {
        if !self.books.delete(id)? {
            return Err(DomainError::BookNotFound(id));
        }
        log::info!("book {} deleted", id);
        Ok(())
    }

    pub fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        self.books.list()
    }

    pub fn find_book(&self, id: i32) -> Result<Book, DomainError> {
        self.books.find_by_id(id)?.ok_or(DomainError::BookNotFound(id))
    }

    /// First book carrying this title under any author.
    pub fn find_book_by_name(&self, name: &str) -> Result<Option<Book>, DomainError> {
        self.books.find_by_name(name.trim())
    }

    /// Date defaults to today (UTC), status to PENDING.
    pub fn create_order(
        &self,
        order_date: Option<NaiveDate>,
        status: Option<OrderStatus>,
    ) -> Result<Order, DomainError> {
        let order_date = order_date.unwrap_or_else(|| Utc::now().date_naive());
        let order = self.orders.create(order_date, status.unwrap_or_default())?;
        log::info!(
            "order {} created with date {} and status {}",
            order.id,
            order.order_date,
            order.status
        );
        Ok(order)
    }

    /// Sets the status when one is given; without one only checks the id.
    pub fn update_order(&self, id: i32, status: Option<OrderStatus>) -> Result<Order, DomainError> {
        let order = match status {
            Some(status) => self.orders.update_status(id, status)?,
            None => self.orders.find_by_id(id)?.map(|view| view.order),
        }
        .ok_or(DomainError::OrderNotFound(id))?;
        log::info!("order {} updated (status {})", order.id, order.status);
        Ok(order)
    }

    pub fn delete_order(&self, id: i32) -> Result<(), DomainError> {
        if !self.orders.delete(id)? {
            return Err(DomainError::OrderNotFound(id));
        }
        log::info!("order {} deleted", id);
        Ok(())
    }

    /// Appends a line to the order's single item. `price` overrides the
    /// book's current price as the snapshot.
    pub fn add_order_item(
        &self,
        order_id: i32,
        book_id: i32,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<LineItemView, DomainError> {
        let added = self.orders.add_line(order_id, book_id, quantity, price)?;
        log::debug!(
            "added {} x '{}' at {} to order {}",
            added.line.quantity,
            added.book_name,
            added.line.price_at_order,
            order_id
        );
        Ok(added)
    }

    pub fn list_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        self.orders.list()
    }

    pub fn find_order(&self, id: i32) -> Result<OrderView, DomainError> {
        self.orders.find_by_id(id)?.ok_or(DomainError::OrderNotFound(id))
    }
}
