//! Process-local store implementing every repository port.
//!
//! There is no referential action to lean on here, so deleting a book or an
//! order removes the dependent rows by hand.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use crate::domain::book::{Book, BookChanges, NewBook, Price};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    LineItem, LineItemView, Order, OrderItemView, OrderStatus, OrderView, Quantity,
};
use crate::domain::ports::{BookRepository, OrderRepository, RevenueRepository};
use crate::domain::revenue::DateRange;

#[derive(Debug, Default)]
struct Tables {
    books: BTreeMap<i32, Book>,
    orders: BTreeMap<i32, Order>,
    /// order_item id -> order id
    order_items: BTreeMap<i32, i32>,
    lines: BTreeMap<i32, LineItem>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, order: &Order) -> OrderView {
        let items = self
            .order_items
            .iter()
            .filter(|(_, order_id)| **order_id == order.id)
            .map(|(item_id, _)| OrderItemView {
                id: *item_id,
                lines: self
                    .lines
                    .values()
                    .filter(|line| line.order_item_id == *item_id)
                    .map(|line| LineItemView {
                        line: line.clone(),
                        book_name: self
                            .books
                            .get(&line.book_id)
                            .map(|b| b.name.clone())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();
        OrderView {
            order: order.clone(),
            items,
        }
    }

    fn pair_taken(&self, name: &str, author: &str, except: Option<i32>) -> bool {
        self.books
            .values()
            .any(|b| Some(b.id) != except && b.name == name && b.author == author)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }

    /// Row counts as (books, orders, order items, line entries).
    pub fn counts(&self) -> Result<(usize, usize, usize, usize), DomainError> {
        let t = self.lock()?;
        Ok((t.books.len(), t.orders.len(), t.order_items.len(), t.lines.len()))
    }
}

impl BookRepository for InMemoryStore {
    fn get_or_create(&self, book: NewBook) -> Result<(Book, bool), DomainError> {
        let mut t = self.lock()?;
        if let Some(existing) = t
            .books
            .values()
            .find(|b| b.name == book.name && b.author == book.author)
        {
            return Ok((existing.clone(), false));
        }

        let id = t.next_id();
        let created = Book {
            id,
            name: book.name,
            author: book.author,
            price: book.price.into_inner(),
        };
        t.books.insert(id, created.clone());
        Ok((created, true))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Book>, DomainError> {
        Ok(self.lock()?.books.values().find(|b| b.name == name).cloned())
    }

    fn list(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.lock()?.books.values().cloned().collect())
    }

    fn update(&self, id: i32, changes: BookChanges) -> Result<Option<Book>, DomainError> {
        let mut t = self.lock()?;
        let Some(current) = t.books.get(&id).cloned() else {
            return Ok(None);
        };

        let name = changes.name.unwrap_or(current.name);
        let author = changes.author.unwrap_or(current.author);
        if t.pair_taken(&name, &author, Some(id)) {
            return Err(DomainError::Conflict(format!(
                "a book named '{}' by {} already exists",
                name, author
            )));
        }

        let updated = Book {
            id,
            name,
            author,
            price: changes.price.map(Price::into_inner).unwrap_or(current.price),
        };
        t.books.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut t = self.lock()?;
        if t.books.remove(&id).is_none() {
            return Ok(false);
        }
        t.lines.retain(|_, line| line.book_id != id);
        Ok(true)
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order_date: NaiveDate, status: OrderStatus) -> Result<Order, DomainError> {
        let mut t = self.lock()?;
        let id = t.next_id();
        let order = Order {
            id,
            order_date,
            status,
        };
        t.orders.insert(id, order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let t = self.lock()?;
        Ok(t.orders.get(&id).map(|order| t.view(order)))
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let t = self.lock()?;
        Ok(t.orders.values().map(|order| t.view(order)).collect())
    }

    fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut t = self.lock()?;
        Ok(t.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut t = self.lock()?;
        if t.orders.remove(&id).is_none() {
            return Ok(false);
        }
        let doomed: Vec<i32> = t
            .order_items
            .iter()
            .filter(|(_, order_id)| **order_id == id)
            .map(|(item_id, _)| *item_id)
            .collect();
        t.lines.retain(|_, line| !doomed.contains(&line.order_item_id));
        t.order_items.retain(|item_id, _| !doomed.contains(item_id));
        Ok(true)
    }

    fn add_line(
        &self,
        order_id: i32,
        book_id: i32,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<LineItemView, DomainError> {
        let mut t = self.lock()?;
        if !t.orders.contains_key(&order_id) {
            return Err(DomainError::OrderNotFound(order_id));
        }
        let book = t
            .books
            .get(&book_id)
            .cloned()
            .ok_or(DomainError::BookNotFound(book_id))?;

        let existing_item = t
            .order_items
            .iter()
            .find(|(_, owner)| **owner == order_id)
            .map(|(item_id, _)| *item_id);
        let order_item_id = match existing_item {
            Some(id) => id,
            None => {
                let id = t.next_id();
                t.order_items.insert(id, order_id);
                id
            }
        };

        let id = t.next_id();
        let line = LineItem {
            id,
            order_item_id,
            book_id,
            quantity: quantity.get(),
            price_at_order: price.map(Price::into_inner).unwrap_or(book.price),
        };
        t.lines.insert(id, line.clone());
        Ok(LineItemView {
            line,
            book_name: book.name,
        })
    }
}

impl RevenueRepository for InMemoryStore {
    fn completed_revenue(
        &self,
        range: &DateRange,
        order_ids: Option<&[i32]>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        let t = self.lock()?;
        let counted = |order_id: i32| {
            t.orders.get(&order_id).is_some_and(|order| {
                order.status == OrderStatus::Completed
                    && range.contains(order.order_date)
                    && order_ids.map_or(true, |ids| ids.contains(&order_id))
            })
        };

        let mut matched = false;
        let mut total = BigDecimal::zero();
        for line in t.lines.values() {
            let owner = t.order_items.get(&line.order_item_id).copied();
            if owner.is_some_and(counted) {
                matched = true;
                total += line.subtotal();
            }
        }
        Ok(matched.then_some(total))
    }
}
