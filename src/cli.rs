//! Interactive management menu behind the `manage_orders` binary.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::application::InventoryService;
use crate::domain::book::{BookChanges, Price};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, Quantity};
use crate::domain::ports::{BookRepository, OrderRepository};

const MENU: &str = "
=== Bookstore Management ===
1. Add a new book
2. Update a book
3. Delete a book
4. Create a new order
5. Update an order
6. Delete an order
7. Add books to an order
8. View all orders
9. View all books
10. Exit";

pub struct Menu<'a, B, O, R, W> {
    inventory: &'a InventoryService<B, O>,
    input: R,
    output: W,
}

impl<'a, B, O, R, W> Menu<'a, B, O, R, W>
where
    B: BookRepository,
    O: OrderRepository,
    R: BufRead,
    W: Write,
{
    pub fn new(inventory: &'a InventoryService<B, O>, input: R, output: W) -> Self {
        Self {
            inventory,
            input,
            output,
        }
    }

    /// Loops until "10" is chosen or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let keep_going = match choice.trim() {
                "1" => self.add_book()?,
                "2" => self.update_book()?,
                "3" => self.delete_book()?,
                "4" => self.create_order()?,
                "5" => self.update_order()?,
                "6" => self.delete_order()?,
                "7" => self.add_books_to_order()?,
                "8" => self.view_orders()?,
                "9" => self.view_books()?,
                "10" => {
                    writeln!(self.output, "Exiting program.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// `None` once the input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_id(&mut self, label: &str, what: &str) -> io::Result<Option<Option<i32>>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i32>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                writeln!(self.output, "❌ {} ID must be a number.", what)?;
                Ok(Some(None))
            }
        }
    }

    fn report(&mut self, err: DomainError) -> io::Result<bool> {
        log::debug!("menu operation failed: {:?}", err);
        writeln!(self.output, "{}", err)?;
        Ok(true)
    }

    fn add_book(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter book name: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter book author: ")? else {
            return Ok(false);
        };
        let Some(raw_price) = self.prompt("Enter book price: ")? else {
            return Ok(false);
        };
        let price = match Price::from_str(&raw_price) {
            Ok(price) => price,
            Err(err) => return self.report(err),
        };

        match self.inventory.create_book(&name, &author, price) {
            Ok((book, true)) => writeln!(self.output, "Book '{}' added successfully!", book.name)?,
            Ok((book, false)) => writeln!(self.output, "Book '{}' already exists!", book.name)?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn update_book(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt_id("Enter the Book ID to update: ", "Book")? else {
            return Ok(false);
        };
        let Some(id) = id else {
            return Ok(true);
        };
        let Some(name) = self.prompt("Enter new book name (or leave blank): ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter new author (or leave blank): ")? else {
            return Ok(false);
        };
        let Some(raw_price) = self.prompt("Enter new price (or leave blank): ")? else {
            return Ok(false);
        };

        let price = match raw_price.trim() {
            "" => None,
            raw => match Price::from_str(raw) {
                Ok(price) => Some(price),
                Err(err) => return self.report(err),
            },
        };
        let non_blank = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        let changes = BookChanges {
            name: non_blank(name),
            author: non_blank(author),
            price,
        };

        match self.inventory.update_book(id, changes) {
            Ok(book) => writeln!(self.output, "Book '{}' updated successfully!", book.id)?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn delete_book(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt_id("Enter the Book ID to delete: ", "Book")? else {
            return Ok(false);
        };
        let Some(id) = id else {
            return Ok(true);
        };
        match self.inventory.delete_book(id) {
            Ok(()) => writeln!(self.output, "Book '{}' deleted successfully!", id)?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn create_order(&mut self) -> io::Result<bool> {
        let Some(raw_date) =
            self.prompt("Enter order date (YYYY-MM-DD or YYYY-MM-DD HH:MM) or blank for today: ")?
        else {
            return Ok(false);
        };
        let order_date = match raw_date.trim() {
            "" => None,
            raw => {
                let parsed = parse_order_date(raw);
                if parsed.is_none() {
                    writeln!(self.output, "Invalid date format. Using today's date instead.")?;
                }
                parsed
            }
        };

        let Some(raw_status) =
            self.prompt("Enter status (PENDING, COMPLETED, CANCELLED) or blank for default: ")?
        else {
            return Ok(false);
        };
        let status = match raw_status.trim() {
            "" => None,
            raw => match raw.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    writeln!(self.output, "Invalid status; using default PENDING.")?;
                    None
                }
            },
        };

        match self.inventory.create_order(order_date, status) {
            Ok(order) => writeln!(
                self.output,
                "Order {} created with date {} and status {}.",
                order.id, order.order_date, order.status
            )?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn update_order(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt_id("Enter the Order ID to update: ", "Order")? else {
            return Ok(false);
        };
        let Some(id) = id else {
            return Ok(true);
        };
        let Some(raw_status) =
            self.prompt("Enter new status (PENDING, COMPLETED, CANCELLED) or blank to skip: ")?
        else {
            return Ok(false);
        };
        let status = match raw_status.trim() {
            "" => None,
            raw => match raw.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    writeln!(self.output, "Invalid status; skipping update.")?;
                    None
                }
            },
        };

        match self.inventory.update_order(id, status) {
            Ok(order) => writeln!(
                self.output,
                "Order '{}' updated successfully! (Status: {})",
                order.id, order.status
            )?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn delete_order(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt_id("Enter the Order ID to delete: ", "Order")? else {
            return Ok(false);
        };
        let Some(id) = id else {
            return Ok(true);
        };
        match self.inventory.delete_order(id) {
            Ok(()) => writeln!(self.output, "Order '{}' deleted successfully!", id)?,
            Err(err) => return self.report(err),
        }
        Ok(true)
    }

    fn add_books_to_order(&mut self) -> io::Result<bool> {
        let mut numbers = Vec::with_capacity(3);
        for label in ["Enter order ID: ", "Enter book ID: ", "Enter quantity: "] {
            let Some(raw) = self.prompt(label)? else {
                return Ok(false);
            };
            match raw.trim().parse::<i64>() {
                Ok(n) => numbers.push(n),
                Err(_) => {
                    writeln!(self.output, "Invalid ID or quantity. Must be a number.")?;
                    return Ok(true);
                }
            }
        }
        let (Ok(order_id), Ok(book_id)) = (i32::try_from(numbers[0]), i32::try_from(numbers[1]))
        else {
            writeln!(self.output, "Invalid ID or quantity. Must be a number.")?;
            return Ok(true);
        };
        let quantity = match Quantity::new(numbers[2]) {
            Ok(quantity) => quantity,
            Err(err) => return self.report(err),
        };

        match self.inventory.add_order_item(order_id, book_id, quantity, None) {
            Ok(added) => writeln!(
                self.output,
                "Added {} x '{}' to Order {}.",
                added.line.quantity, added.book_name, order_id
            )?,
            Err(err) => {
                writeln!(self.output, "Error: {}", err)?;
            }
        }
        Ok(true)
    }

    fn view_orders(&mut self) -> io::Result<bool> {
        let orders = match self.inventory.list_orders() {
            Ok(orders) => orders,
            Err(err) => return self.report(err),
        };
        if orders.is_empty() {
            writeln!(self.output, "No orders found")?;
            return Ok(true);
        }

        for view in orders {
            let order = &view.order;
            writeln!(
                self.output,
                "\nID: {} - Order {} - {} - {}",
                order.id, order.id, order.status, order.order_date
            )?;
            for entry in view.items.iter().flat_map(|item| item.lines.iter()) {
                writeln!(
                    self.output,
                    "   - Book: {} | Qty: {} | Price at Order: ${}",
                    entry.book_name, entry.line.quantity, entry.line.price_at_order
                )?;
            }
        }
        Ok(true)
    }

    fn view_books(&mut self) -> io::Result<bool> {
        let books = match self.inventory.list_books() {
            Ok(books) => books,
            Err(err) => return self.report(err),
        };
        if books.is_empty() {
            writeln!(self.output, "No books found.")?;
            return Ok(true);
        }

        writeln!(self.output, "\n=== All Books ===")?;
        for book in books {
            writeln!(
                self.output,
                "ID: {} | Name: {} | Author: {} | Price: {}",
                book.id, book.name, book.author, book.price
            )?;
        }
        Ok(true)
    }
}

/// Accepts a plain date or a date with a time of day; the time is dropped.
fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}
