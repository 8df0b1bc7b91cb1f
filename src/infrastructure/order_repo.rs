use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::book::Price;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    LineItemView, Order, OrderItemView, OrderStatus, OrderView, Quantity,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{books, order_item_books, order_items, orders};

use super::models::{
    BookRow, NewOrderItemBookRow, NewOrderRow, OrderItemBookRow, OrderItemRow, OrderRow,
};

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Loads items and line entries for `rows` and stitches them together,
/// keeping the order of `rows`.
fn load_views(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<OrderView>, DomainError> {
    let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&rows)
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load(conn)?;

    let lines: Vec<(OrderItemBookRow, BookRow)> = OrderItemBookRow::belonging_to(&items)
        .inner_join(books::table)
        .select((OrderItemBookRow::as_select(), BookRow::as_select()))
        .order(order_item_books::id.asc())
        .load(conn)?;

    let mut lines_by_item: HashMap<i32, Vec<LineItemView>> = items
        .iter()
        .map(|item| item.id)
        .zip(lines.grouped_by(&items))
        .map(|(item_id, lines)| {
            let views = lines
                .into_iter()
                .map(|(line, book)| LineItemView {
                    line: line.into(),
                    book_name: book.name,
                })
                .collect();
            (item_id, views)
        })
        .collect();

    let items_per_order = items.grouped_by(&rows);

    rows.into_iter()
        .zip(items_per_order)
        .map(|(order, items)| -> Result<OrderView, DomainError> {
            Ok(OrderView {
                order: Order::try_from(order)?,
                items: items
                    .into_iter()
                    .map(|item| OrderItemView {
                        id: item.id,
                        lines: lines_by_item.remove(&item.id).unwrap_or_default(),
                    })
                    .collect(),
            })
        })
        .collect()
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order_date: NaiveDate, status: OrderStatus) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                order_date,
                status: status.as_str(),
            })
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)?;

        Order::try_from(row)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(load_views(&mut conn, vec![order])?.pop())
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .select(OrderRow::as_select())
            .order(orders::id.asc())
            .load(&mut conn)?;

        load_views(&mut conn, rows)
    }

    fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(orders::table.find(id))
            .set(orders::status.eq(status.as_str()))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        row.map(Order::try_from).transpose()
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Items and their line entries follow through ON DELETE CASCADE.
        let deleted = diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn add_line(
        &self,
        order_id: i32,
        book_id: i32,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<LineItemView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_exists: bool =
                diesel::select(diesel::dsl::exists(orders::table.find(order_id))).get_result(conn)?;
            if !order_exists {
                return Err(DomainError::OrderNotFound(order_id));
            }

            let book = books::table
                .find(book_id)
                .select(BookRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::BookNotFound(book_id))?;

            let existing_item = order_items::table
                .filter(order_items::order_id.eq(order_id))
                .select(order_items::id)
                .order(order_items::id.asc())
                .first::<i32>(conn)
                .optional()?;

            let order_item_id = match existing_item {
                Some(id) => id,
                None => diesel::insert_into(order_items::table)
                    .values(order_items::order_id.eq(order_id))
                    .returning(order_items::id)
                    .get_result::<i32>(conn)?,
            };

            let price_at_order = price.map(Price::into_inner).unwrap_or(book.price);

            let row = diesel::insert_into(order_item_books::table)
                .values(&NewOrderItemBookRow {
                    order_item_id,
                    book_id: book.id,
                    quantity: quantity.get(),
                    price_at_order,
                })
                .returning(OrderItemBookRow::as_returning())
                .get_result(conn)?;

            Ok(LineItemView {
                line: row.into(),
                book_name: book.name,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use diesel::prelude::*;

    use super::DieselOrderRepository;
    use crate::domain::book::{NewBook, Price};
    use crate::domain::errors::DomainError;
    use crate::domain::order::{OrderStatus, Quantity};
    use crate::domain::ports::{BookRepository, OrderRepository};
    use crate::infrastructure::book_repo::DieselBookRepository;
    use crate::infrastructure::test_db::setup_db;
    use crate::schema::{order_item_books, order_items};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_book(repo: &DieselBookRepository, price: &str) -> i32 {
        repo.get_or_create(NewBook {
            name: "Test Book".to_string(),
            author: "Test Author".to_string(),
            price: Price::from_str(price).expect("valid price"),
        })
        .expect("create book failed")
        .0
        .id
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let order = repo
            .create(date(2024, 3, 9), OrderStatus::Pending)
            .expect("create failed");

        let view = repo
            .find_by_id(order.id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(view.order.status, OrderStatus::Pending);
        assert_eq!(view.order.order_date, date(2024, 3, 9));
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn add_line_snapshots_book_price_by_default() {
        let (_container, pool) = setup_db().await;
        let books = DieselBookRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool);
        let book_id = seed_book(&books, "15.00");
        let order = repo.create(date(2024, 1, 5), OrderStatus::Pending).unwrap();

        let line = repo
            .add_line(order.id, book_id, Quantity::new(2).unwrap(), None)
            .expect("add failed");

        assert_eq!(line.line.quantity, 2);
        assert_eq!(line.book_name, "Test Book");
        assert_eq!(line.line.price_at_order, BigDecimal::from_str("15.00").unwrap());

        let overridden = repo
            .add_line(
                order.id,
                book_id,
                Quantity::new(1).unwrap(),
                Some(Price::from_str("9.99").unwrap()),
            )
            .expect("add failed");
        assert_eq!(overridden.line.price_at_order, BigDecimal::from_str("9.99").unwrap());
    }

    #[tokio::test]
    async fn repeated_add_line_reuses_the_single_order_item() {
        let (_container, pool) = setup_db().await;
        let books = DieselBookRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool);
        let book_id = seed_book(&books, "10.00");
        let order = repo.create(date(2024, 1, 5), OrderStatus::Pending).unwrap();

        let first = repo.add_line(order.id, book_id, Quantity::new(1).unwrap(), None).unwrap();
        let second = repo.add_line(order.id, book_id, Quantity::new(3).unwrap(), None).unwrap();
        assert_eq!(first.line.order_item_id, second.line.order_item_id);

        let view = repo.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].lines.len(), 2);
        assert_eq!(view.items[0].lines[0].book_name, "Test Book");
        assert_eq!(view.revenue(), BigDecimal::from_str("40.00").unwrap());
    }

    #[tokio::test]
    async fn add_line_reports_missing_order_or_book() {
        let (_container, pool) = setup_db().await;
        let books = DieselBookRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let book_id = seed_book(&books, "10.00");
        let order = repo.create(date(2024, 1, 5), OrderStatus::Pending).unwrap();

        let err = repo.add_line(777, book_id, Quantity::new(1).unwrap(), None).unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(777)));

        let err = repo.add_line(order.id, 888, Quantity::new(1).unwrap(), None).unwrap_err();
        assert!(matches!(err, DomainError::BookNotFound(888)));

        // Nothing was written, not even the order item.
        let mut conn = pool.get().unwrap();
        let items: i64 = order_items::table.count().get_result(&mut conn).unwrap();
        assert_eq!(items, 0);
    }

    #[tokio::test]
    async fn delete_order_cascades_to_items_and_lines() {
        let (_container, pool) = setup_db().await;
        let books = DieselBookRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let book_id = seed_book(&books, "10.00");
        let order = repo.create(date(2024, 1, 5), OrderStatus::Completed).unwrap();
        repo.add_line(order.id, book_id, Quantity::new(1).unwrap(), None).unwrap();
        repo.add_line(order.id, book_id, Quantity::new(2).unwrap(), None).unwrap();

        assert!(repo.delete(order.id).expect("delete failed"));
        assert!(repo.find_by_id(order.id).unwrap().is_none());

        let mut conn = pool.get().unwrap();
        let items: i64 = order_items::table.count().get_result(&mut conn).unwrap();
        let lines: i64 = order_item_books::table.count().get_result(&mut conn).unwrap();
        assert_eq!((items, lines), (0, 0));

        // The book itself survives.
        assert!(books.find_by_id(book_id).unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_book_cascades_to_its_lines() {
        let (_container, pool) = setup_db().await;
        let books = DieselBookRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let book_id = seed_book(&books, "10.00");
        let order = repo.create(date(2024, 1, 5), OrderStatus::Completed).unwrap();
        repo.add_line(order.id, book_id, Quantity::new(1).unwrap(), None).unwrap();

        assert!(books.delete(book_id).unwrap());

        let view = repo.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(view.line_count(), 0);
    }

    #[tokio::test]
    async fn update_status_and_list() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let a = repo.create(date(2024, 2, 1), OrderStatus::Pending).unwrap();
        let b = repo.create(date(2024, 2, 2), OrderStatus::Pending).unwrap();

        let updated = repo
            .update_status(b.id, OrderStatus::Cancelled)
            .unwrap()
            .expect("order should exist");
        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert!(repo.update_status(4242, OrderStatus::Completed).unwrap().is_none());

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].order.id, a.id);
        assert_eq!(all[1].order.status, OrderStatus::Cancelled);
    }
}
