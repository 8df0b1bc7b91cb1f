//! Synthetic order data with a built-in revenue cross-check.
//!
//! Every generated order is COMPLETED, dated inside a one-year window and
//! holds a single item with `(i % 3) + 1` lines. After writing, the revenue is
//! re-derived from the store and compared with the running total.

use bigdecimal::{BigDecimal, Zero};
use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::application::{InventoryService, RevenueService};
use crate::domain::book::{round_cents, Price};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, Quantity};
use crate::domain::ports::{BookRepository, OrderRepository, RevenueRepository};
use crate::domain::revenue::DateRange;

pub const BOOK_TITLES: [&str; 20] = [
    "Shadows of the Forgotten",
    "The Clockmaker’s Secret",
    "Echoes of a Distant Star",
    "Beneath the Crimson Sky",
    "The Last Library",
    "Whispers in the Fog",
    "The Alchemist’s Apprentice",
    "Lost in the Labyrinth",
    "The Moonstone Prophecy",
    "A Tale of Two Dimensions",
    "Secrets of the Hidden Valley",
    "The Enchanted Quill",
    "Winds of the Eternal Sea",
    "The Time Traveler’s Dilemma",
    "Legends of the Starborn",
    "The Silent Watcher",
    "Curse of the Silver Phoenix",
    "The Forgotten Manuscript",
    "Echoes from the Abyss",
    "The Guardian’s Oath",
];

pub const PLACEHOLDER_AUTHOR: &str = "Test Author";

/// Line prices are drawn from this range of cents, i.e. $10.00 to $30.00.
const PRICE_CENTS: std::ops::RangeInclusive<i64> = 1_000..=3_000;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid generator window: {0}")]
    Window(String),
    #[error("revenue mismatch: expected {expected}, store reports {actual}")]
    RevenueMismatch {
        expected: BigDecimal,
        actual: BigDecimal,
    },
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_orders: usize,
    pub seed: Option<u64>,
    pub window_start: NaiveDate,
    /// Exclusive.
    pub window_end: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_orders: 100,
            seed: None,
            window_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            window_end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MAX),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub order_ids: Vec<i32>,
    pub line_count: usize,
    /// Running total accumulated while generating.
    pub expected_revenue: BigDecimal,
    /// Re-derived from the store after every row was written.
    pub actual_revenue: BigDecimal,
}

pub fn generate_orders<B, O, R>(
    inventory: &InventoryService<B, O>,
    revenue: &RevenueService<R>,
    config: &GeneratorConfig,
) -> Result<GenerationReport, GeneratorError>
where
    B: BookRepository,
    O: OrderRepository,
    R: RevenueRepository,
{
    let total_days = (config.window_end - config.window_start).num_days();
    if total_days <= 0 {
        return Err(GeneratorError::Window(format!(
            "{} is not before {}",
            config.window_start, config.window_end
        )));
    }

    let mut rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut expected = BigDecimal::zero();
    let mut order_ids = Vec::with_capacity(config.num_orders);
    let mut line_count = 0;
    let mut book_counter = 0usize;

    for i in 0..config.num_orders {
        let order_date = config.window_start + Duration::days(rng.i64(0..total_days));
        let order = inventory.create_order(Some(order_date), Some(OrderStatus::Completed))?;

        let books_in_order = (i % 3) + 1;
        for j in 0..books_in_order {
            let title = BOOK_TITLES[book_counter % BOOK_TITLES.len()];
            book_counter += 1;

            // Titles are matched on name alone; the placeholder author and
            // price only apply to books that do not exist yet.
            let catalog_price = Price::from_cents(rng.i64(PRICE_CENTS))?;
            let book = match inventory.find_book_by_name(title)? {
                Some(book) => book,
                None => inventory.create_book(title, PLACEHOLDER_AUTHOR, catalog_price)?.0,
            };

            let price = Price::from_cents(rng.i64(PRICE_CENTS))?;
            let quantity = Quantity::new(((i + j) % 5) as i64 + 1)?;

            let added = inventory.add_order_item(order.id, book.id, quantity, Some(price))?;
            let line = added.line;
            expected += line.subtotal();
            line_count += 1;

            log::info!(
                "order {} ({}): {} x '{}' at {}",
                order.id,
                order.order_date,
                line.quantity,
                book.name,
                line.price_at_order
            );
        }
        order_ids.push(order.id);
    }

    let range = DateRange::new(config.window_start, config.window_end)
        .map_err(|e| GeneratorError::Window(e.to_string()))?;
    let actual = revenue
        .total_for(&range, Some(order_ids.as_slice()))?
        .unwrap_or_else(BigDecimal::zero);
    let expected = round_cents(&expected);
    let actual = round_cents(&actual);

    if expected != actual {
        return Err(GeneratorError::RevenueMismatch { expected, actual });
    }

    log::info!(
        "generated {} orders with {} lines, revenue {}",
        order_ids.len(),
        line_count,
        actual
    );
    Ok(GenerationReport {
        order_ids,
        line_count,
        expected_revenue: expected,
        actual_revenue: actual,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::InMemoryStore;

    type Services = (
        Arc<InMemoryStore>,
        InventoryService<Arc<InMemoryStore>, Arc<InMemoryStore>>,
        RevenueService<Arc<InMemoryStore>>,
    );

    fn services() -> Services {
        let store = Arc::new(InMemoryStore::new());
        (
            store.clone(),
            InventoryService::new(store.clone(), store.clone()),
            RevenueService::new(store),
        )
    }

    fn seeded(num_orders: usize, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            num_orders,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn hundred_orders_match_the_aggregated_revenue() {
        let (store, inventory, revenue) = services();
        let report = generate_orders(&inventory, &revenue, &seeded(100, 42)).unwrap();

        assert_eq!(report.order_ids.len(), 100);
        // 34 orders with one line, 33 with two, 33 with three.
        assert_eq!(report.line_count, 34 + 33 * 2 + 33 * 3);
        assert_eq!(report.expected_revenue, report.actual_revenue);

        let query = revenue.revenue_for(Some("2024-01-01"), Some("2025-01-01")).unwrap();
        assert_eq!(query.total, report.expected_revenue);

        let (books, orders, items, lines) = store.counts().unwrap();
        assert_eq!((books, orders, items, lines), (20, 100, 100, report.line_count));
    }

    #[test]
    fn orders_follow_the_generation_pattern() {
        let (store, inventory, revenue) = services();
        let config = seeded(12, 7);
        generate_orders(&inventory, &revenue, &config).unwrap();

        let views = OrderRepository::list(&*store).unwrap();
        let mut counter = 0;
        for (i, view) in views.iter().enumerate() {
            assert_eq!(view.order.status, OrderStatus::Completed);
            assert!(view.order.order_date >= config.window_start);
            assert!(view.order.order_date < config.window_end);
            assert_eq!(view.items.len(), 1, "exactly one item per order");

            let lines = &view.items[0].lines;
            assert_eq!(lines.len(), i % 3 + 1);
            for (j, line) in lines.iter().enumerate() {
                assert_eq!(line.book_name, BOOK_TITLES[counter % BOOK_TITLES.len()]);
                counter += 1;
                assert_eq!(line.line.quantity as usize, (i + j) % 5 + 1);
                assert!(line.line.quantity > 0);
                assert!(line.line.price_at_order >= BigDecimal::from(10));
                assert!(line.line.price_at_order <= BigDecimal::from(30));
            }
        }
    }

    #[test]
    fn same_seed_gives_same_data() {
        let snapshot = |seed| {
            let (store, inventory, revenue) = services();
            generate_orders(&inventory, &revenue, &seeded(30, seed)).unwrap();
            OrderRepository::list(&*store)
                .unwrap()
                .into_iter()
                .map(|view| {
                    let prices: Vec<BigDecimal> = view.items[0]
                        .lines
                        .iter()
                        .map(|l| l.line.price_at_order.clone())
                        .collect();
                    (view.order.order_date, prices)
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(snapshot(1234), snapshot(1234));
        assert_ne!(snapshot(1234), snapshot(4321));
    }

    #[test]
    fn self_check_ignores_pre_existing_orders() {
        let (_, inventory, revenue) = services();
        let (book, _) = inventory
            .create_book("Unrelated", "Someone", Price::from_cents(5_000).unwrap())
            .unwrap();
        let order = inventory
            .create_order(NaiveDate::from_ymd_opt(2024, 6, 1), Some(OrderStatus::Completed))
            .unwrap();
        inventory
            .add_order_item(order.id, book.id, Quantity::new(3).unwrap(), None)
            .unwrap();

        let report = generate_orders(&inventory, &revenue, &seeded(10, 9)).unwrap();
        assert_eq!(report.expected_revenue, report.actual_revenue);
    }

    #[test]
    fn existing_titles_are_reused_whatever_their_author() {
        let (store, inventory, revenue) = services();
        let (existing, _) = inventory
            .create_book(BOOK_TITLES[0], "Real Author", Price::from_cents(2_500).unwrap())
            .unwrap();

        generate_orders(&inventory, &revenue, &seeded(12, 3)).unwrap();

        let books = inventory.list_books().unwrap();
        assert_eq!(books.len(), BOOK_TITLES.len());
        let copies: Vec<_> = books.iter().filter(|b| b.name == BOOK_TITLES[0]).collect();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].author, "Real Author");

        let first_line = &OrderRepository::list(&*store).unwrap()[0].items[0].lines[0];
        assert_eq!(first_line.line.book_id, existing.id);
    }

    #[test]
    fn empty_window_is_rejected() {
        let (_, inventory, revenue) = services();
        let config = GeneratorConfig {
            window_end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ..seeded(5, 1)
        };
        assert!(matches!(
            generate_orders(&inventory, &revenue, &config),
            Err(GeneratorError::Window(_))
        ));
    }
}
