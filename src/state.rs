use std::sync::Arc;

use tera::Tera;

use crate::application::{InventoryService, RevenueService};
use crate::db::DbPool;
use crate::domain::ports::{BookRepository, OrderRepository, RevenueRepository};
use crate::infrastructure::{
    DieselBookRepository, DieselOrderRepository, DieselRevenueRepository, InMemoryStore,
};

pub type SharedInventory = InventoryService<Arc<dyn BookRepository>, Arc<dyn OrderRepository>>;
pub type SharedRevenue = RevenueService<Arc<dyn RevenueRepository>>;

pub const REVENUE_TEMPLATE: &str = "revenue.html";

/// Everything a request handler needs, shared across actix workers.
pub struct AppState {
    pub inventory: SharedInventory,
    pub revenue: SharedRevenue,
    pub templates: Tera,
}

impl AppState {
    pub fn new(
        books: Arc<dyn BookRepository>,
        orders: Arc<dyn OrderRepository>,
        revenue: Arc<dyn RevenueRepository>,
    ) -> Result<Self, tera::Error> {
        Ok(Self {
            inventory: InventoryService::new(books, orders),
            revenue: RevenueService::new(revenue),
            templates: templates()?,
        })
    }

    pub fn with_pool(pool: DbPool) -> Result<Self, tera::Error> {
        Self::new(
            Arc::new(DieselBookRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselRevenueRepository::new(pool)),
        )
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Result<Self, tera::Error> {
        Self::new(store.clone(), store.clone(), store)
    }
}

/// Templates are compiled into the binary so the server does not depend on
/// its working directory.
pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(REVENUE_TEMPLATE, include_str!("../templates/revenue.html"))?;
    Ok(tera)
}
