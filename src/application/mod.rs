pub mod inventory_service;
pub mod revenue_service;

pub use inventory_service::InventoryService;
pub use revenue_service::RevenueService;
