pub mod book_repo;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod revenue_repo;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use book_repo::DieselBookRepository;
pub use memory::InMemoryStore;
pub use order_repo::DieselOrderRepository;
pub use revenue_repo::DieselRevenueRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                DomainError::InvalidInput(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
