use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Book with ID {0} not found.")]
    BookNotFound(i32),
    #[error("Order with ID {0} not found.")]
    OrderNotFound(i32),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
