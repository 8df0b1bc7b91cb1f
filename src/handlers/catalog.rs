use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::book::Book;
use crate::domain::order::{LineItemView, OrderItemView, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub name: String,
    pub author: String,
    /// Decimal price as a string, e.g. "19.99"
    pub price: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            author: book.author,
            price: book.price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineResponse {
    pub id: i32,
    pub book_id: i32,
    pub book_name: String,
    pub quantity: i32,
    pub price_at_order: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub lines: Vec<LineResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    /// `YYYY-MM-DD`
    pub order_date: String,
    pub status: String,
    /// Σ quantity × price_at_order over all lines.
    pub revenue: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<LineItemView> for LineResponse {
    fn from(view: LineItemView) -> Self {
        Self {
            id: view.line.id,
            book_id: view.line.book_id,
            book_name: view.book_name,
            quantity: view.line.quantity,
            price_at_order: view.line.price_at_order.to_string(),
        }
    }
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        Self {
            id: item.id,
            lines: item.lines.into_iter().map(LineResponse::from).collect(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let revenue = view.revenue().to_string();
        Self {
            id: view.order.id,
            order_date: view.order.order_date.to_string(),
            status: view.order.status.to_string(),
            revenue,
            items: view.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/books
#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books", body = Vec<BookResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_books(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let books = web::block(move || state.inventory.list_books()).await??;
    let body: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/orders
///
/// Every order with its items and line entries.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders", body = Vec<OrderResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || state.inventory.list_orders()).await??;
    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || state.inventory.find_order(order_id)).await??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
