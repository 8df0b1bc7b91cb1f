pub mod catalog;
pub mod revenue;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        revenue::revenue_summary,
        catalog::list_books,
        catalog::list_orders,
        catalog::get_order,
    ),
    components(schemas(
        revenue::RevenueResponse,
        catalog::BookResponse,
        catalog::OrderResponse,
        catalog::OrderItemResponse,
        catalog::LineResponse,
    )),
    tags(
        (name = "revenue", description = "Revenue from completed orders"),
        (name = "catalog", description = "Read-only views of books and orders"),
    )
)]
pub struct ApiDoc;
