use bigdecimal::BigDecimal;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Numeric};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::OrderStatus;
use crate::domain::ports::RevenueRepository;
use crate::domain::revenue::DateRange;
use crate::schema::{order_item_books, order_items, orders};

#[derive(Clone)]
pub struct DieselRevenueRepository {
    pool: DbPool,
}

impl DieselRevenueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RevenueRepository for DieselRevenueRepository {
    fn completed_revenue(
        &self,
        range: &DateRange,
        order_ids: Option<&[i32]>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = order_item_books::table
            .inner_join(order_items::table.inner_join(orders::table))
            .filter(orders::status.eq(OrderStatus::Completed.as_str()))
            .filter(orders::order_date.between(range.start(), range.end()))
            .select(sql::<Nullable<Numeric>>(
                "SUM(order_item_books.quantity * order_item_books.price_at_order)",
            ))
            .into_boxed();

        if let Some(ids) = order_ids {
            query = query.filter(orders::id.eq_any(ids.to_vec()));
        }

        let total: Option<BigDecimal> = query.get_result(&mut conn)?;
        log::debug!("completed revenue for {}: {:?}", range, total);
        Ok(total)
    }
}
