use bigdecimal::BigDecimal;

use crate::domain::book::round_cents;
use crate::domain::errors::DomainError;
use crate::domain::ports::RevenueRepository;
use crate::domain::revenue::{DateRange, RevenueQueryError, RevenueReport};

pub struct RevenueService<R> {
    repo: R,
}

impl<R: RevenueRepository> RevenueService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates the raw inputs and sums completed-order revenue over the
    /// inclusive range. Nothing is queried unless validation passes.
    pub fn revenue_for(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<RevenueReport, RevenueQueryError> {
        let range = DateRange::parse(start_date, end_date)?;
        self.revenue_in(range)
    }

    pub fn revenue_in(&self, range: DateRange) -> Result<RevenueReport, RevenueQueryError> {
        let total = self
            .total_for(&range, None)?
            .ok_or(RevenueQueryError::NoOrdersFound)?;
        log::info!("revenue for {}: {}", range, total);
        Ok(RevenueReport { range, total })
    }

    /// The raw aggregation, rounded to cents; `None` when no line matched.
    pub fn total_for(
        &self,
        range: &DateRange,
        order_ids: Option<&[i32]>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        Ok(self
            .repo
            .completed_revenue(range, order_ids)?
            .map(|total| round_cents(&total)))
    }
}
