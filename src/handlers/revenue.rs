use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tera::Context;
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;
use crate::state::{AppState, REVENUE_TEMPLATE};

#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueParams {
    /// Inclusive start, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive end, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

impl RevenueParams {
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut params, (key, value)| {
                match key.as_str() {
                    "start_date" => params.start_date = Some(value),
                    "end_date" => params.end_date = Some(value),
                    _ => {}
                }
                params
            })
    }

    fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.start_date) && blank(&self.end_date)
    }
}

/// Outcome of a revenue query. Exactly one of `total_revenue` and
/// `error_message` is set once a query was attempted; both are empty for a
/// blank form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevenueResponse {
    pub start_date: String,
    pub end_date: String,
    /// Decimal string with two places, e.g. "1234.50"
    pub total_revenue: Option<String>,
    pub error_message: Option<String>,
}

async fn evaluate(state: web::Data<AppState>, params: RevenueParams) -> Result<RevenueResponse, AppError> {
    let mut response = RevenueResponse {
        start_date: params.start_date.clone().unwrap_or_default(),
        end_date: params.end_date.clone().unwrap_or_default(),
        total_revenue: None,
        error_message: None,
    };
    if params.is_blank() {
        return Ok(response);
    }

    let result = web::block(move || {
        state
            .revenue
            .revenue_for(params.start_date.as_deref(), params.end_date.as_deref())
    })
    .await?;

    match result {
        Ok(report) => response.total_revenue = Some(report.total.to_string()),
        Err(e) if e.is_user_facing() => {
            log::debug!("revenue query rejected: {}", e);
            response.error_message = Some(e.to_string());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(response)
}

/// GET /revenue
///
/// HTML page with the date form. Validation problems are shown on the page
/// rather than reported through the status code.
pub async fn revenue_index(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let params = RevenueParams::from_pairs(query.into_inner());
    let response = evaluate(state.clone(), params).await?;
    let context = Context::from_serialize(&response)?;
    let body = state.templates.render(REVENUE_TEMPLATE, &context)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// GET /api/revenue
#[utoipa::path(
    get,
    path = "/api/revenue",
    params(RevenueParams),
    responses(
        (status = 200, description = "Revenue total or a validation message", body = RevenueResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "revenue"
)]
pub async fn revenue_summary(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let params = RevenueParams::from_pairs(query.into_inner());
    let response = evaluate(state, params).await?;
    Ok(HttpResponse::Ok().json(response))
}
