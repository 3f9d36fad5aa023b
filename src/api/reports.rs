use crate::auth::auth::AuthUser;
use crate::model::payable::BillingCycle;
use crate::utils::date_filters::{
    DateRange, Period, calculate_comparison_range, calculate_date_range,
    count_recurrence_in_period,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use moka::future::Cache;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::time::Duration;
use utoipa::{IntoParams, ToSchema};

/// Dashboards poll this endpoint; one summary per company and period is
/// plenty fresh at 60s.
static SUMMARY_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(60))
        .build()
});

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// Named period token; unknown tokens fall back to 30_days.
    #[schema(example = "this_month")]
    pub period: Option<String>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct PayableTotals {
    #[schema(example = 9000.0)]
    pub amount: f64,
    #[schema(example = 3)]
    pub row_count: i64,
    #[schema(example = 450.0)]
    pub overdue_amount: f64,
    #[schema(example = 1)]
    pub overdue_count: i64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct PeriodTotals {
    pub team_payments: PayableTotals,
    pub partner_commissions: PayableTotals,
    pub company_expenses: PayableTotals,
    #[schema(example = 11650.0)]
    pub total_outflow: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(example = "this_month")]
    pub period: String,
    #[schema(example = "2026-05-01", value_type = String, format = "date", nullable = true)]
    pub start: Option<NaiveDate>,
    #[schema(example = "2026-05-20", value_type = String, format = "date", nullable = true)]
    pub end: Option<NaiveDate>,
    pub current: PeriodTotals,
    /// Same totals over the immediately preceding window; absent for the
    /// all-time period.
    pub previous: Option<PeriodTotals>,
    /// Approximate cost of recurring expenses inside the window, without
    /// materializing occurrence rows. Absent for the all-time period.
    #[schema(example = 2200.0, nullable = true)]
    pub recurring_expense_projection: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct TotalsRow {
    total_amount: f64,
    total_count: i64,
}

async fn table_totals(
    pool: &MySqlPool,
    table: &str,
    company_id: u64,
    bounds: Option<(NaiveDate, NaiveDate)>,
    status: Option<&str>,
) -> Result<TotalsRow, sqlx::Error> {
    let mut sql = format!(
        "SELECT COALESCE(SUM(amount), 0) AS total_amount, COUNT(*) AS total_count \
         FROM {} WHERE company_id = ?",
        table
    );
    if bounds.is_some() {
        sql.push_str(" AND due_date >= ? AND due_date <= ?");
    }
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }

    let mut query = sqlx::query_as::<_, TotalsRow>(&sql).bind(company_id);
    if let Some((start, end)) = bounds {
        query = query.bind(start).bind(end);
    }
    if let Some(status) = status {
        query = query.bind(status);
    }

    query.fetch_one(pool).await
}

async fn payable_totals(
    pool: &MySqlPool,
    table: &str,
    company_id: u64,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<PayableTotals, sqlx::Error> {
    let all = table_totals(pool, table, company_id, bounds, None).await?;
    let overdue = table_totals(pool, table, company_id, bounds, Some("overdue")).await?;

    Ok(PayableTotals {
        amount: all.total_amount,
        row_count: all.total_count,
        overdue_amount: overdue.total_amount,
        overdue_count: overdue.total_count,
    })
}

async fn period_totals(
    pool: &MySqlPool,
    company_id: u64,
    range: &DateRange,
) -> Result<PeriodTotals, sqlx::Error> {
    let bounds = range.date_bounds();

    let team_payments = payable_totals(pool, "team_payments", company_id, bounds).await?;
    let partner_commissions =
        payable_totals(pool, "partner_commissions", company_id, bounds).await?;
    let company_expenses = payable_totals(pool, "company_expenses", company_id, bounds).await?;

    let total_outflow = team_payments.amount + partner_commissions.amount + company_expenses.amount;

    Ok(PeriodTotals {
        team_payments,
        partner_commissions,
        company_expenses,
        total_outflow,
    })
}

async fn recurring_projection(
    pool: &MySqlPool,
    company_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64, sqlx::Error> {
    let rows = sqlx::query_as::<_, (f64, String)>(
        r#"
        SELECT amount, billing_cycle
        FROM company_expenses
        WHERE company_id = ? AND billing_cycle <> 'one_time'
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let projection = rows
        .iter()
        .map(|(amount, cycle)| {
            let cycle = cycle.parse().unwrap_or(BillingCycle::OneTime);
            amount * f64::from(count_recurrence_in_period(cycle, start, end))
        })
        .sum();

    Ok(projection)
}

/// Period summary for the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(ReportQuery),
    responses(
        (status = 200, description = "Totals for the requested period", body = SummaryResponse),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let period = Period::parse(query.period.as_deref().unwrap_or_default());

    let cache_key = format!("{}:{}", auth.company_id, period);
    if let Some(body) = SUMMARY_CACHE.get(&cache_key).await {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(body));
    }

    let now = Utc::now();
    let range = calculate_date_range(period, now);

    let current = period_totals(pool.get_ref(), auth.company_id, &range)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to compute period totals");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let previous = match calculate_comparison_range(&range) {
        Some(prior) => Some(
            period_totals(pool.get_ref(), auth.company_id, &prior)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to compute comparison totals");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?,
        ),
        // All-time: no comparison window, skip the dependent computation.
        None => None,
    };

    let recurring_expense_projection = match range.date_bounds() {
        Some((start, end)) => Some(
            recurring_projection(pool.get_ref(), auth.company_id, start, end)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to compute recurring projection");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?,
        ),
        None => None,
    };

    let response = SummaryResponse {
        period: period.to_string(),
        start: range.start.map(|s| s.date_naive()),
        end: range.end.map(|e| e.date_naive()),
        current,
        previous,
        recurring_expense_projection,
    };

    let body = serde_json::to_string(&response)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    SUMMARY_CACHE.insert(cache_key, body.clone()).await;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
