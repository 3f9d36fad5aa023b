use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompanyExpense {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub company_id: u64,

    #[schema(example = "Aluguel do escritório")]
    pub description: String,

    #[schema(example = "infraestrutura", nullable = true)]
    pub category: Option<String>,

    #[schema(example = 2200.0)]
    pub amount: f64,

    /// monthly | annual | one_time; drives the recurring projection in
    /// the reports summary.
    #[schema(example = "monthly")]
    pub billing_cycle: String,

    #[schema(example = "2026-06-05", value_type = String, format = "date")]
    pub due_date: NaiveDate,

    #[schema(example = "2026-06-04", value_type = String, format = "date", nullable = true)]
    pub paid_date: Option<NaiveDate>,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "2026-05-01T00:00:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
