use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TeamPayment {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub company_id: u64,

    /// Null for service payments not tied to a registered member.
    #[schema(example = 1, nullable = true)]
    pub team_member_id: Option<u64>,

    #[schema(example = "salary")]
    pub payment_type: String,

    #[schema(example = "Salário 05/2026", nullable = true)]
    pub description: Option<String>,

    #[schema(example = 3000.0)]
    pub amount: f64,

    /// First-of-month date the payment logically belongs to, distinct from
    /// its due date.
    #[schema(example = "2026-05-01", value_type = String, format = "date")]
    pub reference_month: NaiveDate,

    #[schema(example = "2026-06-10", value_type = String, format = "date")]
    pub due_date: NaiveDate,

    #[schema(example = "2026-06-09", value_type = String, format = "date", nullable = true)]
    pub paid_date: Option<NaiveDate>,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "2026-05-01T00:00:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
