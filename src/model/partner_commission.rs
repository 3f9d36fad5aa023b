use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PartnerCommission {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub company_id: u64,

    #[schema(example = "Contabilidade Silva")]
    pub partner_name: String,

    #[schema(example = "Indicação cliente Acme", nullable = true)]
    pub description: Option<String>,

    #[schema(example = 450.0)]
    pub amount: f64,

    #[schema(example = "2026-06-15", value_type = String, format = "date")]
    pub due_date: NaiveDate,

    #[schema(example = "2026-06-14", value_type = String, format = "date", nullable = true)]
    pub paid_date: Option<NaiveDate>,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "2026-05-01T00:00:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
