use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompanySettings {
    #[schema(example = 7)]
    pub company_id: u64,

    /// Fallback due day used when a team member has no explicit
    /// payment_day. Absent settings fall back to day 10.
    #[schema(example = 10, nullable = true)]
    pub default_payment_day: Option<u8>,
}
