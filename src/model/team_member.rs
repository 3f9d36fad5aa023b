use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentType {
    Fixed,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Inactive,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "company_id": 7,
        "name": "Maria Souza",
        "email": "maria@empresa.com.br",
        "monthly_salary": 3000.0,
        "payment_day": 10,
        "employment_type": "fixed",
        "status": "active"
    })
)]
pub struct TeamMember {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub company_id: u64,

    #[schema(example = "Maria Souza")]
    pub name: String,

    #[schema(example = "maria@empresa.com.br", nullable = true)]
    pub email: Option<String>,

    /// Only meaningful for fixed-salary members; the salary generator
    /// snapshots this value into each generated payment.
    #[schema(example = 3000.0, nullable = true)]
    pub monthly_salary: Option<f64>,

    #[schema(example = 10, nullable = true)]
    pub payment_day: Option<u8>,

    #[schema(example = "fixed")]
    pub employment_type: String,

    #[schema(example = "active")]
    pub status: String,
}
