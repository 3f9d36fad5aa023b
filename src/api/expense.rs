use crate::auth::auth::AuthUser;
use crate::api::team_payment::MarkPaid;
use crate::model::company_expense::CompanyExpense;
use crate::model::payable::{BillingCycle, PaymentStatus};
use chrono::{NaiveDate, Utc};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateExpense {
    #[schema(example = "Aluguel do escritório")]
    pub description: String,
    #[schema(example = "infraestrutura", nullable = true)]
    pub category: Option<String>,
    #[schema(example = 2200.0)]
    pub amount: f64,
    #[schema(example = "monthly")]
    pub billing_cycle: BillingCycle,
    #[schema(example = "2026-06-05", value_type = String, format = "date")]
    pub due_date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ExpenseQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<PaymentStatus>,
    #[schema(example = "monthly")]
    pub billing_cycle: Option<BillingCycle>,
}

#[derive(Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub data: Vec<CompanyExpense>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

/// Register an operational expense
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = CreateExpense,
    responses(
        (status = 201, description = "Expense created"),
        (status = 400),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn create_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateExpense>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.description.trim().is_empty() || payload.amount <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "description and a positive amount are required"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO company_expenses
        (company_id, description, category, amount, billing_cycle, due_date, status)
        VALUES (?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(auth.company_id)
    .bind(payload.description.trim())
    .bind(payload.category.as_deref())
    .bind(payload.amount)
    .bind(payload.billing_cycle.to_string())
    .bind(payload.due_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create expense");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Expense created successfully"
    })))
}

/// Paginated expense list
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Paginated expense list", body = ExpenseListResponse),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExpenseQuery>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let status = query.status.map(|s| s.to_string());
    let billing_cycle = query.billing_cycle.map(|c| c.to_string());

    let mut where_sql = String::from(" WHERE company_id = ?");
    if status.is_some() {
        where_sql.push_str(" AND status = ?");
    }
    if billing_cycle.is_some() {
        where_sql.push_str(" AND billing_cycle = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM company_expenses{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(auth.company_id);
    if let Some(status) = status.as_deref() {
        count_q = count_q.bind(status);
    }
    if let Some(cycle) = billing_cycle.as_deref() {
        count_q = count_q.bind(cycle);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM company_expenses{} ORDER BY due_date DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, CompanyExpense>(&data_sql).bind(auth.company_id);
    if let Some(status) = status.as_deref() {
        data_q = data_q.bind(status.to_owned());
    }
    if let Some(cycle) = billing_cycle.as_deref() {
        data_q = data_q.bind(cycle.to_owned());
    }

    let expenses = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch expense list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(ExpenseListResponse {
        data: expenses,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Mark an expense as paid
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{expense_id}/pay",
    params(
        ("expense_id" = u64, Path, description = "ID of the expense to settle")
    ),
    request_body = MarkPaid,
    responses(
        (status = 200, description = "Expense marked as paid"),
        (status = 400, description = "Expense not found or already paid"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn mark_expense_paid(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<MarkPaid>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let expense_id = path.into_inner();
    let paid_date = body.paid_date.unwrap_or_else(|| Utc::now().date_naive());

    let result = sqlx::query(
        r#"
        UPDATE company_expenses
        SET status = 'paid', paid_date = ?
        WHERE id = ?
        AND company_id = ?
        AND status IN ('pending', 'overdue')
        "#,
    )
    .bind(paid_date)
    .bind(expense_id)
    .bind(auth.company_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, expense_id, "Mark expense paid failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Expense not found or already paid"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Expense marked as paid"
    })))
}
