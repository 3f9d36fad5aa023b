use crate::auth::auth::AuthUser;
use crate::api::team_payment::MarkPaid;
use crate::model::partner_commission::PartnerCommission;
use crate::model::payable::PaymentStatus;
use chrono::{NaiveDate, Utc};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateCommission {
    #[schema(example = "Contabilidade Silva")]
    pub partner_name: String,
    #[schema(example = "Indicação cliente Acme", nullable = true)]
    pub description: Option<String>,
    #[schema(example = 450.0)]
    pub amount: f64,
    #[schema(example = "2026-06-15", value_type = String, format = "date")]
    pub due_date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CommissionQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<PaymentStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct CommissionListResponse {
    pub data: Vec<PartnerCommission>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

/// Register a partner commission
#[utoipa::path(
    post,
    path = "/api/v1/commissions",
    request_body = CreateCommission,
    responses(
        (status = 201, description = "Commission created"),
        (status = 400),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Commission"
)]
pub async fn create_commission(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCommission>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.partner_name.trim().is_empty() || payload.amount <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "partner_name and a positive amount are required"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO partner_commissions
        (company_id, partner_name, description, amount, due_date, status)
        VALUES (?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(auth.company_id)
    .bind(payload.partner_name.trim())
    .bind(payload.description.as_deref())
    .bind(payload.amount)
    .bind(payload.due_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create commission");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Commission created successfully"
    })))
}

/// Paginated commission list
#[utoipa::path(
    get,
    path = "/api/v1/commissions",
    params(CommissionQuery),
    responses(
        (status = 200, description = "Paginated commission list", body = CommissionListResponse),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Commission"
)]
pub async fn list_commissions(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CommissionQuery>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let status = query.status.map(|s| s.to_string());

    let mut where_sql = String::from(" WHERE company_id = ?");
    if status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM partner_commissions{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(auth.company_id);
    if let Some(status) = status.as_deref() {
        count_q = count_q.bind(status);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count commissions");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM partner_commissions{} ORDER BY due_date DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, PartnerCommission>(&data_sql).bind(auth.company_id);
    if let Some(status) = status.as_deref() {
        data_q = data_q.bind(status.to_owned());
    }

    let commissions = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch commission list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(CommissionListResponse {
        data: commissions,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Mark a commission as paid
#[utoipa::path(
    put,
    path = "/api/v1/commissions/{commission_id}/pay",
    params(
        ("commission_id" = u64, Path, description = "ID of the commission to settle")
    ),
    request_body = MarkPaid,
    responses(
        (status = 200, description = "Commission marked as paid"),
        (status = 400, description = "Commission not found or already paid"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Commission"
)]
pub async fn mark_commission_paid(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<MarkPaid>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let commission_id = path.into_inner();
    let paid_date = body.paid_date.unwrap_or_else(|| Utc::now().date_naive());

    let result = sqlx::query(
        r#"
        UPDATE partner_commissions
        SET status = 'paid', paid_date = ?
        WHERE id = ?
        AND company_id = ?
        AND status IN ('pending', 'overdue')
        "#,
    )
    .bind(paid_date)
    .bind(commission_id)
    .bind(auth.company_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, commission_id, "Mark commission paid failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Commission not found or already paid"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Commission marked as paid"
    })))
}
