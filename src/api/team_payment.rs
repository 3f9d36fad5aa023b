use crate::auth::auth::AuthUser;
use crate::model::payable::{PaymentStatus, PaymentType};
use crate::model::team_payment::TeamPayment;
use crate::utils::date_filters::month_start;
use chrono::{NaiveDate, Utc};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateTeamPayment {
    /// Optional link to a registered member; service payments to outside
    /// contractors leave it null.
    #[schema(example = 1, nullable = true)]
    pub team_member_id: Option<u64>,

    #[schema(example = "service")]
    pub payment_type: PaymentType,

    #[schema(example = "Manutenção do site", nullable = true)]
    pub description: Option<String>,

    #[schema(example = 800.0)]
    pub amount: f64,

    /// Defaults to the first of the due date's month.
    #[schema(example = "2026-05-01", value_type = String, format = "date", nullable = true)]
    pub reference_month: Option<NaiveDate>,

    #[schema(example = "2026-06-10", value_type = String, format = "date")]
    pub due_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkPaid {
    /// Defaults to today.
    #[schema(example = "2026-06-09", value_type = String, format = "date", nullable = true)]
    pub paid_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeamPaymentQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
    #[schema(example = 1)]
    pub team_member_id: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<PaymentStatus>,
    #[schema(example = "salary")]
    pub payment_type: Option<PaymentType>,
    #[schema(example = "2026-05-01", value_type = String, format = "date")]
    pub reference_month: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct TeamPaymentListResponse {
    pub data: Vec<TeamPayment>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Register a manual team payment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreateTeamPayment,
    responses(
        (status = 201, description = "Payment created"),
        (status = 400, description = "Invalid payload"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "TeamPayment"
)]
pub async fn create_payment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTeamPayment>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.amount <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "amount must be positive"
        })));
    }

    let reference_month = payload
        .reference_month
        .map(month_start)
        .unwrap_or_else(|| month_start(payload.due_date));

    let result = sqlx::query(
        r#"
        INSERT INTO team_payments
        (company_id, team_member_id, payment_type, description, amount,
         reference_month, due_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(auth.company_id)
    .bind(payload.team_member_id)
    .bind(payload.payment_type.to_string())
    .bind(payload.description.as_deref())
    .bind(payload.amount)
    .bind(reference_month)
    .bind(payload.due_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(serde_json::json!({
            "message": "Payment created successfully"
        }))),
        Err(e) => {
            // Duplicate salary for the same member and reference month
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "A salary payment already exists for this member and month"
                    })));
                }
            }

            tracing::error!(error = %e, "Failed to create payment");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Paginated team payment list
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(TeamPaymentQuery),
    responses(
        (status = 200, description = "Paginated payment list", body = TeamPaymentListResponse),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "TeamPayment"
)]
pub async fn list_payments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TeamPaymentQuery>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE company_id = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::U64(auth.company_id)];

    if let Some(member_id) = query.team_member_id {
        where_sql.push_str(" AND team_member_id = ?");
        args.push(FilterValue::U64(member_id));
    }

    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(payment_type) = query.payment_type {
        where_sql.push_str(" AND payment_type = ?");
        args.push(FilterValue::Str(payment_type.to_string()));
    }

    if let Some(month) = query.reference_month {
        where_sql.push_str(" AND reference_month = ?");
        args.push(FilterValue::Date(month_start(month)));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM team_payments{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT *
        FROM team_payments
        {}
        ORDER BY due_date DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, TeamPayment>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let payments = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payment list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(TeamPaymentListResponse {
        data: payments,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Mark a payment as paid
///
/// `paid` is terminal: only pending or overdue payments transition, and a
/// paid row is never modified again.
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}/pay",
    params(
        ("payment_id" = u64, Path, description = "ID of the payment to settle")
    ),
    request_body = MarkPaid,
    responses(
        (status = 200, description = "Payment marked as paid", body = Object, example = json!({
            "message": "Payment marked as paid"
        })),
        (status = 400, description = "Payment not found or already paid", body = Object, example = json!({
            "message": "Payment not found or already paid"
        })),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "TeamPayment"
)]
pub async fn mark_payment_paid(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<MarkPaid>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payment_id = path.into_inner();
    let paid_date = body.paid_date.unwrap_or_else(|| Utc::now().date_naive());

    let result = sqlx::query(
        r#"
        UPDATE team_payments
        SET status = 'paid', paid_date = ?
        WHERE id = ?
        AND company_id = ?
        AND status IN ('pending', 'overdue')
        "#,
    )
    .bind(paid_date)
    .bind(payment_id)
    .bind(auth.company_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payment_id, "Mark payment paid failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Payment not found or already paid"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payment marked as paid"
    })))
}
