use crate::{
    auth::auth::AuthUser,
    model::team_member::{EmploymentType, MemberStatus, TeamMember},
    utils::db_utils::{build_scoped_update, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateTeamMember {
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@empresa.com.br", format = "email", nullable = true)]
    pub email: Option<String>,
    #[schema(example = 3000.0, nullable = true)]
    pub monthly_salary: Option<f64>,
    #[schema(example = 10, nullable = true)]
    pub payment_day: Option<u8>,
    #[schema(example = "fixed")]
    pub employment_type: EmploymentType,
    #[schema(example = "active", nullable = true)]
    pub status: Option<MemberStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamMemberQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub employment_type: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
}

#[derive(Serialize, ToSchema)]
pub struct TeamMemberListResponse {
    pub data: Vec<TeamMember>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Create Team Member
#[utoipa::path(
    post,
    path = "/api/v1/team-members",
    request_body = CreateTeamMember,
    responses(
        (status = 201, description = "Team member created", body = Object, example = json!({
            "message": "Team member created successfully"
        })),
        (status = 401),
        (status = 403),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "TeamMember"
)]
pub async fn create_team_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTeamMember>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if let Some(day) = payload.payment_day {
        if !(1..=31).contains(&day) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "payment_day must be between 1 and 31"
            })));
        }
    }

    let status = payload.status.unwrap_or(MemberStatus::Active);

    let result = sqlx::query(
        r#"
        INSERT INTO team_members
        (company_id, name, email, monthly_salary, payment_day, employment_type, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.company_id)
    .bind(payload.name.trim())
    .bind(payload.email.as_deref())
    .bind(payload.monthly_salary)
    .bind(payload.payment_day)
    .bind(payload.employment_type.to_string())
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Team member created successfully"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to create team member");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, contact the system admin"
            })))
        }
    }
}

// -------------------- Handler --------------------

#[utoipa::path(
    get,
    path = "/api/v1/team-members",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("employment_type", Query, description = "Filter by employment type"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated team member list", body = TeamMemberListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "TeamMember"
)]
pub async fn list_team_members(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TeamMemberQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = vec!["company_id = ?"];
    let mut bindings = vec![FilterValue::U64(auth.company_id)];

    if let Some(employment_type) = &query.employment_type {
        conditions.push("employment_type = ?");
        bindings.push(FilterValue::Str(employment_type.clone()));
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status.clone()));
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM team_members {}", where_clause);
    debug!(sql = %count_sql, "Counting team members");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(s.as_str()),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count team members");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM team_members {} ORDER BY name ASC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching team members");

    let mut data_query = sqlx::query_as::<_, TeamMember>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(s) => data_query.bind(s.as_str()),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let members = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch team members");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(TeamMemberListResponse {
        data: members,
        page,
        per_page,
        total,
    }))
}

/// Update Team Member
#[utoipa::path(
    put,
    path = "/api/v1/team-members/{member_id}",
    params(
        ("member_id", Path, description = "Team member ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Team member updated"),
        (status = 404, description = "Team member not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "TeamMember"
)]
pub async fn update_team_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let member_id = path.into_inner();

    let update = build_scoped_update(
        "team_members",
        &[
            "name",
            "email",
            "monthly_salary",
            "payment_day",
            "employment_type",
            "status",
        ],
        &body,
        member_id,
        auth.company_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Team member not found"));
    }

    Ok(HttpResponse::Ok().body("Team member updated successfully"))
}

/// Delete Team Member
#[utoipa::path(
    delete,
    path = "/api/v1/team-members/{member_id}",
    params(
        ("member_id", Path, description = "Team member ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Team member not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "TeamMember"
)]
pub async fn delete_team_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let member_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM team_members WHERE id = ? AND company_id = ?"#)
        .bind(member_id)
        .bind(auth.company_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Team member not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, member_id, "Failed to delete team member");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Team Member by ID
#[utoipa::path(
    get,
    path = "/api/v1/team-members/{member_id}",
    params(
        ("member_id", Path, description = "Team member ID")
    ),
    responses(
        (status = 200, description = "Team member found", body = TeamMember),
        (status = 404, description = "Team member not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "TeamMember"
)]
pub async fn get_team_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    let member = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT *
        FROM team_members
        WHERE id = ? AND company_id = ?
        "#,
    )
    .bind(member_id)
    .bind(auth.company_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, member_id, "Failed to fetch team member");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match member {
        Some(m) => Ok(HttpResponse::Ok().json(m)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Team member not found"
        }))),
    }
}
