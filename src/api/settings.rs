use crate::auth::auth::AuthUser;
use crate::model::company_settings::CompanySettings;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateSettings {
    #[schema(example = 10, nullable = true)]
    pub default_payment_day: Option<u8>,
}

/// Get company settings
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Company settings", body = CompanySettings),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_settings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let settings = sqlx::query_as::<_, CompanySettings>(
        r#"
        SELECT company_id, default_payment_day
        FROM company_settings
        WHERE company_id = ?
        "#,
    )
    .bind(auth.company_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch company settings");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Companies provisioned before the settings table simply fall back to
    // the built-in payment day.
    let settings = settings.unwrap_or(CompanySettings {
        company_id: auth.company_id,
        default_payment_day: None,
    });

    Ok(HttpResponse::Ok().json(settings))
}

/// Update company settings
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated"),
        (status = 400, description = "Invalid payment day"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn update_settings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateSettings>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if let Some(day) = payload.default_payment_day {
        if !(1..=31).contains(&day) {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "default_payment_day must be between 1 and 31"
            })));
        }
    }

    sqlx::query(
        r#"
        INSERT INTO company_settings (company_id, default_payment_day)
        VALUES (?, ?)
        ON DUPLICATE KEY UPDATE default_payment_day = VALUES(default_payment_day)
        "#,
    )
    .bind(auth.company_id)
    .bind(payload.default_payment_day)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to update company settings");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Settings updated successfully"
    })))
}
