use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use strum_macros::Display;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::automation::{overdue, salary};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AutomationAction {
    All,
    GenerateSalaries,
    UpdateOverdue,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AutomationQuery {
    /// Which phase to run; defaults to both.
    #[schema(example = "all")]
    pub action: Option<AutomationAction>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutomationResults {
    #[schema(example = 4)]
    pub salaries_generated: u64,
    #[schema(example = 2)]
    pub statuses_updated: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AutomationResponse {
    pub success: bool,
    pub results: AutomationResults,
}

async fn run(
    pool: &MySqlPool,
    company_id: Option<u64>,
    action: AutomationAction,
) -> AutomationResults {
    let today = Utc::now().date_naive();
    let mut results = AutomationResults {
        salaries_generated: 0,
        statuses_updated: 0,
        errors: Vec::new(),
    };

    info!(%action, company = ?company_id, "Automation run started");

    if matches!(action, AutomationAction::All | AutomationAction::GenerateSalaries) {
        let outcome = salary::generate_monthly_salaries(pool, company_id, today).await;
        results.salaries_generated = outcome.generated;
        results.errors.extend(outcome.errors);
    }

    if matches!(action, AutomationAction::All | AutomationAction::UpdateOverdue) {
        let outcome = overdue::sweep_overdue(pool, company_id, today).await;
        results.statuses_updated = outcome.total();
        results.errors.extend(outcome.errors);
    }

    results
}

/// Run salary generation / overdue sweep
#[utoipa::path(
    post,
    path = "/api/v1/automation/run",
    params(AutomationQuery),
    responses(
        (status = 200, description = "Batch finished; per-item failures are listed in results.errors", body = AutomationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Unexpected failure", body = Object, example = json!({
            "success": false,
            "error": "database unreachable"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Automation"
)]
pub async fn run_automation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AutomationQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // Top-level catch: if the database is unreachable there is no batch to
    // run and no partial result to report.
    if let Err(e) = pool.acquire().await {
        error!(error = %e, "Automation aborted: database unreachable");
        return Ok(HttpResponse::InternalServerError().json(json!({
            "success": false,
            "error": "database unreachable"
        })));
    }

    let action = query.action.unwrap_or(AutomationAction::All);
    let results = run(pool.get_ref(), Some(auth.company_id), action).await;

    Ok(HttpResponse::Ok().json(AutomationResponse {
        success: true,
        results,
    }))
}

/// Scheduler entry point: same batch, all companies, authenticated by the
/// X-Automation-Key header instead of a user token.
pub async fn run_automation_cron(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<AutomationQuery>,
) -> actix_web::Result<impl Responder> {
    let presented = req
        .headers()
        .get("X-Automation-Key")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if presented.is_empty() || presented != config.automation_key {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "error": "Invalid automation key"
        })));
    }

    if let Err(e) = pool.acquire().await {
        error!(error = %e, "Automation aborted: database unreachable");
        return Ok(HttpResponse::InternalServerError().json(json!({
            "success": false,
            "error": "database unreachable"
        })));
    }

    let action = query.action.unwrap_or(AutomationAction::All);
    let results = run(pool.get_ref(), None, action).await;

    Ok(HttpResponse::Ok().json(AutomationResponse {
        success: true,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_the_camel_case_wire_contract() {
        let response = AutomationResponse {
            success: true,
            results: AutomationResults {
                salaries_generated: 3,
                statuses_updated: 5,
                errors: vec!["Maria: insert failed".into()],
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["results"]["salariesGenerated"], 3);
        assert_eq!(value["results"]["statusesUpdated"], 5);
        assert_eq!(value["results"]["errors"][0], "Maria: insert failed");
    }

    #[test]
    fn action_tokens_deserialize_snake_case() {
        let q: AutomationQuery =
            serde_json::from_value(serde_json::json!({ "action": "generate_salaries" })).unwrap();
        assert_eq!(q.action, Some(AutomationAction::GenerateSalaries));

        let q: AutomationQuery =
            serde_json::from_value(serde_json::json!({ "action": "update_overdue" })).unwrap();
        assert_eq!(q.action, Some(AutomationAction::UpdateOverdue));

        let q: AutomationQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(q.action, None);

        assert!(
            serde_json::from_value::<AutomationQuery>(serde_json::json!({ "action": "nuke" }))
                .is_err()
        );
    }
}
