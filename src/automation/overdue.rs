use chrono::NaiveDate;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{error, info};

#[derive(Debug, Default, Serialize)]
pub struct SweepOutcome {
    pub team_payments: u64,
    pub partner_commissions: u64,
    pub company_expenses: u64,
    pub errors: Vec<String>,
}

impl SweepOutcome {
    pub fn total(&self) -> u64 {
        self.team_payments + self.partner_commissions + self.company_expenses
    }
}

/// Single conditional bulk update per table; atomic at the statement
/// level, so the sweep itself has no race to guard against.
async fn mark_overdue(
    pool: &MySqlPool,
    table: &str,
    company_id: Option<u64>,
    today: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let mut sql = format!(
        "UPDATE {} SET status = 'overdue' \
         WHERE status = 'pending' AND due_date < ? AND paid_date IS NULL",
        table
    );
    if company_id.is_some() {
        sql.push_str(" AND company_id = ?");
    }

    let mut query = sqlx::query(&sql).bind(today);
    if let Some(company) = company_id {
        query = query.bind(company);
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Reclassifies past-due pending obligations across the three payable
/// tables. Each table is swept independently; one table's failure is
/// collected and does not block the others. Rows with a paid_date are
/// never touched regardless of due date.
pub async fn sweep_overdue(
    pool: &MySqlPool,
    company_id: Option<u64>,
    today: NaiveDate,
) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();

    match mark_overdue(pool, "team_payments", company_id, today).await {
        Ok(n) => outcome.team_payments = n,
        Err(e) => {
            error!(error = %e, "Overdue sweep failed for team_payments");
            outcome.errors.push(format!("team_payments: {}", e));
        }
    }

    match mark_overdue(pool, "partner_commissions", company_id, today).await {
        Ok(n) => outcome.partner_commissions = n,
        Err(e) => {
            error!(error = %e, "Overdue sweep failed for partner_commissions");
            outcome.errors.push(format!("partner_commissions: {}", e));
        }
    }

    match mark_overdue(pool, "company_expenses", company_id, today).await {
        Ok(n) => outcome.company_expenses = n,
        Err(e) => {
            error!(error = %e, "Overdue sweep failed for company_expenses");
            outcome.errors.push(format!("company_expenses: {}", e));
        }
    }

    info!(
        team_payments = outcome.team_payments,
        partner_commissions = outcome.partner_commissions,
        company_expenses = outcome.company_expenses,
        errors = outcome.errors.len(),
        "Overdue sweep finished"
    );

    outcome
}
