use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, error, info};

use crate::utils::payment_day::resolve_payment_day;

/// One row per team member joined to its company's settings, read in a
/// single scan so the eligibility decision and the snapshotted amount come
/// from the same consistent read.
#[derive(Debug, sqlx::FromRow)]
pub struct SalaryCandidate {
    pub id: u64,
    pub company_id: u64,
    pub name: String,
    pub monthly_salary: Option<f64>,
    pub payment_day: Option<u8>,
    pub employment_type: String,
    pub status: String,
    pub default_payment_day: Option<u8>,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerateOutcome {
    pub generated: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

/// Only active, fixed-salary members with a positive salary get a
/// generated payment.
pub fn is_salary_eligible(candidate: &SalaryCandidate) -> bool {
    candidate.employment_type == "fixed"
        && candidate.status == "active"
        && candidate.monthly_salary.unwrap_or(0.0) > 0.0
}

/// First day of `today`'s month, the month a generated salary logically
/// belongs to.
pub fn current_reference_month(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap()
}

/// Salaries for a reference month fall due in the following month, on the
/// resolved payment day. Days past the end of that month clamp to its last
/// day (payment_day 31 in February pays on the 28th/29th).
pub fn salary_due_date(reference_month: NaiveDate, day: u8) -> NaiveDate {
    let next_month = reference_month + Months::new(1);
    let clamped = u32::from(day).min(days_in_month(next_month));
    next_month.with_day(clamped).unwrap()
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap();
    let next = first + Months::new(1);
    (next - first).num_days() as u32
}

/// Generates the current month's pending salary payment for every eligible
/// team member that does not have one yet. Idempotent: re-runs skip
/// already-generated members, and the insert itself is conflict-ignoring
/// so concurrent invocations cannot double-insert.
///
/// `company_id = None` runs the scheduler pass over all companies;
/// `Some(id)` scopes the manual trigger to one company. Per-member
/// failures are collected and never abort the batch.
pub async fn generate_monthly_salaries(
    pool: &MySqlPool,
    company_id: Option<u64>,
    today: NaiveDate,
) -> GenerateOutcome {
    let mut outcome = GenerateOutcome::default();
    let reference_month = current_reference_month(today);

    let mut sql = String::from(
        r#"
        SELECT tm.id, tm.company_id, tm.name, tm.monthly_salary, tm.payment_day,
               tm.employment_type, tm.status, cs.default_payment_day
        FROM team_members tm
        LEFT JOIN company_settings cs ON cs.company_id = tm.company_id
        "#,
    );
    if company_id.is_some() {
        sql.push_str(" WHERE tm.company_id = ?");
    }

    let mut scan = sqlx::query_as::<_, SalaryCandidate>(&sql);
    if let Some(company) = company_id {
        scan = scan.bind(company);
    }

    let candidates = match scan.fetch_all(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Salary generation: candidate scan failed");
            outcome.errors.push(format!("candidate scan failed: {}", e));
            return outcome;
        }
    };

    for candidate in &candidates {
        if !is_salary_eligible(candidate) {
            continue;
        }

        // Existence pre-check keeps re-runs cheap and the skip count honest.
        let already_generated = match sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_payments
                WHERE team_member_id = ? AND payment_type = 'salary' AND reference_month = ?
            )
            "#,
        )
        .bind(candidate.id)
        .bind(reference_month)
        .fetch_one(pool)
        .await
        {
            Ok(exists) => exists,
            Err(e) => {
                error!(error = %e, member_id = candidate.id, "Salary generation: existence check failed");
                outcome
                    .errors
                    .push(format!("{}: existence check failed: {}", candidate.name, e));
                continue;
            }
        };

        if already_generated {
            outcome.skipped += 1;
            continue;
        }

        let resolved = resolve_payment_day(candidate.payment_day, candidate.default_payment_day);
        let due_date = salary_due_date(reference_month, resolved.day);
        let amount = candidate.monthly_salary.unwrap_or(0.0);

        debug!(
            member_id = candidate.id,
            day = resolved.day,
            tier = ?resolved.tier,
            %due_date,
            "Generating salary payment"
        );

        // INSERT IGNORE + unique (team_member_id, reference_month,
        // payment_type) index: a concurrent run that won the race leaves
        // rows_affected at 0, which counts as skipped, not as an error.
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO team_payments
            (company_id, team_member_id, payment_type, description, amount,
             reference_month, due_date, status)
            VALUES (?, ?, 'salary', ?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(candidate.company_id)
        .bind(candidate.id)
        .bind(format!("Salário {}", reference_month.format("%m/%Y")))
        .bind(amount)
        .bind(reference_month)
        .bind(due_date)
        .execute(pool)
        .await;

        match result {
            Ok(res) if res.rows_affected() > 0 => outcome.generated += 1,
            Ok(_) => outcome.skipped += 1,
            Err(e) => {
                error!(error = %e, member_id = candidate.id, "Salary generation: insert failed");
                outcome
                    .errors
                    .push(format!("{}: insert failed: {}", candidate.name, e));
            }
        }
    }

    info!(
        %reference_month,
        generated = outcome.generated,
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "Salary generation finished"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(employment_type: &str, status: &str, salary: Option<f64>) -> SalaryCandidate {
        SalaryCandidate {
            id: 1,
            company_id: 7,
            name: "Maria Souza".into(),
            monthly_salary: salary,
            payment_day: Some(10),
            employment_type: employment_type.into(),
            status: status.into(),
            default_payment_day: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_active_paid_member_is_eligible() {
        assert!(is_salary_eligible(&candidate("fixed", "active", Some(3000.0))));
    }

    #[test]
    fn variable_members_never_generate() {
        assert!(!is_salary_eligible(&candidate("variable", "active", Some(3000.0))));
    }

    #[test]
    fn inactive_members_never_generate() {
        assert!(!is_salary_eligible(&candidate("fixed", "inactive", Some(3000.0))));
    }

    #[test]
    fn zero_or_missing_salary_never_generates() {
        assert!(!is_salary_eligible(&candidate("fixed", "active", Some(0.0))));
        assert!(!is_salary_eligible(&candidate("fixed", "active", None)));
    }

    #[test]
    fn reference_month_is_first_of_month() {
        assert_eq!(current_reference_month(date(2026, 5, 20)), date(2026, 5, 1));
        assert_eq!(current_reference_month(date(2026, 5, 1)), date(2026, 5, 1));
    }

    #[test]
    fn due_date_lands_on_payment_day_of_next_month() {
        assert_eq!(salary_due_date(date(2024, 1, 1), 10), date(2024, 2, 10));
        assert_eq!(salary_due_date(date(2026, 12, 1), 5), date(2027, 1, 5));
    }

    #[test]
    fn due_date_clamps_to_month_length() {
        // 2024 is a leap year
        assert_eq!(salary_due_date(date(2024, 1, 1), 31), date(2024, 2, 29));
        assert_eq!(salary_due_date(date(2023, 1, 1), 31), date(2023, 2, 28));
        assert_eq!(salary_due_date(date(2024, 3, 1), 31), date(2024, 4, 30));
    }
}
