use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic, tenant-scoped UPDATE SQL
/// ===============================
/// Only whitelisted columns may appear in the payload, and the WHERE clause
/// always pins both the row id and the caller's company_id so one tenant
/// can never touch another tenant's rows.
pub fn build_scoped_update(
    table: &str,
    allowed_columns: &[&str],
    payload: &Value,
    id: u64,
    company_id: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    for key in obj.keys() {
        if !allowed_columns.contains(&key.as_str()) {
            return Err(ErrorBadRequest(format!("Unknown field: {}", key)));
        }
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ? AND company_id = ?",
        table, set_clause
    );

    let mut values = Vec::with_capacity(obj.len() + 2);

    // Convert JSON values → SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    values.push(SqlValue::I64(id as i64));
    values.push(SqlValue::I64(company_id as i64));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[&str] = &["name", "status", "monthly_salary"];

    #[test]
    fn builds_scoped_update_for_whitelisted_fields() {
        let payload = json!({ "name": "Maria", "monthly_salary": 3500.0 });
        let update = build_scoped_update("team_members", COLUMNS, &payload, 4, 7).unwrap();

        assert!(update.sql.starts_with("UPDATE team_members SET "));
        assert!(update.sql.ends_with("WHERE id = ? AND company_id = ?"));
        assert!(update.sql.contains("name = ?"));
        assert!(update.sql.contains("monthly_salary = ?"));
        // two payload values + id + company_id
        assert_eq!(update.values.len(), 4);
    }

    #[test]
    fn rejects_unknown_columns() {
        let payload = json!({ "role_id": 1 });
        assert!(build_scoped_update("team_members", COLUMNS, &payload, 4, 7).is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        let payload = json!({});
        assert!(build_scoped_update("team_members", COLUMNS, &payload, 4, 7).is_err());
    }

    #[test]
    fn date_strings_bind_as_dates() {
        let payload = json!({ "status": "2026-02-10" });
        let update = build_scoped_update("team_members", COLUMNS, &payload, 4, 7).unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }
}
