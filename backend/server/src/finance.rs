//! # Finance
//!
//! Personal transaction ledger. Transactions are pushed by an iOS Shortcut, which
//! sends dates like `Nov 6, 2025 at 6:28 PM`.
//!
//! ## Payload
//! ```json
//! {
//!     "User": "kory",
//!     "Category": "Food",
//!     "Amount": 12.5,
//!     "Date": "Nov 6, 2025 at 6:28 PM",
//!     "Title": "Lunch",
//!     "Description": "optional",
//!     "Rate": "optional"
//! }
//! ```
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use tracing::{info, warn};

use crate::error::AppError;

pub const PAYLOAD_DATE_FORMAT: &str = "%b %d, %Y at %I:%M %p";
pub const STORED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REQUIRED_FIELDS: [&str; 5] = ["User", "Category", "Amount", "Date", "Title"];

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub title: String,
    pub description: Option<String>,
    pub rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub rate: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub title: String,
    pub description: Option<String>,
    pub rate: Option<String>,
}

pub fn parse_transaction_date(text: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(text.trim(), PAYLOAD_DATE_FORMAT)
        .map_err(|e| AppError::InvalidDate(format!("{text}: {e}")))
}

impl NewTransaction {
    /// Validates a decoded JSON body. Missing fields are reported together.
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let fields = payload.as_object().ok_or(AppError::MalformedPayload)?;

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| fields.get(*field).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let date = text_field(fields, "Date").ok_or(AppError::MalformedPayload)?;

        Ok(Self {
            user: text_field(fields, "User").ok_or(AppError::MalformedPayload)?,
            category: text_field(fields, "Category").ok_or(AppError::MalformedPayload)?,
            amount: amount_field(fields).ok_or(AppError::MalformedPayload)?,
            date: parse_transaction_date(&date)?,
            title: text_field(fields, "Title").ok_or(AppError::MalformedPayload)?,
            description: text_field(fields, "Description"),
            rate: text_field(fields, "Rate"),
        })
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Shortcuts sends amounts as text more often than not
fn amount_field(fields: &Map<String, Value>) -> Option<f64> {
    match fields.get("Amount")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        _ => None,
    }
}

pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    transaction: &NewTransaction,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO transactions (user, category, amount, date, title, description, rate)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&transaction.user)
    .bind(&transaction.category)
    .bind(transaction.amount)
    .bind(transaction.date.format(STORED_DATE_FORMAT).to_string())
    .bind(&transaction.title)
    .bind(&transaction.description)
    .bind(&transaction.rate)
    .execute(&mut *conn)
    .await?;

    info!(
        "Inserted transaction: {}, {}, {}, {}, {}",
        transaction.user,
        transaction.category,
        transaction.amount,
        transaction.date,
        transaction.title
    );

    Ok(result.last_insert_rowid())
}

/// User names match case-insensitively.
pub async fn transactions_for_user(
    conn: &mut SqliteConnection,
    user: &str,
) -> Result<Vec<Transaction>, AppError> {
    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT id, category, amount, CAST(date AS TEXT) AS date, title, description, rate
        FROM transactions
        WHERE user = ? COLLATE NOCASE
        ORDER BY date, id
        "#,
    )
    .bind(user)
    .fetch_all(&mut *conn)
    .await?;

    Ok(transactions)
}

/// Returns `false` when no transaction has that id.
pub async fn edit_transaction(
    conn: &mut SqliteConnection,
    id: i64,
    patch: &TransactionPatch,
) -> Result<bool, AppError> {
    if patch.is_empty() {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM transactions WHERE id = ?)",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        return Ok(exists);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE transactions SET ");
    let mut fields = builder.separated(", ");

    if let Some(category) = &patch.category {
        fields.push("category = ").push_bind_unseparated(category.clone());
    }
    if let Some(amount) = patch.amount {
        fields.push("amount = ").push_bind_unseparated(amount);
    }
    if let Some(date) = patch.date {
        fields
            .push("date = ")
            .push_bind_unseparated(date.format(STORED_DATE_FORMAT).to_string());
    }
    if let Some(title) = &patch.title {
        fields.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(description) = &patch.description {
        fields
            .push("description = ")
            .push_bind_unseparated(description.clone());
    }
    if let Some(rate) = &patch.rate {
        fields.push("rate = ").push_bind_unseparated(rate.clone());
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        warn!("No transaction found with id {id}");
        return Ok(false);
    }

    info!("Updated transaction with id {id}");
    Ok(true)
}

/// Returns `false` when no transaction has that id.
pub async fn delete_transaction(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        warn!("No transaction found with id {id}");
        return Ok(false);
    }

    info!("Deleted transaction with id {id}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::database::{initialize_finance_schema, tests::memory};

    async fn ledger() -> SqliteConnection {
        let mut conn = memory().await;
        initialize_finance_schema(&mut conn).await.unwrap();
        conn
    }

    fn lunch() -> NewTransaction {
        NewTransaction {
            user: "Kory".to_string(),
            category: "Food".to_string(),
            amount: 12.5,
            date: parse_transaction_date("Nov 6, 2025 at 6:28 PM").unwrap(),
            title: "Lunch".to_string(),
            description: None,
            rate: None,
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_transaction_date("Nov 6, 2025 at 6:28 PM").unwrap();

        assert_eq!(
            date,
            NaiveDate::from_ymd_opt(2025, 11, 6)
                .unwrap()
                .and_hms_opt(18, 28, 0)
                .unwrap()
        );
        assert_eq!(
            date.format(STORED_DATE_FORMAT).to_string(),
            "2025-11-06 18:28:00"
        );
    }

    #[test]
    fn test_parse_bad_date() {
        assert!(matches!(
            parse_transaction_date("2025-11-06"),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_payload() {
        let payload = json!({
            "User": "Kory",
            "Category": "Food",
            "Amount": "$1,012.50",
            "Date": "Nov 6, 2025 at 6:28 PM",
            "Title": "Groceries",
            "Rate": "monthly",
        });

        let transaction = NewTransaction::from_payload(&payload).unwrap();
        assert_eq!(transaction.amount, 1012.5);
        assert_eq!(transaction.rate.as_deref(), Some("monthly"));
        assert!(transaction.description.is_none());
    }

    #[test]
    fn test_payload_missing_fields() {
        let payload = json!({ "User": "Kory", "Amount": 3, "Date": null });

        match NewTransaction::from_payload(&payload) {
            Err(AppError::MissingFields(missing)) => {
                assert_eq!(missing, vec!["Category", "Date", "Title"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_not_an_object() {
        assert!(matches!(
            NewTransaction::from_payload(&json!([1, 2])),
            Err(AppError::MalformedPayload)
        ));
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let mut conn = ledger().await;

        let id = insert_transaction(&mut conn, &lunch()).await.unwrap();
        let rows = transactions_for_user(&mut conn, "kory").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].date, "2025-11-06 18:28:00");
        assert_eq!(rows[0].title, "Lunch");
        assert!(transactions_for_user(&mut conn, "someone").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit() {
        let mut conn = ledger().await;
        let id = insert_transaction(&mut conn, &lunch()).await.unwrap();

        let patch = TransactionPatch {
            amount: Some(15.0),
            description: Some("with tip".to_string()),
            ..Default::default()
        };

        assert!(edit_transaction(&mut conn, id, &patch).await.unwrap());
        assert!(!edit_transaction(&mut conn, id + 1, &patch).await.unwrap());

        let row = &transactions_for_user(&mut conn, "Kory").await.unwrap()[0];
        assert_eq!(row.amount, 15.0);
        assert_eq!(row.description.as_deref(), Some("with tip"));
        assert_eq!(row.category, "Food");
    }

    #[tokio::test]
    async fn test_empty_patch() {
        let mut conn = ledger().await;
        let id = insert_transaction(&mut conn, &lunch()).await.unwrap();

        assert!(edit_transaction(&mut conn, id, &TransactionPatch::default()).await.unwrap());
        assert!(!edit_transaction(&mut conn, 99, &TransactionPatch::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let mut conn = ledger().await;
        let id = insert_transaction(&mut conn, &lunch()).await.unwrap();

        assert!(delete_transaction(&mut conn, id).await.unwrap());
        assert!(!delete_transaction(&mut conn, id).await.unwrap());
        assert!(transactions_for_user(&mut conn, "Kory").await.unwrap().is_empty());
    }
}
