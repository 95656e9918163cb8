use anyhow::Context as _;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::Database;
use crate::impls::now_unix_secs;
use crate::model::transactions::{
    NewTransaction, RecurringFrequency, Transaction, TransactionFilter, TransactionKind,
    TransactionStatus, TransactionSummary,
};

const TRANSACTION_COLUMNS: &str = "id, user_id, kind, amount_cents, category, description, \
     occurred_on, payment_method, status, recurring_frequency, created_at";

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    amount_cents: i64,
    category: String,
    description: String,
    occurred_on: NaiveDate,
    payment_method: String,
    status: String,
    recurring_frequency: Option<String>,
    created_at: i64,
}

pub async fn create_transaction(
    db: &Database,
    user_id: Uuid,
    new: &NewTransaction,
) -> anyhow::Result<Transaction> {
    new.validate()?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: TransactionRow = sqlx::query_as(&format!(
        "INSERT INTO transactions (
            id,
            user_id,
            kind,
            amount_cents,
            category,
            description,
            occurred_on,
            payment_method,
            status,
            recurring_frequency,
            created_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {TRANSACTION_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(new.kind.as_str())
    .bind(new.amount_cents)
    .bind(new.category.trim())
    .bind(new.description.trim())
    .bind(new.date)
    .bind(new.payment_method.trim())
    .bind(new.status.as_str())
    .bind(new.recurring.map(RecurringFrequency::as_str))
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_transaction(row)
}

/// List a user's transactions, newest date first.
pub async fn list_transactions(
    db: &Database,
    user_id: Uuid,
    filter: &TransactionFilter,
) -> anyhow::Result<Vec<Transaction>> {
    let limit_i64 = i64::from(filter.limit.clamp(1, 500));

    let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
        "SELECT {TRANSACTION_COLUMNS}
         FROM transactions
         WHERE user_id = $1
           AND ($2::DATE IS NULL OR occurred_on >= $2)
           AND ($3::DATE IS NULL OR occurred_on <= $3)
           AND ($4::TEXT IS NULL OR kind = $4)
           AND ($5::TEXT IS NULL OR LOWER(category) = LOWER($5))
           AND ($6::TEXT IS NULL OR status = $6)
         ORDER BY occurred_on DESC, created_at DESC
         LIMIT $7"
    ))
    .bind(user_id)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.kind.map(TransactionKind::as_str))
    .bind(filter.category.as_deref())
    .bind(filter.status.map(TransactionStatus::as_str))
    .bind(limit_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_transaction).collect()
}

/// Totals for every transaction dated within `[start, end]`.
pub async fn transactions_summary(
    db: &Database,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<TransactionSummary> {
    anyhow::ensure!(start <= end, "start date {start} is after end date {end}");

    let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
        "SELECT {TRANSACTION_COLUMNS}
         FROM transactions
         WHERE user_id = $1 AND occurred_on >= $2 AND occurred_on <= $3
         ORDER BY occurred_on DESC"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db.pool())
    .await?;

    let transactions = rows
        .into_iter()
        .map(to_transaction)
        .collect::<anyhow::Result<Vec<_>>>()?;

    TransactionSummary::from_transactions(&transactions)
}

pub async fn set_transaction_status(
    db: &Database,
    user_id: Uuid,
    transaction_id: Uuid,
    status: TransactionStatus,
) -> anyhow::Result<Option<Transaction>> {
    let row: Option<TransactionRow> = sqlx::query_as(&format!(
        "UPDATE transactions SET status = $3
         WHERE id = $1 AND user_id = $2
         RETURNING {TRANSACTION_COLUMNS}"
    ))
    .bind(transaction_id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_optional(db.pool())
    .await?;

    row.map(to_transaction).transpose()
}

pub async fn delete_transaction(
    db: &Database,
    user_id: Uuid,
    transaction_id: Uuid,
) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(transaction_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_transaction(row: TransactionRow) -> anyhow::Result<Transaction> {
    let kind = TransactionKind::parse(&row.kind)
        .with_context(|| format!("unknown transaction kind `{}`", row.kind))?;
    let status = TransactionStatus::parse(&row.status)
        .with_context(|| format!("unknown transaction status `{}`", row.status))?;
    let recurring = row
        .recurring_frequency
        .as_deref()
        .map(|raw| {
            RecurringFrequency::parse(raw)
                .with_context(|| format!("unknown recurring frequency `{raw}`"))
        })
        .transpose()?;

    Ok(Transaction {
        id: row.id,
        user_id: row.user_id,
        kind,
        amount_cents: row.amount_cents,
        category: row.category,
        description: row.description,
        date: row.occurred_on,
        payment_method: row.payment_method,
        status,
        recurring,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}
