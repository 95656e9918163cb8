use anyhow::Context as _;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::Database;
use crate::impls::now_unix_secs;
use crate::model::debts::{Debt, DebtCategory, DebtPriority, DebtStatus, NewDebt};

const DEBT_COLUMNS: &str = "id, user_id, name, amount_cents, remaining_cents, interest_rate, \
     due_date, payment_day, category, status, priority, card_last_digits, card_brand, \
     card_color, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DebtRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    amount_cents: i64,
    remaining_cents: i64,
    interest_rate: f64,
    due_date: NaiveDate,
    payment_day: i16,
    category: String,
    status: String,
    priority: String,
    card_last_digits: Option<String>,
    card_brand: Option<String>,
    card_color: Option<String>,
    created_at: i64,
    updated_at: i64,
}

/// Insert a new debt. Debts always start `active`.
pub async fn create_debt(db: &Database, user_id: Uuid, new: &NewDebt) -> anyhow::Result<Debt> {
    new.validate()?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: DebtRow = sqlx::query_as(&format!(
        "INSERT INTO debts (
            id,
            user_id,
            name,
            amount_cents,
            remaining_cents,
            interest_rate,
            due_date,
            payment_day,
            category,
            status,
            priority,
            card_last_digits,
            card_brand,
            card_color,
            created_at,
            updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
         RETURNING {DEBT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(new.name.trim())
    .bind(new.amount_cents)
    .bind(new.remaining_cents)
    .bind(new.interest_rate)
    .bind(new.due_date)
    .bind(i16::from(new.payment_day))
    .bind(new.category.as_str())
    .bind(DebtStatus::Active.as_str())
    .bind(new.priority.as_str())
    .bind(new.card_last_digits.as_deref())
    .bind(new.card_brand.as_deref())
    .bind(new.card_color.as_deref())
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_debt(row)
}

pub async fn list_debts(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<Debt>> {
    let rows: Vec<DebtRow> = sqlx::query_as(&format!(
        "SELECT {DEBT_COLUMNS}
         FROM debts
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_debt).collect()
}

pub async fn set_debt_status(
    db: &Database,
    user_id: Uuid,
    debt_id: Uuid,
    status: DebtStatus,
) -> anyhow::Result<Option<Debt>> {
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: Option<DebtRow> = sqlx::query_as(&format!(
        "UPDATE debts SET status = $3, updated_at = $4
         WHERE id = $1 AND user_id = $2
         RETURNING {DEBT_COLUMNS}"
    ))
    .bind(debt_id)
    .bind(user_id)
    .bind(status.as_str())
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_debt).transpose()
}

pub async fn set_debt_priority(
    db: &Database,
    user_id: Uuid,
    debt_id: Uuid,
    priority: DebtPriority,
) -> anyhow::Result<Option<Debt>> {
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: Option<DebtRow> = sqlx::query_as(&format!(
        "UPDATE debts SET priority = $3, updated_at = $4
         WHERE id = $1 AND user_id = $2
         RETURNING {DEBT_COLUMNS}"
    ))
    .bind(debt_id)
    .bind(user_id)
    .bind(priority.as_str())
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_debt).transpose()
}

pub async fn delete_debt(db: &Database, user_id: Uuid, debt_id: Uuid) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM debts WHERE id = $1 AND user_id = $2")
        .bind(debt_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_debt(row: DebtRow) -> anyhow::Result<Debt> {
    let category = DebtCategory::parse(&row.category)
        .with_context(|| format!("unknown debt category `{}`", row.category))?;
    let status = DebtStatus::parse(&row.status)
        .with_context(|| format!("unknown debt status `{}`", row.status))?;
    let priority = DebtPriority::parse(&row.priority)
        .with_context(|| format!("unknown debt priority `{}`", row.priority))?;

    Ok(Debt {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        amount_cents: row.amount_cents,
        remaining_cents: row.remaining_cents,
        interest_rate: row.interest_rate,
        due_date: row.due_date,
        payment_day: u8::try_from(row.payment_day).context("payment_day row out of u8 range")?,
        category,
        status,
        priority,
        card_last_digits: row.card_last_digits,
        card_brand: row.card_brand,
        card_color: row.card_color,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        updated_at: u64::try_from(row.updated_at).context("updated_at row out of u64 range")?,
    })
}
