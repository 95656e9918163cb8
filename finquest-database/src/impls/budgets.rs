use anyhow::Context as _;
use uuid::Uuid;

use crate::database::Database;
use crate::impls::now_unix_secs;
use crate::model::budgets::{Budget, BudgetPatch, BudgetPeriod, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, name, planned_cents, actual_cents, color, \
     period_year, period_month, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    planned_cents: i64,
    actual_cents: i64,
    color: String,
    period_year: i32,
    period_month: i16,
    created_at: i64,
    updated_at: i64,
}

pub async fn create_budget(
    db: &Database,
    user_id: Uuid,
    new: &NewBudget,
) -> anyhow::Result<Budget> {
    new.validate()?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: BudgetRow = sqlx::query_as(&format!(
        "INSERT INTO budgets (
            id,
            user_id,
            name,
            planned_cents,
            actual_cents,
            color,
            period,
            period_year,
            period_month,
            created_at,
            updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6, 'monthly', $7, $8, $9, $9)
         RETURNING {BUDGET_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(new.name.trim())
    .bind(new.planned_cents)
    .bind(new.actual_cents)
    .bind(new.color())
    .bind(new.period.year)
    .bind(i16::from(new.period.month))
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_budget(row)
}

/// Budgets of one month, or all of them when `period` is `None`.
pub async fn list_budgets(
    db: &Database,
    user_id: Uuid,
    period: Option<BudgetPeriod>,
) -> anyhow::Result<Vec<Budget>> {
    let rows: Vec<BudgetRow> = sqlx::query_as(&format!(
        "SELECT {BUDGET_COLUMNS}
         FROM budgets
         WHERE user_id = $1
           AND ($2::INT IS NULL OR period_year = $2)
           AND ($3::SMALLINT IS NULL OR period_month = $3)
         ORDER BY period_year DESC, period_month DESC, created_at DESC, id DESC"
    ))
    .bind(user_id)
    .bind(period.map(|period| period.year))
    .bind(period.map(|period| i16::from(period.month)))
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_budget).collect()
}

/// Apply the fields present in `patch`; the rest are kept.
pub async fn update_budget(
    db: &Database,
    user_id: Uuid,
    budget_id: Uuid,
    patch: &BudgetPatch,
) -> anyhow::Result<Option<Budget>> {
    patch.validate()?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: Option<BudgetRow> = sqlx::query_as(&format!(
        "UPDATE budgets
         SET name = COALESCE($3, name),
             planned_cents = COALESCE($4, planned_cents),
             actual_cents = COALESCE($5, actual_cents),
             color = COALESCE($6, color),
             updated_at = $7
         WHERE id = $1 AND user_id = $2
         RETURNING {BUDGET_COLUMNS}"
    ))
    .bind(budget_id)
    .bind(user_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.planned_cents)
    .bind(patch.actual_cents)
    .bind(patch.color.as_deref().map(str::trim))
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_budget).transpose()
}

/// Overwrite the amount spent so far.
pub async fn set_budget_spent(
    db: &Database,
    user_id: Uuid,
    budget_id: Uuid,
    actual_cents: i64,
) -> anyhow::Result<Option<Budget>> {
    let patch = BudgetPatch {
        actual_cents: Some(actual_cents),
        ..BudgetPatch::default()
    };
    update_budget(db, user_id, budget_id, &patch).await
}

pub async fn delete_budget(db: &Database, user_id: Uuid, budget_id: Uuid) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
        .bind(budget_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_budget(row: BudgetRow) -> anyhow::Result<Budget> {
    Ok(Budget {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        planned_cents: row.planned_cents,
        actual_cents: row.actual_cents,
        color: row.color,
        year: row.period_year,
        month: u8::try_from(row.period_month).context("period_month row out of u8 range")?,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        updated_at: u64::try_from(row.updated_at).context("updated_at row out of u64 range")?,
    })
}
