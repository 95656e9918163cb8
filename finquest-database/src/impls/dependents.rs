use std::collections::HashMap;

use anyhow::Context as _;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::Database;
use crate::impls::now_unix_secs;
use crate::model::dependents::{
    Dependent, DependentDetails, DependentEvent, DependentEventKind, DependentExpense,
    DependentExpenseKind, NewDependent, NewDependentEvent, NewDependentExpense,
};

const DEPENDENT_COLUMNS: &str = "id, user_id, name, birth_date, school_name, school_grade, \
     health_insurance, blood_type, allergies, medications, monthly_cost_cents, created_at, \
     updated_at";
const EVENT_COLUMNS: &str = "id, dependent_id, kind, event_date, description";
const EXPENSE_COLUMNS: &str = "id, dependent_id, kind, description, amount_cents, expense_date, \
     recurrent";

#[derive(sqlx::FromRow)]
struct DependentRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    birth_date: NaiveDate,
    school_name: Option<String>,
    school_grade: Option<String>,
    health_insurance: Option<String>,
    blood_type: Option<String>,
    allergies: Option<String>,
    medications: Option<String>,
    monthly_cost_cents: i64,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    dependent_id: Uuid,
    kind: String,
    event_date: NaiveDate,
    description: String,
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    dependent_id: Uuid,
    kind: String,
    description: String,
    amount_cents: i64,
    expense_date: NaiveDate,
    recurrent: bool,
}

pub async fn create_dependent(
    db: &Database,
    user_id: Uuid,
    new: &NewDependent,
    today: NaiveDate,
) -> anyhow::Result<Dependent> {
    new.validate(today)?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: DependentRow = sqlx::query_as(&format!(
        "INSERT INTO dependents (
            id,
            user_id,
            name,
            birth_date,
            school_name,
            school_grade,
            health_insurance,
            blood_type,
            allergies,
            medications,
            monthly_cost_cents,
            created_at,
            updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
         RETURNING {DEPENDENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(new.name.trim())
    .bind(new.birth_date)
    .bind(new.school_name.as_deref())
    .bind(new.school_grade.as_deref())
    .bind(new.health_insurance.as_deref())
    .bind(new.blood_type())
    .bind(new.allergies.as_deref())
    .bind(new.medications.as_deref())
    .bind(new.monthly_cost_cents)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_dependent(row)
}

/// Every dependent of the user, newest first, with events and expenses.
pub async fn list_dependents(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<DependentDetails>> {
    let rows: Vec<DependentRow> = sqlx::query_as(&format!(
        "SELECT {DEPENDENT_COLUMNS}
         FROM dependents
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let event_rows: Vec<EventRow> = sqlx::query_as(&format!(
        "SELECT {EVENT_COLUMNS}
         FROM dependent_events
         WHERE dependent_id = ANY($1)
         ORDER BY event_date ASC, id ASC"
    ))
    .bind(ids.as_slice())
    .fetch_all(db.pool())
    .await?;

    let expense_rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
        "SELECT {EXPENSE_COLUMNS}
         FROM dependent_expenses
         WHERE dependent_id = ANY($1)
         ORDER BY expense_date DESC, id DESC"
    ))
    .bind(ids.as_slice())
    .fetch_all(db.pool())
    .await?;

    let mut events: HashMap<Uuid, Vec<DependentEvent>> = HashMap::new();
    for row in event_rows {
        let event = to_event(row)?;
        events.entry(event.dependent_id).or_default().push(event);
    }
    let mut expenses: HashMap<Uuid, Vec<DependentExpense>> = HashMap::new();
    for row in expense_rows {
        let expense = to_expense(row)?;
        expenses.entry(expense.dependent_id).or_default().push(expense);
    }

    rows.into_iter()
        .map(|row| {
            let dependent = to_dependent(row)?;
            Ok(DependentDetails {
                events: events.remove(&dependent.id).unwrap_or_default(),
                expenses: expenses.remove(&dependent.id).unwrap_or_default(),
                dependent,
            })
        })
        .collect()
}

/// Replace every editable field of a dependent.
pub async fn update_dependent(
    db: &Database,
    user_id: Uuid,
    dependent_id: Uuid,
    new: &NewDependent,
    today: NaiveDate,
) -> anyhow::Result<Option<Dependent>> {
    new.validate(today)?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: Option<DependentRow> = sqlx::query_as(&format!(
        "UPDATE dependents
         SET name = $3,
             birth_date = $4,
             school_name = $5,
             school_grade = $6,
             health_insurance = $7,
             blood_type = $8,
             allergies = $9,
             medications = $10,
             monthly_cost_cents = $11,
             updated_at = $12
         WHERE id = $1 AND user_id = $2
         RETURNING {DEPENDENT_COLUMNS}"
    ))
    .bind(dependent_id)
    .bind(user_id)
    .bind(new.name.trim())
    .bind(new.birth_date)
    .bind(new.school_name.as_deref())
    .bind(new.school_grade.as_deref())
    .bind(new.health_insurance.as_deref())
    .bind(new.blood_type())
    .bind(new.allergies.as_deref())
    .bind(new.medications.as_deref())
    .bind(new.monthly_cost_cents)
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_dependent).transpose()
}

/// Events and expenses go with the dependent.
pub async fn delete_dependent(
    db: &Database,
    user_id: Uuid,
    dependent_id: Uuid,
) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM dependents WHERE id = $1 AND user_id = $2")
        .bind(dependent_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

/// `None` when the dependent does not exist or belongs to someone else.
pub async fn add_dependent_event(
    db: &Database,
    user_id: Uuid,
    dependent_id: Uuid,
    new: &NewDependentEvent,
) -> anyhow::Result<Option<DependentEvent>> {
    new.validate()?;

    let row: Option<EventRow> = sqlx::query_as(&format!(
        "INSERT INTO dependent_events (id, dependent_id, kind, event_date, description)
         SELECT $1, d.id, $4, $5, $6
         FROM dependents d
         WHERE d.id = $2 AND d.user_id = $3
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(dependent_id)
    .bind(user_id)
    .bind(new.kind.as_str())
    .bind(new.date)
    .bind(new.description.trim())
    .fetch_optional(db.pool())
    .await?;

    row.map(to_event).transpose()
}

/// `None` when the dependent does not exist or belongs to someone else.
pub async fn add_dependent_expense(
    db: &Database,
    user_id: Uuid,
    dependent_id: Uuid,
    new: &NewDependentExpense,
) -> anyhow::Result<Option<DependentExpense>> {
    new.validate()?;

    let row: Option<ExpenseRow> = sqlx::query_as(&format!(
        "INSERT INTO dependent_expenses (
            id,
            dependent_id,
            kind,
            description,
            amount_cents,
            expense_date,
            recurrent
         )
         SELECT $1, d.id, $4, $5, $6, $7, $8
         FROM dependents d
         WHERE d.id = $2 AND d.user_id = $3
         RETURNING {EXPENSE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(dependent_id)
    .bind(user_id)
    .bind(new.kind.as_str())
    .bind(new.description.trim())
    .bind(new.amount_cents)
    .bind(new.date)
    .bind(new.recurrent)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_expense).transpose()
}

fn to_dependent(row: DependentRow) -> anyhow::Result<Dependent> {
    Ok(Dependent {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        birth_date: row.birth_date,
        school_name: row.school_name,
        school_grade: row.school_grade,
        health_insurance: row.health_insurance,
        blood_type: row.blood_type,
        allergies: row.allergies,
        medications: row.medications,
        monthly_cost_cents: row.monthly_cost_cents,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        updated_at: u64::try_from(row.updated_at).context("updated_at row out of u64 range")?,
    })
}

fn to_event(row: EventRow) -> anyhow::Result<DependentEvent> {
    let kind = DependentEventKind::parse(&row.kind)
        .with_context(|| format!("unknown dependent event type `{}`", row.kind))?;

    Ok(DependentEvent {
        id: row.id,
        dependent_id: row.dependent_id,
        kind,
        date: row.event_date,
        description: row.description,
    })
}

fn to_expense(row: ExpenseRow) -> anyhow::Result<DependentExpense> {
    let kind = DependentExpenseKind::parse(&row.kind)
        .with_context(|| format!("unknown dependent expense type `{}`", row.kind))?;

    Ok(DependentExpense {
        id: row.id,
        dependent_id: row.dependent_id,
        kind,
        description: row.description,
        amount_cents: row.amount_cents,
        date: row.expense_date,
        recurrent: row.recurrent,
    })
}
