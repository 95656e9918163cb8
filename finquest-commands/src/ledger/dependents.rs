use finquest_core::{Context, Error};
use finquest_database::impls::dependents::{
    add_dependent_event, add_dependent_expense, create_dependent, delete_dependent,
    list_dependents, update_dependent,
};
use finquest_database::model::dependents::{NewDependent, NewDependentEvent, NewDependentExpense};
use finquest_utils::formatting::format_brl;
use finquest_utils::time::today;
use uuid::Uuid;

use crate::CommandMeta;
use crate::ledger::render::dependent_block;

pub const META: CommandMeta = CommandMeta {
    name: "dependents",
    desc: "Keep dependents' details, upcoming events and expenses.",
    category: "ledger",
    usage: "finquest dependents <add <name> <birth-date> [--monthly-cost] ... | list | update <id> <name> <birth-date> ... | delete <id> | event <id> <medical|school|birthday|other> <date> <description> | expense <id> <education|health|activities|other> <amount> <description> [--date] [--recurrent]>",
};

pub async fn add(ctx: Context<'_>, new: &NewDependent) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let dependent = create_dependent(ctx.db(), user_id, new, today()).await?;
    Ok(format!("Dependent added: {} {}", dependent.name, dependent.id))
}

pub async fn list(ctx: Context<'_>) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let dependents = list_dependents(ctx.db(), user_id).await?;
    if dependents.is_empty() {
        return Ok("No dependents recorded.".to_owned());
    }

    let today = today();
    let blocks = dependents
        .iter()
        .map(|details| dependent_block(details, today))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(blocks.join("\n\n"))
}

pub async fn update(
    ctx: Context<'_>,
    dependent_id: Uuid,
    details: &NewDependent,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match update_dependent(ctx.db(), user_id, dependent_id, details, today()).await? {
        Some(dependent) => Ok(format!("Dependent updated: {}", dependent.name)),
        None => Ok(format!("Dependent {dependent_id} not found.")),
    }
}

pub async fn delete(ctx: Context<'_>, dependent_id: Uuid) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if delete_dependent(ctx.db(), user_id, dependent_id).await? {
        Ok("Dependent deleted.".to_owned())
    } else {
        Ok(format!("Dependent {dependent_id} not found."))
    }
}

pub async fn event(
    ctx: Context<'_>,
    dependent_id: Uuid,
    new: &NewDependentEvent,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match add_dependent_event(ctx.db(), user_id, dependent_id, new).await? {
        Some(event) => Ok(format!(
            "Event added: {} {} ({})",
            event.date.format("%Y-%m-%d"),
            event.description,
            event.kind.as_str()
        )),
        None => Ok(format!("Dependent {dependent_id} not found.")),
    }
}

pub async fn expense(
    ctx: Context<'_>,
    dependent_id: Uuid,
    new: &NewDependentExpense,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match add_dependent_expense(ctx.db(), user_id, dependent_id, new).await? {
        Some(expense) => Ok(format!(
            "Expense added: {} {} ({})",
            format_brl(expense.amount_cents),
            expense.description,
            expense.kind.as_str()
        )),
        None => Ok(format!("Dependent {dependent_id} not found.")),
    }
}
