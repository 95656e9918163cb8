use finquest_core::{Context, Error};
use finquest_database::impls::debts::{
    create_debt, delete_debt, list_debts, set_debt_priority, set_debt_status,
};
use finquest_database::model::debts::{DebtPriority, DebtStatus, NewDebt, outstanding_cents};
use finquest_utils::formatting::format_brl;
use uuid::Uuid;

use crate::CommandMeta;
use crate::ledger::render::debt_line;

pub const META: CommandMeta = CommandMeta {
    name: "debts",
    desc: "Track debts, their status and priority.",
    category: "ledger",
    usage: "finquest debts <add <name> <amount> <due-date> <payment-day> ... | list | status <id> <active|paid|defaulted> | priority <id> <low|medium|high> | delete <id>>",
};

pub async fn add(ctx: Context<'_>, new: &NewDebt) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let debt = create_debt(ctx.db(), user_id, new).await?;
    Ok(format!("Debt recorded.\n{}", debt_line(&debt)))
}

pub async fn list(ctx: Context<'_>) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let debts = list_debts(ctx.db(), user_id).await?;
    if debts.is_empty() {
        return Ok("No debts recorded.".to_owned());
    }

    let outstanding = outstanding_cents(&debts)?;

    let mut lines: Vec<String> = debts.iter().map(debt_line).collect();
    lines.push(format!("Outstanding: {}", format_brl(outstanding)));
    Ok(lines.join("\n"))
}

pub async fn status(ctx: Context<'_>, debt_id: Uuid, status: DebtStatus) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match set_debt_status(ctx.db(), user_id, debt_id, status).await? {
        Some(debt) => Ok(format!("{} is now {}.", debt.name, debt.status.as_str())),
        None => Ok(format!("Debt {debt_id} not found.")),
    }
}

pub async fn priority(
    ctx: Context<'_>,
    debt_id: Uuid,
    priority: DebtPriority,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match set_debt_priority(ctx.db(), user_id, debt_id, priority).await? {
        Some(debt) => Ok(format!(
            "{} priority is now {}.",
            debt.name,
            debt.priority.as_str()
        )),
        None => Ok(format!("Debt {debt_id} not found.")),
    }
}

pub async fn delete(ctx: Context<'_>, debt_id: Uuid) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if delete_debt(ctx.db(), user_id, debt_id).await? {
        Ok("Debt deleted.".to_owned())
    } else {
        Ok(format!("Debt {debt_id} not found."))
    }
}
