use finquest_core::{Context, Error};
use finquest_database::impls::budgets::{
    create_budget, delete_budget, list_budgets, set_budget_spent, update_budget,
};
use finquest_database::model::budgets::{BudgetPatch, BudgetPeriod, BudgetTotals, NewBudget};
use uuid::Uuid;

use crate::CommandMeta;
use crate::ledger::render::{budget_line, budget_totals_line};

pub const META: CommandMeta = CommandMeta {
    name: "budgets",
    desc: "Plan monthly budgets and compare them with what was spent.",
    category: "ledger",
    usage: "finquest budgets <add <name> <planned> [--spent] [--color] [--month YYYY-MM] | list [--month YYYY-MM | --all] | update <id> [--name] [--planned] [--spent] [--color] | spent <id> <amount> | delete <id>>",
};

pub async fn add(ctx: Context<'_>, new: &NewBudget) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let budget = create_budget(ctx.db(), user_id, new).await?;
    Ok(format!("Budget created.\n{}", budget_line(&budget)))
}

pub async fn list(ctx: Context<'_>, period: Option<BudgetPeriod>) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let budgets = list_budgets(ctx.db(), user_id, period).await?;
    if budgets.is_empty() {
        return Ok("No budgets found.".to_owned());
    }

    let totals = BudgetTotals::from_budgets(&budgets)?;

    let mut lines: Vec<String> = budgets.iter().map(budget_line).collect();
    lines.push(budget_totals_line(&totals));
    Ok(lines.join("\n"))
}

pub async fn update(ctx: Context<'_>, budget_id: Uuid, patch: &BudgetPatch) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if patch.is_empty() {
        return Ok("Nothing to update.".to_owned());
    }
    match update_budget(ctx.db(), user_id, budget_id, patch).await? {
        Some(budget) => Ok(format!("Budget updated.\n{}", budget_line(&budget))),
        None => Ok(format!("Budget {budget_id} not found.")),
    }
}

pub async fn spent(ctx: Context<'_>, budget_id: Uuid, actual_cents: i64) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match set_budget_spent(ctx.db(), user_id, budget_id, actual_cents).await? {
        Some(budget) => Ok(budget_line(&budget)),
        None => Ok(format!("Budget {budget_id} not found.")),
    }
}

pub async fn delete(ctx: Context<'_>, budget_id: Uuid) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if delete_budget(ctx.db(), user_id, budget_id).await? {
        Ok("Budget deleted.".to_owned())
    } else {
        Ok(format!("Budget {budget_id} not found."))
    }
}
