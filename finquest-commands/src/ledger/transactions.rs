use chrono::NaiveDate;
use finquest_core::{Context, Error};
use finquest_database::impls::transactions::{
    create_transaction, delete_transaction, list_transactions, set_transaction_status,
    transactions_summary,
};
use finquest_database::model::transactions::{NewTransaction, TransactionFilter, TransactionStatus};
use finquest_utils::formatting::format_brl;
use finquest_utils::time::{month_bounds, today};
use uuid::Uuid;

use crate::CommandMeta;
use crate::ledger::render::{summary_block, transaction_line};

pub const META: CommandMeta = CommandMeta {
    name: "transactions",
    desc: "Record, list and summarize income and expenses.",
    category: "ledger",
    usage: "finquest transactions <add <income|expense> <amount> <category> ... | list [filters] | summary [--from <date>] [--to <date>] | status <id> <status> | delete <id>>",
};

pub async fn add(ctx: Context<'_>, new: &NewTransaction) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let transaction = create_transaction(ctx.db(), user_id, new).await?;
    Ok(format!("Transaction recorded.\n{}", transaction_line(&transaction)))
}

pub async fn list(ctx: Context<'_>, filter: &TransactionFilter) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let transactions = list_transactions(ctx.db(), user_id, filter).await?;
    if transactions.is_empty() {
        return Ok("No transactions found.".to_owned());
    }

    Ok(transactions
        .iter()
        .map(transaction_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Totals for `[from, to]`; missing bounds default to the current month.
pub async fn summary(
    ctx: Context<'_>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let (month_start, month_end) = month_bounds(today());
    let start = from.unwrap_or(month_start);
    let end = to.unwrap_or(month_end);

    let summary = transactions_summary(ctx.db(), user_id, start, end).await?;
    Ok(format!(
        "Summary {} to {}\n{}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
        summary_block(&summary)
    ))
}

pub async fn status(
    ctx: Context<'_>,
    transaction_id: Uuid,
    status: TransactionStatus,
) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    match set_transaction_status(ctx.db(), user_id, transaction_id, status).await? {
        Some(transaction) => Ok(format!(
            "Transaction of {} is now {}.",
            format_brl(transaction.amount_cents),
            transaction.status.as_str()
        )),
        None => Ok(format!("Transaction {transaction_id} not found.")),
    }
}

pub async fn delete(ctx: Context<'_>, transaction_id: Uuid) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if delete_transaction(ctx.db(), user_id, transaction_id).await? {
        Ok("Transaction deleted.".to_owned())
    } else {
        Ok(format!("Transaction {transaction_id} not found."))
    }
}
