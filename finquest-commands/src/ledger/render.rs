use chrono::NaiveDate;
use finquest_database::model::budgets::{Budget, BudgetTotals};
use finquest_database::model::debts::Debt;
use finquest_database::model::dependents::DependentDetails;
use finquest_database::model::transactions::{Transaction, TransactionKind, TransactionSummary};
use finquest_utils::formatting::{format_brl, format_percent, humanize_key};

pub fn transaction_line(transaction: &Transaction) -> String {
    let sign = match transaction.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };
    let mut line = format!(
        "{} {sign}{} {} [{}] {} ({}) {}",
        transaction.date.format("%Y-%m-%d"),
        format_brl(transaction.amount_cents),
        transaction.category,
        transaction.status.as_str(),
        transaction.description,
        transaction.payment_method,
        transaction.id,
    );
    if let Some(recurring) = transaction.recurring {
        line.push_str(&format!(" ↻ {}", recurring.as_str()));
    }
    line
}

pub fn summary_block(summary: &TransactionSummary) -> String {
    let mut lines = vec![
        format!("Income:  {}", format_brl(summary.total_income_cents)),
        format!("Expense: {}", format_brl(summary.total_expense_cents)),
        format!("Balance: {}", format_brl(summary.balance_cents)),
    ];
    if !summary.by_category.is_empty() {
        lines.push("By category:".to_owned());
        lines.extend(summary.by_category.iter().map(|(category, total)| {
            format!(
                "  {category}: {} ({} transactions)",
                format_brl(total.total_cents),
                total.count
            )
        }));
    }
    lines.join("\n")
}

pub fn debt_line(debt: &Debt) -> String {
    let mut line = format!(
        "{} [{} · {} · {}] {} of {} left, {}% a.m., due {} (day {}) {}",
        debt.name,
        humanize_key(debt.category.as_str()),
        debt.status.as_str(),
        debt.priority.as_str(),
        format_brl(debt.remaining_cents),
        format_brl(debt.amount_cents),
        debt.interest_rate,
        debt.due_date.format("%Y-%m-%d"),
        debt.payment_day,
        debt.id,
    );
    if let Some(digits) = &debt.card_last_digits {
        let brand = debt.card_brand.as_deref().unwrap_or("card");
        line.push_str(&format!(" · {brand} •••• {digits}"));
    }
    line.push_str(&format!(
        "\n    paid {}",
        format_percent(debt.paid_fraction() * 100.0)
    ));
    line
}

pub fn budget_line(budget: &Budget) -> String {
    let mut line = format!(
        "{} {:04}-{:02}: {} of {} spent ({}) {}",
        budget.name,
        budget.year,
        budget.month,
        format_brl(budget.actual_cents),
        format_brl(budget.planned_cents),
        format_percent(budget.usage_fraction() * 100.0),
        budget.id,
    );
    if budget.is_over_budget() {
        line.push_str(&format!(
            "\n    over by {}",
            format_brl(-budget.remaining_cents())
        ));
    } else {
        line.push_str(&format!(
            "\n    {} left",
            format_brl(budget.remaining_cents())
        ));
    }
    line
}

pub fn budget_totals_line(totals: &BudgetTotals) -> String {
    format!(
        "Planned: {} · Spent: {} · Left: {}",
        format_brl(totals.planned_cents),
        format_brl(totals.actual_cents),
        format_brl(totals.remaining_cents()),
    )
}

pub fn dependent_block(details: &DependentDetails, today: NaiveDate) -> anyhow::Result<String> {
    let dependent = &details.dependent;
    let mut lines = vec![format!(
        "{} ({} years, born {}) {}/month {}",
        dependent.name,
        dependent.age_on(today),
        dependent.birth_date.format("%Y-%m-%d"),
        format_brl(dependent.monthly_cost_cents),
        dependent.id,
    )];

    let school = [dependent.school_name.as_deref(), dependent.school_grade.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    if !school.is_empty() {
        lines.push(format!("    school: {}", school.join(", ")));
    }
    let health = [
        dependent.health_insurance.as_deref(),
        dependent.blood_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    if !health.is_empty() {
        lines.push(format!("    health: {}", health.join(", ")));
    }
    if let Some(allergies) = &dependent.allergies {
        lines.push(format!("    allergies: {allergies}"));
    }
    if let Some(medications) = &dependent.medications {
        lines.push(format!("    medications: {medications}"));
    }

    if let Some(event) = details.next_event(today) {
        lines.push(format!(
            "    next: {} {} ({})",
            event.date.format("%Y-%m-%d"),
            event.description,
            event.kind.as_str(),
        ));
    }
    if !details.expenses.is_empty() {
        lines.push(format!(
            "    expenses: {} total, {} recurrent",
            format_brl(details.expenses_total_cents()?),
            format_brl(details.recurrent_cents()?),
        ));
        lines.extend(details.expenses.iter().map(|expense| {
            let marker = if expense.recurrent { " ↻" } else { "" };
            format!(
                "      {} {} {} [{}]{marker}",
                expense.date.format("%Y-%m-%d"),
                format_brl(expense.amount_cents),
                expense.description,
                expense.kind.as_str(),
            )
        }));
    }

    Ok(lines.join("\n"))
}
