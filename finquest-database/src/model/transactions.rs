use std::collections::BTreeMap;

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" | "receita" => Some(TransactionKind::Income),
            "expense" | "despesa" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(TransactionStatus::Pending),
            "completed" => Some(TransactionStatus::Completed),
            "cancelled" | "canceled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(RecurringFrequency::Weekly),
            "monthly" => Some(RecurringFrequency::Monthly),
            "yearly" => Some(RecurringFrequency::Yearly),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub recurring: Option<RecurringFrequency>,
    pub created_at: u64,
}

#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub recurring: Option<RecurringFrequency>,
}

impl NewTransaction {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.amount_cents > 0, "amount must be greater than zero");
        anyhow::ensure!(!self.category.trim().is_empty(), "category must not be blank");
        anyhow::ensure!(
            !self.payment_method.trim().is_empty(),
            "payment method must not be blank"
        );
        Ok(())
    }
}

/// Optional list filters; `None` fields match everything.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub status: Option<TransactionStatus>,
    pub limit: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub total_cents: i64,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub balance_cents: i64,
    pub by_category: BTreeMap<String, CategoryTotal>,
}

impl TransactionSummary {
    /// Totals per kind and per category.
    ///
    /// Cancelled transactions never moved money, so they are left out of every
    /// total and count, even when dated inside the period. Errors when a total
    /// does not fit in `i64` cents.
    pub fn from_transactions(transactions: &[Transaction]) -> anyhow::Result<Self> {
        let mut summary = Self::default();

        for transaction in transactions
            .iter()
            .filter(|transaction| transaction.status != TransactionStatus::Cancelled)
        {
            let amount = transaction.amount_cents;
            let total = match transaction.kind {
                TransactionKind::Income => &mut summary.total_income_cents,
                TransactionKind::Expense => &mut summary.total_expense_cents,
            };
            *total = total
                .checked_add(amount)
                .context("transaction total out of i64 range")?;

            let entry = summary
                .by_category
                .entry(transaction.category.clone())
                .or_default();
            entry.total_cents = entry.total_cents.checked_add(amount).with_context(|| {
                format!("category `{}` total out of i64 range", transaction.category)
            })?;
            entry.count += 1;
        }

        summary.balance_cents = summary
            .total_income_cents
            .checked_sub(summary.total_expense_cents)
            .context("balance out of i64 range")?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{
        NewTransaction, Transaction, TransactionKind, TransactionStatus, TransactionSummary,
    };

    fn transaction(
        kind: TransactionKind,
        amount_cents: i64,
        category: &str,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            kind,
            amount_cents,
            category: category.to_owned(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"),
            payment_method: "pix".to_owned(),
            status,
            recurring: None,
            created_at: 0,
        }
    }

    #[test]
    fn summary_totals_by_kind_and_category() {
        let transactions = vec![
            transaction(TransactionKind::Income, 500_000, "salario", TransactionStatus::Completed),
            transaction(TransactionKind::Expense, 120_050, "mercado", TransactionStatus::Completed),
            transaction(TransactionKind::Expense, 30_000, "mercado", TransactionStatus::Pending),
            transaction(TransactionKind::Expense, 99_999, "lazer", TransactionStatus::Cancelled),
        ];

        let summary = TransactionSummary::from_transactions(&transactions).expect("totals fit");
        assert_eq!(summary.total_income_cents, 500_000);
        assert_eq!(summary.total_expense_cents, 150_050);
        assert_eq!(summary.balance_cents, 349_950);

        let groceries = summary.by_category.get("mercado").expect("category present");
        assert_eq!(groceries.total_cents, 150_050);
        assert_eq!(groceries.count, 2);
        assert!(!summary.by_category.contains_key("lazer"));
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = TransactionSummary::from_transactions(&[]).expect("totals fit");
        assert_eq!(summary, TransactionSummary::default());
    }

    #[test]
    fn parses_kinds_and_statuses() {
        assert_eq!(TransactionKind::parse("Income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("despesa"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("transfer"), None);
        assert_eq!(
            TransactionStatus::parse("canceled"),
            Some(TransactionStatus::Cancelled)
        );
        assert_eq!(TransactionStatus::default(), TransactionStatus::Completed);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let mut new = NewTransaction {
            kind: TransactionKind::Expense,
            amount_cents: 0,
            category: "mercado".to_owned(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"),
            payment_method: "debito".to_owned(),
            status: TransactionStatus::Completed,
            recurring: None,
        };
        assert!(new.validate().is_err());

        new.amount_cents = 1;
        assert!(new.validate().is_ok());

        new.category = "  ".to_owned();
        assert!(new.validate().is_err());
    }

    #[test]
    fn oversized_totals_are_errors() {
        let half = i64::MAX / 2 + 1;
        let transactions = vec![
            transaction(TransactionKind::Income, half, "salario", TransactionStatus::Completed),
            transaction(TransactionKind::Income, half, "salario", TransactionStatus::Completed),
        ];
        assert!(TransactionSummary::from_transactions(&transactions).is_err());

        let transactions = vec![
            transaction(TransactionKind::Expense, i64::MAX, "aluguel", TransactionStatus::Completed),
            transaction(TransactionKind::Expense, 1, "mercado", TransactionStatus::Completed),
        ];
        assert!(TransactionSummary::from_transactions(&transactions).is_err());

        let transactions = vec![
            transaction(TransactionKind::Income, i64::MAX, "salario", TransactionStatus::Completed),
            transaction(TransactionKind::Income, i64::MAX, "bonus", TransactionStatus::Cancelled),
        ];
        let summary =
            TransactionSummary::from_transactions(&transactions).expect("cancelled rows skipped");
        assert_eq!(summary.balance_cents, i64::MAX);
    }
}
