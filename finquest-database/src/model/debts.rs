use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtCategory {
    CreditCard,
    Loan,
    Financing,
    Other,
}

impl DebtCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtCategory::CreditCard => "credit_card",
            DebtCategory::Loan => "loan",
            DebtCategory::Financing => "financing",
            DebtCategory::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "credit_card" | "card" => Some(DebtCategory::CreditCard),
            "loan" => Some(DebtCategory::Loan),
            "financing" => Some(DebtCategory::Financing),
            "other" => Some(DebtCategory::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    #[default]
    Active,
    Paid,
    Defaulted,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtStatus::Active => "active",
            DebtStatus::Paid => "paid",
            DebtStatus::Defaulted => "defaulted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(DebtStatus::Active),
            "paid" => Some(DebtStatus::Paid),
            "defaulted" => Some(DebtStatus::Defaulted),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl DebtPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtPriority::Low => "low",
            DebtPriority::Medium => "medium",
            DebtPriority::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(DebtPriority::Low),
            "medium" => Some(DebtPriority::Medium),
            "high" => Some(DebtPriority::High),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount_cents: i64,
    pub remaining_cents: i64,
    /// Percent per month.
    pub interest_rate: f64,
    pub due_date: NaiveDate,
    pub payment_day: u8,
    pub category: DebtCategory,
    pub status: DebtStatus,
    pub priority: DebtPriority,
    pub card_last_digits: Option<String>,
    pub card_brand: Option<String>,
    pub card_color: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Debt {
    /// Share of the original amount already paid, in 0.0..=1.0.
    pub fn paid_fraction(&self) -> f64 {
        if self.amount_cents <= 0 {
            return 0.0;
        }

        let paid = (self.amount_cents - self.remaining_cents).max(0) as f64;
        (paid / self.amount_cents as f64).clamp(0.0, 1.0)
    }
}

/// Sum of what is still owed on active debts.
pub fn outstanding_cents(debts: &[Debt]) -> anyhow::Result<i64> {
    debts
        .iter()
        .filter(|debt| debt.status == DebtStatus::Active)
        .try_fold(0_i64, |total, debt| total.checked_add(debt.remaining_cents))
        .context("outstanding debt total out of i64 range")
}

#[derive(Clone, Debug)]
pub struct NewDebt {
    pub name: String,
    pub amount_cents: i64,
    pub remaining_cents: i64,
    pub interest_rate: f64,
    pub due_date: NaiveDate,
    pub payment_day: u8,
    pub category: DebtCategory,
    pub priority: DebtPriority,
    pub card_last_digits: Option<String>,
    pub card_brand: Option<String>,
    pub card_color: Option<String>,
}

impl NewDebt {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "debt name must not be blank");
        anyhow::ensure!(self.amount_cents > 0, "amount must be greater than zero");
        anyhow::ensure!(
            (0..=self.amount_cents).contains(&self.remaining_cents),
            "remaining amount must be between zero and the total amount"
        );
        anyhow::ensure!(
            self.interest_rate.is_finite() && self.interest_rate >= 0.0,
            "interest rate must be a non-negative number"
        );
        anyhow::ensure!(
            (1..=31).contains(&self.payment_day),
            "payment day must be between 1 and 31"
        );
        if let Some(digits) = &self.card_last_digits {
            anyhow::ensure!(
                digits.len() == 4 && digits.chars().all(|ch| ch.is_ascii_digit()),
                "card last digits must be exactly 4 digits"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{Debt, DebtCategory, DebtPriority, DebtStatus, NewDebt, outstanding_cents};

    fn new_debt() -> NewDebt {
        NewDebt {
            name: "Cartão Nubank".to_owned(),
            amount_cents: 200_000,
            remaining_cents: 150_000,
            interest_rate: 12.5,
            due_date: NaiveDate::from_ymd_opt(2026, 12, 10).expect("valid date"),
            payment_day: 10,
            category: DebtCategory::CreditCard,
            priority: DebtPriority::High,
            card_last_digits: Some("1234".to_owned()),
            card_brand: Some("mastercard".to_owned()),
            card_color: None,
        }
    }

    #[test]
    fn valid_debt_passes() {
        assert!(new_debt().validate().is_ok());
    }

    #[test]
    fn rejects_inconsistent_amounts_and_days() {
        let mut debt = new_debt();
        debt.remaining_cents = 300_000;
        assert!(debt.validate().is_err());

        let mut debt = new_debt();
        debt.payment_day = 0;
        assert!(debt.validate().is_err());

        let mut debt = new_debt();
        debt.card_last_digits = Some("12a4".to_owned());
        assert!(debt.validate().is_err());

        let mut debt = new_debt();
        debt.interest_rate = f64::NAN;
        assert!(debt.validate().is_err());
    }

    fn stored(remaining_cents: i64, status: DebtStatus) -> Debt {
        let template = new_debt();
        Debt {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: template.name,
            amount_cents: template.amount_cents,
            remaining_cents,
            interest_rate: template.interest_rate,
            due_date: template.due_date,
            payment_day: template.payment_day,
            category: template.category,
            status,
            priority: template.priority,
            card_last_digits: None,
            card_brand: None,
            card_color: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn paid_fraction_is_clamped() {
        let mut debt = stored(150_000, DebtStatus::Active);
        assert_eq!(debt.paid_fraction(), 0.25);

        debt.remaining_cents = 250_000;
        assert_eq!(debt.paid_fraction(), 0.0);

        debt.remaining_cents = 0;
        assert_eq!(debt.paid_fraction(), 1.0);
    }

    #[test]
    fn parses_enum_keys() {
        assert_eq!(DebtCategory::parse("credit-card"), Some(DebtCategory::CreditCard));
        assert_eq!(DebtStatus::parse("PAID"), Some(DebtStatus::Paid));
        assert_eq!(DebtPriority::parse("urgent"), None);
        assert_eq!(DebtStatus::default(), DebtStatus::Active);
    }

    #[test]
    fn outstanding_counts_active_debts_only() {
        let debts = vec![
            stored(150_000, DebtStatus::Active),
            stored(50_000, DebtStatus::Paid),
            stored(20_000, DebtStatus::Active),
        ];
        assert_eq!(outstanding_cents(&debts).expect("fits"), 170_000);
        assert_eq!(outstanding_cents(&[]).expect("fits"), 0);
    }

    #[test]
    fn outstanding_overflow_is_an_error() {
        let debts = vec![
            stored(i64::MAX / 2 + 1, DebtStatus::Active),
            stored(i64::MAX / 2 + 1, DebtStatus::Active),
        ];
        assert!(outstanding_cents(&debts).is_err());

        let debts = vec![
            stored(i64::MAX, DebtStatus::Active),
            stored(i64::MAX, DebtStatus::Defaulted),
        ];
        assert_eq!(outstanding_cents(&debts).expect("fits"), i64::MAX);
    }
}
