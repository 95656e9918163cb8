use anyhow::Context as _;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BUDGET_COLOR: &str = "bg-blue-500";

/// A monthly spending envelope: what was planned against what was spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub planned_cents: i64,
    pub actual_cents: i64,
    pub color: String,
    pub year: i32,
    pub month: u8,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Budget {
    /// Planned minus spent; negative once the budget is exceeded.
    pub fn remaining_cents(&self) -> i64 {
        self.planned_cents.saturating_sub(self.actual_cents)
    }

    /// Spent as a share of planned. Not clamped, so 1.5 means 50% over.
    pub fn usage_fraction(&self) -> f64 {
        if self.planned_cents <= 0 {
            return 0.0;
        }
        self.actual_cents as f64 / self.planned_cents as f64
    }

    pub fn is_over_budget(&self) -> bool {
        self.actual_cents > self.planned_cents
    }
}

/// Planned and spent totals over a set of budgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BudgetTotals {
    pub planned_cents: i64,
    pub actual_cents: i64,
}

impl BudgetTotals {
    pub fn from_budgets(budgets: &[Budget]) -> anyhow::Result<Self> {
        budgets.iter().try_fold(Self::default(), |totals, budget| {
            Ok(Self {
                planned_cents: totals
                    .planned_cents
                    .checked_add(budget.planned_cents)
                    .context("planned budget total out of i64 range")?,
                actual_cents: totals
                    .actual_cents
                    .checked_add(budget.actual_cents)
                    .context("spent budget total out of i64 range")?,
            })
        })
    }

    pub fn remaining_cents(&self) -> i64 {
        self.planned_cents.saturating_sub(self.actual_cents)
    }
}

/// Calendar month a budget belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetPeriod {
    pub year: i32,
    pub month: u8,
}

impl BudgetPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            // month() is always 1..=12
            month: date.month() as u8,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=12).contains(&self.month),
            "month must be between 1 and 12"
        );
        anyhow::ensure!(
            (1970..=9999).contains(&self.year),
            "year must be between 1970 and 9999"
        );
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct NewBudget {
    pub name: String,
    pub planned_cents: i64,
    pub actual_cents: i64,
    pub color: Option<String>,
    pub period: BudgetPeriod,
}

impl NewBudget {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "budget name must not be blank");
        anyhow::ensure!(
            self.planned_cents > 0,
            "planned amount must be greater than zero"
        );
        anyhow::ensure!(self.actual_cents >= 0, "spent amount must not be negative");
        if let Some(color) = &self.color {
            anyhow::ensure!(!color.trim().is_empty(), "budget color must not be blank");
        }
        self.period.validate()
    }

    pub fn color(&self) -> &str {
        self.color
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_BUDGET_COLOR)
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub planned_cents: Option<i64>,
    pub actual_cents: Option<i64>,
    pub color: Option<String>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.planned_cents.is_none()
            && self.actual_cents.is_none()
            && self.color.is_none()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(name) = &self.name {
            anyhow::ensure!(!name.trim().is_empty(), "budget name must not be blank");
        }
        if let Some(planned) = self.planned_cents {
            anyhow::ensure!(planned > 0, "planned amount must be greater than zero");
        }
        if let Some(actual) = self.actual_cents {
            anyhow::ensure!(actual >= 0, "spent amount must not be negative");
        }
        if let Some(color) = &self.color {
            anyhow::ensure!(!color.trim().is_empty(), "budget color must not be blank");
        }
        Ok(())
    }
}
