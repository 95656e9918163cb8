use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use finquest_commands::utility::{help, usage};
use finquest_commands::{ledger, progression};
use finquest_core::{Context, Error};
use finquest_database::model::budgets::{BudgetPatch, BudgetPeriod, NewBudget};
use finquest_database::model::debts::{DebtCategory, DebtPriority, DebtStatus, NewDebt};
use finquest_database::model::dependents::{
    DependentEventKind, DependentExpenseKind, NewDependent, NewDependentEvent, NewDependentExpense,
};
use finquest_database::model::profile::ProfilePatch;
use finquest_database::model::transactions::{
    NewTransaction, RecurringFrequency, TransactionFilter, TransactionKind, TransactionStatus,
};
use finquest_progression::CategoryFilter;
use finquest_utils::parse::{parse_amount_cents, parse_date};
use finquest_utils::time::today;

#[derive(Debug, Parser)]
#[command(name = "finquest")]
#[command(about = "Personal finance tracker with XP, levels and achievements")]
#[command(version, disable_help_subcommand = true)]
pub struct Cli {
    /// Acting user id
    #[arg(short, long, global = true, env = "FINQUEST_USER_ID")]
    pub user: Option<Uuid>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Local(LocalCommand),

    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands answered without touching the database.
#[derive(Debug, Subcommand)]
pub enum LocalCommand {
    /// List available commands
    Help {
        /// Page number or category
        query: Option<String>,
    },

    /// Show usage syntax for a command
    Usage {
        /// Command name
        command: Option<String>,
    },
}

/// Commands that read or write the acting user's data.
#[derive(Debug, Subcommand)]
pub enum StoredCommand {
    /// Show, create or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Experience points
    Xp {
        #[command(subcommand)]
        action: XpAction,
    },

    /// List or unlock achievements
    Achievements {
        #[command(subcommand)]
        action: AchievementsAction,
    },

    /// Income and expenses
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Debts and their payoff
    Debts {
        #[command(subcommand)]
        action: DebtsAction,
    },

    /// Monthly budgets, planned against spent
    Budgets {
        #[command(subcommand)]
        action: BudgetsAction,
    },

    /// Dependents, their events and expenses
    Dependents {
        #[command(subcommand)]
        action: DependentsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    Show,
    Create {
        name: String,
        email: String,
    },
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_avatar")]
        avatar: Option<String>,
        #[arg(long)]
        clear_avatar: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum XpAction {
    Add {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AchievementsAction {
    List {
        #[arg(long, value_parser = category_filter_arg, default_value = "all")]
        category: CategoryFilter,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Unlock {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TransactionsAction {
    Add(TransactionArgs),
    List {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
        #[arg(long, value_parser = kind_arg)]
        kind: Option<TransactionKind>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = transaction_status_arg)]
        status: Option<TransactionStatus>,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Summary {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
    },
    Status {
        id: Uuid,
        #[arg(value_parser = transaction_status_arg)]
        status: TransactionStatus,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct TransactionArgs {
    #[arg(value_parser = kind_arg)]
    pub kind: TransactionKind,
    #[arg(value_parser = amount_arg)]
    pub amount: i64,
    pub category: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Defaults to today
    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "other")]
    pub payment_method: String,
    #[arg(long, value_parser = transaction_status_arg, default_value = "completed")]
    pub status: TransactionStatus,
    #[arg(long, value_parser = recurring_arg)]
    pub recurring: Option<RecurringFrequency>,
}

impl TransactionArgs {
    fn into_new(self) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            amount_cents: self.amount,
            category: self.category,
            description: self.description,
            date: self.date.unwrap_or_else(today),
            payment_method: self.payment_method,
            status: self.status,
            recurring: self.recurring,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DebtsAction {
    Add(DebtArgs),
    List,
    Status {
        id: Uuid,
        #[arg(value_parser = debt_status_arg)]
        status: DebtStatus,
    },
    Priority {
        id: Uuid,
        #[arg(value_parser = debt_priority_arg)]
        priority: DebtPriority,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct DebtArgs {
    pub name: String,
    #[arg(value_parser = amount_arg)]
    pub amount: i64,
    #[arg(value_parser = date_arg)]
    pub due_date: NaiveDate,
    pub payment_day: u8,
    /// Defaults to the full amount
    #[arg(long, value_parser = amount_arg)]
    pub remaining: Option<i64>,
    /// Monthly interest in percent
    #[arg(long, default_value_t = 0.0)]
    pub interest_rate: f64,
    #[arg(long, value_parser = debt_category_arg, default_value = "other")]
    pub category: DebtCategory,
    #[arg(long, value_parser = debt_priority_arg, default_value = "medium")]
    pub priority: DebtPriority,
    #[arg(long)]
    pub card_digits: Option<String>,
    #[arg(long)]
    pub card_brand: Option<String>,
    #[arg(long)]
    pub card_color: Option<String>,
}

impl DebtArgs {
    fn into_new(self) -> NewDebt {
        NewDebt {
            name: self.name,
            amount_cents: self.amount,
            remaining_cents: self.remaining.unwrap_or(self.amount),
            interest_rate: self.interest_rate,
            due_date: self.due_date,
            payment_day: self.payment_day,
            category: self.category,
            priority: self.priority,
            card_last_digits: self.card_digits,
            card_brand: self.card_brand,
            card_color: self.card_color,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BudgetsAction {
    Add(BudgetArgs),
    List {
        /// Defaults to the current month
        #[arg(long, value_parser = month_arg, conflicts_with = "all")]
        month: Option<BudgetPeriod>,
        #[arg(long)]
        all: bool,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = amount_arg)]
        planned: Option<i64>,
        #[arg(long, value_parser = amount_arg)]
        spent: Option<i64>,
        #[arg(long)]
        color: Option<String>,
    },
    Spent {
        id: Uuid,
        #[arg(value_parser = amount_arg)]
        amount: i64,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct BudgetArgs {
    pub name: String,
    #[arg(value_parser = amount_arg)]
    pub planned: i64,
    #[arg(long, value_parser = amount_arg, default_value = "0")]
    pub spent: i64,
    #[arg(long)]
    pub color: Option<String>,
    /// Defaults to the current month
    #[arg(long, value_parser = month_arg)]
    pub month: Option<BudgetPeriod>,
}

impl BudgetArgs {
    fn into_new(self) -> NewBudget {
        NewBudget {
            name: self.name,
            planned_cents: self.planned,
            actual_cents: self.spent,
            color: self.color,
            period: self
                .month
                .unwrap_or_else(|| BudgetPeriod::containing(today())),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DependentsAction {
    Add(DependentArgs),
    List,
    /// Replace every detail of a dependent
    Update {
        id: Uuid,
        #[command(flatten)]
        details: DependentArgs,
    },
    Delete {
        id: Uuid,
    },
    Event {
        id: Uuid,
        #[arg(value_parser = event_kind_arg)]
        kind: DependentEventKind,
        #[arg(value_parser = date_arg)]
        date: NaiveDate,
        description: String,
    },
    Expense {
        id: Uuid,
        #[arg(value_parser = expense_kind_arg)]
        kind: DependentExpenseKind,
        #[arg(value_parser = amount_arg)]
        amount: i64,
        description: String,
        /// Defaults to today
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
        #[arg(long)]
        recurrent: bool,
    },
}

#[derive(Debug, Args)]
pub struct DependentArgs {
    pub name: String,
    #[arg(value_parser = date_arg)]
    pub birth_date: NaiveDate,
    #[arg(long)]
    pub school_name: Option<String>,
    #[arg(long)]
    pub school_grade: Option<String>,
    #[arg(long)]
    pub health_insurance: Option<String>,
    #[arg(long)]
    pub blood_type: Option<String>,
    #[arg(long)]
    pub allergies: Option<String>,
    #[arg(long)]
    pub medications: Option<String>,
    #[arg(long, value_parser = amount_arg, default_value = "0")]
    pub monthly_cost: i64,
}

impl DependentArgs {
    fn into_new(self) -> NewDependent {
        NewDependent {
            name: self.name,
            birth_date: self.birth_date,
            school_name: self.school_name,
            school_grade: self.school_grade,
            health_insurance: self.health_insurance,
            blood_type: self.blood_type,
            allergies: self.allergies,
            medications: self.medications,
            monthly_cost_cents: self.monthly_cost,
        }
    }
}

pub fn run_local(command: LocalCommand) -> Result<String, Error> {
    match command {
        LocalCommand::Help { query } => help::help(query.as_deref()),
        LocalCommand::Usage { command } => Ok(usage::usage(command.as_deref())),
    }
}

pub async fn dispatch(ctx: Context<'_>, command: StoredCommand) -> Result<String, Error> {
    match command {
        StoredCommand::Profile { action } => match action {
            ProfileAction::Show => progression::profile::show(ctx).await,
            ProfileAction::Create { name, email } => {
                progression::profile::create(ctx, &name, &email).await
            }
            ProfileAction::Update {
                name,
                avatar,
                clear_avatar,
            } => {
                let avatar_url = if clear_avatar { Some(None) } else { avatar.map(Some) };
                let patch = ProfilePatch { name, avatar_url };
                progression::profile::update(ctx, &patch).await
            }
        },
        StoredCommand::Xp {
            action: XpAction::Add { amount },
        } => progression::xp::add(ctx, amount).await,
        StoredCommand::Achievements { action } => match action {
            AchievementsAction::List { category, page } => {
                progression::achievements::list(ctx, category, page).await
            }
            AchievementsAction::Unlock { id } => progression::achievements::unlock(ctx, &id).await,
        },
        StoredCommand::Transactions { action } => match action {
            TransactionsAction::Add(args) => {
                ledger::transactions::add(ctx, &args.into_new()).await
            }
            TransactionsAction::List {
                from,
                to,
                kind,
                category,
                status,
                limit,
            } => {
                let filter = TransactionFilter {
                    start_date: from,
                    end_date: to,
                    kind,
                    category,
                    status,
                    limit,
                };
                ledger::transactions::list(ctx, &filter).await
            }
            TransactionsAction::Summary { from, to } => {
                ledger::transactions::summary(ctx, from, to).await
            }
            TransactionsAction::Status { id, status } => {
                ledger::transactions::status(ctx, id, status).await
            }
            TransactionsAction::Delete { id } => ledger::transactions::delete(ctx, id).await,
        },
        StoredCommand::Debts { action } => match action {
            DebtsAction::Add(args) => ledger::debts::add(ctx, &args.into_new()).await,
            DebtsAction::List => ledger::debts::list(ctx).await,
            DebtsAction::Status { id, status } => ledger::debts::status(ctx, id, status).await,
            DebtsAction::Priority { id, priority } => {
                ledger::debts::priority(ctx, id, priority).await
            }
            DebtsAction::Delete { id } => ledger::debts::delete(ctx, id).await,
        },
        StoredCommand::Budgets { action } => match action {
            BudgetsAction::Add(args) => ledger::budgets::add(ctx, &args.into_new()).await,
            BudgetsAction::List { month, all } => {
                let period = if all {
                    None
                } else {
                    Some(month.unwrap_or_else(|| BudgetPeriod::containing(today())))
                };
                ledger::budgets::list(ctx, period).await
            }
            BudgetsAction::Update {
                id,
                name,
                planned,
                spent,
                color,
            } => {
                let patch = BudgetPatch {
                    name,
                    planned_cents: planned,
                    actual_cents: spent,
                    color,
                };
                ledger::budgets::update(ctx, id, &patch).await
            }
            BudgetsAction::Spent { id, amount } => ledger::budgets::spent(ctx, id, amount).await,
            BudgetsAction::Delete { id } => ledger::budgets::delete(ctx, id).await,
        },
        StoredCommand::Dependents { action } => match action {
            DependentsAction::Add(args) => ledger::dependents::add(ctx, &args.into_new()).await,
            DependentsAction::List => ledger::dependents::list(ctx).await,
            DependentsAction::Update { id, details } => {
                ledger::dependents::update(ctx, id, &details.into_new()).await
            }
            DependentsAction::Delete { id } => ledger::dependents::delete(ctx, id).await,
            DependentsAction::Event {
                id,
                kind,
                date,
                description,
            } => {
                let new = NewDependentEvent {
                    kind,
                    date,
                    description,
                };
                ledger::dependents::event(ctx, id, &new).await
            }
            DependentsAction::Expense {
                id,
                kind,
                amount,
                description,
                date,
                recurrent,
            } => {
                let new = NewDependentExpense {
                    kind,
                    description,
                    amount_cents: amount,
                    date: date.unwrap_or_else(today),
                    recurrent,
                };
                ledger::dependents::expense(ctx, id, &new).await
            }
        },
    }
}

fn amount_arg(raw: &str) -> Result<i64, String> {
    parse_amount_cents(raw).ok_or_else(|| format!("`{raw}` is not a valid amount"))
}

fn date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("`{raw}` is not a date (use YYYY-MM-DD or DD/MM/YYYY)"))
}

fn category_filter_arg(raw: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(raw).ok_or_else(|| {
        format!("unknown category `{raw}` (all, economia, investimento, pagamentos, metas)")
    })
}

fn kind_arg(raw: &str) -> Result<TransactionKind, String> {
    TransactionKind::parse(raw).ok_or_else(|| format!("expected income or expense, got `{raw}`"))
}

fn transaction_status_arg(raw: &str) -> Result<TransactionStatus, String> {
    TransactionStatus::parse(raw)
        .ok_or_else(|| format!("expected pending, completed or cancelled, got `{raw}`"))
}

fn recurring_arg(raw: &str) -> Result<RecurringFrequency, String> {
    RecurringFrequency::parse(raw)
        .ok_or_else(|| format!("expected weekly, monthly or yearly, got `{raw}`"))
}

fn debt_category_arg(raw: &str) -> Result<DebtCategory, String> {
    DebtCategory::parse(raw)
        .ok_or_else(|| format!("expected credit_card, loan, financing or other, got `{raw}`"))
}

fn debt_status_arg(raw: &str) -> Result<DebtStatus, String> {
    DebtStatus::parse(raw).ok_or_else(|| format!("expected active, paid or defaulted, got `{raw}`"))
}

fn debt_priority_arg(raw: &str) -> Result<DebtPriority, String> {
    DebtPriority::parse(raw).ok_or_else(|| format!("expected low, medium or high, got `{raw}`"))
}

fn month_arg(raw: &str) -> Result<BudgetPeriod, String> {
    let invalid = || format!("`{raw}` is not a month (use YYYY-MM)");
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let period = BudgetPeriod {
        year: year.parse().map_err(|_| invalid())?,
        month: month.parse().map_err(|_| invalid())?,
    };
    period.validate().map_err(|_| invalid())?;
    Ok(period)
}

fn event_kind_arg(raw: &str) -> Result<DependentEventKind, String> {
    DependentEventKind::parse(raw)
        .ok_or_else(|| format!("expected medical, school, birthday or other, got `{raw}`"))
}

fn expense_kind_arg(raw: &str) -> Result<DependentExpenseKind, String> {
    DependentExpenseKind::parse(raw)
        .ok_or_else(|| format!("expected education, health, activities or other, got `{raw}`"))
}
