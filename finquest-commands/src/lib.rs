pub mod ledger;
pub mod progression;
pub mod utility;

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::usage::META,
    progression::profile::META,
    progression::xp::META,
    progression::achievements::META,
    ledger::transactions::META,
    ledger::debts::META,
    ledger::budgets::META,
    ledger::dependents::META,
];
