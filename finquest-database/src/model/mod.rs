pub mod budgets;
pub mod debts;
pub mod dependents;
pub mod profile;
pub mod transactions;
