pub mod budgets;
pub mod debts;
pub mod dependents;
pub mod render;
pub mod transactions;
