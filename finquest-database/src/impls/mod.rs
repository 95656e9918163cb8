use std::time::{SystemTime, UNIX_EPOCH};

pub mod budgets;
pub mod debts;
pub mod dependents;
pub mod profiles;
pub mod transactions;

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
