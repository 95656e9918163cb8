/// Rejected progression input. Raised before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("XP amount must not be negative (got {0})")]
    NegativeXp(i64),

    #[error("XP total would exceed the maximum: {current} + {amount}")]
    XpOverflow { current: u64, amount: u64 },

    #[error("achievement id must not be blank")]
    BlankAchievementId,

    #[error("unknown achievement `{0}`")]
    UnknownAchievement(String),
}
