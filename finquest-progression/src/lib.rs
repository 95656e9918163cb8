/// Static achievement definitions and per-profile achievement progress.
pub mod catalog;
/// Invalid-input errors raised by progression updates.
pub mod error;
/// Level curve: XP to level and level thresholds.
pub mod level;
/// Profile progression value and its update operations.
pub mod progression;

pub use catalog::{
    AchievementCategory, AchievementDefinition, AchievementIcon, AchievementProgress, Catalog,
    CategoryBadge, CategoryFilter, completed_by_category,
};
pub use error::ProgressionError;
pub use level::{LevelProgress, level_floor_xp, level_for_xp, next_level_xp};
pub use progression::{MAX_XP, Progress, Unlock};
