use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{AchievementDefinition, Catalog};
use crate::error::ProgressionError;
use crate::level::{LevelProgress, level_for_xp, next_level_xp};

/// Highest XP total a profile may hold; stored as a signed 64-bit column.
pub const MAX_XP: u64 = i64::MAX as u64;

/// XP, level and unlocked achievements of one profile.
///
/// `level` is cached from `xp` and never set on its own. Deserializing
/// ignores any stored level and derives it again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProgressRecord")]
pub struct Progress {
    xp: u64,
    level: u32,
    achievements: BTreeSet<String>,
}

#[derive(Deserialize)]
struct ProgressRecord {
    #[serde(default)]
    xp: u64,
    #[serde(default)]
    achievements: BTreeSet<String>,
}

impl From<ProgressRecord> for Progress {
    fn from(record: ProgressRecord) -> Self {
        Self::from_parts(record.xp, record.achievements)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::from_parts(0, BTreeSet::new())
    }
}

/// Result of unlocking an achievement through [`Progress::unlock`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unlock {
    pub progress: Progress,
    pub definition: &'static AchievementDefinition,
    pub newly_unlocked: bool,
    pub awarded_xp: u64,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(xp: u64, achievements: impl IntoIterator<Item = String>) -> Self {
        Self {
            xp,
            level: level_for_xp(xp),
            achievements: achievements.into_iter().collect(),
        }
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn next_level_xp(&self) -> f64 {
        next_level_xp(self.xp)
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::for_xp(self.xp)
    }

    pub fn achievements(&self) -> &BTreeSet<String> {
        &self.achievements
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }

    /// Add `amount` XP and derive the level again. Negative amounts are rejected.
    pub fn add_xp(&self, amount: i64) -> Result<Self, ProgressionError> {
        let amount = u64::try_from(amount).map_err(|_| ProgressionError::NegativeXp(amount))?;
        self.gain_xp(amount)
    }

    fn gain_xp(&self, amount: u64) -> Result<Self, ProgressionError> {
        let xp = self
            .xp
            .checked_add(amount)
            .filter(|xp| *xp <= MAX_XP)
            .ok_or(ProgressionError::XpOverflow {
                current: self.xp,
                amount,
            })?;

        Ok(Self {
            xp,
            level: level_for_xp(xp),
            achievements: self.achievements.clone(),
        })
    }

    /// Insert a catalog achievement id. Adding an id that is already present
    /// returns an equal value.
    pub fn add_achievement(&self, catalog: &Catalog, id: &str) -> Result<Self, ProgressionError> {
        let definition = lookup(catalog, id)?;

        let mut next = self.clone();
        next.achievements.insert(definition.id.to_owned());
        Ok(next)
    }

    /// Add an achievement and, the first time only, its XP reward.
    pub fn unlock(&self, catalog: &Catalog, id: &str) -> Result<Unlock, ProgressionError> {
        let definition = lookup(catalog, id)?;

        if self.has_achievement(definition.id) {
            return Ok(Unlock {
                progress: self.clone(),
                definition,
                newly_unlocked: false,
                awarded_xp: 0,
            });
        }

        let mut next = self.gain_xp(definition.xp_reward)?;
        next.achievements.insert(definition.id.to_owned());

        Ok(Unlock {
            progress: next,
            definition,
            newly_unlocked: true,
            awarded_xp: definition.xp_reward,
        })
    }
}

fn lookup(catalog: &Catalog, id: &str) -> Result<&'static AchievementDefinition, ProgressionError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ProgressionError::BlankAchievementId);
    }

    catalog
        .get(id)
        .ok_or_else(|| ProgressionError::UnknownAchievement(id.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::{MAX_XP, Progress};
    use crate::catalog::Catalog;
    use crate::error::ProgressionError;

    #[test]
    fn fresh_progress_starts_at_level_one() {
        let progress = Progress::new();
        assert_eq!(progress.xp(), 0);
        assert_eq!(progress.level(), 1);
        assert!(progress.achievements().is_empty());
        assert_eq!(progress.next_level_xp(), 500.0);
    }

    #[test]
    fn adding_xp_rederives_the_level() {
        let progress = Progress::new().add_xp(500).expect("valid amount");
        assert_eq!(progress.xp(), 500);
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.next_level_xp(), 1250.0);

        let progress = progress.add_xp(750).expect("valid amount");
        assert_eq!(progress.xp(), 1250);
        assert_eq!(progress.level(), 3);
    }

    #[test]
    fn adding_xp_is_additive() {
        let start = Progress::from_parts(321, Vec::new());
        for amount in [0_i64, 1, 99, 1_000, 123_456] {
            let next = start.add_xp(amount).expect("valid amount");
            assert_eq!(next.xp(), start.xp() + amount as u64);
            assert!(next.level() >= start.level());
        }
    }

    #[test]
    fn negative_xp_is_rejected_without_changes() {
        let start = Progress::from_parts(800, vec!["meta_alcancada".to_owned()]);
        let snapshot = start.clone();

        assert_eq!(start.add_xp(-5), Err(ProgressionError::NegativeXp(-5)));
        assert_eq!(start, snapshot);
    }

    #[test]
    fn overflowing_xp_is_rejected() {
        let start = Progress::from_parts(u64::MAX - 1, Vec::new());
        assert!(matches!(
            start.add_xp(2),
            Err(ProgressionError::XpOverflow { .. })
        ));
    }

    #[test]
    fn xp_stops_at_the_storable_maximum() {
        let start = Progress::from_parts(MAX_XP - 10, Vec::new());
        let snapshot = start.clone();

        let topped = start.add_xp(10).expect("reaches the maximum exactly");
        assert_eq!(topped.xp(), MAX_XP);
        assert_eq!(
            start.add_xp(11),
            Err(ProgressionError::XpOverflow {
                current: MAX_XP - 10,
                amount: 11,
            })
        );
        assert_eq!(start, snapshot);

        let catalog = Catalog::builtin();
        assert!(matches!(
            topped.unlock(&catalog, "primeiro_investimento"),
            Err(ProgressionError::XpOverflow { .. })
        ));
        assert!(i64::try_from(topped.xp()).is_ok());
    }

    #[test]
    fn adding_an_achievement_twice_keeps_one_entry() {
        let catalog = Catalog::builtin();
        let once = Progress::new()
            .add_achievement(&catalog, "primeiro_investimento")
            .expect("known id");
        let twice = once
            .add_achievement(&catalog, "primeiro_investimento")
            .expect("known id");

        assert_eq!(once, twice);
        assert_eq!(twice.achievements().len(), 1);
        assert!(twice.has_achievement("primeiro_investimento"));
        assert_eq!(twice.xp(), 0);
    }

    #[test]
    fn unknown_and_blank_ids_are_rejected() {
        let catalog = Catalog::builtin();
        let start = Progress::new();

        assert_eq!(
            start.add_achievement(&catalog, "nao_existe"),
            Err(ProgressionError::UnknownAchievement("nao_existe".to_owned()))
        );
        assert_eq!(
            start.add_achievement(&catalog, "   "),
            Err(ProgressionError::BlankAchievementId)
        );
        assert!(start.achievements().is_empty());
    }

    #[test]
    fn unlock_awards_xp_only_once() {
        let catalog = Catalog::builtin();

        let first = Progress::new()
            .unlock(&catalog, "primeiro_investimento")
            .expect("known id");
        assert!(first.newly_unlocked);
        assert_eq!(first.awarded_xp, 500);
        assert_eq!(first.progress.xp(), 500);
        assert_eq!(first.progress.level(), 2);

        let second = first
            .progress
            .unlock(&catalog, "primeiro_investimento")
            .expect("known id");
        assert!(!second.newly_unlocked);
        assert_eq!(second.awarded_xp, 0);
        assert_eq!(second.progress, first.progress);
    }

    #[test]
    fn deserializing_ignores_a_stale_level() {
        let raw = r#"{"xp": 2500, "level": 3, "achievements": ["pagador_pontual"]}"#;
        let progress: Progress = serde_json::from_str(raw).expect("valid json");

        assert_eq!(progress.xp(), 2500);
        assert_eq!(progress.level(), 4);
        assert!(progress.has_achievement("pagador_pontual"));
    }
}
