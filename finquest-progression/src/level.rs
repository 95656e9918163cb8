use serde::Serialize;

/// Scale of the level curve: level 2 starts at `BASE_XP * 0.5`.
pub const BASE_XP: f64 = 1_000.0;
/// Each level costs this factor more than the previous one.
pub const LEVEL_GROWTH: f64 = 1.5;

/// Derive the level for a cumulative XP total.
///
/// `level(xp) = floor(ln(xp / 1000 + 1) / ln(1.5)) + 1`
///
/// The log ratio is snapped against [`level_floor_xp`] so exact thresholds
/// (500, 1250, 2375, ...) always land on the higher level.
pub fn level_for_xp(xp: u64) -> u32 {
    let xp = xp as f64;
    let ratio = (xp / BASE_XP + 1.0).ln() / LEVEL_GROWTH.ln();
    let mut level = ratio.floor().max(0.0) as u32 + 1;

    while level_floor_xp(level + 1) <= xp {
        level += 1;
    }
    while level > 1 && level_floor_xp(level) > xp {
        level -= 1;
    }

    level
}

/// Cumulative XP at which `level` starts. Level 1 starts at 0.
pub fn level_floor_xp(level: u32) -> f64 {
    let exponent = i32::try_from(level.max(1) - 1).unwrap_or(i32::MAX);
    BASE_XP * (LEVEL_GROWTH.powi(exponent) - 1.0)
}

/// Cumulative XP required to reach the level after `level_for_xp(xp)`.
pub fn next_level_xp(xp: u64) -> f64 {
    level_floor_xp(level_for_xp(xp) + 1)
}

/// Snapshot used to render level badges and XP bars.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    pub level_floor_xp: f64,
    pub next_level_xp: f64,
}

impl LevelProgress {
    pub fn for_xp(xp: u64) -> Self {
        let level = level_for_xp(xp);
        Self {
            level,
            xp,
            level_floor_xp: level_floor_xp(level),
            next_level_xp: level_floor_xp(level + 1),
        }
    }

    /// Cumulative XP as a percentage of the next threshold, clamped to 0..=100.
    pub fn percent(&self) -> f64 {
        if self.next_level_xp <= 0.0 {
            return 0.0;
        }

        (self.xp as f64 / self.next_level_xp * 100.0).clamp(0.0, 100.0)
    }

    pub fn xp_to_next_level(&self) -> f64 {
        (self.next_level_xp - self.xp as f64).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{LevelProgress, level_floor_xp, level_for_xp, next_level_xp};

    #[test]
    fn zero_xp_is_level_one() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(next_level_xp(0), 500.0);
    }

    #[test]
    fn thresholds_follow_the_curve() {
        assert_eq!(level_floor_xp(1), 0.0);
        assert_eq!(level_floor_xp(2), 500.0);
        assert_eq!(level_floor_xp(3), 1250.0);
        assert_eq!(level_floor_xp(4), 2375.0);
        assert_eq!(level_floor_xp(5), 4062.5);
    }

    #[test]
    fn exact_thresholds_land_on_the_new_level() {
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(next_level_xp(500), 1250.0);
        assert_eq!(level_for_xp(1249), 2);
        assert_eq!(level_for_xp(1250), 3);
        assert_eq!(level_for_xp(2375), 4);
        assert_eq!(level_for_xp(4062), 4);
        assert_eq!(level_for_xp(4063), 5);
    }

    #[test]
    fn level_is_monotonic_and_next_threshold_stays_ahead() {
        let mut previous = level_for_xp(0);
        for xp in (0..50_000_u64).step_by(7) {
            let level = level_for_xp(xp);
            assert!(level >= 1);
            assert!(level >= previous, "level dropped at xp {xp}");
            assert!(next_level_xp(xp) > xp as f64, "next threshold behind at xp {xp}");
            assert!(level_floor_xp(level) <= xp as f64);
            previous = level;
        }
    }

    #[test]
    fn huge_totals_do_not_panic() {
        let level = level_for_xp(u64::MAX);
        assert!(level > 80);
        assert!(next_level_xp(u64::MAX) > u64::MAX as f64);
    }

    #[test]
    fn level_progress_percent_is_clamped() {
        let fresh = LevelProgress::for_xp(0);
        assert_eq!(fresh.level, 1);
        assert_eq!(fresh.percent(), 0.0);
        assert_eq!(fresh.xp_to_next_level(), 500.0);

        let mid = LevelProgress::for_xp(625);
        assert_eq!(mid.level, 2);
        assert_eq!(mid.level_floor_xp, 500.0);
        assert_eq!(mid.next_level_xp, 1250.0);
        assert_eq!(mid.percent(), 50.0);
    }
}
