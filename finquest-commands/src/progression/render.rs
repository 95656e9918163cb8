use std::collections::BTreeMap;

use finquest_core::SaveStatus;
use finquest_database::model::profile::Profile;
use finquest_progression::{AchievementCategory, AchievementProgress};
use finquest_utils::formatting::{format_level_badge, format_percent, format_xp_bar};
use finquest_utils::time::format_unix_date;

const XP_BAR_WIDTH: usize = 20;

pub fn profile_card(profile: &Profile) -> String {
    let progress = profile.level_progress();
    let mut lines = vec![
        format!("{} <{}>", profile.name, profile.email),
        format!(
            "{} · {}",
            format_level_badge(progress.level),
            format_percent(progress.percent())
        ),
        format_xp_bar(&progress, XP_BAR_WIDTH),
        format!(
            "Achievements: {}",
            profile.progress().achievements().len()
        ),
        format!("Member since {}", format_unix_date(profile.created_at)),
    ];
    if let Some(avatar_url) = &profile.avatar_url {
        lines.push(format!("Avatar: {avatar_url}"));
    }
    lines.join("\n")
}

pub fn achievement_line(entry: &AchievementProgress) -> String {
    let definition = entry.definition;
    let mark = if entry.is_completed { "x" } else { " " };
    format!(
        "[{mark}] {} {} ({}/{}) +{} XP\n    {} · {}",
        definition.icon.glyph(),
        definition.title,
        entry.progress,
        definition.max_progress,
        definition.xp_reward,
        definition.description,
        definition.category.label(),
    )
}

pub fn category_totals(counts: &BTreeMap<AchievementCategory, usize>) -> String {
    if counts.is_empty() {
        return "No achievements completed yet.".to_owned();
    }

    counts
        .iter()
        .map(|(category, count)| {
            format!("{} {}: {count}", category.badge().name(), category.label())
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Message appended when a change could not be persisted.
pub fn save_notice(status: &SaveStatus) -> Option<String> {
    match status {
        SaveStatus::Saved => None,
        SaveStatus::NotSaved(err) => Some(format!(
            "Warning: changes not saved ({err:#}). They are kept for this run only."
        )),
    }
}

pub fn with_save_notice(body: String, status: &SaveStatus) -> String {
    match save_notice(status) {
        Some(notice) => format!("{body}\n{notice}"),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use finquest_core::SaveStatus;
    use finquest_database::model::profile::Profile;
    use finquest_progression::{AchievementCategory, AchievementProgress, Catalog};
    use uuid::Uuid;

    use super::{achievement_line, category_totals, profile_card, save_notice, with_save_notice};

    #[test]
    fn renders_profile_card() {
        let profile = Profile::new(Uuid::nil(), "Ana", "ana@example.com", 0)
            .add_xp(500)
            .expect("valid amount");
        let card = profile_card(&profile);
        assert!(card.starts_with("Ana <ana@example.com>"));
        assert!(card.contains("Nível 2"));
        assert!(card.contains("500/1250 XP"));
        assert!(card.contains("Member since 1970-01-01"));
    }

    #[test]
    fn renders_achievement_lines() {
        let catalog = Catalog::builtin();
        let definition = catalog.get("meta_alcancada").expect("builtin");
        let line = achievement_line(&AchievementProgress::new(definition, true));
        assert!(line.starts_with("[x] 🎯 Primeira Meta Alcançada (1/1) +800 XP"));

        let line = achievement_line(&AchievementProgress::new(definition, false));
        assert!(line.starts_with("[ ]"));
        assert!(line.contains("(0/1)"));
    }

    #[test]
    fn renders_category_totals() {
        assert_eq!(category_totals(&BTreeMap::new()), "No achievements completed yet.");

        let mut counts = BTreeMap::new();
        counts.insert(AchievementCategory::Investment, 2);
        let rendered = category_totals(&counts);
        assert!(rendered.ends_with(": 2"));
    }

    #[test]
    fn only_failed_saves_get_a_notice() {
        assert!(save_notice(&SaveStatus::Saved).is_none());

        let status = SaveStatus::NotSaved(anyhow::anyhow!("db down"));
        let body = with_save_notice("ok".to_owned(), &status);
        assert!(body.starts_with("ok\nWarning: changes not saved (db down)"));
    }
}
