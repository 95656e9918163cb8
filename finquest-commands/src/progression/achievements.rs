use finquest_core::{Context, Error};
use finquest_database::impls::profiles::fetch_profile;
use finquest_progression::{CategoryFilter, completed_by_category};
use finquest_utils::pagination::paginate;

use crate::CommandMeta;
use crate::progression::render::{achievement_line, category_totals, with_save_notice};

pub const META: CommandMeta = CommandMeta {
    name: "achievements",
    desc: "List achievements or unlock one.",
    category: "progression",
    usage: "finquest achievements <list [--category <economia|investimento|pagamentos|metas>] [--page <n>] | unlock <id>>",
};

const ACHIEVEMENTS_PER_PAGE: usize = 10;

pub async fn list(ctx: Context<'_>, filter: CategoryFilter, page: usize) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let profile = fetch_profile(ctx.db(), user_id).await?;
    let catalog = ctx.data.catalog;

    let all = catalog.progress_for(profile.progress().achievements());
    let shown = catalog.filtered_progress(profile.progress().achievements(), filter);
    if shown.is_empty() {
        return Ok("No achievements in this category.".to_owned());
    }

    let Some((entries, footer)) = paginate(&shown, ACHIEVEMENTS_PER_PAGE, page) else {
        return Ok(format!("Page {page} is out of range."));
    };

    let completed = all.iter().filter(|entry| entry.is_completed).count();
    let mut lines = vec![format!("Achievements {completed}/{}", catalog.len())];
    lines.extend(entries.iter().map(achievement_line));
    lines.push(category_totals(&completed_by_category(&all)));
    lines.push(footer);
    Ok(lines.join("\n"))
}

pub async fn unlock(ctx: Context<'_>, id: &str) -> Result<String, Error> {
    let mut session = ctx.session().await?;
    let previous_level = session.profile().level();

    let (update, unlock) = session.unlock(id).await?;
    let body = if unlock.newly_unlocked {
        let mut body = format!(
            "Unlocked {} {}! +{} XP",
            unlock.definition.icon.glyph(),
            unlock.definition.title,
            unlock.awarded_xp
        );
        if update.profile.level() > previous_level {
            body.push_str(&format!("\nLevel up! Now level {}.", update.profile.level()));
        }
        body
    } else {
        format!("{} is already unlocked.", unlock.definition.title)
    };

    Ok(with_save_notice(body, &update.status))
}
