use finquest_core::{Context, Error};
use finquest_utils::formatting::{format_level_badge, format_xp_bar};

use crate::CommandMeta;
use crate::progression::render::with_save_notice;

pub const META: CommandMeta = CommandMeta {
    name: "xp",
    desc: "Add experience points to your profile.",
    category: "progression",
    usage: "finquest xp add <amount>",
};

pub async fn add(ctx: Context<'_>, amount: i64) -> Result<String, Error> {
    let mut session = ctx.session().await?;
    let previous_level = session.profile().level();

    let update = session.add_xp(amount).await?;
    let progress = update.profile.level_progress();

    let mut body = format!(
        "+{amount} XP\n{}\n{} XP to the next level",
        format_xp_bar(&progress, 20),
        progress.xp_to_next_level().ceil() as u64
    );
    if progress.level > previous_level {
        body.push_str(&format!(
            "\nLevel up! You reached {}.",
            format_level_badge(progress.level)
        ));
    }

    Ok(with_save_notice(body, &update.status))
}
