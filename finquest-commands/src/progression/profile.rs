use finquest_core::{Context, Error};
use finquest_database::impls::profiles::{create_profile, fetch_profile, update_profile};
use finquest_database::model::profile::ProfilePatch;
use tracing::info;
use uuid::Uuid;

use crate::CommandMeta;
use crate::progression::render::profile_card;

pub const META: CommandMeta = CommandMeta {
    name: "profile",
    desc: "Show, create or edit your profile.",
    category: "progression",
    usage: "finquest profile <show | create <name> <email> | update [--name <name>] [--avatar <url> | --clear-avatar]>",
};

pub async fn show(ctx: Context<'_>) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    let profile = fetch_profile(ctx.db(), user_id).await?;
    Ok(profile_card(&profile))
}

/// Create a profile for the acting user, or for a fresh id when none is set.
pub async fn create(ctx: Context<'_>, name: &str, email: &str) -> Result<String, Error> {
    let user_id = ctx.user_id.unwrap_or_else(Uuid::new_v4);
    let profile = create_profile(ctx.db(), user_id, name, email).await?;
    info!(user_id = %profile.id, "profile created");

    let mut out = profile_card(&profile);
    if ctx.user_id.is_none() {
        out.push_str(&format!(
            "\nProfile id: {}\nSet FINQUEST_USER_ID={} to use it.",
            profile.id, profile.id
        ));
    }
    Ok(out)
}

pub async fn update(ctx: Context<'_>, patch: &ProfilePatch) -> Result<String, Error> {
    let user_id = ctx.require_user()?;
    if patch.is_empty() {
        return Ok("Nothing to update.".to_owned());
    }

    let profile = update_profile(ctx.db(), user_id, patch).await?;
    Ok(format!("Profile updated.\n{}", profile_card(&profile)))
}
