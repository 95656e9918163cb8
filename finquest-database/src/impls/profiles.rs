use anyhow::Context as _;
use tracing::{debug, warn};
use uuid::Uuid;

use finquest_progression::Progress;

use crate::cache::{invalidate_profile, profile_key};
use crate::database::Database;
use crate::impls::now_unix_secs;
use crate::model::profile::{Profile, ProfilePatch};

const PROFILE_COLUMNS: &str =
    "id, name, email, avatar_url, level, xp, achievements, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    avatar_url: Option<String>,
    level: i32,
    xp: i64,
    achievements: Vec<String>,
    created_at: i64,
    updated_at: i64,
}

/// Load a profile, going through the cache first.
pub async fn fetch_profile(db: &Database, user_id: Uuid) -> anyhow::Result<Profile> {
    let cache = db.cache();
    let cache_key = profile_key(cache, user_id);
    cache
        .get_or_load_json(&cache_key, cache.profile_ttl(), || async {
            load_profile(db, user_id)
                .await?
                .with_context(|| format!("profile {user_id} not found"))
        })
        .await
}

/// Load a profile straight from the database.
pub async fn load_profile(db: &Database, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row: Option<ProfileRow> = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_profile).transpose()
}

pub async fn create_profile(
    db: &Database,
    user_id: Uuid,
    name: &str,
    email: &str,
) -> anyhow::Result<Profile> {
    let name = name.trim();
    let email = email.trim();
    anyhow::ensure!(!name.is_empty(), "profile name must not be blank");
    anyhow::ensure!(email.contains('@'), "`{email}` is not a valid email address");

    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: ProfileRow = sqlx::query_as(&format!(
        "INSERT INTO profiles (id, name, email, level, xp, achievements, created_at, updated_at)
         VALUES ($1, $2, $3, 1, 0, '{{}}', $4, $4)
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    invalidate_profile(db.cache(), user_id).await;
    to_profile(row)
}

/// Persist the progression fields and editable details of `profile`.
/// Email and creation time are never written.
pub async fn save_profile(db: &Database, profile: &Profile) -> anyhow::Result<Profile> {
    let level = i32::try_from(profile.level()).context("level out of i32 range")?;
    let xp = i64::try_from(profile.xp()).context("xp out of i64 range")?;
    let achievements: Vec<String> = profile.progress().achievements().iter().cloned().collect();
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let row: Option<ProfileRow> = sqlx::query_as(&format!(
        "UPDATE profiles
         SET name = $2, avatar_url = $3, level = $4, xp = $5, achievements = $6, updated_at = $7
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(profile.id)
    .bind(&profile.name)
    .bind(profile.avatar_url.as_deref())
    .bind(level)
    .bind(xp)
    .bind(achievements)
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    invalidate_profile(db.cache(), profile.id).await;

    let row = row.with_context(|| format!("profile {} not found", profile.id))?;
    debug!(user_id = %profile.id, xp, level, "profile saved");
    to_profile(row)
}

/// Merge editable details into the current row.
pub async fn update_profile(
    db: &Database,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> anyhow::Result<Profile> {
    if let Some(name) = &patch.name {
        anyhow::ensure!(!name.trim().is_empty(), "profile name must not be blank");
    }

    let current = load_profile(db, user_id)
        .await?
        .with_context(|| format!("profile {user_id} not found"))?;
    if patch.is_empty() {
        return Ok(current);
    }

    let patched = patch.apply(&current, now_unix_secs());
    let updated_at = i64::try_from(patched.updated_at).context("updated_at out of i64 range")?;

    let row: ProfileRow = sqlx::query_as(&format!(
        "UPDATE profiles
         SET name = $2, avatar_url = $3, updated_at = $4
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&patched.name)
    .bind(patched.avatar_url.as_deref())
    .bind(updated_at)
    .fetch_one(db.pool())
    .await?;

    invalidate_profile(db.cache(), user_id).await;
    to_profile(row)
}

fn to_profile(row: ProfileRow) -> anyhow::Result<Profile> {
    let xp = u64::try_from(row.xp).context("xp row out of u64 range")?;
    let progress = Progress::from_parts(xp, row.achievements);

    if i64::from(row.level) != i64::from(progress.level()) {
        warn!(
            user_id = %row.id,
            stored_level = row.level,
            derived_level = progress.level(),
            xp,
            "stored level disagrees with xp; using derived level"
        );
    }

    Ok(Profile::from_stored(
        row.id,
        row.name,
        row.email,
        row.avatar_url,
        u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        u64::try_from(row.updated_at).context("updated_at row out of u64 range")?,
        progress,
    ))
}
