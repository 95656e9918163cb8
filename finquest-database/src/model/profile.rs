use serde::{Deserialize, Serialize};
use uuid::Uuid;

use finquest_progression::{Catalog, LevelProgress, Progress, ProgressionError, Unlock};

/// Persisted per-user record. Progression fields are only reachable through
/// the update methods so `level` always follows `xp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(flatten)]
    progress: Progress,
}

impl Profile {
    pub fn new(id: Uuid, name: impl Into<String>, email: impl Into<String>, now: u64) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            avatar_url: None,
            created_at: now,
            updated_at: now,
            progress: Progress::new(),
        }
    }

    /// Rebuild a stored profile. The level is taken from `progress`, never from storage.
    pub fn from_stored(
        id: Uuid,
        name: String,
        email: String,
        avatar_url: Option<String>,
        created_at: u64,
        updated_at: u64,
        progress: Progress,
    ) -> Self {
        Self {
            id,
            name,
            email,
            avatar_url,
            created_at,
            updated_at,
            progress,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn xp(&self) -> u64 {
        self.progress.xp()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    pub fn level_progress(&self) -> LevelProgress {
        self.progress.level_progress()
    }

    pub fn with_progress(&self, progress: Progress) -> Self {
        Self {
            progress,
            ..self.clone()
        }
    }

    pub fn add_xp(&self, amount: i64) -> Result<Self, ProgressionError> {
        Ok(self.with_progress(self.progress.add_xp(amount)?))
    }

    pub fn add_achievement(&self, catalog: &Catalog, id: &str) -> Result<Self, ProgressionError> {
        Ok(self.with_progress(self.progress.add_achievement(catalog, id)?))
    }

    /// Unlock an achievement and return the updated profile with the unlock details.
    pub fn unlock(&self, catalog: &Catalog, id: &str) -> Result<(Self, Unlock), ProgressionError> {
        let unlock = self.progress.unlock(catalog, id)?;
        Ok((self.with_progress(unlock.progress.clone()), unlock))
    }
}

/// Editable profile fields. Email is fixed at creation and XP, level and
/// achievements only move through progression updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar_url: Option<Option<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar_url.is_none()
    }

    pub fn apply(&self, profile: &Profile, now: u64) -> Profile {
        let mut updated = profile.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_owned();
        }
        if let Some(avatar_url) = &self.avatar_url {
            updated.avatar_url = avatar_url.clone();
        }
        updated.updated_at = now;
        updated
    }
}
