use finquest_database::model::profile::Profile;
use finquest_progression::{Catalog, ProgressionError, Unlock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::Error;
use crate::store::ProfileStore;

/// Outcome of persisting a profile change.
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    NotSaved(Error),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// The profile after an update, plus whether it reached the store.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub profile: Profile,
    pub status: SaveStatus,
}

/// The acting user's profile, updated locally first and then saved.
///
/// A failed save never rolls back the local profile. It stays marked as
/// unsaved until [`Session::retry_save`] or a later update succeeds.
pub struct Session<S> {
    store: S,
    catalog: Catalog,
    profile: Profile,
    unsaved: bool,
}

impl<S: ProfileStore> Session<S> {
    pub async fn open(store: S, catalog: Catalog, user_id: Uuid) -> anyhow::Result<Self> {
        let profile = store.fetch_profile(user_id).await?;
        Ok(Self::new(store, catalog, profile))
    }

    pub fn new(store: S, catalog: Catalog, profile: Profile) -> Self {
        Self {
            store,
            catalog,
            profile,
            unsaved: false,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Add `amount` XP. Invalid amounts are rejected before anything changes.
    pub async fn add_xp(&mut self, amount: i64) -> Result<ProfileUpdate, ProgressionError> {
        let updated = self.profile.add_xp(amount)?;
        Ok(self.commit(updated).await)
    }

    pub async fn add_achievement(&mut self, id: &str) -> Result<ProfileUpdate, ProgressionError> {
        let updated = self.profile.add_achievement(&self.catalog, id)?;
        Ok(self.commit(updated).await)
    }

    /// Record an achievement and grant its XP reward the first time.
    pub async fn unlock(&mut self, id: &str) -> Result<(ProfileUpdate, Unlock), ProgressionError> {
        let (updated, unlock) = self.profile.unlock(&self.catalog, id)?;
        if !unlock.newly_unlocked {
            let status = self.retry_save().await;
            let update = ProfileUpdate {
                profile: self.profile.clone(),
                status,
            };
            return Ok((update, unlock));
        }

        info!(
            user_id = %self.profile.id,
            achievement = unlock.definition.id,
            xp_reward = unlock.awarded_xp,
            "achievement unlocked"
        );
        Ok((self.commit(updated).await, unlock))
    }

    /// Try again to persist the current profile.
    pub async fn retry_save(&mut self) -> SaveStatus {
        if !self.unsaved {
            return SaveStatus::Saved;
        }
        let profile = self.profile.clone();
        self.commit(profile).await.status
    }

    async fn commit(&mut self, updated: Profile) -> ProfileUpdate {
        let previous_level = self.profile.level();
        if updated.level() > previous_level {
            info!(
                user_id = %updated.id,
                from = previous_level,
                to = updated.level(),
                xp = updated.xp(),
                "level up"
            );
        }

        self.profile = updated.clone();
        match self.store.save_profile(&updated).await {
            Ok(saved) => {
                self.profile = saved.clone();
                self.unsaved = false;
                ProfileUpdate {
                    profile: saved,
                    status: SaveStatus::Saved,
                }
            }
            Err(err) => {
                warn!(user_id = %updated.id, error = ?err, "profile changes not saved");
                self.unsaved = true;
                ProfileUpdate {
                    profile: updated,
                    status: SaveStatus::NotSaved(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use finquest_database::model::profile::Profile;
    use finquest_progression::{Catalog, ProgressionError};
    use uuid::Uuid;

    use super::{SaveStatus, Session};
    use crate::store::ProfileStore;

    #[derive(Clone, Default)]
    struct MemoryStore {
        profiles: Arc<Mutex<HashMap<Uuid, Profile>>>,
        failing: Arc<AtomicBool>,
    }

    impl MemoryStore {
        fn with_profile(profile: Profile) -> Self {
            let store = Self::default();
            store
                .profiles
                .lock()
                .expect("store lock")
                .insert(profile.id, profile);
            store
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn stored(&self, id: Uuid) -> Option<Profile> {
            self.profiles.lock().expect("store lock").get(&id).cloned()
        }
    }

    impl ProfileStore for MemoryStore {
        async fn fetch_profile(&self, user_id: Uuid) -> anyhow::Result<Profile> {
            self.stored(user_id)
                .ok_or_else(|| anyhow::anyhow!("profile {user_id} not found"))
        }

        async fn save_profile(&self, profile: &Profile) -> anyhow::Result<Profile> {
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("storage unavailable");
            }
            self.profiles
                .lock()
                .expect("store lock")
                .insert(profile.id, profile.clone());
            Ok(profile.clone())
        }
    }

    fn fresh_profile() -> Profile {
        Profile::new(Uuid::new_v4(), "Ana", "ana@example.com", 1_700_000_000)
    }

    async fn open_session() -> (MemoryStore, Session<MemoryStore>, Uuid) {
        let profile = fresh_profile();
        let id = profile.id;
        let store = MemoryStore::with_profile(profile);
        let session = Session::open(store.clone(), Catalog::builtin(), id)
            .await
            .expect("profile exists");
        (store, session, id)
    }

    #[tokio::test]
    async fn open_fails_for_missing_profile() {
        let result = Session::open(MemoryStore::default(), Catalog::builtin(), Uuid::new_v4()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn xp_gain_is_saved_and_levels_up() {
        let (store, mut session, id) = open_session().await;

        let update = session.add_xp(500).await.expect("valid amount");
        assert!(update.status.is_saved());
        assert_eq!(update.profile.level(), 2);
        assert_eq!(update.profile.xp(), 500);
        assert!(!session.has_unsaved_changes());

        let stored = store.stored(id).expect("saved");
        assert_eq!(stored.xp(), 500);
        assert_eq!(stored.level(), 2);
    }

    #[tokio::test]
    async fn negative_xp_changes_nothing() {
        let (store, mut session, id) = open_session().await;
        let before = session.profile().clone();

        let err = session.add_xp(-10).await.expect_err("negative rejected");
        assert_eq!(err, ProgressionError::NegativeXp(-10));
        assert_eq!(session.profile(), &before);
        assert_eq!(store.stored(id), Some(before));
    }

    #[tokio::test]
    async fn failed_save_keeps_local_update_and_can_retry() {
        let (store, mut session, id) = open_session().await;
        store.set_failing(true);

        let update = session.add_xp(1_250).await.expect("valid amount");
        assert!(matches!(update.status, SaveStatus::NotSaved(_)));
        assert_eq!(update.profile.level(), 3);
        assert_eq!(session.profile().xp(), 1_250);
        assert!(session.has_unsaved_changes());
        assert_eq!(store.stored(id).map(|profile| profile.xp()), Some(0));

        assert!(!session.retry_save().await.is_saved());
        assert!(session.has_unsaved_changes());

        store.set_failing(false);
        assert!(session.retry_save().await.is_saved());
        assert!(!session.has_unsaved_changes());
        assert_eq!(store.stored(id).map(|profile| profile.xp()), Some(1_250));
    }

    #[tokio::test]
    async fn retry_without_pending_changes_is_a_no_op() {
        let (store, mut session, _) = open_session().await;
        store.set_failing(true);
        assert!(session.retry_save().await.is_saved());
    }

    #[tokio::test]
    async fn unlock_awards_reward_once() {
        let (store, mut session, id) = open_session().await;

        let (update, unlock) = session
            .unlock("primeiro_investimento")
            .await
            .expect("known achievement");
        assert!(unlock.newly_unlocked);
        assert_eq!(unlock.awarded_xp, 500);
        assert_eq!(update.profile.xp(), 500);
        assert_eq!(update.profile.level(), 2);

        let (again, repeat) = session
            .unlock("primeiro_investimento")
            .await
            .expect("known achievement");
        assert!(!repeat.newly_unlocked);
        assert_eq!(repeat.awarded_xp, 0);
        assert_eq!(again.profile.xp(), 500);

        let stored = store.stored(id).expect("saved");
        assert!(stored.progress().has_achievement("primeiro_investimento"));
    }

    #[tokio::test]
    async fn add_achievement_does_not_grant_xp() {
        let (_, mut session, _) = open_session().await;

        let update = session
            .add_achievement("meta_alcancada")
            .await
            .expect("known achievement");
        assert_eq!(update.profile.xp(), 0);
        assert!(update.profile.progress().has_achievement("meta_alcancada"));

        let err = session
            .add_achievement("nope")
            .await
            .expect_err("unknown achievement");
        assert_eq!(err, ProgressionError::UnknownAchievement("nope".to_owned()));
    }
}
