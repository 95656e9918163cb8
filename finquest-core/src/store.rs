use std::future::Future;

use finquest_database::Database;
use finquest_database::impls::profiles;
use finquest_database::model::profile::Profile;
use uuid::Uuid;

/// Where a [`Session`](crate::Session) reads and writes profiles.
pub trait ProfileStore {
    fn fetch_profile(&self, user_id: Uuid) -> impl Future<Output = anyhow::Result<Profile>>;

    /// Persist `profile` and return the stored copy.
    fn save_profile(&self, profile: &Profile) -> impl Future<Output = anyhow::Result<Profile>>;
}

impl ProfileStore for Database {
    async fn fetch_profile(&self, user_id: Uuid) -> anyhow::Result<Profile> {
        profiles::fetch_profile(self, user_id).await
    }

    async fn save_profile(&self, profile: &Profile) -> anyhow::Result<Profile> {
        profiles::save_profile(self, profile).await
    }
}
