pub mod session;
pub mod store;

use anyhow::Context as _;
use finquest_database::Database;
use finquest_progression::Catalog;
use uuid::Uuid;

pub use session::{ProfileUpdate, SaveStatus, Session};
pub use store::ProfileStore;

pub type Error = anyhow::Error;

/// Long-lived handles shared by every command.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub catalog: Catalog,
}

impl Data {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            catalog: Catalog::builtin(),
        }
    }
}

/// Per-invocation context: shared data plus the acting user, if any.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub data: &'a Data,
    pub user_id: Option<Uuid>,
}

impl<'a> Context<'a> {
    pub fn new(data: &'a Data, user_id: Option<Uuid>) -> Self {
        Self { data, user_id }
    }

    pub fn db(&self) -> &'a Database {
        &self.data.db
    }

    pub fn require_user(&self) -> anyhow::Result<Uuid> {
        self.user_id
            .context("no user selected; pass --user or set FINQUEST_USER_ID")
    }

    /// Open a progression session for the acting user.
    pub async fn session(&self) -> anyhow::Result<Session<Database>> {
        let user_id = self.require_user()?;
        Session::open(self.data.db.clone(), self.data.catalog, user_id).await
    }
}
