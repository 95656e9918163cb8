use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;

/// Embedded schema migrations for profiles and ledger tables.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Pool plus read cache, cloned into every command.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}
