use std::future::Future;
use std::time::Duration;

use anyhow::Context as _;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_KEY_PREFIX: &str = "finquest:prod";
pub const DEFAULT_PROFILE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Redis connections handing out JSON values.
#[derive(Clone, Debug)]
struct RedisJson {
    pool: Pool,
}

impl RedisJson {
    fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .context("failed to create redis pool")?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> anyhow::Result<Connection> {
        self.pool.get().await.context("failed to get redis connection")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .context("redis PING failed")?;
        Ok(())
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let mut conn = self.conn().await?;
        let bytes = conn
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .with_context(|| format!("redis GET failed for `{key}`"))?;

        bytes.map(|bytes| decode(key, &bytes)).transpose()
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()> {
        let payload = encode(key, value)?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, payload, ttl_seconds(ttl))
            .await
            .with_context(|| format!("redis SETEX failed for `{key}`"))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, u64>(key)
            .await
            .with_context(|| format!("redis DEL failed for `{key}`"))?;
        Ok(())
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec(value)
        .with_context(|| format!("failed to serialize cache value for `{key}`"))
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> anyhow::Result<T> {
    serde_json::from_slice(bytes)
        .with_context(|| format!("failed to deserialize cache value for `{key}`"))
}

/// Redis rejects a zero expiry, so sub-second TTLs round up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// `Disabled` misses every read and accepts every write.
#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled,
    Redis(RedisJson),
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
    profile_ttl: Duration,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled,
            profile_ttl: DEFAULT_PROFILE_CACHE_TTL,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisJson::connect(redis_url)?),
            profile_ttl: DEFAULT_PROFILE_CACHE_TTL,
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn configure_profile_ttl(&mut self, ttl: Duration) {
        self.profile_ttl = ttl.max(Duration::from_secs(1));
    }

    pub fn profile_ttl(&self) -> Duration {
        self.profile_ttl
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(redis) => redis.ping().await,
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match &self.backend {
            CacheBackend::Disabled => Ok(None),
            CacheBackend::Redis(redis) => redis.load(key).await,
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        match &self.backend {
            CacheBackend::Disabled => encode(key, value).map(drop),
            CacheBackend::Redis(redis) => redis.store(key, value, ttl).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(redis) => redis.remove(key).await,
        }
    }

    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}

pub fn profile_key(cache: &CacheService, user_id: Uuid) -> String {
    cache.key(format!("profile:{user_id}"))
}

/// Drop the cached profile. Failures are logged and swallowed.
pub async fn invalidate_profile(cache: &CacheService, user_id: Uuid) {
    let key = profile_key(cache, user_id);
    if let Err(e) = cache.del(&key).await {
        warn!(?e, cache_key = %key, "cache invalidation failed");
    }
}
