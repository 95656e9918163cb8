mod cli;

use std::env;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use finquest_core::{Context, Data};
use finquest_database::cache::{DEFAULT_KEY_PREFIX, DEFAULT_PROFILE_CACHE_TTL};
use finquest_database::{CacheService, Database};

use crate::cli::{Cli, Command};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so FINQUEST_USER_ID can come from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = match cli.command {
        Command::Local(command) => {
            println!("{}", cli::run_local(command)?);
            return Ok(());
        }
        Command::Stored(command) => command,
    };

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let db = connect_database().await?;
    let data = Data::new(db);
    let ctx = Context::new(&data, cli.user);

    let output = cli::dispatch(ctx, command).await?;
    println!("{output}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if verbose || env::var_os("RUST_LOG").is_some() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .init();
        return;
    }

    let fmt_layer = fmt_layer.with_filter(filter_fn(|metadata| {
        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        within_info_level && !metadata.target().starts_with("sqlx::query")
    }));
    tracing_subscriber::registry().with(fmt_layer).init();
}

async fn connect_database() -> anyhow::Result<Database> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let max_connections = u32::try_from(env_u64(
        "DATABASE_MAX_CONNECTIONS",
        u64::from(DEFAULT_MAX_CONNECTIONS),
    ))
    .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    .max(1);

    let db_pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;
    debug!(max_connections, "PostgreSQL connection established.");

    let mut cache = configure_cache();
    let ttl_seconds = env_u64(
        "PROFILE_CACHE_TTL_SECONDS",
        DEFAULT_PROFILE_CACHE_TTL.as_secs(),
    );
    cache.configure_profile_ttl(Duration::from_secs(ttl_seconds));
    debug!(
        profile_cache_ttl_seconds = cache.profile_ttl().as_secs(),
        "Profile cache TTL configured."
    );

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            debug!("Redis cache health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        db.migrate().await?;
        debug!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    Ok(db)
}

fn configure_cache() -> CacheService {
    let key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_owned());

    if !env_bool("REDIS_ENABLED", false) {
        debug!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(key_prefix);
    }

    match env::var("REDIS_URL") {
        Ok(redis_url) => match CacheService::redis(&redis_url, key_prefix.clone()) {
            Ok(cache) => {
                debug!(key_prefix = %key_prefix, "Redis cache enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, key_prefix = %key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                CacheService::disabled(key_prefix)
            }
        },
        Err(_) => {
            warn!(key_prefix = %key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
            CacheService::disabled(key_prefix)
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}
