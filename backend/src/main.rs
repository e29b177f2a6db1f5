//! Backend entry-point: builds configuration from the environment, runs
//! pending migrations, and starts the HTTP server.

mod server;

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::web;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::UploadLimits;
use backend::outbound::media::MediaProviderConfig;
use backend::outbound::persistence::{DbPool, PoolConfig};

use server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Run pending migrations over a blocking wrapper of the async connection.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel_async::AsyncPgConnection;
        use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;

        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(%name, %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

fn media_config_from_env() -> Option<MediaProviderConfig> {
    let base_url = env::var("MEDIA_BASE_URL").ok()?;
    let base_url = match Url::parse(base_url.as_str()) {
        Ok(url) => url,
        Err(err) => {
            warn!(error = %err, "MEDIA_BASE_URL is not a valid URL; media provider disabled");
            return None;
        }
    };
    let api_key = env::var("MEDIA_API_KEY").unwrap_or_default();
    let folder = env_or("MEDIA_FOLDER", "volunteer-activities");
    let mut config = MediaProviderConfig::new(base_url, api_key, folder);
    if let Some(seconds) = parse_env::<u64>("MEDIA_TIMEOUT_SECONDS") {
        config.timeout = Duration::from_secs(seconds);
    }
    Some(config)
}

fn upload_limits_from_env() -> UploadLimits {
    let defaults = UploadLimits::default();
    UploadLimits {
        max_files: parse_env::<usize>("MAX_FILES").unwrap_or(defaults.max_files),
        max_file_bytes: parse_env::<usize>("MAX_FILE_SIZE").unwrap_or(defaults.max_file_bytes),
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let bind_addr: SocketAddr = env_or("BIND_ADDR", "0.0.0.0:8080")
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;
    let cors_origin = env_or("CORS_ORIGIN", "http://localhost:5173");

    let mut config = ServerConfig::new(bind_addr, cors_origin)
        .with_upload_limits(upload_limits_from_env());

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_migrations(database_url.clone()).await?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| std::io::Error::other(format!("pool construction failed: {err}")))?;
        config = config.with_db_pool(pool);
    }
    if let Some(media) = media_config_from_env() {
        config = config.with_media(media);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "server started");
    server.await
}
