//! Backend entry-point: loads settings, prepares storage and serves the REST
//! API with its OpenAPI docs.

mod server;

use std::ffi::OsString;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use foodgram::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use foodgram::settings::ServerSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let config = build_server_config(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting foodgram backend");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

fn load_settings<I, T>(args: I) -> std::io::Result<ServerSettings>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ServerSettings::load_from_iter(args)
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))
}

async fn build_server_config(settings: &ServerSettings) -> std::io::Result<ServerConfig> {
    let session = session_settings(
        &SessionToggles::from(settings),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let bcrypt_cost = settings.bcrypt_cost().map_err(std::io::Error::other)?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_media_root(settings.media_root())
    .with_bcrypt_cost(bcrypt_cost);

    let Some(database_url) = settings.database_url() else {
        return Ok(config);
    };
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    Ok(config.with_db_pool(pool))
}
