use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_admin::config::Config;
use salon_admin::middleware::{RateLimiter, RequestId};
use salon_admin::modules::media::services::SupabaseStorage;
use salon_admin::modules::users::services::SupabaseIdentityProvider;
use salon_admin::{AppSettings, AppState, ExternalServices, Repositories};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "salon_admin=debug,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting salon admin backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Business timezone: {}", config.app.business_timezone);

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let identities = Arc::new(SupabaseIdentityProvider::new(&config.platform)?);
    let storage = Arc::new(SupabaseStorage::new(&config.platform)?);

    let state = AppState::new(
        Repositories::postgres(db_pool.clone()),
        ExternalServices::new(identities, storage, db_pool),
        AppSettings::from_config(&config),
    );
    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute);

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Cors::permissive())
            .wrap(rate_limiter.clone())
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
