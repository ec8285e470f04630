//! Al-Sadiqoon CMS Backend
//! Mission: Content management for the public site behind a guarded admin panel

use alsadiqoon_backend::{
    audit::AuditLog,
    auth::{JwtHandler, UserStore},
    config::Config,
    content::ContentStore,
    middleware::{RateLimitConfig, RateLimiter},
    routes::{create_router, AppState},
};
use anyhow::{Context, Result};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, time::interval};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());

    std::fs::create_dir_all(&config.upload_dir).context("Failed to create upload directory")?;

    let user_store = Arc::new(
        UserStore::new(&config.db_path, &config.default_admin_password)
            .context("Failed to open user store")?,
    );
    let audit = AuditLog::new(&config.db_path).context("Failed to open audit log")?;
    let content =
        Arc::new(ContentStore::new(&config.db_path).context("Failed to open content store")?);
    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    let login_limiter = RateLimiter::new(RateLimitConfig::login());
    let api_limiter = RateLimiter::new(RateLimitConfig::api());

    // Evict stale rate-limit windows in the background
    {
        let login_limiter = login_limiter.clone();
        let api_limiter = api_limiter.clone();
        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(300));
            loop {
                tick.tick().await;
                login_limiter.cleanup();
                api_limiter.cleanup();
            }
        });
    }

    let state = AppState {
        user_store,
        jwt,
        audit,
        content,
        config: config.clone(),
    };

    let app = create_router(state, login_limiter, api_limiter);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Al-Sadiqoon server running on http://{}", addr);
    info!("📊 Database: {}", config.db_path);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
