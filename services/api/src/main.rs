use anyhow::Context as _;
use axum::http::{HeaderValue, Method, header};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use adoptly_api::config::ApiConfig;
use adoptly_api::infra::cloudinary::CloudinarySigner;
use adoptly_api::infra::mailer::SmtpMailer;
use adoptly_api::router::build_router;
use adoptly_api::state::AppState;
use adoptly_api_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    adoptly_core::tracing::init_tracing();

    let config = ApiConfig::from_env().context("load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    if config.run_migrations {
        Migrator::up(&db, None).await.context("run migrations")?;
        info!("database migrations applied");
    }

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret.clone(),
        cookie_secure: config.cookie_secure,
        frontend_url: config.frontend_url.clone(),
        upload_dir: config.upload_dir.clone().into(),
        mailer: SmtpMailer::new(&config.smtp)?,
        cloudinary: CloudinarySigner::new(&config.cloudinary),
    };

    let origin = config
        .frontend_url
        .trim_end_matches('/')
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid FRONTEND_URL {:?}", config.frontend_url))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let router = build_router(state).layer(cors);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("adoptly api listening on {http_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
