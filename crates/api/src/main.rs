use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::{background, state};
use atelier_events::{EmailConfig, EventBus, Mailer, Notifier};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // Database: connect, verify, migrate. Any failure here aborts startup;
    // the server is useless without its tables.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = atelier_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    atelier_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    atelier_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    let event_bus = Arc::new(EventBus::default());

    // SMTP is optional: without SMTP_HOST the site runs fine, it just
    // cannot send verification, reset, or notification mail.
    let mailer = EmailConfig::from_env().map(|email_config| {
        let mailer = Mailer::new(&email_config).expect("Failed to initialize SMTP mailer");
        tracing::info!(host = %email_config.smtp_host, "SMTP mailer ready");
        mailer
    });
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set, email delivery disabled");
    }

    // The notifier needs both a transport and somewhere to send. Missing
    // either, events still flow on the bus; nobody listens for mail.
    let notifier_handle = match (&mailer, &config.admin_notify_email) {
        (Some(mailer), Some(notify_to)) => {
            let handle = tokio::spawn(Notifier::run(
                event_bus.subscribe(),
                mailer.clone(),
                notify_to.clone(),
            ));
            tracing::info!(%notify_to, "Owner notifications enabled");
            Some(handle)
        }
        _ => None,
    };

    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::maintenance::run(
        pool.clone(),
        config.trash_retention_days,
        sweep_cancel.clone(),
    ));

    let app = build_app_router(AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        mailer: mailer.map(Arc::new),
    });

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Connections are drained; stop the background work in order.
    tracing::info!("Shutting down background tasks");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;

    // Dropping the last bus handle closes the broadcast channel, which is
    // the notifier's signal to exit its receive loop.
    drop(event_bus);
    if let Some(handle) = notifier_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    tracing::info!("Shutdown complete");
}

/// Resolve when the process is asked to stop: SIGINT from a terminal, or
/// SIGTERM from a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
