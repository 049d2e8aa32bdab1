use nexlify::config::{init_db, run_migrations, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexlify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    if config.run_migrations {
        run_migrations(&db).await.expect("Failed to run migrations");
        tracing::info!("Migrations applied");
    }

    if config.admin_secret.is_none() {
        tracing::warn!("ADMIN_SECRET not set; admin self-registration is disabled");
    }

    let app = nexlify::create_app(db, &config).expect("Failed to build metrics registry");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.expect("Server error");
}
