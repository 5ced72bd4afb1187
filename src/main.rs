use gitfight::{
    store::{JsonFileKeyValueStore, PostgresKeyValueStore},
    AppConfig, AppState, ArenaService, GithubClient, HttpLeaderboardClient, InMemoryKeyValueStore,
    KeyValueStore, StoreBackend,
};
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitfight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Git Fight server");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> = match config.store_backend() {
        StoreBackend::Postgres(url) => {
            let pool = sqlx::PgPool::connect(&url).await?;
            let store = PostgresKeyValueStore::new(pool);
            store.ensure_schema().await?;
            info!("Using PostgreSQL store");
            Arc::new(store)
        }
        StoreBackend::File(path) => {
            info!(path = %path.display(), "Using JSON file store");
            Arc::new(JsonFileKeyValueStore::new(path))
        }
        StoreBackend::Memory => {
            warn!("No store configured, progress will not survive a restart");
            Arc::new(InMemoryKeyValueStore::new())
        }
    };

    let profiles = Arc::new(GithubClient::new(
        &config.github_api_url,
        config.github_token.clone(),
    )?);

    let mut builder =
        ArenaService::builder(profiles, store).with_categories(config.categories());
    if let Some(url) = &config.leaderboard_url {
        builder = builder.with_leaderboard(Arc::new(HttpLeaderboardClient::new(url)?));
        info!(url = %url, "Forwarding battles to the global leaderboard");
    }

    let app = gitfight::app(AppState::new(Arc::new(builder.build())));

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server running on http://{}", config.bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}
