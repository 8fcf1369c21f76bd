use std::sync::Arc;

use potluck::app::{router, AppState};
use potluck::catalog::Catalog;
use potluck::config::AppConfig;
use potluck::db::comment_repository::MongoCommentRepository;
use potluck::db::like_repository::MongoLikeRepository;
use potluck::db::memory::MemoryStore;
use potluck::db::post_repository::MongoPostRepository;
use potluck::db::recipe_repository::MongoRecipeRepository;
use potluck::demo_seeder;
use potluck::storage::client::{MemoryStorageClient, S3StorageClient};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potluck=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Potluck server...");

    let config = AppConfig::load()?;
    let session_key = config.session_key()?;

    let state = if config.demo_mode {
        tracing::info!("Demo mode: using in-memory store and storage");

        let store = Arc::new(MemoryStore::new());
        demo_seeder::seed_demo_data(&store).await;

        let mut catalog = Catalog::load_or_empty(&config.catalog_path).await;
        if catalog.is_empty() {
            catalog = demo_seeder::demo_catalog()?;
        }

        AppState {
            session_key,
            ..AppState::in_memory(store, Arc::new(MemoryStorageClient::new()), catalog)
        }
    } else {
        // Connect to MongoDB
        let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;
        let mongo_db = mongo_client.database(&config.mongodb_database);
        tracing::info!("Connected to MongoDB at {}", config.mongodb_uri);

        // Connect to S3
        let storage_client = S3StorageClient::from_config(&config).await;
        tracing::info!("S3 storage client initialized for bucket '{}'", config.s3_bucket);

        AppState {
            post_repo: Arc::new(MongoPostRepository::new(&mongo_db)),
            comment_repo: Arc::new(MongoCommentRepository::new(&mongo_db)),
            like_repo: Arc::new(MongoLikeRepository::new(&mongo_db)),
            recipe_repo: Arc::new(MongoRecipeRepository::new(&mongo_db)),
            storage_client: Arc::new(storage_client),
            catalog: Arc::new(Catalog::load_or_empty(&config.catalog_path).await),
            session_key,
        }
    };

    let app = router(state, config.demo_mode)
        // Static files (pages, scripts, icons)
        .fallback_service(ServeDir::new(&config.site_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
