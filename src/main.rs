use std::sync::Arc;

use classroom_ledger::api::{AppState, create_router};
use classroom_ledger::config::ConfigLoader;
use classroom_ledger::error::CenterResult;
use classroom_ledger::persistence::{
    BlobKeys, DirectoryDocumentStore, DocumentStore, JsonFileCache, LocalCache, bootstrap,
};
use classroom_ledger::sync::SyncScheduler;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/center";

#[tokio::main]
async fn main() -> CenterResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("CENTER_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        center = %config.center().code,
        "Loaded configuration"
    );

    let settings = config.sync().clone();
    let record_id = config.center().record_id.clone();

    let remote: Option<Arc<dyn DocumentStore>> = settings
        .remote_dir
        .as_ref()
        .map(|dir| Arc::new(DirectoryDocumentStore::new(dir)) as Arc<dyn DocumentStore>);
    let cache: Arc<dyn LocalCache> = Arc::new(JsonFileCache::new(&settings.cache_dir));

    let loaded = bootstrap(
        remote.as_deref(),
        cache.as_ref(),
        BlobKeys {
            record_id: &record_id,
            cache_key: &settings.cache_key,
        },
        config.seed(),
    )
    .await;
    info!(source = ?loaded.source, "Center data ready");

    let sync = SyncScheduler::from_settings(&settings, &record_id, remote, cache);
    let bind_address = config.center_config().server.bind_address.clone();
    let state = AppState::new(config, loaded.store, sync, loaded.source);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
