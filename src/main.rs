use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_browse::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, KeyValueStore, MemoryStore, RedisStore},
    models::ImageCdn,
    services::{Banner, CatalogClient, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_browse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let images = ImageCdn::new(config.tmdb_image_url.clone());

    let (store, store_writer) = match &config.redis_url {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (store, handle) = RedisStore::new(client);
            tracing::info!("Banner index persisted in Redis");
            (Arc::new(store) as Arc<dyn KeyValueStore>, Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set; banner index kept in memory");
            (Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>, None)
        }
    };

    let banner = Arc::new(
        Banner::mount(
            catalog.clone(),
            store,
            images.clone(),
            config.banner_period(),
        )
        .await,
    );

    let state = AppState::new(catalog, images, banner.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    banner.unmount().await;
    if let Some(handle) = store_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
