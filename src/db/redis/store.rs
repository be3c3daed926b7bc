use redis::AsyncCommands;
use redis::Client;
use tokio::sync::mpsc;

use crate::db::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client for view-state persistence
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous store writes
#[derive(Debug)]
struct StoreWriteMessage {
    key: String,
    value: String,
}

/// Redis-backed key-value store
///
/// Writes go through a background task so `set` never blocks the caller.
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<StoreWriteMessage>,
}

/// Handle for gracefully shutting down the store writer
pub struct StoreWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl StoreWriterHandle {
    /// Signals the writer task and waits until pending writes are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Store writer task failed");
        }
        tracing::info!("Store writer stopped");
    }
}

impl RedisStore {
    /// Creates a new store and spawns its background writer
    pub fn new(redis_client: Client) -> (Self, StoreWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::store_writer_task(client, write_rx, shutdown_rx).await;
        });

        let store = Self {
            redis_client,
            write_tx,
        };

        (store, StoreWriterHandle { shutdown_tx, task })
    }

    async fn store_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<StoreWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Store writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis store");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // No new writes are accepted; drain what is already queued.
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(
                                error = %e,
                                "Failed to flush store write during shutdown"
                            );
                        } else {
                            flushed += 1;
                        }
                    }
                    tracing::info!(flushed, "Store writer shutting down");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: StoreWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(msg.key, msg.value).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) {
        let msg = StoreWriteMessage {
            key: key.to_string(),
            value: value.to_string(),
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, key, "Failed to queue store write");
        }
    }
}
