use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::product::Product;
use crate::repository::{self, LoadError, ProductSource};

pub enum LoadEvent {
    Finished(Result<Vec<Product>, LoadError>),
}

/// Owns the runtime the catalog fetch runs on. Dropping it abandons any
/// request still in flight.
pub struct ProductLoader {
    runtime: Runtime,
}

impl ProductLoader {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }

    /// Start the single catalog load. The result arrives on the returned
    /// channel once, success or failure.
    pub fn start(
        &self,
        source: ProductSource,
        timeout: Option<Duration>,
    ) -> mpsc::Receiver<LoadEvent> {
        let (tx, rx) = mpsc::channel();

        tracing::info!(%source, ?timeout, "loading products");
        self.runtime.spawn(async move {
            let result = match repository::http_client(timeout) {
                Ok(client) => repository::fetch(&client, &source).await,
                Err(e) => Err(e),
            };
            let _ = tx.send(LoadEvent::Finished(result));
        });

        rx
    }
}
