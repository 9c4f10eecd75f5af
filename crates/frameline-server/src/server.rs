use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use frameline_store::ContentStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Frameline photo store server.
pub struct PhotoServer {
    config: ServerConfig,
}

impl PhotoServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the store and serve requests until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let store = Arc::new(ContentStore::open(&self.config.photos_dir)?);
        let app = build_router(store);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            dir = %self.config.photos_dir.display(),
            "photo server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
