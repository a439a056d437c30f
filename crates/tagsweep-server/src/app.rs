//! Application wiring.

use axum::Router;
use std::sync::Arc;
use tagsweep_config::{AppConfig, StoreBackendKind};
use tagsweep_core::{TagsweepError, TagsweepResult};
use tagsweep_rest::{create_router, header_name, AppState, WebhookAuthState};
use tagsweep_service::{
    DownstreamCache, HttpDownstreamCache, IndexQueue, IndexWorker, InvalidationCoordinator,
    NoopDownstreamCache, QueryTagIndexer,
};
use tagsweep_store::{create_pool, AssociationBackend, AssociationStore, InMemoryBackend, RedisBackend};
use tokio::net::TcpListener;
use tracing::info;

/// A fully wired server, ready to bind.
pub struct Application {
    router: Router,
    worker: IndexWorker,
    addr: String,
    backend_name: &'static str,
}

impl Application {
    /// Builds every component described by `config`.
    ///
    /// A Redis backend is pinged here, so an unreachable store fails startup.
    pub async fn build(config: &AppConfig) -> TagsweepResult<Self> {
        let backend = build_backend(config).await?;
        let store = Arc::new(AssociationStore::new(
            backend,
            config.store.operation_timeout(),
        ));
        let backend_name = store.backend_name();

        let indexer = QueryTagIndexer::new(store.clone());
        let (index_queue, worker) = IndexQueue::spawn(indexer, config.indexer.queue_capacity);

        let downstream = build_downstream(config)?;
        let coordinator = Arc::new(InvalidationCoordinator::new(
            store.clone(),
            downstream,
            config.downstream.timeout(),
        ));

        let state = AppState::new(coordinator, index_queue, store)
            .with_tags_header(header_name(&config.indexer.tags_header)?)
            .with_flush(config.store.allow_flush);
        let auth = WebhookAuthState::new(
            config.security.webhook_secret.clone(),
            &config.security.secret_header,
        )?;

        let router = create_router(state, auth, &config.server);

        Ok(Self {
            router,
            worker,
            addr: config.server.addr(),
            backend_name,
        })
    }

    /// Address the server binds to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Name of the association store backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// A handle to the router, for in-process requests.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves until `shutdown` resolves, then waits for queued index writes.
    pub async fn run<F>(self, shutdown: F) -> TagsweepResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| TagsweepError::Internal(format!("Failed to bind {}: {}", self.addr, e)))?;

        info!("Starting REST server on http://{}", self.addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| TagsweepError::Internal(format!("REST server error: {}", e)))?;

        info!("Draining index queue");
        self.worker.join().await;
        Ok(())
    }
}

async fn build_backend(config: &AppConfig) -> TagsweepResult<Arc<dyn AssociationBackend>> {
    match config.store.backend {
        StoreBackendKind::Redis => {
            let pool = create_pool(&config.redis).await?;
            Ok(Arc::new(RedisBackend::new(pool, config.store.key_prefix.clone())))
        }
        StoreBackendKind::Memory => {
            info!("Using in-memory association store; associations are lost on restart");
            Ok(Arc::new(InMemoryBackend::new()))
        }
    }
}

fn build_downstream(config: &AppConfig) -> TagsweepResult<Arc<dyn DownstreamCache>> {
    match &config.downstream.purge_url {
        Some(url) => {
            let client = reqwest::Client::builder()
                .timeout(config.downstream.timeout())
                .build()
                .map_err(|e| {
                    TagsweepError::Configuration(format!("Failed to build HTTP client: {}", e))
                })?;
            info!(purge_url = %url, "Downstream purges go over HTTP");
            Ok(Arc::new(HttpDownstreamCache::with_client(client, url.clone())))
        }
        None => Ok(Arc::new(NoopDownstreamCache)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackendKind::Memory;
        config.security.webhook_secret = "s3cret".to_string();
        config
    }

    #[tokio::test]
    async fn test_build_with_memory_backend() {
        let app = Application::build(&memory_config()).await.unwrap();
        assert_eq!(app.backend_name(), "memory");
        assert_eq!(app.addr(), "0.0.0.0:8080");

        let response = app
            .router()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_build_with_http_downstream() {
        let mut config = memory_config();
        config.downstream.purge_url = Some("http://localhost:9/purge".to_string());
        assert!(Application::build(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_tags_header_fails_build() {
        let mut config = memory_config();
        config.indexer.tags_header = "not a header".to_string();
        let err = Application::build(&config).await.err().unwrap();
        assert!(matches!(err, TagsweepError::Configuration(_)));
    }
}
