//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::ShapingConfig;
use crate::core::mapping::MappingRegistry;
use crate::resources::{Author, Course};
use crate::storage::{InMemoryStore, ResourceStore};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the course library server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ShapingConfig::default_config())
///     .with_author_store(InMemoryStore::with_items(authors))
///     .with_course_store(InMemoryStore::with_items(courses))
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: Option<ShapingConfig>,
    authors: Option<Arc<dyn ResourceStore<Author>>>,
    courses: Option<Arc<dyn ResourceStore<Course>>>,
    custom_routes: Vec<Router>,
    global_registry: bool,
    cors: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: None,
            authors: None,
            courses: None,
            custom_routes: Vec::new(),
            global_registry: false,
            cors: false,
        }
    }

    /// Set the shaping configuration (defaults to [`ShapingConfig::default_config`])
    pub fn with_config(mut self, config: ShapingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the shaping configuration from a YAML file
    pub fn with_config_file(self, path: &str) -> Result<Self> {
        let config = ShapingConfig::from_yaml_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the author store (defaults to an empty in-memory store)
    pub fn with_author_store(mut self, store: impl ResourceStore<Author> + 'static) -> Self {
        self.authors = Some(Arc::new(store));
        self
    }

    /// Set the course store (defaults to an empty in-memory store)
    pub fn with_course_store(mut self, store: impl ResourceStore<Course> + 'static) -> Self {
        self.courses = Some(Arc::new(store));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Install the mapping registry as the process-wide registry
    ///
    /// Only one server per process may do this.
    pub fn with_global_registry(mut self) -> Self {
        self.global_registry = true;
        self
    }

    /// Allow cross-origin requests from any origin
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let config = self
            .config
            .take()
            .unwrap_or_else(ShapingConfig::default_config);

        let registry = if self.global_registry {
            let registry = MappingRegistry::from_config(&config)?;
            Some(MappingRegistry::install_global(registry)?)
        } else {
            None
        };

        let authors = self
            .authors
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryStore::<Author>::new()));
        let courses = self
            .courses
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryStore::<Course>::new()));

        ServerHost::from_builder_components(config, registry, authors, courses)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        let custom_routes = std::mem::take(&mut self.custom_routes);
        RestExposure::build_router(host, custom_routes, self.cors)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_author_store(store)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::new();
        assert!(builder.config.is_none());
        assert!(builder.authors.is_none());
        assert!(builder.custom_routes.is_empty());
        assert!(!builder.global_registry);
    }

    #[test]
    fn test_build_host_defaults() {
        let host = ServerBuilder::new().build_host().unwrap();
        assert!(host.registry.has_mapping("Author"));
        assert_eq!(host.config.as_ref(), &ShapingConfig::default_config());
    }

    #[tokio::test]
    async fn test_build_host_uses_supplied_store() {
        let born = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
        let author = Author::new("Ann", "Bonny", born, "Rum");
        let host = ServerBuilder::new()
            .with_author_store(InMemoryStore::with_items(vec![author.clone()]))
            .build_host()
            .unwrap();
        assert_eq!(host.authors.get(&author.id).await.unwrap(), Some(author));
    }

    #[test]
    fn test_with_config_file_missing() {
        assert!(ServerBuilder::new().with_config_file("/nonexistent.yaml").is_err());
    }

    #[test]
    fn test_build_produces_router() {
        assert!(ServerBuilder::new().with_cors().build().is_ok());
    }
}
