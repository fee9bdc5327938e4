//! Server host for transport-agnostic API exposure
//!
//! The host owns everything a request needs to be represented: the mapping
//! registry, the negotiator, the link builder and the resource stores. It is
//! built once and shared read-only across requests.

use crate::config::ShapingConfig;
use crate::core::link::LinkBuilder;
use crate::core::mapping::MappingRegistry;
use crate::core::negotiation::Negotiator;
use crate::resources::{Author, Course};
use crate::storage::ResourceStore;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all engine state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(
///     ShapingConfig::default_config(),
///     None,
///     Arc::new(InMemoryStore::<Author>::new()),
///     Arc::new(InMemoryStore::<Course>::new()),
/// )?;
///
/// let app = RestExposure::build_router(Arc::new(host), vec![], false)?;
/// ```
pub struct ServerHost {
    /// Shaping configuration
    pub config: Arc<ShapingConfig>,

    /// Logical-to-backing field mappings
    pub registry: Arc<MappingRegistry>,

    /// `Accept` header classifier
    pub negotiator: Negotiator,

    /// Hypermedia link builder
    pub links: LinkBuilder,

    pub authors: Arc<dyn ResourceStore<Author>>,

    pub courses: Arc<dyn ResourceStore<Course>>,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// The mapping registry is built from the configuration unless one is
    /// supplied (e.g., the process-wide registry). Fails when the mapping
    /// table is invalid or a link template names an undeclared route.
    pub fn from_builder_components(
        config: ShapingConfig,
        registry: Option<Arc<MappingRegistry>>,
        authors: Arc<dyn ResourceStore<Author>>,
        courses: Arc<dyn ResourceStore<Course>>,
    ) -> Result<Self> {
        let registry = match registry {
            Some(registry) => registry,
            None => Arc::new(MappingRegistry::from_config(&config)?),
        };
        let negotiator = Negotiator::new(&config.negotiation);
        let links = LinkBuilder::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            registry,
            negotiator,
            links,
            authors,
            courses,
        })
    }
}
