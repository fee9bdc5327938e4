//! # Course Library
//!
//! A dynamic resource-representation engine, and the REST service for
//! authors and courses built on top of it.
//!
//! ## Features
//!
//! - **Field Shaping**: `?fields=id,name` projects a resource onto the requested fields
//! - **Sort Mapping**: `?orderBy=name desc,age` resolves to validated backing-field orderings
//! - **Content Negotiation**: vendor media types select the full projection and hypermedia
//! - **Hypermedia Links**: per-resource and paging links built from a declarative route table
//! - **Configuration-Based**: mappings, routes and links declared in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use course_library::prelude::*;
//!
//! let registry = MappingRegistry::from_config(&ShapingConfig::default_config())?;
//! let terms = resolve_order("Author", "name desc", &registry)?;
//! // [FirstName descending, LastName descending]
//!
//! let negotiated = negotiate("application/vnd.marvin.author.full.hateoas+json")?;
//! assert_eq!(negotiated.variant, RepresentationVariant::Full);
//! assert!(negotiated.include_links);
//!
//! let record = shape(&author.to_full(), "firstName,dateOfBirth")?;
//! // {"id": ..., "firstName": ..., "dateOfBirth": ...}
//! ```

pub mod config;
pub mod core;
pub mod resources;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Configuration ===
    pub use crate::config::{MappingConfig, NegotiationConfig, ShapingConfig};

    // === Engine ===
    pub use crate::core::{
        error::{ConfigError, FieldError, MappingError, NegotiationError, ShapeError, ShapeResult},
        field::FieldValue,
        link::{Link, LinkBuilder, LinkTemplate},
        mapping::{MappingEntry, MappingRegistry},
        negotiation::{NegotiatedMediaType, Negotiator, RepresentationVariant, negotiate},
        query::{FieldsQuery, PagedList, PaginationMetadata, ResourceParameters},
        representation::{Represent, represent, represent_collection, validate_fields_for},
        shape::{FieldSelection, ShapedRecord, Shapeable, shape, shape_all},
        sort::{ResolvedOrderTerm, resolve_order},
        validation::{require_fields, type_has_fields, validate},
    };

    // === Macros ===
    pub use crate::{impl_record, impl_shapeable};

    // === Resources ===
    pub use crate::resources::{Author, AuthorDto, AuthorFullDto, Course, CourseDto};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, Record, ResourceStore, Sortable, apply_order};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};
}
