//! Core of the representation engine
//!
//! - [`mapping`]: logical-to-backing field table shared by every component
//! - [`validation`] and [`shape`]: field lists in, ordered records out
//! - [`sort`]: order-by expressions into backing-field orderings
//! - [`negotiation`], [`link`], [`representation`]: what a response looks like

pub mod error;
pub mod field;
pub mod link;
pub mod mapping;
pub mod negotiation;
pub mod query;
pub mod representation;
pub mod shape;
pub mod sort;
pub mod validation;

pub use error::{ConfigError, FieldError, MappingError, NegotiationError, ShapeError, ShapeResult};
pub use field::FieldValue;
pub use link::{Link, LinkBuilder, LinkTemplate};
pub use mapping::{MappingEntry, MappingRegistry};
pub use negotiation::{NegotiatedMediaType, Negotiator, RepresentationVariant};
pub use query::{FieldsQuery, PagedList, PaginationMetadata, ResourceParameters};
pub use representation::Represent;
pub use shape::{FieldSelection, ShapedRecord, Shapeable};
pub use sort::{ResolvedOrderTerm, SortClause};
