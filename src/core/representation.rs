//! Representation composition
//!
//! Once a request has been negotiated, the variant picks which projection a
//! resource is mapped into, the projection is shaped down to the requested
//! fields, and links are appended only when the media type asked for them.

use crate::core::error::{ConfigError, ShapeError, ShapeResult};
use crate::core::link::Link;
use crate::core::negotiation::{NegotiatedMediaType, RepresentationVariant};
use crate::core::shape::{FieldSelection, ShapedRecord, Shapeable, shape_all};
use crate::core::validation::require_fields;
use serde_json::{Map, Value};

/// Key under which links are embedded in a representation
pub const LINKS_KEY: &str = "links";
/// Key holding the items of a collection envelope
pub const VALUE_KEY: &str = "value";

/// A backing resource with a default ("friendly") and a full projection
pub trait Represent {
    type Friendly: Shapeable;
    type Full: Shapeable;

    fn to_friendly(&self) -> Self::Friendly;

    fn to_full(&self) -> Self::Full;
}

/// Validate a field list against the projection the variant selects
///
/// Runs before storage is queried.
pub fn validate_fields_for<R: Represent>(
    variant: RepresentationVariant,
    fields: &str,
) -> ShapeResult<()> {
    match variant {
        RepresentationVariant::Default => require_fields::<R::Friendly>(fields),
        RepresentationVariant::Full => require_fields::<R::Full>(fields),
    }
}

/// Map a resource into the variant's projection and shape it
pub fn project<R: Represent>(
    resource: &R,
    variant: RepresentationVariant,
    fields: &str,
) -> ShapeResult<ShapedRecord> {
    let record = match variant {
        RepresentationVariant::Default => {
            FieldSelection::resolve::<R::Friendly>(fields)?.apply(&resource.to_friendly())
        }
        RepresentationVariant::Full => {
            FieldSelection::resolve::<R::Full>(fields)?.apply(&resource.to_full())
        }
    };
    Ok(record)
}

/// Render a shaped record, appending links when present
pub fn render(record: ShapedRecord, links: Option<Vec<Link>>) -> ShapeResult<Value> {
    let mut object = record.into_json()?;
    if let Some(links) = links {
        object.insert(LINKS_KEY.to_string(), links_to_json(links)?);
    }
    Ok(Value::Object(object))
}

/// Render a collection page
///
/// Without links the body is a bare array; with links it is an envelope
/// `{ "value": [...], "links": [...] }`.
pub fn render_collection(items: Vec<Value>, links: Option<Vec<Link>>) -> ShapeResult<Value> {
    match links {
        None => Ok(Value::Array(items)),
        Some(links) => {
            let mut envelope = Map::new();
            envelope.insert(VALUE_KEY.to_string(), Value::Array(items));
            envelope.insert(LINKS_KEY.to_string(), links_to_json(links)?);
            Ok(Value::Object(envelope))
        }
    }
}

/// Negotiated rendering of a single resource
///
/// `links` is only invoked when the media type includes hypermedia.
pub fn represent<R, F>(
    resource: &R,
    negotiated: &NegotiatedMediaType,
    fields: &str,
    links: F,
) -> ShapeResult<Value>
where
    R: Represent,
    F: FnOnce(&R) -> Result<Vec<Link>, ConfigError>,
{
    let record = project(resource, negotiated.variant, fields)?;
    let links = if negotiated.include_links {
        Some(links(resource)?)
    } else {
        None
    };
    render(record, links)
}

/// Negotiated rendering of a collection page
///
/// The field list is resolved once for the whole page. With hypermedia,
/// every item carries its own links and the envelope carries the
/// collection links.
pub fn represent_collection<R, F, C>(
    resources: &[R],
    negotiated: &NegotiatedMediaType,
    fields: &str,
    item_links: F,
    collection_links: C,
) -> ShapeResult<Value>
where
    R: Represent,
    F: Fn(&R) -> Result<Vec<Link>, ConfigError>,
    C: FnOnce() -> Result<Vec<Link>, ConfigError>,
{
    let include_links = negotiated.include_links;
    let items = match negotiated.variant {
        RepresentationVariant::Default => {
            let projections: Vec<R::Friendly> = resources.iter().map(R::to_friendly).collect();
            let records = shape_all(&projections, fields)?;
            render_items(resources, records, include_links, &item_links)?
        }
        RepresentationVariant::Full => {
            let projections: Vec<R::Full> = resources.iter().map(R::to_full).collect();
            let records = shape_all(&projections, fields)?;
            render_items(resources, records, include_links, &item_links)?
        }
    };

    let links = if include_links {
        Some(collection_links()?)
    } else {
        None
    };
    render_collection(items, links)
}

fn render_items<R, F>(
    resources: &[R],
    records: impl Iterator<Item = ShapedRecord>,
    include_links: bool,
    item_links: &F,
) -> ShapeResult<Vec<Value>>
where
    F: Fn(&R) -> Result<Vec<Link>, ConfigError>,
{
    resources
        .iter()
        .zip(records)
        .map(|(resource, record)| {
            let links = if include_links {
                Some(item_links(resource)?)
            } else {
                None
            };
            render(record, links)
        })
        .collect()
}

fn links_to_json(links: Vec<Link>) -> ShapeResult<Value> {
    serde_json::to_value(links).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize links");
        ShapeError::Internal(format!("Links could not be serialized: {}", e))
    })
}
