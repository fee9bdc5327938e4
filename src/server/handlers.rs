//! HTTP handlers for the course library
//!
//! Every handler follows the same pipeline: negotiate the `Accept` header,
//! validate the field list and order-by expression, and only then query
//! storage. Shaping and link building run on the fetched records.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ShapingConfig;
use crate::core::error::{ConfigError, FieldError, NegotiationError, ShapeError, ShapeResult};
use crate::core::link::{Link, LinkBuilder, NEXT_PAGE_REL, PREVIOUS_PAGE_REL};
use crate::core::mapping::MappingRegistry;
use crate::core::negotiation::{NegotiatedMediaType, Negotiator};
use crate::core::query::{FieldsQuery, PagedList, PaginationMetadata, ResourceParameters};
use crate::core::representation::{represent, represent_collection, validate_fields_for};
use crate::core::sort::resolve_order;
use crate::resources::author::{self, AUTHOR_KIND};
use crate::resources::course::COURSE_KIND;
use crate::resources::{Author, COURSE_COLLECTION_KIND, Course, ROOT_KIND};
use crate::server::host::ServerHost;
use crate::storage::ResourceStore;

/// Header carrying pagination metadata of collection responses
pub const X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

pub const GET_AUTHORS_ROUTE: &str = "GetAuthors";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ShapingConfig>,
    pub registry: Arc<MappingRegistry>,
    pub negotiator: Negotiator,
    pub links: LinkBuilder,
    pub authors: Arc<dyn ResourceStore<Author>>,
    pub courses: Arc<dyn ResourceStore<Course>>,
}

impl AppState {
    pub fn from_host(host: &ServerHost) -> Self {
        Self {
            config: host.config.clone(),
            registry: host.registry.clone(),
            negotiator: host.negotiator.clone(),
            links: host.links.clone(),
            authors: host.authors.clone(),
            courses: host.courses.clone(),
        }
    }

    /// Negotiate the request's `Accept` header (absent means JSON)
    fn negotiate(&self, headers: &HeaderMap) -> ShapeResult<NegotiatedMediaType> {
        let accept = match headers.get(ACCEPT) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                tracing::warn!("Rejected non-ASCII Accept header");
                NegotiationError::UnsupportedMediaType {
                    value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    reason: "header is not visible ASCII".to_string(),
                }
            })?),
        };

        self.negotiator.negotiate_optional(accept).map_err(|e| {
            tracing::warn!(error = %e, "Rejected Accept header");
            e.into()
        })
    }

    async fn find_author(&self, author_id: Uuid) -> ShapeResult<Author> {
        self.authors
            .get(&author_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ShapeError::NotFound {
                resource_kind: AUTHOR_KIND.to_string(),
                id: author_id,
            })
    }

    fn author_links(&self, author: &Author, fields: &str) -> Result<Vec<Link>, ConfigError> {
        let author_id = author.id.to_string();
        self.links.links_for_resource(
            self.config.links_for(AUTHOR_KIND),
            &[("authorId", author_id.as_str())],
            fields,
        )
    }

    fn course_links(&self, course: &Course, fields: &str) -> Result<Vec<Link>, ConfigError> {
        let author_id = course.author_id.to_string();
        let course_id = course.id.to_string();
        self.links.links_for_resource(
            self.config.links_for(COURSE_KIND),
            &[("authorId", author_id.as_str()), ("courseId", course_id.as_str())],
            fields,
        )
    }
}

fn storage_error(err: anyhow::Error) -> ShapeError {
    tracing::error!(error = %err, "Storage query failed");
    ShapeError::Internal(err.to_string())
}

/// Render a JSON body labelled with the negotiated vendor type when it is JSON
fn negotiated_response(negotiated: &NegotiatedMediaType, body: Value) -> Response {
    let mut response = Json(body).into_response();
    if negotiated.media_type.ends_with("+json") {
        if let Ok(value) = HeaderValue::from_str(&negotiated.media_type) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
    }
    response
}

fn with_pagination(mut response: Response, metadata: &PaginationMetadata) -> ShapeResult<Response> {
    let metadata =
        serde_json::to_string(metadata).map_err(|e| ShapeError::Internal(e.to_string()))?;
    let value =
        HeaderValue::from_str(&metadata).map_err(|e| ShapeError::Internal(e.to_string()))?;
    response.headers_mut().insert(X_PAGINATION, value);
    Ok(response)
}

/// GET /api
pub async fn get_root(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ShapeError> {
    state.negotiate(&headers)?;

    let links = state
        .links
        .links_for_resource(state.config.links_for(ROOT_KIND), &[], "")?;

    Ok(Json(links).into_response())
}

/// GET /api/authors
pub async fn list_authors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ResourceParameters>,
) -> Result<Response, ShapeError> {
    let negotiated = state.negotiate(&headers)?;

    if !state
        .registry
        .valid_mapping_exists_for(AUTHOR_KIND, &params.order_by)
    {
        tracing::warn!(order_by = %params.order_by, "Rejected order-by expression");
        return Err(FieldError::UnknownField {
            resource_kind: AUTHOR_KIND.to_string(),
            field: params.order_by.clone(),
        }
        .into());
    }
    let terms = resolve_order(AUTHOR_KIND, &params.order_by, &state.registry)?;
    validate_fields_for::<Author>(negotiated.variant, params.fields())?;

    let filter = author::filter(&params);
    let page = state
        .authors
        .page(&filter, &terms, params.page_number(), params.page_size())
        .await
        .map_err(storage_error)?;

    tracing::debug!(
        total_count = page.total_count,
        current_page = page.current_page,
        "Listed authors"
    );

    let fields = params.fields();
    let query_pairs = params.to_query_pairs();
    let collection_links = || {
        state.links.links_for_collection(
            GET_AUTHORS_ROUTE,
            &[],
            &query_pairs,
            page.has_next(),
            page.has_previous(),
        )
    };

    let body = represent_collection(
        &page.items,
        &negotiated,
        fields,
        |author| state.author_links(author, fields),
        collection_links,
    )?;

    let metadata = if negotiated.include_links {
        page.metadata()
    } else {
        let links = collection_links()?;
        page_metadata_with_links(&page, &links)
    };

    with_pagination(negotiated_response(&negotiated, body), &metadata)
}

/// Metadata carrying the previous/next hrefs of plain representations
fn page_metadata_with_links<T>(page: &PagedList<T>, links: &[Link]) -> PaginationMetadata {
    let href = |relation: &str| {
        links
            .iter()
            .find(|link| link.relation == relation)
            .map(|link| link.href.clone())
    };
    page.metadata()
        .with_page_links(href(PREVIOUS_PAGE_REL), href(NEXT_PAGE_REL))
}

/// GET /api/authors/{authorId}
pub async fn get_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(author_id): Path<Uuid>,
    Query(query): Query<FieldsQuery>,
) -> Result<Response, ShapeError> {
    let negotiated = state.negotiate(&headers)?;
    validate_fields_for::<Author>(negotiated.variant, query.fields())?;

    let author = state.find_author(author_id).await?;
    let body = represent(&author, &negotiated, query.fields(), |author| {
        state.author_links(author, query.fields())
    })?;

    Ok(negotiated_response(&negotiated, body))
}

/// GET /api/authors/{authorId}/courses
pub async fn list_courses_for_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(author_id): Path<Uuid>,
    Query(query): Query<FieldsQuery>,
) -> Result<Response, ShapeError> {
    let negotiated = state.negotiate(&headers)?;
    validate_fields_for::<Course>(negotiated.variant, query.fields())?;

    state.find_author(author_id).await?;
    let courses = state
        .courses
        .find(&|course: &Course| course.author_id == author_id)
        .await
        .map_err(storage_error)?;

    let fields = query.fields();
    let body = represent_collection(
        &courses,
        &negotiated,
        fields,
        |course| state.course_links(course, fields),
        || {
            let author_id = author_id.to_string();
            state.links.links_for_resource(
                state.config.links_for(COURSE_COLLECTION_KIND),
                &[("authorId", author_id.as_str())],
                fields,
            )
        },
    )?;

    Ok(negotiated_response(&negotiated, body))
}

/// GET /api/authors/{authorId}/courses/{courseId}
pub async fn get_course_for_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((author_id, course_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<FieldsQuery>,
) -> Result<Response, ShapeError> {
    let negotiated = state.negotiate(&headers)?;
    validate_fields_for::<Course>(negotiated.variant, query.fields())?;

    state.find_author(author_id).await?;
    let course = state
        .courses
        .get(&course_id)
        .await
        .map_err(storage_error)?
        .filter(|course| course.author_id == author_id)
        .ok_or_else(|| ShapeError::NotFound {
            resource_kind: COURSE_KIND.to_string(),
            id: course_id,
        })?;

    let body = represent(&course, &negotiated, query.fields(), |course| {
        state.course_links(course, query.fields())
    })?;

    Ok(negotiated_response(&negotiated, body))
}
