//! Hypermedia links
//!
//! The [`LinkBuilder`] is generic over a declarative list of
//! [`LinkTemplate`]s: which relations a resource advertises is configuration,
//! not code. Route templates are plain paths with `{param}` placeholders.

use crate::config::ShapingConfig;
use crate::core::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Relation of the link pointing at the current representation
pub const SELF_REL: &str = "self";
/// Relation of the next collection page
pub const NEXT_PAGE_REL: &str = "nextPage";
/// Relation of the previous collection page
pub const PREVIOUS_PAGE_REL: &str = "previousPage";

/// A navigable reference embedded in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(rename = "rel")]
    pub relation: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, relation: impl Into<String>, method: &str) -> Self {
        Self {
            href: href.into(),
            relation: relation.into(),
            method: method.to_uppercase(),
        }
    }
}

/// Declaration of one link a resource advertises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplate {
    /// Relation name (e.g., "delete_author")
    pub relation: String,

    /// Name of the route in the route table (e.g., "DeleteAuthor")
    pub route: String,

    /// HTTP verb (e.g., "DELETE")
    pub method: String,

    /// Whether the `fields` query parameter is carried over when non-blank
    #[serde(default)]
    pub include_fields: bool,
}

impl LinkTemplate {
    pub fn new(relation: &str, route: &str, method: &str, include_fields: bool) -> Self {
        Self {
            relation: relation.to_string(),
            route: route.to_string(),
            method: method.to_string(),
            include_fields,
        }
    }
}

/// Builds links from the configured route table
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
    page_parameter: String,
    routes: Arc<IndexMap<String, String>>,
}

impl LinkBuilder {
    /// Create a builder over a route table
    pub fn new(
        base_url: impl Into<String>,
        page_parameter: impl Into<String>,
        routes: IndexMap<String, String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_parameter: page_parameter.into(),
            routes: Arc::new(routes),
        }
    }

    /// Create a builder from configuration
    ///
    /// Every route named by a link template must be declared.
    pub fn from_config(config: &ShapingConfig) -> Result<Self, ConfigError> {
        for template in config.resource_links.values().flatten() {
            if !config.routes.contains_key(&template.route) {
                return Err(ConfigError::MissingRoute {
                    route: template.route.clone(),
                });
            }
        }

        Ok(Self::new(
            config.base_url.clone(),
            config.page_parameter.clone(),
            config.routes.clone(),
        ))
    }

    /// Expand a route template into an absolute or root-relative URL
    pub fn url_for(
        &self,
        route: &str,
        route_values: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<String, ConfigError> {
        let template = self
            .routes
            .get(route)
            .ok_or_else(|| ConfigError::MissingRoute {
                route: route.to_string(),
            })?;

        let mut path = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            let name = &rest[open + 1..open + close];
            let value = route_values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| ConfigError::MissingRouteParameter {
                    route: route.to_string(),
                    parameter: name.to_string(),
                })?;
            path.push_str(&rest[..open]);
            path.push_str(value);
            rest = &rest[open + close + 1..];
        }
        path.push_str(rest);

        let mut href = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            href.push('?');
            href.push_str(&encoded);
        }
        Ok(href)
    }

    /// Links for a single resource instance
    ///
    /// Templates are expanded in declaration order. Templates flagged with
    /// `include_fields` carry the `fields` query parameter when it is non-blank.
    pub fn links_for_resource(
        &self,
        templates: &[LinkTemplate],
        route_values: &[(&str, &str)],
        fields: &str,
    ) -> Result<Vec<Link>, ConfigError> {
        templates
            .iter()
            .map(|template| -> Result<Link, ConfigError> {
                let query: Vec<(&str, &str)> =
                    if template.include_fields && !fields.trim().is_empty() {
                        vec![("fields", fields)]
                    } else {
                        Vec::new()
                    };
                let href = self.url_for(&template.route, route_values, &query)?;
                Ok(Link::new(href, template.relation.clone(), &template.method))
            })
            .collect()
    }

    /// Links for one page of a collection
    ///
    /// Always yields `self`; `nextPage` and `previousPage` follow when the
    /// flags say so. Each link re-encodes the whole query, shifting only the
    /// page number.
    pub fn links_for_collection(
        &self,
        route: &str,
        route_values: &[(&str, &str)],
        query: &IndexMap<String, String>,
        has_next: bool,
        has_previous: bool,
    ) -> Result<Vec<Link>, ConfigError> {
        let current_page = query
            .get(&self.page_parameter)
            .and_then(|page| page.parse::<usize>().ok())
            .unwrap_or(1);

        let mut links = vec![Link::new(
            self.page_href(route, route_values, query, current_page)?,
            SELF_REL,
            "GET",
        )];

        if has_next {
            links.push(Link::new(
                self.page_href(route, route_values, query, current_page + 1)?,
                NEXT_PAGE_REL,
                "GET",
            ));
        }

        if has_previous {
            let previous = current_page.saturating_sub(1).max(1);
            links.push(Link::new(
                self.page_href(route, route_values, query, previous)?,
                PREVIOUS_PAGE_REL,
                "GET",
            ));
        }

        Ok(links)
    }

    fn page_href(
        &self,
        route: &str,
        route_values: &[(&str, &str)],
        query: &IndexMap<String, String>,
        page: usize,
    ) -> Result<String, ConfigError> {
        let page = page.to_string();
        let mut pairs: Vec<(&str, &str)> = query
            .iter()
            .map(|(key, value)| {
                if *key == self.page_parameter {
                    (key.as_str(), page.as_str())
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();
        if !query.contains_key(&self.page_parameter) {
            pairs.push((self.page_parameter.as_str(), page.as_str()));
        }
        self.url_for(route, route_values, &pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> LinkBuilder {
        let mut routes = IndexMap::new();
        routes.insert("GetAuthors".to_string(), "/api/authors".to_string());
        routes.insert(
            "GetAuthor".to_string(),
            "/api/authors/{authorId}".to_string(),
        );
        routes.insert(
            "GetCourseForAuthor".to_string(),
            "/api/authors/{authorId}/courses/{courseId}".to_string(),
        );
        LinkBuilder::new("", "pageNumber", routes)
    }

    fn author_templates() -> Vec<LinkTemplate> {
        vec![
            LinkTemplate::new("self", "GetAuthor", "GET", true),
            LinkTemplate::new("delete_author", "GetAuthor", "delete", false),
        ]
    }

    #[test]
    fn test_url_for_substitutes_parameters() {
        let href = builder()
            .url_for(
                "GetCourseForAuthor",
                &[("courseId", "c1"), ("authorId", "a1")],
                &[],
            )
            .unwrap();
        assert_eq!(href, "/api/authors/a1/courses/c1");
    }

    #[test]
    fn test_url_for_missing_parameter() {
        let err = builder()
            .url_for("GetCourseForAuthor", &[("authorId", "a1")], &[])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRouteParameter {
                route: "GetCourseForAuthor".to_string(),
                parameter: "courseId".to_string(),
            }
        );
    }

    #[test]
    fn test_url_for_unknown_route() {
        assert!(matches!(
            builder().url_for("Nope", &[], &[]),
            Err(ConfigError::MissingRoute { .. })
        ));
    }

    #[test]
    fn test_base_url_prefix() {
        let mut routes = IndexMap::new();
        routes.insert("GetAuthors".to_string(), "/api/authors".to_string());
        let builder = LinkBuilder::new("http://localhost:3000/", "pageNumber", routes);
        assert_eq!(
            builder.url_for("GetAuthors", &[], &[]).unwrap(),
            "http://localhost:3000/api/authors"
        );
    }

    #[test]
    fn test_resource_links_with_fields() {
        let links = builder()
            .links_for_resource(&author_templates(), &[("authorId", "a1")], "id,name")
            .unwrap();
        assert_eq!(
            links,
            vec![
                Link::new("/api/authors/a1?fields=id%2Cname", "self", "GET"),
                Link::new("/api/authors/a1", "delete_author", "DELETE"),
            ]
        );
    }

    #[test]
    fn test_resource_links_without_fields() {
        let links = builder()
            .links_for_resource(&author_templates(), &[("authorId", "a1")], "  ")
            .unwrap();
        assert_eq!(links[0].href, "/api/authors/a1");
        assert_eq!(links[1].method, "DELETE");
    }

    fn page_query(page: &str) -> IndexMap<String, String> {
        let mut query = IndexMap::new();
        query.insert("orderBy".to_string(), "name desc".to_string());
        query.insert("pageNumber".to_string(), page.to_string());
        query.insert("pageSize".to_string(), "10".to_string());
        query
    }

    #[test]
    fn test_collection_links_next_only() {
        let links = builder()
            .links_for_collection("GetAuthors", &[], &page_query("1"), true, false)
            .unwrap();
        let relations: Vec<&str> = links.iter().map(|l| l.relation.as_str()).collect();
        assert_eq!(relations, vec!["self", "nextPage"]);
        assert_eq!(
            links[0].href,
            "/api/authors?orderBy=name+desc&pageNumber=1&pageSize=10"
        );
        assert_eq!(
            links[1].href,
            "/api/authors?orderBy=name+desc&pageNumber=2&pageSize=10"
        );
    }

    #[test]
    fn test_collection_links_previous_only() {
        let links = builder()
            .links_for_collection("GetAuthors", &[], &page_query("3"), false, true)
            .unwrap();
        let relations: Vec<&str> = links.iter().map(|l| l.relation.as_str()).collect();
        assert_eq!(relations, vec!["self", "previousPage"]);
        assert_eq!(
            links[1].href,
            "/api/authors?orderBy=name+desc&pageNumber=2&pageSize=10"
        );
    }

    #[test]
    fn test_collection_links_both_and_neither() {
        let links = builder()
            .links_for_collection("GetAuthors", &[], &page_query("2"), true, true)
            .unwrap();
        assert_eq!(links.len(), 3);

        let links = builder()
            .links_for_collection("GetAuthors", &[], &page_query("1"), false, false)
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].relation, SELF_REL);
    }

    #[test]
    fn test_collection_links_without_page_parameter() {
        let links = builder()
            .links_for_collection("GetAuthors", &[], &IndexMap::new(), true, false)
            .unwrap();
        assert_eq!(links[0].href, "/api/authors?pageNumber=1");
        assert_eq!(links[1].href, "/api/authors?pageNumber=2");
    }

    #[test]
    fn test_link_serializes_rel() {
        let json = serde_json::to_value(Link::new("/api", "self", "get")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "href": "/api", "rel": "self", "method": "GET" })
        );
    }
}
