//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::link::LinkTemplate;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One logical field of a resource and its backing fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Resource kind (e.g., "Author")
    pub resource_kind: String,

    /// Client-facing field name (e.g., "Name")
    pub logical_name: String,

    /// Backing fields, in sort precedence order (e.g., ["FirstName", "LastName"])
    pub backing_fields: Vec<String>,

    /// Invert the sort direction (e.g., age sorts on date of birth)
    #[serde(default)]
    pub reverse: bool,
}

impl MappingConfig {
    pub fn new(
        resource_kind: &str,
        logical_name: &str,
        backing_fields: &[&str],
        reverse: bool,
    ) -> Self {
        Self {
            resource_kind: resource_kind.to_string(),
            logical_name: logical_name.to_string(),
            backing_fields: backing_fields.iter().map(|f| f.to_string()).collect(),
            reverse,
        }
    }
}

/// Tokens recognized in the `Accept` subtype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationConfig {
    /// Trailing token that switches hypermedia links on
    #[serde(default = "default_hypermedia_suffix")]
    pub hypermedia_suffix: String,

    /// Trailing token that selects the full projection
    #[serde(default = "default_full_variant_token")]
    pub full_variant_token: String,
}

fn default_hypermedia_suffix() -> String {
    "hateoas".to_string()
}

fn default_full_variant_token() -> String {
    "full".to_string()
}

fn default_page_parameter() -> String {
    "pageNumber".to_string()
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            hypermedia_suffix: default_hypermedia_suffix(),
            full_variant_token: default_full_variant_token(),
        }
    }
}

/// Complete configuration of the representation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingConfig {
    /// Prefix for every generated href; empty yields root-relative hrefs
    #[serde(default)]
    pub base_url: String,

    /// Query parameter carrying the page number in collection links
    #[serde(default = "default_page_parameter")]
    pub page_parameter: String,

    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Logical-to-backing field mappings
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,

    /// Route name -> path template with `{param}` placeholders
    #[serde(default)]
    pub routes: IndexMap<String, String>,

    /// Resource kind -> links advertised by each instance
    #[serde(default)]
    pub resource_links: IndexMap<String, Vec<LinkTemplate>>,
}

impl ShapingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string(),
        })?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Link templates declared for a resource kind (case-insensitive)
    pub fn links_for(&self, resource_kind: &str) -> &[LinkTemplate] {
        self.resource_links
            .iter()
            .find(|(kind, _)| kind.eq_ignore_ascii_case(resource_kind))
            .map(|(_, templates)| templates.as_slice())
            .unwrap_or_default()
    }

    /// The authors/courses configuration of the course library
    pub fn default_config() -> Self {
        let mappings = vec![
            MappingConfig::new("Author", "Id", &["Id"], false),
            MappingConfig::new("Author", "MainCategory", &["MainCategory"], false),
            MappingConfig::new("Author", "Age", &["DateOfBirth"], true),
            MappingConfig::new("Author", "Name", &["FirstName", "LastName"], false),
            MappingConfig::new("Course", "Id", &["Id"], false),
            MappingConfig::new("Course", "Title", &["Title"], false),
            MappingConfig::new("Course", "Description", &["Description"], false),
            MappingConfig::new("Course", "AuthorId", &["AuthorId"], false),
        ];

        let routes = [
            ("GetRoot", "/api"),
            ("GetAuthors", "/api/authors"),
            ("CreateAuthor", "/api/authors"),
            ("GetAuthor", "/api/authors/{authorId}"),
            ("DeleteAuthor", "/api/authors/{authorId}"),
            ("GetCoursesForAuthor", "/api/authors/{authorId}/courses"),
            ("CreateCourseForAuthor", "/api/authors/{authorId}/courses"),
            ("GetCourseForAuthor", "/api/authors/{authorId}/courses/{courseId}"),
            ("DeleteCourseForAuthor", "/api/authors/{authorId}/courses/{courseId}"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        let mut resource_links = IndexMap::new();
        resource_links.insert(
            "Root".to_string(),
            vec![
                LinkTemplate::new("self", "GetRoot", "GET", false),
                LinkTemplate::new("authors", "GetAuthors", "GET", false),
                LinkTemplate::new("create_author", "CreateAuthor", "POST", false),
            ],
        );
        resource_links.insert(
            "Author".to_string(),
            vec![
                LinkTemplate::new("self", "GetAuthor", "GET", true),
                LinkTemplate::new("delete_author", "DeleteAuthor", "DELETE", false),
                LinkTemplate::new(
                    "create_course_for_author",
                    "CreateCourseForAuthor",
                    "POST",
                    false,
                ),
                LinkTemplate::new("courses", "GetCoursesForAuthor", "GET", false),
            ],
        );
        resource_links.insert(
            "Course".to_string(),
            vec![
                LinkTemplate::new("self", "GetCourseForAuthor", "GET", true),
                LinkTemplate::new("delete_course", "DeleteCourseForAuthor", "DELETE", false),
            ],
        );
        resource_links.insert(
            "CourseCollection".to_string(),
            vec![LinkTemplate::new("self", "GetCoursesForAuthor", "GET", true)],
        );

        Self {
            base_url: String::new(),
            page_parameter: default_page_parameter(),
            negotiation: NegotiationConfig::default(),
            mappings,
            routes,
            resource_links,
        }
    }
}
