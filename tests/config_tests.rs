//! Tests of configuration-driven behavior
//!
//! Mappings, negotiation tokens, routes and links all come from YAML; these
//! tests load alternative configurations and check the API follows them.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use course_library::prelude::*;
use serde_json::Value;

// =============================================================================
// Fixtures
// =============================================================================

const CONFIG: &str = r#"
base_url: "http://library.test"
page_parameter: pageNumber
negotiation:
  hypermedia_suffix: hal
  full_variant_token: complete
mappings:
  - resource_kind: Author
    logical_name: Name
    backing_fields: [LastName, FirstName]
  - resource_kind: Author
    logical_name: Born
    backing_fields: [DateOfBirth]
routes:
  GetAuthors: /v2/authors
  GetAuthor: /v2/authors/{authorId}
resource_links:
  Author:
    - relation: self
      route: GetAuthor
      method: GET
      include_fields: true
"#;

fn server(config: ShapingConfig) -> TestServer {
    let authors = vec![
        Author::new(
            "Ann",
            "Bonny",
            Utc.with_ymd_and_hms(1697, 11, 8, 0, 0, 0).unwrap(),
            "Rum",
        ),
        Author::new(
            "Zed",
            "Abbot",
            Utc.with_ymd_and_hms(1710, 1, 1, 0, 0, 0).unwrap(),
            "Maps",
        ),
    ];

    let app = ServerBuilder::new()
        .with_config(config)
        .with_author_store(InMemoryStore::with_items(authors))
        .build()
        .unwrap();
    TestServer::new(app)
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|author| author["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Configured mappings
// =============================================================================

mod mapping_tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_backing_field_order() {
        let server = server(ShapingConfig::from_yaml_str(CONFIG).unwrap());
        let response = server.get("/api/authors").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(names(&body), vec!["Zed Abbot", "Ann Bonny"]);
    }

    #[tokio::test]
    async fn test_unmapped_logical_name_is_rejected() {
        let server = server(ShapingConfig::from_yaml_str(CONFIG).unwrap());
        let response = server
            .get("/api/authors")
            .add_query_param("orderBy", "age")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/authors")
            .add_query_param("orderBy", "born desc")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(names(&body), vec!["Zed Abbot", "Ann Bonny"]);
    }
}

// =============================================================================
// Configured negotiation and links
// =============================================================================

mod negotiation_tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_tokens() {
        let server = server(ShapingConfig::from_yaml_str(CONFIG).unwrap());
        let response = server
            .get("/api/authors")
            .add_query_param("fields", "firstName")
            .add_header(
                header::ACCEPT,
                HeaderValue::from_static("application/vnd.library.author.complete.hal+json"),
            )
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let first = &body["value"][0];
        assert_eq!(first["firstName"], "Zed");

        let author_id = first["id"].as_str().unwrap();
        assert_eq!(
            first["links"][0]["href"],
            format!("http://library.test/v2/authors/{}?fields=firstName", author_id)
        );
        assert_eq!(
            body["links"][0]["href"],
            "http://library.test/v2/authors?fields=firstName&orderBy=name&pageNumber=1&pageSize=10"
        );
    }

    #[tokio::test]
    async fn test_default_tokens_no_longer_apply() {
        let server = server(ShapingConfig::from_yaml_str(CONFIG).unwrap());
        let response = server
            .get("/api/authors")
            .add_header(
                header::ACCEPT,
                HeaderValue::from_static("application/vnd.library.author.full.hateoas+json"),
            )
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body.is_array());
        assert!(body[0].get("name").is_some());
    }
}

// =============================================================================
// Configuration errors
// =============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_link_to_undeclared_route_fails_build() {
        let mut config = ShapingConfig::from_yaml_str(CONFIG).unwrap();
        config.routes.shift_remove("GetAuthor");

        let result = ServerBuilder::new().with_config(config).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_mapping_fails_build() {
        let mut config = ShapingConfig::from_yaml_str(CONFIG).unwrap();
        config
            .mappings
            .push(MappingConfig::new("author", "NAME", &["FirstName"], false));

        let result = ServerBuilder::new().with_config(config).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.yaml");
        std::fs::write(&path, CONFIG).unwrap();

        let builder = ServerBuilder::new().with_config_file(path.to_str().unwrap());
        assert!(builder.is_ok());
    }
}
