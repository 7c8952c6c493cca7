/// Integration tests for request synthesis and insertion point location
use specfuzz::models::{Endpoint, Method, ParameterInfo, ParameterLocation, SpecParser};
use specfuzz::request::{build_request, build_request_text, USER_AGENT};
use specfuzz::{build_template, OpenApiParser};

const PETSTORE: &str = include_str!("fixtures/openapi-petstore.json");

fn endpoint(method: Method, server: &str, path: &str, params: Vec<ParameterInfo>) -> Endpoint {
    Endpoint::new(1, "https", method, server, path, params, "")
}

#[test]
fn test_get_request_exact_bytes() {
    let ep = endpoint(Method::GET, "https://api.test.com", "/users", vec![]);
    let expected = format!(
        "GET /users HTTP/1.1\r\nHost: api.test.com\r\nUser-Agent: {}\r\n\r\n",
        USER_AGENT
    );
    assert_eq!(build_request_text(&ep, None), expected);
    assert_eq!(build_request(&ep, None).raw, expected.into_bytes());
}

#[test]
fn test_post_request_exact_bytes() {
    let ep = endpoint(Method::POST, "https://api.test.com", "/users", vec![]);
    let expected = format!(
        "POST /users HTTP/1.1\r\nHost: api.test.com\r\nUser-Agent: {}\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n{{}}",
        USER_AGENT
    );
    assert_eq!(build_request_text(&ep, None), expected);
}

#[test]
fn test_body_only_for_post_put_patch() {
    for method in Method::ALL {
        let ep = endpoint(method, "https://api.test.com", "/x", vec![]);
        let text = build_request_text(&ep, None);
        let has_body = text.ends_with("\r\n\r\n{}");
        assert_eq!(has_body, matches!(method, Method::POST | Method::PUT | Method::PATCH), "{}", method);
        assert_eq!(text.contains("Content-Length: 2\r\n"), has_body);
        assert!(text.starts_with(&format!("{} /x HTTP/1.1\r\n", method)));
    }
}

#[test]
fn test_host_header_ports() {
    let ep = endpoint(Method::GET, "https://api.test.com:8443/", "/", vec![]);
    let built = build_request(&ep, None);
    assert!(built.as_text().contains("Host: api.test.com:8443\r\n"));
    assert_eq!(built.service.port, 8443);
    assert!(built.service.secure);

    let ep = endpoint(Method::GET, "https://api.test.com:443", "/", vec![]);
    let built = build_request(&ep, None);
    assert!(built.as_text().contains("Host: api.test.com\r\n"));
    assert_eq!(built.service.port, 443);

    let ep = endpoint(Method::GET, "http://api.test.com", "/", vec![]);
    let built = build_request(&ep, None);
    assert_eq!(built.service.port, 80);
    assert!(!built.service.secure);
    assert!(built.as_text().contains("Host: api.test.com\r\n"));
}

#[test]
fn test_base_url_override() {
    let ep = endpoint(Method::GET, "https://spec.example.com", "/users", vec![]);
    let text = build_request_text(&ep, Some("  http://localhost:3000/  "));
    assert!(text.contains("Host: localhost:3000\r\n"));
    assert!(!text.contains("spec.example.com"));

    let text = build_request_text(&ep, Some(""));
    assert!(text.contains("Host: spec.example.com\r\n"));
}

#[test]
fn test_missing_or_unusable_server_targets_localhost() {
    let ep = endpoint(Method::GET, "", "/users", vec![]);
    let built = build_request(&ep, None);
    assert!(built.as_text().contains("Host: localhost\r\n"));
    assert_eq!(built.service.host, "localhost");
    assert!(built.service.secure);

    let ep = endpoint(Method::GET, "/v1", "/users", vec![]);
    assert!(build_request_text(&ep, None).contains("Host: localhost\r\n"));
}

#[test]
fn test_path_parameters_substituted() {
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/users/{userId}/posts/{postId}",
        vec![ParameterInfo::new("userId", ParameterLocation::Path)],
    );
    let text = build_request_text(&ep, None);
    assert!(text.starts_with("GET /users/1/posts/1 HTTP/1.1\r\n"));
    assert!(!text.contains('{') && !text.contains('}'));
}

#[test]
fn test_query_string_in_declaration_order() {
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/users",
        vec![
            ParameterInfo::with_placeholder("limit", ParameterLocation::Query, "10"),
            ParameterInfo::with_placeholder("offset", ParameterLocation::Query, "0"),
        ],
    );
    assert!(build_request_text(&ep, None).starts_with("GET /users?limit=10&offset=0 HTTP/1.1\r\n"));

    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/search",
        vec![ParameterInfo::new("q", ParameterLocation::Query)],
    );
    assert!(build_request_text(&ep, None).starts_with("GET /search?q= HTTP/1.1\r\n"));
}

#[test]
fn test_header_and_cookie_parameters_do_not_appear() {
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/users",
        vec![
            ParameterInfo::with_placeholder("X-Api-Key", ParameterLocation::Header, "secret"),
            ParameterInfo::with_placeholder("session", ParameterLocation::Cookie, "abc"),
        ],
    );
    let text = build_request_text(&ep, None);
    assert!(!text.contains("X-Api-Key"));
    assert!(!text.contains("session"));
    assert!(!text.contains("Cookie:"));
}

#[test]
fn test_insertion_points_query_and_path() {
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/items/{id}",
        vec![
            ParameterInfo::with_placeholder("id", ParameterLocation::Path, "42"),
            ParameterInfo::with_placeholder("sort", ParameterLocation::Query, "asc"),
        ],
    );
    let template = build_template(&ep, None);
    assert!(String::from_utf8_lossy(&template.raw).starts_with("GET /items/42?sort=asc HTTP/1.1\r\n"));
    assert_eq!(template.insertion_points.len(), 2);
    assert_eq!(template.marked_values(), vec!["42".to_string(), "asc".to_string()]);
    assert_eq!(template.insertion_points[0], 11..13);
    assert_eq!(template.insertion_points[1], 19..22);
}

#[test]
fn test_insertion_point_for_body() {
    let ep = endpoint(Method::PATCH, "https://api.test.com", "/users", vec![]);
    let template = build_template(&ep, None);
    assert_eq!(template.insertion_points.len(), 1);
    let range = template.insertion_points[0].clone();
    assert_eq!(range.end, template.raw.len());
    assert_eq!(&template.raw[range], b"{}");
}

#[test]
fn test_empty_query_value_gives_empty_range() {
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/search",
        vec![ParameterInfo::new("q", ParameterLocation::Query)],
    );
    let template = build_template(&ep, None);
    assert_eq!(template.insertion_points.len(), 1);
    let range = template.insertion_points[0].clone();
    assert!(range.is_empty());
    assert_eq!(&template.raw[range.start - 2..range.start], b"q=");
}

#[test]
fn test_path_placeholder_uses_first_occurrence() {
    // "/v1" comes before the substituted id, so the range lands inside the version segment.
    let ep = endpoint(
        Method::GET,
        "https://api.test.com",
        "/v1/users/{id}",
        vec![ParameterInfo::new("id", ParameterLocation::Path)],
    );
    let template = build_template(&ep, None);
    assert_eq!(template.insertion_points, vec![6..7]);
}

#[test]
fn test_ranges_are_within_request() {
    let result = OpenApiParser::new().parse("petstore", PETSTORE);
    for ep in &result.endpoints {
        let template = build_template(ep, None);
        for range in &template.insertion_points {
            assert!(range.start <= range.end);
            assert!(range.end <= template.raw.len());
        }
    }
}
