use specfuzz::insertion::build_template;
use specfuzz::models::SpecParser;
use specfuzz::reporting::{export_csv, export_markdown, render_json};
use specfuzz::OpenApiParser;
use std::fs;

const PETSTORE: &str = include_str!("fixtures/openapi-petstore.json");

#[test]
fn reporting_exports_create_files() {
    let endpoints = OpenApiParser::new().parse("petstore", PETSTORE).endpoints;
    let dir = tempfile::tempdir().expect("tempdir");

    let csv_path = export_csv(&endpoints, dir.path()).expect("CSV export should succeed");
    let md_path = export_markdown(&endpoints, dir.path()).expect("Markdown export should succeed");

    assert!(csv_path.exists(), "CSV file should exist: {}", csv_path.display());
    assert!(md_path.exists(), "Markdown file should exist: {}", md_path.display());

    let csv_name = csv_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let md_name = md_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(csv_name.starts_with("specfuzz_catalog_"));
    assert!(csv_name.ends_with(".csv"));
    assert!(md_name.starts_with("specfuzz_catalog_"));
    assert!(md_name.ends_with(".md"));
}

#[test]
fn csv_has_one_row_per_endpoint() {
    let endpoints = OpenApiParser::new().parse("petstore", PETSTORE).endpoints;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = export_csv(&endpoints, dir.path()).expect("CSV export should succeed");
    let content = fs::read_to_string(path).expect("read CSV");

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "1,https,GET,https://petstore.example.com/v1,/pets,QUERY:limit,List all pets"
    );
    assert!(lines[3].starts_with("3,https,GET,https://petstore.example.com/v1,/pets/{id},PATH:id,"));
}

#[test]
fn markdown_table_shape() {
    let endpoints = OpenApiParser::new().parse("petstore", PETSTORE).endpoints;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = export_markdown(&endpoints, dir.path()).expect("Markdown export should succeed");
    let content = fs::read_to_string(path).expect("read Markdown");

    assert!(content.starts_with("# specfuzz endpoint catalog\n"));
    assert!(content.contains("| # | Scheme | Method | Server | Path | Parameters | Description |"));
    assert!(content.contains("| 2 | https | POST | https://petstore.example.com/v1 | /pets |  | Create a pet |"));
}

#[test]
fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(export_csv(&[], &missing).is_err());
}

#[test]
fn request_templates_render_as_json() {
    let endpoints = OpenApiParser::new().parse("petstore", PETSTORE).endpoints;
    let templates: Vec<_> = endpoints.iter().map(|e| build_template(e, None)).collect();
    let json = render_json(&templates).expect("serialize templates");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value.as_array().map(Vec::len), Some(3));
    assert_eq!(value[0]["service"]["host"], "petstore.example.com");
    assert_eq!(value[0]["service"]["port"], 443);
    assert_eq!(value[1]["insertion_points"][0]["end"], value[1]["raw"].as_array().map(Vec::len).unwrap_or_default());
}
