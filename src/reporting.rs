// Catalog reporting for specfuzz
// Exports the endpoint table as CSV, Markdown or JSON.
// Everything in a spec is attacker-controlled text, so CSV cells are escaped
// against spreadsheet formula injection.

use crate::models::Endpoint;
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const COLUMNS: [&str; 7] = ["#", "Scheme", "Method", "Server", "Path", "Parameters", "Description"];

/// Escape CSV field to prevent formula injection attacks
/// Cells starting with =, +, -, @, or tab are prefixed with single quote
pub fn escape_csv_field(field: &str) -> String {
    let needs_escaping = field.starts_with(['=', '+', '-', '@', '\t']);

    if needs_escaping {
        format!("\"'{}\"", field.replace('"', "\"\""))
    } else if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_markdown_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn row(endpoint: &Endpoint) -> [String; 7] {
    [
        endpoint.index().to_string(),
        endpoint.scheme().to_string(),
        endpoint.method().to_string(),
        endpoint.server().to_string(),
        endpoint.path().to_string(),
        endpoint.params_summary(),
        endpoint.description().to_string(),
    ]
}

fn report_path(dir: &Path, extension: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("specfuzz_catalog_{}.{}", timestamp, extension))
}

pub fn export_csv(endpoints: &[Endpoint], dir: &Path) -> Result<PathBuf, std::io::Error> {
    let path = report_path(dir, "csv");
    let mut file = File::create(&path)?;

    writeln!(file, "{}", COLUMNS.join(","))?;
    for endpoint in endpoints {
        let cells: Vec<String> = row(endpoint).iter().map(|c| escape_csv_field(c)).collect();
        writeln!(file, "{}", cells.join(","))?;
    }

    info!("Wrote {} endpoints to {}", endpoints.len(), path.display());
    Ok(path)
}

pub fn export_markdown(endpoints: &[Endpoint], dir: &Path) -> Result<PathBuf, std::io::Error> {
    let path = report_path(dir, "md");
    let mut file = File::create(&path)?;

    writeln!(file, "# specfuzz endpoint catalog\n")?;
    writeln!(file, "| {} |", COLUMNS.join(" | "))?;
    writeln!(file, "|{}", "---|".repeat(COLUMNS.len()))?;
    for endpoint in endpoints {
        let cells: Vec<String> = row(endpoint).iter().map(|c| escape_markdown_cell(c)).collect();
        writeln!(file, "| {} |", cells.join(" | "))?;
    }

    info!("Wrote {} endpoints to {}", endpoints.len(), path.display());
    Ok(path)
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
