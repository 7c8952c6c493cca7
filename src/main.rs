// Main CLI entry point for specfuzz
// Uses clap for argument parsing; logs go to stderr, command output to stdout.

use anyhow::{Context, Result};
use specfuzz::catalog::Catalog;
use specfuzz::config::{build_cli, Action, ExportOptions, Settings};
use specfuzz::error::LoadError;
use specfuzz::insertion::build_template;
use specfuzz::models::{Endpoint, ParseResult};
use specfuzz::reporting::{export_csv, export_markdown, render_json};
use specfuzz::source::SpecLoader;
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read spec content from stdin")?;
    Ok(buf)
}

/// Status line shown after a load, mirroring what a UI would display.
fn load_status(result: &ParseResult, source: &str) -> String {
    if !result.endpoints.is_empty() {
        return format!("Loaded {} endpoints from {}", result.endpoints.len(), source);
    }
    match result.messages.as_slice() {
        [] => "No endpoints parsed. Check spec format.".to_string(),
        [only] => format!("Parse failed: {}", only),
        [first, ..] => format!("Parse failed: {} (see log for more)", first),
    }
}

fn print_table(catalog: &Catalog) {
    println!("{:>4}  {:<6}  {:<7}  {:<32}  {:<40}  {}", "#", "Scheme", "Method", "Server", "Path", "Parameters");
    for e in catalog.rows() {
        println!(
            "{:>4}  {:<6}  {:<7}  {:<32}  {:<40}  {}",
            e.index(),
            e.scheme(),
            e.method(),
            e.server(),
            e.path(),
            e.params_summary()
        );
    }
    println!("{} hits", catalog.hit_count());
}

fn print_requests(endpoints: &[&Endpoint], base_url: Option<&str>, json: bool) -> Result<()> {
    let templates: Vec<_> = endpoints.iter().map(|e| build_template(e, base_url)).collect();
    if json {
        println!("{}", render_json(&templates).context("failed to serialize request templates")?);
        return Ok(());
    }
    for (endpoint, template) in endpoints.iter().zip(&templates) {
        println!("### {} ({}:{})", endpoint.tab_label(70), template.service.host, template.service.port);
        println!("{}", String::from_utf8_lossy(&template.raw));
        let ranges: Vec<String> = template
            .insertion_points
            .iter()
            .map(|r| format!("[{}, {})", r.start, r.end))
            .collect();
        println!("\n-- insertion points: {}\n", ranges.join(" "));
    }
    Ok(())
}

fn export(endpoints: &[Endpoint], options: &ExportOptions) -> Result<()> {
    if options.csv {
        let path = export_csv(endpoints, &options.out_dir).context("CSV export failed")?;
        println!("{}", path.display());
    }
    if options.markdown {
        let path = export_markdown(endpoints, &options.out_dir).context("Markdown export failed")?;
        println!("{}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "specfuzz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_matches(&build_cli().get_matches());
    let pasted = if settings.read_stdin { Some(read_stdin()?) } else { None };

    let loader = SpecLoader::new(settings.timeout).context("failed to build HTTP client")?;
    let loaded = match loader.load(settings.input.as_deref(), pasted.as_deref()).await {
        Ok(loaded) => loaded,
        Err(LoadError::NoInput) => {
            eprintln!("{}", LoadError::NoInput);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    for m in &loaded.result.messages {
        warn!("OpenAPI parse: {}", m);
    }
    info!("{}", load_status(&loaded.result, &loaded.source));
    if !loaded.result.default_server.is_empty() && settings.base_url.is_none() {
        info!("Using server {} from spec", loaded.result.default_server);
    }

    let mut catalog = Catalog::new(loaded.result.endpoints);
    catalog.set_filter(&settings.filter);
    if catalog.filter().is_active() {
        info!("Filter '{}' matched {} of {}", settings.filter, catalog.hit_count(), catalog.total());
    }

    let base_url = settings.base_url.as_deref();
    match &settings.action {
        Action::List => print_table(&catalog),
        Action::Requests { json } => {
            let selected: Vec<&Endpoint> = catalog.rows().collect();
            print_requests(&selected, base_url, *json)?;
        }
        Action::Export(options) => {
            let selected: Vec<Endpoint> = catalog.rows().cloned().collect();
            export(&selected, options)?;
        }
    }

    Ok(())
}
