// Runtime configuration for specfuzz
// Built with clap; every option that makes sense in CI also reads an environment variable.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which catalog reports `export` writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub csv: bool,
    pub markdown: bool,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Requests { json: bool },
    Export(ExportOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: Option<String>,
    pub read_stdin: bool,
    pub base_url: Option<String>,
    pub filter: String,
    pub timeout: Duration,
    pub action: Action,
}

pub fn build_cli() -> Command {
    Command::new("specfuzz")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Jake Abendroth")
        .about("Turns OpenAPI/Swagger specs into HTTP request templates with insertion points")
        .after_help("EXAMPLES:\n  specfuzz -i https://api.example.com/openapi.json list\n  specfuzz -i petstore.yaml -f '^POST' requests --json\n  cat pasted.txt | specfuzz --stdin -b https://staging.example.com export --csv")
        .subcommand_required(true)
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .num_args(1)
            .global(true)
            .help("URL or file path of the OpenAPI/Swagger spec"))
        .arg(Arg::new("stdin")
            .long("stdin")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Read pasted spec content from stdin (used when --input is absent or fails)"))
        .arg(Arg::new("base_url")
            .short('b')
            .long("base-url")
            .num_args(1)
            .env("SPECFUZZ_BASE_URL")
            .global(true)
            .help("Override the server URL declared in the spec"))
        .arg(Arg::new("filter")
            .short('f')
            .long("filter")
            .num_args(1)
            .env("SPECFUZZ_FILTER")
            .global(true)
            .help("Regex matched against 'METHOD path server'"))
        .arg(Arg::new("timeout")
            .long("timeout")
            .num_args(1)
            .env("SPECFUZZ_TIMEOUT")
            .value_parser(value_parser!(u64))
            .default_value("30")
            .global(true)
            .help("HTTP timeout in seconds when loading a spec from a URL"))
        .subcommand(Command::new("list").about("Print the filtered endpoint catalog"))
        .subcommand(Command::new("requests")
            .about("Print synthesized requests and their insertion points")
            .arg(Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit request templates as JSON")))
        .subcommand(Command::new("export")
            .about("Write the filtered catalog as CSV and/or Markdown")
            .arg(Arg::new("csv")
                .long("csv")
                .action(ArgAction::SetTrue)
                .help("Write a CSV report"))
            .arg(Arg::new("markdown")
                .long("markdown")
                .action(ArgAction::SetTrue)
                .help("Write a Markdown report"))
            .arg(Arg::new("out")
                .long("out")
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Directory for report files")))
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let action = match matches.subcommand() {
            Some(("requests", sub)) => Action::Requests {
                json: sub.get_flag("json"),
            },
            Some(("export", sub)) => {
                let csv = sub.get_flag("csv");
                let markdown = sub.get_flag("markdown");
                // Neither flag means both reports.
                let both = !csv && !markdown;
                Action::Export(ExportOptions {
                    csv: csv || both,
                    markdown: markdown || both,
                    out_dir: sub
                        .get_one::<PathBuf>("out")
                        .cloned()
                        .unwrap_or_else(|| PathBuf::from(".")),
                })
            }
            _ => Action::List,
        };

        Self {
            input: matches.get_one::<String>("input").cloned(),
            read_stdin: matches.get_flag("stdin"),
            base_url: matches
                .get_one::<String>("base_url")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            filter: matches.get_one::<String>("filter").cloned().unwrap_or_default(),
            timeout: Duration::from_secs(
                matches
                    .get_one::<u64>("timeout")
                    .copied()
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            action,
        }
    }
}
