use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::manifest::load_manifest;
use crate::route::HandlerRef;
use crate::router::{parse_method, CompiledRoute, MatchResult, RequestInfo, RouteTable};
use crate::runtime_config::RouterConfig;

/// Command-line interface for routekit
#[derive(Debug, Parser)]
#[command(name = "routekit")]
#[command(about = "Inspect and exercise route manifests", long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the routes of a manifest
    Routes {
        /// Path to the route manifest (YAML, JSON or TOML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Order by path instead of registration order
        #[arg(long, default_value_t = false)]
        sorted: bool,
    },
    /// Resolve a request against a manifest
    Match {
        #[arg(short, long)]
        manifest: PathBuf,

        /// HTTP method, e.g. GET
        method: String,

        /// Request path, e.g. /pets/42
        path: String,

        /// Content-Type of the request; enables content negotiation
        #[arg(long)]
        content_type: Option<String>,

        /// Accept header of the request; enables content negotiation
        #[arg(long)]
        accept: Option<String>,
    },
    /// Build the URI of a handler
    Reverse {
        #[arg(short, long)]
        manifest: PathBuf,

        controller: String,

        action: String,

        /// Parameters as name=value; unused ones become the query string
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `name=value` argument. The value may itself contain `=`.
///
/// # Errors
///
/// A message when there is no `=` or the name is empty.
pub fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{arg}'")),
    }
}

/// Parse the process arguments and run the selected command against stdout.
///
/// # Errors
///
/// Manifest, registration and argument errors.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let matched = run(&cli, &mut stdout.lock())?;
    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run `cli`, writing its output to `out`.
///
/// Returns `false` when a `match` command found no route.
///
/// # Errors
///
/// Manifest, registration and argument errors.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Routes { manifest, sorted } => {
            let table = load_table(manifest)?;
            let routes = if *sorted {
                table.sorted_routes()
            } else {
                table.all_routes()
            };
            if cli.json {
                let list: Vec<Value> = routes.iter().map(|r| route_json(r)).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
            } else {
                for route in &routes {
                    writeln!(out, "{route}")?;
                }
            }
            Ok(true)
        }
        Commands::Match {
            manifest,
            method,
            path,
            content_type,
            accept,
        } => {
            let table = load_table(manifest)?;
            let method = parse_method(method)?;
            let result = if content_type.is_some() || accept.is_some() {
                let mut request = RequestInfo::new(&method, path);
                request.content_type = content_type.as_deref();
                request.accept = accept.as_deref();
                table.match_request(&request)?
            } else {
                table.match_route(&method, path)?
            };
            print_match(cli.json, &result, out)?;
            Ok(result.is_match())
        }
        Commands::Reverse {
            manifest,
            controller,
            action,
            params,
        } => {
            let table = load_table(manifest)?;
            let handler = HandlerRef::new(controller, action);
            let uri = table.reverse_route_for(&handler, params.iter().map(|(k, v)| (k, v)))?;
            if cli.json {
                let doc = json!({ "handler": handler.to_string(), "uri": uri });
                writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            } else {
                writeln!(out, "{uri}")?;
            }
            Ok(true)
        }
    }
}

fn load_table(manifest: &Path) -> anyhow::Result<RouteTable> {
    let templates = load_manifest(manifest)?;
    let table = RouteTable::with_config(RouterConfig::from_env());
    table
        .register_all(templates)
        .with_context(|| format!("failed to register routes of {}", manifest.display()))?;
    Ok(table)
}

fn route_json(route: &CompiledRoute) -> Value {
    let template = route.template();
    json!({
        "id": route.id().to_string(),
        "method": route.method().as_str(),
        "uri": route.uri(),
        "handler": route.handler().to_string(),
        "accepts": template.accepts().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "produces": template.produces().iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn print_match(json: bool, result: &MatchResult, out: &mut impl Write) -> anyhow::Result<()> {
    let status = result.status();
    if json {
        let mut doc = json!({ "status": status.as_u16() });
        match result {
            MatchResult::Matched(m) => {
                doc["route"] = route_json(&m.route);
                doc["params"] = m
                    .path_params
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                    .collect::<serde_json::Map<_, _>>()
                    .into();
            }
            MatchResult::MethodNotAllowed { allowed } => {
                doc["allowed"] = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().into();
            }
            _ => {}
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        return Ok(());
    }

    match result {
        MatchResult::Matched(m) => {
            writeln!(out, "{}", m.route)?;
            for (name, value) in &m.path_params {
                writeln!(out, "  {name} = {value}")?;
            }
        }
        MatchResult::MethodNotAllowed { allowed } => {
            let allowed: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
            writeln!(out, "{status} (allowed: {})", allowed.join(", "))?;
        }
        _ => writeln!(out, "{status}")?,
    }
    Ok(())
}
