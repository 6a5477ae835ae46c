//! Declarative route manifests.
//!
//! A manifest lists the routes of one or more controllers in YAML, JSON or TOML:
//!
//! ```yaml
//! controller: Pets          # default for entries without one
//! prefix: /api              # joined in front of every uri
//! routes:
//!   - method: GET
//!     uri: /pets/{id}
//!     action: show
//!     produces: [application/json]
//!   - method: POST
//!     uri: /pets
//!     action: create
//!     accepts: [application/json]
//! ```
//!
//! Loading only produces [`RouteTemplate`]s; registering them is up to the caller.

use anyhow::{anyhow, bail, Context};
use http::Method;
use serde::Deserialize;
use std::path::Path;

use crate::route::{with_prefix, RouteBuilder, RouteTemplate};

/// On-disk format of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
    Toml,
}

impl ManifestFormat {
    /// Pick a format from the file extension; anything unknown is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => ManifestFormat::Json,
            Some("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    controller: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteEntry {
    method: String,
    uri: String,
    action: String,
    #[serde(default)]
    controller: Option<String>,
    #[serde(default)]
    accepts: Vec<String>,
    #[serde(default)]
    produces: Vec<String>,
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// I/O errors, syntax errors, and entries that do not form a valid route
/// template, each with the file name in the context.
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<Vec<RouteTemplate>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route manifest {}", path.display()))?;
    parse_manifest(&content, ManifestFormat::from_path(path))
        .with_context(|| format!("invalid route manifest {}", path.display()))
}

/// Parse manifest text.
///
/// # Errors
///
/// Syntax errors, unknown fields, entries without a controller, invalid methods,
/// and builder errors (bad media types).
pub fn parse_manifest(content: &str, format: ManifestFormat) -> anyhow::Result<Vec<RouteTemplate>> {
    let manifest: Manifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        ManifestFormat::Json => serde_json::from_str(content)?,
        ManifestFormat::Toml => toml::from_str(content)?,
    };

    let prefix = manifest.prefix.as_deref().unwrap_or("");
    manifest
        .routes
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let controller = entry
                .controller
                .as_deref()
                .or(manifest.controller.as_deref())
                .ok_or_else(|| anyhow!("route #{idx} ({}) has no controller", entry.uri))?;
            let method = Method::from_bytes(entry.method.trim().to_ascii_uppercase().as_bytes())
                .with_context(|| format!("route #{idx} has an invalid method '{}'", entry.method))?;
            if entry.uri.trim().is_empty() {
                bail!("route #{idx} has an empty uri");
            }

            let mut builder = RouteBuilder::route(method).on(with_prefix(prefix, &entry.uri));
            for accepted in entry.accepts {
                builder = builder.accepting(accepted);
            }
            for produced in entry.produces {
                builder = builder.producing(produced);
            }
            builder
                .to(controller, &entry.action)
                .with_context(|| format!("route #{idx} is invalid"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("r.json")), ManifestFormat::Json);
        assert_eq!(ManifestFormat::from_path(Path::new("r.TOML")), ManifestFormat::Toml);
        assert_eq!(ManifestFormat::from_path(Path::new("r.yml")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("routes")), ManifestFormat::Yaml);
    }

    #[test]
    fn yaml_with_prefix_and_default_controller() {
        let yaml = r#"
controller: Pets
prefix: /api
routes:
  - method: get
    uri: pets/{id}
    action: show
  - method: POST
    uri: /pets
    action: create
    controller: Admin
    accepts: [application/json]
"#;
        let routes = parse_manifest(yaml, ManifestFormat::Yaml).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].method(), &Method::GET);
        assert_eq!(routes[0].uri(), "/api/pets/{id}");
        assert_eq!(routes[0].handler().to_string(), "Pets#show");
        assert_eq!(routes[1].handler().to_string(), "Admin#create");
        assert_eq!(routes[1].accepts().len(), 1);
    }

    #[test]
    fn toml_manifest() {
        let toml = r#"
controller = "Files"

[[routes]]
method = "GET"
uri = "/files/{path*}"
action = "serve"
produces = ["application/octet-stream"]
"#;
        let routes = parse_manifest(toml, ManifestFormat::Toml).unwrap();
        assert_eq!(routes[0].uri(), "/files/{path*}");
        assert_eq!(routes[0].produces()[0].to_string(), "application/octet-stream");
    }

    #[test]
    fn json_manifest() {
        let json = r#"{"routes":[{"method":"DELETE","uri":"/x","action":"drop","controller":"X"}]}"#;
        let routes = parse_manifest(json, ManifestFormat::Json).unwrap();
        assert_eq!(routes[0].method(), &Method::DELETE);
    }

    #[test]
    fn entry_without_controller_fails() {
        let yaml = "routes:\n  - { method: GET, uri: /x, action: a }\n";
        let err = parse_manifest(yaml, ManifestFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("has no controller"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "routes:\n  - { method: GET, uri: /x, action: a, controller: C, verb: x }\n";
        assert!(parse_manifest(yaml, ManifestFormat::Yaml).is_err());
    }

    #[test]
    fn wildcard_produces_is_rejected() {
        let yaml = "controller: C\nroutes:\n  - { method: GET, uri: /x, action: a, produces: ['text/*'] }\n";
        let err = parse_manifest(yaml, ManifestFormat::Yaml).unwrap_err();
        assert!(format!("{err:#}").contains("wildcard"));
    }
}
