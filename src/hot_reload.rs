//! # Hot Reload Module
//!
//! Live reloading of a controller's routes from its manifest file.
//!
//! ## Overview
//!
//! [`watch_manifest`] watches one manifest file and, whenever it is modified or
//! re-created:
//! - reloads and parses it with [`crate::manifest::load_manifest`]
//! - atomically replaces the controller's routes via
//!   [`RouteTable::replace_controller`]
//! - calls the reload hook with the routes now registered
//!
//! Requests being dispatched while this happens keep using the snapshot they
//! loaded, so they see either the old routes or the new ones, never a mix.
//!
//! ## Error Handling
//!
//! If the new manifest fails to parse, or a route fails to compile or conflicts:
//! - the error is logged
//! - the previous routes remain active
//!
//! ## Usage
//!
//! ```rust,no_run
//! use routekit::hot_reload::watch_manifest;
//! use routekit::RouteTable;
//! use std::sync::Arc;
//!
//! let table = Arc::new(RouteTable::new());
//! let watcher = watch_manifest("routes/pets.yaml", Arc::clone(&table), "Pets", |routes| {
//!     println!("Reloaded {} routes", routes.len());
//! })?;
//! // Keep `watcher` alive for as long as reloads should happen.
//! # drop(watcher);
//! # Ok::<(), notify::Error>(())
//! ```

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::manifest::load_manifest;
use crate::router::{CompiledRoute, RouteTable};

/// Reload `controller`'s routes from `manifest_path` now.
///
/// Returns the routes registered for the controller after the reload, or the
/// reason it was rejected (in which case the table is unchanged).
///
/// # Errors
///
/// Manifest load errors and registration errors.
pub fn reload_manifest(
    manifest_path: &Path,
    table: &RouteTable,
    controller: &str,
) -> anyhow::Result<Vec<Arc<CompiledRoute>>> {
    let templates = load_manifest(manifest_path)?;
    if let Some(foreign) = templates
        .iter()
        .find(|t| t.handler().controller() != controller)
    {
        anyhow::bail!(
            "manifest {} declares route {} for another controller than {controller}",
            manifest_path.display(),
            foreign
        );
    }
    Ok(table.replace_controller(controller, templates)?)
}

/// Watch a manifest file and re-register `controller`'s routes when it changes.
///
/// The initial content is **not** loaded; call [`reload_manifest`] first if the
/// routes are not registered yet.
///
/// # Errors
///
/// Errors creating the watcher or watching the path.
pub fn watch_manifest<P, F>(
    manifest_path: P,
    table: Arc<RouteTable>,
    controller: impl Into<String>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&[Arc<CompiledRoute>]) + Send + 'static,
{
    let path: PathBuf = manifest_path.as_ref().to_path_buf();
    let watch_path = path.clone();
    let controller = controller.into();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload_manifest(&watch_path, &table, &controller) {
                    Ok(routes) => {
                        info!(
                            manifest = %watch_path.display(),
                            controller = %controller,
                            routes_count = routes.len(),
                            "hot-reload: applied route updates"
                        );
                        on_reload(&routes);
                    }
                    Err(e) => {
                        error!(
                            manifest = %watch_path.display(),
                            controller = %controller,
                            error = %format!("{e:#}"),
                            "hot-reload: manifest rejected, keeping previous routes"
                        );
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(manifest = %path.display(), "hot-reload: watching route manifest");
    Ok(watcher)
}
