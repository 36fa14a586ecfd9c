//! Engine binary for GridRev.
//!
//! This is the main entry point that wires together the work queue, the
//! dispatch loop, the in-memory revision model, the shared scene, and the
//! broadcast view surface. It loads configuration, registers the managed
//! regions, and runs the dispatch loop until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `gridrev-config.yaml`
//! 3. Build the live scene and the region registry from config
//! 4. Build the revision model, view surface, and estate service
//! 5. Spawn the controller's dispatch loop
//! 6. Wait for Ctrl-C, then shut the loop down

mod broadcast;
mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use gridrev_core::{Controller, RegionRegistry, StaticEstateService};
use gridrev_store::MemoryRevisionModel;
use gridrev_types::{RegionId, RegionInfo};
use gridrev_world::{Scene, SharedScene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::broadcast::ChatBroadcaster;
use crate::config::GridConfig;
use crate::error::EngineError;

const BROADCAST_CAPACITY: usize = 256;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration loading or region registration fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gridrev-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        channel = config.control.channel,
        managers = config.control.managers.len(),
        regions = config.regions.len(),
        "Configuration loaded"
    );

    // 3. Build the live scene and the region registry.
    let (registry, scene) = build_regions(&config)?;
    let shared = SharedScene::new(scene);

    // 4. Build the controller's collaborators.
    let model = MemoryRevisionModel::new(shared.clone());
    let view = ChatBroadcaster::new(BROADCAST_CAPACITY);
    let estate = StaticEstateService::new(config.control.managers.iter().copied());

    // A subscriber must exist before the loop starts or early updates are
    // dropped on the floor.
    let mut updates = view.subscribe();
    tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            info!(?update, "View update");
        }
    });

    // 5. Spawn the dispatch loop.
    let controller = Controller::new(
        model,
        view,
        shared,
        estate,
        Arc::clone(&registry),
        config.control.channel,
    );
    let handle = gridrev_core::spawn(controller);
    info!(channel = config.control.channel, "Controller running");

    // 6. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    handle.shutdown().await;

    info!("gridrev-engine shutdown complete");
    Ok(())
}

/// Register every configured region and mirror it into a fresh scene.
fn build_regions(config: &GridConfig) -> Result<(Arc<RegionRegistry>, Scene), EngineError> {
    let registry = Arc::new(RegionRegistry::new());
    let mut scene = Scene::new();
    for entry in &config.regions {
        let id = RegionId::new();
        registry.register(RegionInfo {
            id,
            name: entry.name.clone(),
            grid_x: entry.grid_x,
            grid_y: entry.grid_y,
        })?;
        scene.add_region(id);
        info!(region = %id, name = entry.name, "Region registered");
    }
    Ok((registry, scene))
}

/// Load the engine configuration from `gridrev-config.yaml`, or from the
/// path given as the first command-line argument.
///
/// A missing default file yields the built-in defaults; an explicit path
/// that cannot be read is an error.
fn load_config() -> Result<GridConfig, EngineError> {
    if let Some(arg) = std::env::args().nth(1) {
        return Ok(GridConfig::load(Path::new(&arg))?);
    }
    let default_path = Path::new("gridrev-config.yaml");
    if default_path.exists() {
        Ok(GridConfig::load(default_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(GridConfig::default())
    }
}
