extern crate log;
pub mod app;
pub mod engine;
pub mod error;
pub mod geofile;
pub mod store;
use crate::app::hit_test::HitIndex;
use crate::app::renderer::{MapRenderer, MapSurface};
use crate::app::script::read_script;
use crate::app::session::{Session, ViewSettings};
use crate::engine::filter::FilterState;
use crate::geofile::feature::{AttributeKeys, TimeOfDay};
use crate::geofile::geojson::{read_boundary, BoundaryLayer};
use crate::geofile::source::FeatureSource;
use crate::store::feature_store::FeatureStore;
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Replay map interactions against a traffic congestion layer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,

    /// Path to an event script, overrides `events_path` from the config.
    #[arg(short, long)]
    events_filepath: Option<PathBuf>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
struct ViewConfig {
    center_lon: f64,
    center_lat: f64,
    zoom: f64,
}

impl Default for ViewConfig {
    // Pekanbaru.
    fn default() -> Self {
        Self {
            center_lon: 101.4498,
            center_lat: 0.5071,
            zoom: 12.0,
        }
    }
}

fn default_click_tolerance() -> f64 {
    0.0005
}

#[derive(Deserialize, Debug)]
struct Config {
    traffic_source: FeatureSource,
    boundary_source: Option<FeatureSource>,
    #[serde(default)]
    attribute_keys: AttributeKeys,
    #[serde(default)]
    view: ViewConfig,
    /// Degrees.
    #[serde(default = "default_click_tolerance")]
    click_tolerance: f64,
    #[serde(default)]
    initial_filter: Vec<TimeOfDay>,
    events_path: Option<PathBuf>,
}

fn load_traffic_store(config: &Config) -> FeatureStore {
    match FeatureStore::load(&config.traffic_source, &config.attribute_keys) {
        Ok(store) => {
            if store.is_empty() {
                log::warn!("Traffic source {} has no point features", config.traffic_source);
            }
            store
        }
        Err(err) => {
            log::error!("{}, continuing without traffic features", err);
            FeatureStore::empty()
        }
    }
}

fn load_boundary(config: &Config) -> BoundaryLayer {
    match &config.boundary_source {
        Some(source) => read_boundary(source).unwrap_or_else(|err| {
            log::warn!("{}, continuing without boundary", err);
            BoundaryLayer::default()
        }),
        None => BoundaryLayer::default(),
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    let store = load_traffic_store(&config);
    let boundary = load_boundary(&config);
    let mut session = Session::new(store, boundary);
    let mut surface = MapSurface::default();

    let view = ViewSettings {
        center: geo::Point::new(config.view.center_lon, config.view.center_lat),
        zoom: config.view.zoom,
    };
    let initial_filter = FilterState::from_times(config.initial_filter.iter().copied());
    surface.apply_all(&session.start(view, initial_filter));

    let steps = match args.events_filepath.or(config.events_path) {
        Some(filepath) => read_script(&filepath)?,
        None => Vec::new(),
    };
    for step in &steps {
        let hit_index = HitIndex::build(
            session.store().get_all(),
            &surface,
            config.click_tolerance,
        );
        let event = step.resolve(&hit_index);
        let commands = session.dispatch(&event);
        surface.apply_all(&commands);
    }

    log::info!(
        "{} of {} traffic features listed, {} drawn",
        surface.list().len(),
        session.store().len(),
        surface.drawn_features().len()
    );
    for entry in surface.list() {
        let time = entry
            .time_of_day
            .map(|time| time.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        log::info!("[{}] {} - {} ({})", entry.id, entry.name, entry.address, time);
    }
    if let Some(extent) = surface.extent() {
        log::info!("View fit to {:?} - {:?}", extent.min(), extent.max());
    }
    log::info!("Selection: {:?}", session.state().selection.selection());
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
