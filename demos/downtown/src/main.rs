//! downtown: parking guidance on a synthetic city grid.
//!
//! Builds a street grid (or loads an Overpass JSON map), simplifies it,
//! generates parking spots and runs a mixed fleet of cruisers, local
//! parkers, guided parkers and rogue parkers.  KPIs and world summaries go
//! to CSV files under `output_dir`.
//!
//! ```text
//! cargo run --release -p downtown [config.toml]
//! RUST_LOG=debug cargo run -p downtown      # per-car transitions
//! ```

mod network;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use pgs_core::{SimConfig, Tick};
use pgs_mobility::CarStatus;
use pgs_output::{CsvWriter, OutputWriter, SimOutputObserver};
use pgs_sim::{CarEvent, CarEventKind, FleetConfig, SimBuilder, SimObserver};
use pgs_spatial::StreetNetworkBuilder;
use pgs_world::{World, WorldConfig, WorldStats};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    output_dir: PathBuf,
    sim:        SimConfig,
    world:      WorldConfig,
    fleet:      FleetConfig,
    map:        MapConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/downtown"),
            sim:        SimConfig::default(),
            world:      WorldConfig::default(),
            fleet:      FleetConfig::default(),
            map:        MapConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub rows:            usize,
    pub cols:            usize,
    pub block_m:         f64,
    /// Also the default for map ways without a `maxspeed` tag.
    pub speed_limit_kmh: f64,
    /// Load this Overpass JSON export instead of building the grid.
    pub overpass_json:   Option<PathBuf>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            rows:            12,
            cols:            12,
            block_m:         120.0,
            speed_limit_kmh: 50.0,
            overpass_json:   None,
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEFAULT_CONFIG.to_owned(),
    };
    toml::from_str(&text).context("parsing configuration")
}

fn load_network(map: &MapConfig) -> Result<StreetNetworkBuilder> {
    match &map.overpass_json {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(pgs_spatial::osm::load_overpass_json(&json, map.speed_limit_kmh)?)
        }
        None => Ok(network::build_grid(map)),
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Forwards to the CSV observer and keeps per-behavior tallies for the
/// final report.
struct ProgressObserver<W: OutputWriter> {
    inner:    SimOutputObserver<W>,
    parked:   BTreeMap<&'static str, u64>,
    arrivals: u64,
    started:  Instant,
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_car_event(&mut self, tick: Tick, event: &CarEvent) {
        match event.kind {
            CarEventKind::Parked { .. } => *self.parked.entry(event.behavior).or_default() += 1,
            CarEventKind::DestinationReached { .. } => self.arrivals += 1,
            _ => {}
        }
        self.inner.on_car_event(tick, event);
    }

    fn on_snapshot(&mut self, tick: Tick, stats: &WorldStats) {
        info!(
            "{tick}: {} free of {} spots, {} park events, {} pathing failures ({:.1} s)",
            stats.free_spots,
            stats.total_spots,
            stats.park_events,
            self.inner.pathing_failures(),
            self.started.elapsed().as_secs_f64()
        );
        self.inner.on_snapshot(tick, stats);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    if let Some(threads) = config.sim.num_threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    // 1. Street network.
    let mut builder = load_network(&config.map)?;
    let raw_edges = builder.edge_count();
    let merged = builder.simplify();
    info!("simplified {raw_edges} raw streets: {merged} contractions");
    let world = World::new(builder.build(), config.world.clone())?;

    // 2. Fleet.
    let mut sim = SimBuilder::new(config.sim.clone(), world)
        .fleet(config.fleet.clone())
        .build()?;

    // 3. Output.
    let writer = CsvWriter::new(Path::new(&config.output_dir))?;
    let mut obs = ProgressObserver {
        inner:    SimOutputObserver::new(writer, &config.sim),
        parked:   BTreeMap::new(),
        arrivals: 0,
        started:  Instant::now(),
    };

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Report.
    let stats = sim.world.stats();
    println!();
    println!("Simulated {} in {:.2} s", sim.clock, t0.elapsed().as_secs_f64());
    println!(
        "Spots: {} total, {} initially free, {} free now, {} park events",
        stats.total_spots, stats.initially_free_spots, stats.free_spots, stats.park_events
    );
    println!("Cruiser arrivals: {}", obs.arrivals);
    println!();
    println!("{:<16} {:>8}", "Behavior", "Parked");
    println!("{}", "-".repeat(25));
    for (behavior, n) in &obs.parked {
        println!("{behavior:<16} {n:>8}");
    }
    println!();
    println!("{:<16} {:>8}", "Status", "Cars");
    println!("{}", "-".repeat(25));
    for status in [CarStatus::Driving, CarStatus::Parking, CarStatus::Parked, CarStatus::PathingFailed] {
        println!("{:<16} {:>8}", status.to_string(), sim.count_status(status));
    }
    println!();
    println!("Output written to {}", config.output_dir.display());
    Ok(())
}
