//! tile_router — end-to-end demo of the tilegraph map engine.
//!
//! Writes a synthetic street grid as tile files, loads the tiles back
//! through a [`TileLoader`], and routes across the grid with both routers
//! and two cost policies.  Both ends sit on primary roads, so a
//! `--max-layer 3` load still finds a route.
//!
//! ```text
//! cargo run -p tile_router -- --max-layer 3
//! RUST_LOG=tg_osm=debug cargo run -p tile_router -- --config map.toml
//! ```

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tg_core::NodeKey;
use tg_osm::{MapConfig, OpenStreetMap, OsmLink, OsmNode, TileLoader, TravelTimeCost};
use tg_routing::{AstarRouter, CostPolicy, DistanceCost, RecursiveRouter, RouteResult, Router};

use network::{COLS, ROWS, build_network, position};

#[derive(Parser, Debug)]
#[command(name = "tile_router", about = "Write, load and route over synthetic map tiles")]
struct Args {
    /// TOML map configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile directory; overrides the configuration.  A temporary directory
    /// is used if neither names one.
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// Load only layers up to this key.
    #[arg(long)]
    max_layer: Option<i16>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    // ── Configuration ─────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => MapConfig::load(path).with_context(|| format!("reading {}", path.display()))?,
        None => MapConfig::default(),
    };
    let scratch_dir = tempfile::tempdir()?;
    if let Some(dir) = &args.tiles {
        config.tiles_path = dir.clone();
    } else if args.config.is_none() {
        config.tiles_path = scratch_dir.path().to_path_buf();
    }
    if args.max_layer.is_some() {
        config.max_layer = args.max_layer;
    }
    std::fs::create_dir_all(&config.tiles_path)?;

    // ── Write tiles ───────────────────────────────────────────────────────
    let source = build_network()?;
    let written = source.save_tiles(&config.tiles_path)?;
    info!(
        tiles = written.len(),
        nodes = source.node_count(),
        links = source.link_count(),
        dir = %config.tiles_path.display(),
        "tiles written"
    );

    // ── Load ──────────────────────────────────────────────────────────────
    let mut loader = TileLoader::new(config);
    let mut map = OpenStreetMap::new();
    let t0 = Instant::now();
    let loaded = loader.load_region(&mut map, source.bounding_box())?;
    println!(
        "Loaded {loaded} tiles in {:.1} ms: {} nodes, {} links, {} places, {} areas",
        t0.elapsed().as_secs_f64() * 1e3,
        map.node_count(),
        map.link_count(),
        map.place_count(),
        map.area_count(),
    );
    map.verify()?;

    let from = loader
        .nearest_node(&mut map, position(0, 0))?
        .context("no node near the south-west corner")?;
    let to = loader
        .nearest_node(&mut map, position(ROWS - 2, COLS - 2))?
        .context("no node near the north-east crossing")?;

    // ── Route ─────────────────────────────────────────────────────────────
    report("A*, distance", &map, &AstarRouter, from, to, &DistanceCost);
    report("branch-and-bound, distance", &map, &RecursiveRouter, from, to, &DistanceCost);
    report("A*, travel time", &map, &AstarRouter, from, to, &TravelTimeCost);
    report("branch-and-bound, travel time", &map, &RecursiveRouter, from, to, &TravelTimeCost);

    Ok(())
}

fn report<R, C>(label: &str, map: &OpenStreetMap, router: &R, from: NodeKey, to: NodeKey, cost: &C)
where
    R: Router<OsmNode, OsmLink, C>,
    C: CostPolicy<OsmNode, OsmLink>,
{
    let t0 = Instant::now();
    let route: Option<RouteResult> = map.route(router, from, to, cost);
    let ms = t0.elapsed().as_secs_f64() * 1e3;
    match route {
        Some(route) => println!(
            "{label:<32} {:>3} links  cost {:>10.1}  ({ms:.2} ms)",
            route.links.len(),
            route.cost,
        ),
        None => println!("{label:<32} no route from {from} to {to}  ({ms:.2} ms)"),
    }
}
