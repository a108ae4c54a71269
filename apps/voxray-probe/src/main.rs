//! Voxray Raycast Probe
//!
//! Builds a small arena (floor, back wall, a pond and a row of mobs), fires
//! a fan of rays from an eye position and logs what each ray hits.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxray-probe -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--max-distance <N>`: Maximum ray length in blocks (default: 32)
//! - `--rays <N>`: Number of rays in the fan (default: 16)
//! - `--selection <POLICY>`: `nearest` or `first_hit` (default: nearest)
//! - `--tolerance <N>`: Entity box margin (default: 0.35)
//! - `--prune <MODE>`: `position` or `volume` (default: position)
//! - `--tie <POLICY>`: `prefer_block` or `prefer_entity` (default: prefer_block)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::{bail, Context};
use glam::DVec3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voxray_core::{BlockId, BlockPos, Ray};
use voxray_entity::{Entity, EntityView};
use voxray_physics::{
    EntityPrune, EntitySelection, RaycastConfig, RaycastOutcome, Raycaster, TiePolicy,
};
use voxray_test::TestScene;

const EYE: DVec3 = DVec3::new(0.5, 1.62, -6.5);

struct ProbeOptions {
    max_distance: f64,
    rays: u32,
    config: RaycastConfig,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_distance: 32.0,
            rays: 16,
            config: RaycastConfig::default(),
        }
    }
}

fn parse_args() -> anyhow::Result<ProbeOptions> {
    let mut options = ProbeOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().with_context(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--max-distance" => {
                options.max_distance = value("--max-distance")?.parse()?;
            }
            "--rays" => options.rays = value("--rays")?.parse()?,
            "--selection" => {
                let selection: EntitySelection = value("--selection")?.parse()?;
                options.config = options.config.with_selection(selection);
            }
            "--prune" => {
                let prune: EntityPrune = value("--prune")?.parse()?;
                options.config = options.config.with_prune(prune);
            }
            "--tie" => {
                let tie: TiePolicy = value("--tie")?.parse()?;
                options.config = options.config.with_tie(tie);
            }
            "--tolerance" => {
                let tolerance: f64 = value("--tolerance")?.parse()?;
                options.config = options.config.with_tolerance(tolerance);
            }
            other => bail!("unknown argument {other:?}, see --help"),
        }
    }
    Ok(options)
}

/// Builds the arena and returns it with the player standing at the eye.
fn build_arena() -> anyhow::Result<(TestScene, Entity)> {
    let mut scene = TestScene::with_radius(2);
    scene.fill(BlockPos::new(-16, -1, -16), BlockPos::new(16, -1, 16), BlockId::GRASS)?;
    scene.fill(BlockPos::new(-16, 0, 16), BlockPos::new(16, 8, 16), BlockId::STONE)?;
    scene.fill(BlockPos::new(-3, -1, 2), BlockPos::new(3, -1, 5), BlockId::WATER)?;
    for x in [-6.0, -2.0, 2.0, 6.0] {
        scene.spawn_mob(DVec3::new(x, 0.0, 8.0));
    }
    let player = scene.spawn_mob(DVec3::new(EYE.x, 0.0, EYE.z));
    Ok((scene, player))
}

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = parse_args()?;
    let raycaster = Raycaster::new(options.config)?;
    let (scene, player) = build_arena()?;
    info!(
        chunks = scene.world.len(),
        rays = options.rays,
        max_distance = options.max_distance,
        "Voxray probe"
    );

    let rays: Vec<(Ray, f64)> = (0..options.rays)
        .map(|i| {
            let spread = if options.rays > 1 {
                f64::from(i) / f64::from(options.rays - 1) - 0.5
            } else {
                0.0
            };
            let direction = DVec3::new(spread, -0.05, 1.0).normalize();
            (Ray::new(EYE, direction), options.max_distance)
        })
        .collect();

    // Rays start inside the player's own box.
    let not_player = |view: &EntityView<Entity>| view.id != player;
    let outcomes = raycaster.raycast_batch(&scene.world, &scene.entities, &rays, not_player);

    let (mut entities, mut blocks, mut misses) = (0, 0, 0);
    for ((ray, _), outcome) in rays.iter().zip(outcomes) {
        match outcome? {
            RaycastOutcome::Entity { entity, point } => {
                entities += 1;
                info!(direction = %ray.direction, ?entity, %point, "hit entity");
            }
            RaycastOutcome::Block { point } => {
                blocks += 1;
                info!(direction = %ray.direction, %point, "hit block");
            }
            RaycastOutcome::Nothing => {
                misses += 1;
                info!(direction = %ray.direction, "hit nothing");
            }
        }
    }

    info!(
        entities,
        blocks,
        misses,
        cached_volumes = raycaster.volumes().len(),
        "Probe finished"
    );
    Ok(())
}

fn print_help() {
    eprintln!(
        "Voxray Raycast Probe

USAGE:
    cargo run -p voxray-probe -- [OPTIONS]

OPTIONS:
    --max-distance <N>      Maximum ray length in blocks (default: 32)
    --rays <N>              Number of rays in the fan (default: 16)
    --selection <POLICY>    Entity selection: nearest | first_hit (default: nearest)
    --tolerance <N>         Margin added to entity boxes (default: 0.35)
    --prune <MODE>          Entity range check: position | volume (default: position)
    --tie <POLICY>          Equal distances: prefer_block | prefer_entity (default: prefer_block)
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
