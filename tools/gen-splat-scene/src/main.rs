//! gen-splat-scene - deterministic Gaussian splat fixture generator
//!
//! Writes JSON scenes for renderer tests: the full `gaussian3d_v1` splat
//! scene, plus the position + color galaxy and debug grid fixtures.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::DVec3;
use splatgen::{DebugGrid, GalaxyCloud, SceneConfig, stream};
use std::path::PathBuf;

use gen_splat_scene::{MAX_PRECISION, SceneStats, WriteOptions, export, manifest};

/// Seed used by the galaxy fixture when none is given
const DEFAULT_GALAXY_SEED: u64 = 42;
/// Grid positions are written with this many decimals unless overridden
const DEFAULT_GRID_PRECISION: u32 = 6;

#[derive(Parser)]
#[command(name = "gen-splat-scene")]
#[command(about = "Deterministic Gaussian splat test scene generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the curve tube / warped disk / blob cluster scene
    Scene {
        /// Scene manifest (TOML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base seed (overrides manifest)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output JSON file (overrides manifest)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Layers to leave out
        #[arg(long, value_enum, value_delimiter = ',')]
        skip: Vec<LayerKind>,

        /// Write position + color only instead of full splats
        #[arg(long)]
        points_only: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Round values to this many decimals
        #[arg(long, value_parser = precision_parser())]
        precision: Option<u32>,
    },

    /// Validate a scene manifest without generating
    Check {
        /// Scene manifest (TOML)
        #[arg(default_value = "scene.toml")]
        config: PathBuf,
    },

    /// Generate the spiral galaxy point cloud
    Galaxy {
        /// Total number of points
        #[arg(short = 'n', long, default_value_t = 60_000)]
        points: usize,

        /// Random seed
        #[arg(short, long, default_value_t = DEFAULT_GALAXY_SEED)]
        seed: u64,

        /// Output JSON file
        #[arg(short, long, default_value = "galaxy_points.json")]
        out: PathBuf,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Round values to this many decimals
        #[arg(long, value_parser = precision_parser())]
        precision: Option<u32>,
    },

    /// Generate the n x n x n debug grid
    Grid {
        /// Points per axis
        #[arg(short, long, default_value_t = 10)]
        n: usize,

        /// Distance between neighbouring points
        #[arg(long, default_value_t = 0.5)]
        spacing: f64,

        /// Grid center
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        center: Option<Vec<f64>>,

        /// Output JSON file
        #[arg(short, long, default_value = "grid_points.json")]
        out: PathBuf,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Round values to this many decimals
        #[arg(long, default_value_t = DEFAULT_GRID_PRECISION, value_parser = precision_parser())]
        precision: u32,
    },

    /// Print statistics for a scene JSON file
    Inspect {
        /// Scene JSON file (either layout)
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayerKind {
    CurveTube,
    WarpedDisk,
    BlobClusters,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scene {
            config,
            seed,
            out,
            skip,
            points_only,
            compact,
            precision,
        } => {
            let mut manifest = match &config {
                Some(path) => {
                    tracing::info!("Loading manifest {:?}", path);
                    manifest::load_manifest(path)?
                }
                None => manifest::SceneManifest::default(),
            };

            if let Some(seed) = seed {
                manifest.scene.seed = seed;
            }
            apply_skips(&mut manifest.scene, &skip);

            let mut options = manifest.output.write_options();
            if compact {
                options.pretty = false;
            }
            if precision.is_some() {
                options.precision = precision;
            }
            let out = out.unwrap_or(manifest.output.path);

            let composer = manifest.scene.composer();
            tracing::info!(
                "Generating {} gaussians from {} layers (seed {})",
                composer.total_count(),
                composer.layers().len(),
                composer.seed()
            );
            let scene = composer.compose().context("Scene generation failed")?;
            log_bounds(scene.bounds());

            if points_only {
                export::write_points_json(&out, &scene.to_points(), options)?;
            } else {
                export::write_scene_json(&out, &scene, options)?;
            }
        }

        Commands::Check { config } => {
            tracing::info!("Checking manifest {:?}", config);
            let manifest = manifest::load_manifest(&config)?;
            let composer = manifest.scene.composer();
            composer.validate()?;
            tracing::info!(
                "Manifest is valid: {} layers, {} gaussians",
                composer.layers().len(),
                composer.total_count()
            );
        }

        Commands::Galaxy {
            points,
            seed,
            out,
            compact,
            precision,
        } => {
            let galaxy = GalaxyCloud::with_points(points);
            tracing::info!("Generating galaxy with {} points (seed {})", points, seed);
            let cloud = galaxy
                .build(&mut stream(seed, 0))
                .context("Galaxy generation failed")?;
            log_bounds(cloud.bounds());
            export::write_points_json(
                &out,
                &cloud,
                WriteOptions {
                    pretty: !compact,
                    precision,
                },
            )?;
        }

        Commands::Grid {
            n,
            spacing,
            center,
            out,
            compact,
            precision,
        } => {
            let center = center.map(|c| DVec3::from_slice(&c)).unwrap_or(DVec3::ZERO);
            let grid = DebugGrid { n, spacing, center };
            tracing::info!("Generating {}^3 grid (spacing {})", n, spacing);
            let points = grid.build().context("Grid generation failed")?;
            log_bounds(points.bounds());
            export::write_points_json(
                &out,
                &points,
                WriteOptions {
                    pretty: !compact,
                    precision: Some(precision),
                },
            )?;
        }

        Commands::Inspect { input } => {
            tracing::info!("Inspecting {:?}", input);
            let scene = export::load_scene_json(&input)?;
            let stats = SceneStats::collect(&scene);
            stats.log();
            if !stats.is_clean() {
                tracing::warn!("Scene violates renderer input invariants");
            }
        }
    }

    Ok(())
}

fn precision_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(MAX_PRECISION))
}

fn apply_skips(scene: &mut SceneConfig, skip: &[LayerKind]) {
    for layer in skip {
        match layer {
            LayerKind::CurveTube => scene.curve_tube.enabled = false,
            LayerKind::WarpedDisk => scene.warped_disk.enabled = false,
            LayerKind::BlobClusters => scene.blob_clusters.enabled = false,
        }
    }
}

fn log_bounds(bounds: Option<splatgen::Bounds>) {
    if let Some(bounds) = bounds {
        tracing::info!("Bounds: min {:?} max {:?}", bounds.min, bounds.max);
    }
}
