//! JSON scene files
//!
//! Two layouts:
//!
//! Full splats (`gaussian3d_v1`):
//! ```json
//! { "format": "gaussian3d_v1",
//!   "gaussians": [ { "mean": [x,y,z], "scale": [sx,sy,sz],
//!                    "rotation": [x,y,z,w], "opacity": a, "color": [r,g,b] } ] }
//! ```
//!
//! Points (position + color only):
//! ```json
//! { "gaussians": [ { "position": [x,y,z], "color": [r,g,b] } ] }
//! ```
//!
//! The loader accepts both: `position` stands in for a missing `mean`, and missing
//! shape fields fall back to unit scale, identity rotation and full opacity.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use splatgen::{Gaussian, PointGaussian, PointScene, Scene};
use std::fs;
use std::path::Path;

/// Format tag written into full splat files
pub const GAUSSIAN3D_FORMAT: &str = "gaussian3d_v1";

/// Most decimal places rounding accepts; f32 carries fewer than this
pub const MAX_PRECISION: u32 = 15;

/// How numbers and whitespace are written
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Indented output (otherwise compact, no spaces)
    pub pretty: bool,
    /// Round every value to this many decimal places
    pub precision: Option<u32>,
}

impl WriteOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(digits) = self.precision {
            if digits > MAX_PRECISION {
                bail!(
                    "Precision must be at most {} decimals (got {})",
                    MAX_PRECISION,
                    digits
                );
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GaussianFile<'a> {
    format: &'a str,
    gaussians: &'a [Gaussian],
}

#[derive(Serialize)]
struct PointFile<'a> {
    gaussians: &'a [PointGaussian],
}

/// Encode full splats as a `gaussian3d_v1` document
pub fn scene_to_json(scene: &Scene, options: WriteOptions) -> Result<String> {
    options.validate()?;
    let rounded;
    let gaussians = match options.precision {
        Some(digits) => {
            rounded = scene
                .iter()
                .map(|g| round_gaussian(g, digits))
                .collect::<Vec<_>>();
            &rounded[..]
        }
        None => &scene.gaussians[..],
    };
    encode(
        &GaussianFile {
            format: GAUSSIAN3D_FORMAT,
            gaussians,
        },
        options.pretty,
    )
}

/// Encode position + color points
pub fn points_to_json(points: &PointScene, options: WriteOptions) -> Result<String> {
    options.validate()?;
    let rounded;
    let gaussians = match options.precision {
        Some(digits) => {
            rounded = points
                .gaussians
                .iter()
                .map(|p| PointGaussian {
                    position: round3(p.position, digits),
                    color: round3(p.color, digits),
                })
                .collect::<Vec<_>>();
            &rounded[..]
        }
        None => &points.gaussians[..],
    };
    encode(&PointFile { gaussians }, options.pretty)
}

/// Write a full splat scene, creating parent directories as needed
pub fn write_scene_json(path: &Path, scene: &Scene, options: WriteOptions) -> Result<()> {
    let json = scene_to_json(scene, options)?;
    write_file(path, &json)?;
    tracing::info!("Wrote {} gaussians to {}", scene.len(), path.display());
    Ok(())
}

/// Write a point scene, creating parent directories as needed
pub fn write_points_json(path: &Path, points: &PointScene, options: WriteOptions) -> Result<()> {
    let json = points_to_json(points, options)?;
    write_file(path, &json)?;
    tracing::info!("Wrote {} points to {}", points.len(), path.display());
    Ok(())
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    json.push('\n');
    Ok(json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write output: {:?}", path))
}

fn round(value: f32, digits: u32) -> f32 {
    let factor = 10f64.powi(digits as i32);
    ((value as f64 * factor).round() / factor) as f32
}

fn round3(v: [f32; 3], digits: u32) -> [f32; 3] {
    v.map(|c| round(c, digits))
}

fn round_gaussian(g: &Gaussian, digits: u32) -> Gaussian {
    Gaussian {
        mean: round3(g.mean, digits),
        scale: round3(g.scale, digits),
        rotation: g.rotation.map(|c| round(c, digits)),
        opacity: round(g.opacity, digits),
        color: round3(g.color, digits),
    }
}

/// One entry as found on disk; everything but `color` is optional
#[derive(Deserialize)]
struct RawGaussian {
    #[serde(default)]
    mean: Option<[f32; 3]>,
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    opacity: Option<f32>,
    color: Option<[f32; 3]>,
}

#[derive(Deserialize)]
struct RawFile {
    #[serde(default)]
    format: Option<String>,
    gaussians: Option<Vec<RawGaussian>>,
}

/// Parse a scene document in either layout
pub fn parse_scene_json(json: &str) -> Result<Scene> {
    let file: RawFile = serde_json::from_str(json).context("Invalid scene JSON")?;

    if let Some(format) = &file.format {
        if format != GAUSSIAN3D_FORMAT {
            tracing::warn!("Unknown scene format '{}', reading anyway", format);
        }
    }

    let Some(raw) = file.gaussians else {
        bail!("Scene JSON is missing the 'gaussians' array");
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, g)| -> Result<Gaussian> {
            let Some(color) = g.color else {
                bail!("Gaussian {} is missing its 'color' field", i);
            };
            Ok(Gaussian {
                mean: g.mean.or(g.position).unwrap_or([0.0; 3]),
                scale: g.scale.unwrap_or([1.0; 3]),
                rotation: g.rotation.unwrap_or([0.0, 0.0, 0.0, 1.0]),
                opacity: g.opacity.unwrap_or(1.0),
                color,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Scene::new)
}

/// Load a scene file in either layout
pub fn load_scene_json(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene: {:?}", path))?;
    parse_scene_json(&json).with_context(|| format!("Failed to parse scene: {:?}", path))
}
