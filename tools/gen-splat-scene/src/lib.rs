//! gen-splat-scene library
//!
//! JSON serialization, TOML manifests and scene statistics for the
//! `gen-splat-scene` fixture tool.

pub mod export;
pub mod inspect;
pub mod manifest;

pub use export::{
    GAUSSIAN3D_FORMAT, MAX_PRECISION, WriteOptions, load_scene_json, parse_scene_json,
    points_to_json, scene_to_json, write_points_json, write_scene_json,
};
pub use inspect::SceneStats;
pub use manifest::{SceneManifest, load_manifest};
