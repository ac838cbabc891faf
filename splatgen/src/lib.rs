//! Procedural Gaussian splat fixture generation
//!
//! Builds deterministic collections of anisotropic 3D Gaussians for use as
//! renderer test fixtures. Every generator draws from its own seeded
//! [`SplatRng`], so a scene is fully reproducible from a single base seed.
//!
//! # Example
//! ```no_run
//! use splatgen::scene::SceneComposer;
//!
//! // Torus-knot tube, warped spiral disk and glow clusters
//! let scene = SceneComposer::with_defaults(1337).compose()?;
//! assert_eq!(scene.len(), 7000 + 9000 + 6 * 1200);
//!
//! // Position + color only, for the simple point fixture format
//! let points = scene.to_points();
//! assert_eq!(points.len(), scene.len());
//! # Ok::<(), splatgen::GenError>(())
//! ```

pub mod color;
pub mod curve;
pub mod error;
pub mod gaussian;
pub mod generators;
pub mod math;
pub mod scene;

pub use error::GenError;
pub use gaussian::{Bounds, Gaussian, PointGaussian, PointScene, Scene};
pub use generators::{
    BlobClusters, CurveTube, DebugGrid, GalaxyCloud, SplatGenerator, SplatRng, WarpedDisk, stream,
};
pub use scene::{Generator, Layer, LayerConfig, SceneComposer, SceneConfig};
