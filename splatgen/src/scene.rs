//! Scene composition
//!
//! A [`SceneComposer`] runs an ordered list of generator layers, each on its
//! own random stream derived from one base seed, and concatenates their
//! output. Because streams are per layer, adding, removing or reordering a
//! layer never changes what the other layers produce.
//!
//! With the `parallel` feature, layers are generated concurrently on rayon.
//! Output order and content are identical either way.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::gaussian::{Gaussian, Scene};
use crate::generators::{BlobClusters, CurveTube, SplatGenerator, WarpedDisk, stream};

/// Default seed offset of the curve tube layer
pub const CURVE_TUBE_SEED_OFFSET: u64 = 10;
/// Default seed offset of the warped disk layer
pub const WARPED_DISK_SEED_OFFSET: u64 = 20;
/// Default seed offset of the blob cluster layer
pub const BLOB_CLUSTERS_SEED_OFFSET: u64 = 30;

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 1337;

/// Any full-splat generator the composer can run
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    CurveTube(CurveTube),
    WarpedDisk(WarpedDisk),
    BlobClusters(BlobClusters),
}

impl From<CurveTube> for Generator {
    fn from(g: CurveTube) -> Self {
        Self::CurveTube(g)
    }
}

impl From<WarpedDisk> for Generator {
    fn from(g: WarpedDisk) -> Self {
        Self::WarpedDisk(g)
    }
}

impl From<BlobClusters> for Generator {
    fn from(g: BlobClusters) -> Self {
        Self::BlobClusters(g)
    }
}

impl SplatGenerator for Generator {
    fn name(&self) -> &'static str {
        match self {
            Self::CurveTube(g) => g.name(),
            Self::WarpedDisk(g) => g.name(),
            Self::BlobClusters(g) => g.name(),
        }
    }

    fn count(&self) -> usize {
        match self {
            Self::CurveTube(g) => g.count(),
            Self::WarpedDisk(g) => g.count(),
            Self::BlobClusters(g) => g.count(),
        }
    }

    fn validate(&self) -> Result<(), GenError> {
        match self {
            Self::CurveTube(g) => g.validate(),
            Self::WarpedDisk(g) => g.validate(),
            Self::BlobClusters(g) => g.validate(),
        }
    }

    fn generate<R: Rng>(&self, rng: &mut R, out: &mut Vec<Gaussian>) {
        match self {
            Self::CurveTube(g) => g.generate(rng, out),
            Self::WarpedDisk(g) => g.generate(rng, out),
            Self::BlobClusters(g) => g.generate(rng, out),
        }
    }
}

/// One generator and the offset added to the base seed for its stream
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub seed_offset: u64,
    pub generator: Generator,
}

impl Layer {
    fn run(&self, base_seed: u64) -> Vec<Gaussian> {
        let mut rng = stream(base_seed, self.seed_offset);
        let mut out = Vec::with_capacity(self.generator.count());
        self.generator.generate(&mut rng, &mut out);
        tracing::debug!(
            "{} (seed {} + {}): {} splats",
            self.generator.name(),
            base_seed,
            self.seed_offset,
            out.len()
        );
        out
    }
}

/// Ordered set of generator layers sharing one base seed
#[derive(Debug, Clone, PartialEq)]
pub struct SceneComposer {
    seed: u64,
    layers: Vec<Layer>,
}

impl SceneComposer {
    /// Empty composer; add layers with [`push`](Self::push)
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            layers: Vec::new(),
        }
    }

    /// Curve tube, warped disk and blob clusters with default parameters
    pub fn with_defaults(seed: u64) -> Self {
        SceneConfig {
            seed,
            ..Default::default()
        }
        .composer()
    }

    /// Append a layer; layers run and concatenate in insertion order
    pub fn push(mut self, seed_offset: u64, generator: impl Into<Generator>) -> Self {
        self.layers.push(Layer {
            seed_offset,
            generator: generator.into(),
        });
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Total number of splats [`compose`](Self::compose) will produce
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects such
    /// scenes.
    pub fn total_count(&self) -> usize {
        self.layers
            .iter()
            .fold(0usize, |total, l| total.saturating_add(l.generator.count()))
    }

    /// Check every layer's parameters and the combined splat count
    pub fn validate(&self) -> Result<(), GenError> {
        self.layers
            .iter()
            .try_for_each(|layer| layer.generator.validate())?;
        self.layers
            .iter()
            .try_fold(0usize, |total, l| total.checked_add(l.generator.count()))
            .map(|_| ())
            .ok_or_else(|| GenError::param("scene", "layers", "combined splat count overflows"))
    }

    /// Validate all layers, then generate and concatenate them
    ///
    /// Nothing is generated if any layer is invalid.
    pub fn compose(&self) -> Result<Scene, GenError> {
        self.validate()?;

        #[cfg(feature = "parallel")]
        let parts: Vec<Vec<Gaussian>> = {
            use rayon::prelude::*;
            self.layers
                .par_iter()
                .map(|layer| layer.run(self.seed))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let parts: Vec<Vec<Gaussian>> = self
            .layers
            .iter()
            .map(|layer| layer.run(self.seed))
            .collect();

        let mut gaussians = Vec::with_capacity(self.total_count());
        for part in parts {
            gaussians.extend(part);
        }

        tracing::debug!(
            "composed {} splats from {} layers",
            gaussians.len(),
            self.layers.len()
        );
        Ok(Scene::new(gaussians))
    }
}

/// Manifest-friendly description of one layer
///
/// Generator parameters are flattened into the same table as `enabled` and
/// `seed_offset`, and every field may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig<G> {
    pub enabled: bool,
    /// Overrides the layer's standard seed offset
    pub seed_offset: Option<u64>,
    #[serde(flatten)]
    pub params: G,
}

impl<G: Default> Default for LayerConfig<G> {
    fn default() -> Self {
        Self {
            enabled: true,
            seed_offset: None,
            params: G::default(),
        }
    }
}

/// The standard three-layer fixture scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub curve_tube: LayerConfig<CurveTube>,
    pub warped_disk: LayerConfig<WarpedDisk>,
    pub blob_clusters: LayerConfig<BlobClusters>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            curve_tube: LayerConfig::default(),
            warped_disk: LayerConfig::default(),
            blob_clusters: LayerConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Composer running the enabled layers in fixed order: tube, disk, clusters
    pub fn composer(&self) -> SceneComposer {
        let mut composer = SceneComposer::new(self.seed);
        if self.curve_tube.enabled {
            composer = composer.push(
                self.curve_tube
                    .seed_offset
                    .unwrap_or(CURVE_TUBE_SEED_OFFSET),
                self.curve_tube.params.clone(),
            );
        }
        if self.warped_disk.enabled {
            composer = composer.push(
                self.warped_disk
                    .seed_offset
                    .unwrap_or(WARPED_DISK_SEED_OFFSET),
                self.warped_disk.params.clone(),
            );
        }
        if self.blob_clusters.enabled {
            composer = composer.push(
                self.blob_clusters
                    .seed_offset
                    .unwrap_or(BLOB_CLUSTERS_SEED_OFFSET),
                self.blob_clusters.params.clone(),
            );
        }
        composer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::assert_valid_splats;

    fn small_config(seed: u64) -> SceneConfig {
        let mut config = SceneConfig {
            seed,
            ..Default::default()
        };
        config.curve_tube.params.count = 700;
        config.warped_disk.params.count = 900;
        config.blob_clusters.params.per_cluster = 120;
        config
    }

    #[test]
    fn test_default_scene_counts() {
        let scene = SceneComposer::with_defaults(DEFAULT_SEED).compose().unwrap();
        assert_eq!(scene.len(), 7000 + 9000 + 7200);
        assert_valid_splats(&scene.gaussians);
    }

    #[test]
    fn test_concatenation_order_matches_layers() {
        let seed = 77;
        let config = small_config(seed);
        let scene = config.composer().compose().unwrap();
        assert_eq!(scene.len(), 700 + 900 + 720);

        let tube = config
            .curve_tube
            .params
            .build(&mut stream(seed, CURVE_TUBE_SEED_OFFSET))
            .unwrap();
        let disk = config
            .warped_disk
            .params
            .build(&mut stream(seed, WARPED_DISK_SEED_OFFSET))
            .unwrap();
        let blobs = config
            .blob_clusters
            .params
            .build(&mut stream(seed, BLOB_CLUSTERS_SEED_OFFSET))
            .unwrap();

        assert_eq!(&scene.gaussians[..700], &tube[..]);
        assert_eq!(&scene.gaussians[700..1600], &disk[..]);
        assert_eq!(&scene.gaussians[1600..], &blobs[..]);
    }

    #[test]
    fn test_disabling_a_layer_leaves_others_untouched() {
        let full = small_config(5).composer().compose().unwrap();

        let mut config = small_config(5);
        config.curve_tube.enabled = false;
        let partial = config.composer().compose().unwrap();

        assert_eq!(partial.len(), 900 + 720);
        assert_eq!(&partial.gaussians[..], &full.gaussians[700..]);
    }

    #[test]
    fn test_reordering_layers_keeps_each_layer_output() {
        let disk = WarpedDisk::with_count(100);
        let blobs = BlobClusters::new(2, 50);

        let a = SceneComposer::new(9)
            .push(20, disk.clone())
            .push(30, blobs.clone())
            .compose()
            .unwrap();
        let b = SceneComposer::new(9)
            .push(30, blobs)
            .push(20, disk)
            .compose()
            .unwrap();

        assert_eq!(&a.gaussians[..100], &b.gaussians[100..]);
        assert_eq!(&a.gaussians[100..], &b.gaussians[..100]);
    }

    #[test]
    fn test_identical_seed_is_bit_identical() {
        let a = small_config(2024).composer().compose().unwrap();
        let b = small_config(2024).composer().compose().unwrap();
        let bits = |s: &Scene| -> Vec<u32> {
            s.iter()
                .flat_map(|g| {
                    g.mean
                        .into_iter()
                        .chain(g.scale)
                        .chain(g.rotation)
                        .chain([g.opacity])
                        .chain(g.color)
                })
                .map(f32::to_bits)
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_invalid_layer_fails_before_generation() {
        let composer = SceneComposer::new(1)
            .push(10, CurveTube::with_count(10))
            .push(20, WarpedDisk::with_count(0));
        assert_eq!(
            composer.compose(),
            Err(GenError::InvalidCount {
                generator: "warped_disk",
                count: 0
            })
        );
    }

    #[test]
    fn test_seed_offset_override() {
        let mut config = small_config(3);
        config.warped_disk.seed_offset = Some(99);
        let composer = config.composer();
        assert_eq!(composer.layers()[0].seed_offset, CURVE_TUBE_SEED_OFFSET);
        assert_eq!(composer.layers()[1].seed_offset, 99);
        assert_eq!(composer.layers()[2].seed_offset, BLOB_CLUSTERS_SEED_OFFSET);
        assert_eq!(composer.total_count(), 700 + 900 + 720);
    }

    #[test]
    fn test_overflowing_counts_are_rejected() {
        let composer = SceneComposer::new(1).push(30, BlobClusters::new(1 << 33, 1 << 33));
        assert!(composer.validate().is_err());
        assert_eq!(composer.total_count(), usize::MAX);
        assert!(composer.compose().is_err());

        let half = usize::MAX / 2 + 1;
        let composer = SceneComposer::new(1)
            .push(20, WarpedDisk::with_count(half))
            .push(21, WarpedDisk::with_count(half));
        assert_eq!(composer.total_count(), usize::MAX);
        assert!(matches!(
            composer.validate(),
            Err(GenError::InvalidParameter { name: "layers", .. })
        ));
    }
}
