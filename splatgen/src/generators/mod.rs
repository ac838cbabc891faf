//! Point distribution generators
//!
//! Each generator is a plain parameter struct with sensible defaults (every
//! field can be overridden independently, including from a manifest) and a
//! pure `generate` that appends splats to an accumulator. Randomness comes
//! exclusively from the RNG passed in, so two calls with equally seeded
//! streams produce bit-identical output.
//!
//! Full splats:
//! - [`CurveTube`] - streaks following a torus knot
//! - [`WarpedDisk`] - flattened spiral disk with a bright core
//! - [`BlobClusters`] - puffy glow clusters
//!
//! Position + color fixtures:
//! - [`GalaxyCloud`] - core, spiral arms and haze
//! - [`DebugGrid`] - regular n x n x n grid with an index gradient

mod clusters;
mod disk;
mod galaxy;
mod grid;
mod tube;

pub use clusters::BlobClusters;
pub use disk::WarpedDisk;
pub use galaxy::GalaxyCloud;
pub use grid::DebugGrid;
pub use tube::CurveTube;

use rand::{Rng, SeedableRng};

use crate::error::GenError;
use crate::gaussian::Gaussian;

/// Deterministic RNG used by every generator
pub type SplatRng = rand_pcg::Pcg64;

/// Independent random stream for one generator
///
/// The stream is seeded with `base_seed + offset` (wrapping), so each
/// generator's output depends only on its own offset and never on which
/// other generators ran before it.
pub fn stream(base_seed: u64, offset: u64) -> SplatRng {
    SplatRng::seed_from_u64(base_seed.wrapping_add(offset))
}

/// A generator of full anisotropic splats
pub trait SplatGenerator {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Number of splats one `generate` call appends
    fn count(&self) -> usize;

    /// Check parameters before any work is done
    fn validate(&self) -> Result<(), GenError>;

    /// Append exactly [`count`](Self::count) splats to `out`
    ///
    /// Parameters are assumed valid; call [`validate`](Self::validate) first.
    fn generate<R: Rng>(&self, rng: &mut R, out: &mut Vec<Gaussian>);

    /// Validate, then generate into a fresh vector
    fn build<R: Rng>(&self, rng: &mut R) -> Result<Vec<Gaussian>, GenError> {
        self.validate()?;
        let mut out = Vec::with_capacity(self.count());
        self.generate(rng, &mut out);
        tracing::debug!("{}: generated {} splats", self.name(), out.len());
        Ok(out)
    }
}

pub(crate) fn ensure_count(generator: &'static str, count: usize) -> Result<(), GenError> {
    if count == 0 {
        return Err(GenError::InvalidCount { generator, count });
    }
    Ok(())
}

pub(crate) fn ensure_positive(
    generator: &'static str,
    name: &'static str,
    value: f64,
) -> Result<(), GenError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(GenError::param(
            generator,
            name,
            format!("must be positive and finite (got {value})"),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(
    generator: &'static str,
    name: &'static str,
    value: f64,
) -> Result<(), GenError> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(GenError::param(
            generator,
            name,
            format!("must be non-negative and finite (got {value})"),
        ));
    }
    Ok(())
}

/// Uniform draw in `[-0.5, 0.5)`
#[inline]
pub(crate) fn centered<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>() - 0.5
}
