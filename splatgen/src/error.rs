//! Generation errors
//!
//! Only parameter validation can fail. Numerical degeneracies are absorbed
//! by epsilon guards in [`crate::math`] and never reach the caller.

/// Invalid generator input, reported before any generation work starts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    #[error("{generator}: count must be positive (got {count})")]
    InvalidCount {
        generator: &'static str,
        count: usize,
    },

    #[error("grid needs at least one point per axis (got {0})")]
    InvalidGridSize(usize),

    #[error("{generator}: invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        generator: &'static str,
        name: &'static str,
        reason: String,
    },
}

impl GenError {
    pub(crate) fn param(
        generator: &'static str,
        name: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            generator,
            name,
            reason: reason.into(),
        }
    }
}
