//! Configuration for import, merge and reloop stages

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for SVG import
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImportConfig {
    /// Maximum chord length used to approximate curves, in canonical units (CSS pixels).
    /// Also used as the simplification tolerance.
    /// Default: 0.1
    pub quantization: f64,
    /// Run line simplification on the imported geometry.
    /// Default: false
    pub simplify: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            quantization: 0.1,
            simplify: false,
        }
    }
}

/// Configuration for line merging
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeConfig {
    /// Maximum distance between two line endings for them to be joined
    pub tolerance: f64,
    /// Allow reversing lines to find more joins
    pub flip: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            flip: true,
        }
    }
}

/// Configuration for reseaming closed lines
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReloopConfig {
    /// Lines whose first and last points are within this distance are considered closed
    pub tolerance: f64,
    /// Explicit seam index; drawn from the caller's RNG when `None`
    pub seam: Option<usize>,
}

impl Default for ReloopConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            seam: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let import = ImportConfig::default();
        assert_eq!(import.quantization, 0.1);
        assert!(!import.simplify);

        let merge = MergeConfig::default();
        assert_eq!(merge.tolerance, 0.05);
        assert!(merge.flip);

        let reloop = ReloopConfig::default();
        assert!(reloop.seam.is_none());
    }
}
