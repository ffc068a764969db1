use clap::Parser;
use plotline_lib::{ImportConfig, MergeConfig, ReloopConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Plotline - Import SVG line art, reduce pen-up travel and report plotting metrics
pub struct Settings {
    /// SVG file to import
    #[clap(value_name = "FILE")]
    pub file: PathBuf,

    /// Maximum segment length used to approximate curves, in CSS pixels
    #[clap(short, long, default_value = "0.1")]
    pub quantization: f64,

    /// Simplify imported lines, using the quantization as tolerance
    #[clap(long)]
    pub simplify: bool,

    /// Import everything into layer 1, ignoring top-level groups
    #[clap(long)]
    pub single_layer: bool,

    /// Merge lines whose endings are close
    #[clap(short, long)]
    pub merge: bool,

    /// Maximum distance between joined line endings
    #[clap(long, default_value = "0.05")]
    pub merge_tolerance: f64,

    /// Never reverse lines while merging
    #[clap(long)]
    pub no_flip: bool,

    /// Move the seam of closed lines
    #[clap(long)]
    pub reloop: bool,

    /// Maximum first-to-last point distance for a line to count as closed
    #[clap(long, default_value = "0.05")]
    pub reloop_tolerance: f64,

    /// Seam index for reloop (random when omitted)
    #[clap(long)]
    pub seam: Option<usize>,

    /// Seed for the reloop random seam
    #[clap(long)]
    pub seed: Option<u64>,
}

impl Settings {
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            quantization: self.quantization,
            simplify: self.simplify,
        }
    }

    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            tolerance: self.merge_tolerance,
            flip: !self.no_flip,
        }
    }

    pub fn reloop_config(&self) -> ReloopConfig {
        ReloopConfig {
            tolerance: self.reloop_tolerance,
            seam: self.seam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library() {
        let settings = Settings::parse_from(["plotline", "drawing.svg"]);
        assert_eq!(settings.file, PathBuf::from("drawing.svg"));
        assert!(!settings.merge);
        assert!(!settings.reloop);

        let import = settings.import_config();
        let default_import = ImportConfig::default();
        assert_eq!(import.quantization, default_import.quantization);
        assert_eq!(import.simplify, default_import.simplify);

        let merge = settings.merge_config();
        assert_eq!(merge.tolerance, MergeConfig::default().tolerance);
        assert!(merge.flip);

        let reloop = settings.reloop_config();
        assert_eq!(reloop.tolerance, ReloopConfig::default().tolerance);
        assert_eq!(reloop.seam, None);
    }

    #[test]
    fn test_flags() {
        let settings = Settings::parse_from([
            "plotline",
            "drawing.svg",
            "-q",
            "0.5",
            "--simplify",
            "--merge",
            "--merge-tolerance",
            "1.5",
            "--no-flip",
            "--reloop",
            "--seam",
            "3",
            "--seed",
            "42",
        ]);

        assert_eq!(settings.import_config().quantization, 0.5);
        assert!(settings.import_config().simplify);
        assert_eq!(settings.merge_config().tolerance, 1.5);
        assert!(!settings.merge_config().flip);
        assert_eq!(settings.reloop_config().seam, Some(3));
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_file_is_required() {
        assert!(Settings::try_parse_from(["plotline"]).is_err());
    }
}
