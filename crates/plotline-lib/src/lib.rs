//! Plotline Library - Layered Line Art Model for Pen Plotters
//!
//! This library holds plottable line art in memory as ordered polylines grouped into
//! numbered layers. It imports that art from SVG documents, applies geometric transforms,
//! and reduces pen-up travel by merging lines whose endpoints are close, using a dynamic
//! quadtree over line endpoints instead of pairwise comparison.
//!
//! # Architecture
//!
//! - **[`PageGeometry`]**: Scale and offset derived from an SVG root's `viewBox`/`width`/`height`
//! - **[`flatten_paths`]**: Curves and lines to polylines, with optional simplification
//! - **[`read_multilayer_svg`]**: SVG import with top-level groups mapped to layer ids
//! - **[`LineCollection`]**: Ordered polylines with transforms, metrics, merge and reloop
//! - **[`LineIndex`]**: Endpoint index supporting removal and nearest-within queries
//! - **[`VectorData`]**: Layer id to [`LineCollection`] map passed through the pipeline
//!
//! # Performance Characteristics
//!
//! - **Merge**: O(N log N) expected for N lines (one index query per extension)
//! - **Import**: top-level groups are flattened in parallel

mod collection;
pub mod config;
pub mod flatten;
mod index;
pub mod line;
mod page;
pub mod svg;
mod vector_data;

// Public API exports
pub use collection::{LineCollection, PenUpStats};
pub use config::{ImportConfig, MergeConfig, ReloopConfig};
pub use flatten::{CurveSegment, RamerDouglasPeucker, Simplifier, flatten_paths};
pub use index::{LineHandle, LineIndex};
pub use page::{PageGeometry, convert_length};
pub use svg::{
    SvgImport, read_multilayer_svg, read_multilayer_svg_str, read_svg, read_svg_str,
};
pub use vector_data::{LayerId, VectorData};

/// Error types for the data model
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid layer id {0}: layer ids must be positive")]
    InvalidLayerId(i64),

    #[error("Layer {0} not found")]
    LayerNotFound(i64),

    #[error("No geometry")]
    NoGeometry,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
