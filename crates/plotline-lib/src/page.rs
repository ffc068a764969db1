//! Page geometry resolution from SVG root attributes
//!
//! Interprets the `viewBox`, `width` and `height` attributes of an SVG root and computes
//! the scale and offset that bring user coordinates to canonical units.

use crate::{DataError, Result};
use geo::Coord;
use svgtypes::{Length, LengthUnit};

/// CSS pixels per inch, the canonical unit's resolution
const PX_PER_INCH: f64 = 96.0;

/// Convert a length with an optional unit suffix to canonical units (CSS pixels)
///
/// Supported units: none, `px`, `in`, `mm`, `cm`, `pt`, `pc`. Relative units (`%`, `em`,
/// `ex`) cannot be resolved without a context and are rejected.
pub fn convert_length(value: &str) -> Result<f64> {
    let length: Length = value
        .trim()
        .parse()
        .map_err(|e| DataError::Parse(format!("invalid length {value:?}: {e}")))?;

    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => PX_PER_INCH,
        LengthUnit::Mm => PX_PER_INCH / 25.4,
        LengthUnit::Cm => PX_PER_INCH / 2.54,
        LengthUnit::Pt => PX_PER_INCH / 72.0,
        LengthUnit::Pc => PX_PER_INCH / 6.0,
        other => {
            return Err(DataError::Parse(format!(
                "unsupported unit {other:?} in length {value:?}"
            )));
        }
    };

    Ok(length.number * factor)
}

/// Scale and offset mapping document user coordinates to canonical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Resolved page width, `None` when the document declares no view box
    pub width: Option<f64>,
    /// Resolved page height, `None` when the document declares no view box
    pub height: Option<f64>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PageGeometry {
    /// Resolve page geometry from the root's raw attribute values
    ///
    /// # Arguments
    /// * `view_box` - `viewBox` attribute: min-x, min-y, width, height
    /// * `width` - `width` attribute, with optional unit
    /// * `height` - `height` attribute, with optional unit
    ///
    /// # Returns
    /// Identity geometry with unresolved size if there is no view box, or an error if the
    /// view box is malformed or a length cannot be converted
    pub fn from_attributes(
        view_box: Option<&str>,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Result<Self> {
        let Some(view_box) = view_box else {
            return Ok(Self::default());
        };

        let [min_x, min_y, vb_width, vb_height] = parse_view_box(view_box)?;
        if vb_width <= 0.0 || vb_height <= 0.0 {
            return Err(DataError::Parse(format!(
                "view box {view_box:?} must have a positive width and height"
            )));
        }

        let width = match width {
            Some(w) => convert_length(w)?,
            None => vb_width,
        };
        let height = match height {
            Some(h) => convert_length(h)?,
            None => vb_height,
        };

        Ok(Self {
            width: Some(width),
            height: Some(height),
            scale_x: width / vb_width,
            scale_y: height / vb_height,
            offset_x: -min_x,
            offset_y: -min_y,
        })
    }

    /// Map a user-space coordinate to canonical units: `(p + offset) * scale`
    #[inline(always)]
    pub fn apply(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x + self.offset_x) * self.scale_x,
            y: (coord.y + self.offset_y) * self.scale_y,
        }
    }
}

/// Parse a view box into exactly four numbers
fn parse_view_box(view_box: &str) -> Result<[f64; 4]> {
    let tokens: Vec<&str> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 4 {
        return Err(DataError::Parse(format!(
            "view box {view_box:?} must have 4 numbers, found {}",
            tokens.len()
        )));
    }

    let mut values = [0.0; 4];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::Parse(format!("non-numeric view box value {token:?}")))?;
    }
    Ok(values)
}
