//! SVG import
//!
//! Walks an SVG document with `quick-xml`'s event reader, converts every drawable element to
//! a `kurbo::BezPath` in document user coordinates (group and element `transform`s
//! applied), then flattens the paths through [`flatten_paths`] with the root's
//! [`PageGeometry`].
//!
//! Multilayer import maps each top-level `<g>` to a layer id:
//! - the digits of its Inkscape `label`, if any
//! - else the digits of its `id`, if any
//! - else its 1-based position among top-level groups
//!
//! Id 0 becomes 1. Top-level drawables outside any group go to layer 1.

use crate::{
    DataError, ImportConfig, LayerId, LineCollection, PageGeometry, RamerDouglasPeucker, Result,
    Simplifier, VectorData, convert_length, flatten_paths,
};

use geo::Rect;
use kurbo::{Affine, BezPath, Circle, Ellipse, Point, Rect as BoxRect, RoundedRect, Shape};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Namespace URI of Inkscape's attributes
const INKSCAPE_NAMESPACE: &str = "http://www.inkscape.org/namespaces/inkscape";

/// Prefix used for Inkscape attributes when the document does not bind one
const DEFAULT_INKSCAPE_PREFIX: &str = "inkscape";

/// Accuracy used when converting circles and ellipses to cubic curves, in user units
const SHAPE_TOLERANCE: f64 = 1e-3;

/// Imported geometry with the document's page size in canonical units
#[derive(Debug, Clone, PartialEq)]
pub struct SvgImport<T> {
    pub data: T,
    pub width: f64,
    pub height: f64,
}

/// Read an SVG file into a single [`LineCollection`]
///
/// Every drawable element of the document is imported, group structure is ignored.
pub fn read_svg(path: impl AsRef<Path>, config: &ImportConfig) -> Result<SvgImport<LineCollection>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    read_svg_str(&content, config)
}

/// Read SVG text into a single [`LineCollection`]
pub fn read_svg_str(svg: &str, config: &ImportConfig) -> Result<SvgImport<LineCollection>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("svg::read_svg");

    let document = Document::parse(svg)?;
    let page = document.page_geometry()?;

    let lc = flatten_paths(
        document.paths.iter().map(|p| p.path.segments()),
        config.quantization,
        &page,
        simplifier(config),
    )?;

    let (width, height) = resolve_size(&page, lc.bounds());
    Ok(SvgImport {
        data: lc,
        width,
        height,
    })
}

/// Read an SVG file into a [`VectorData`], one layer per top-level group
pub fn read_multilayer_svg(
    path: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<SvgImport<VectorData>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    read_multilayer_svg_str(&content, config)
}

/// Read SVG text into a [`VectorData`], one layer per top-level group
pub fn read_multilayer_svg_str(
    svg: &str,
    config: &ImportConfig,
) -> Result<SvgImport<VectorData>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("svg::read_multilayer_svg");

    let document = Document::parse(svg)?;
    let page = document.page_geometry()?;
    let simplifier = simplifier(config);

    let top_level: Vec<&BezPath> = document
        .paths
        .iter()
        .filter(|p| p.group.is_none())
        .map(|p| &p.path)
        .collect();

    let mut group_paths: Vec<Vec<&BezPath>> = vec![Vec::new(); document.groups.len()];
    for p in &document.paths {
        if let Some(group) = p.group {
            group_paths[group].push(&p.path);
        }
    }

    // Groups are independent: flatten them in parallel, then add in document order
    let group_layers = group_paths
        .par_iter()
        .map(|paths| {
            flatten_paths(
                paths.iter().map(|p| p.segments()),
                config.quantization,
                &page,
                simplifier,
            )
        })
        .collect::<Result<Vec<LineCollection>>>()?;

    let mut vector_data = VectorData::new();
    if !top_level.is_empty() {
        let lc = flatten_paths(
            top_level.iter().map(|p| p.segments()),
            config.quantization,
            &page,
            simplifier,
        )?;
        vector_data.add(lc, Some(1))?;
    }

    for (i, (group, lc)) in document.groups.iter().zip(group_layers).enumerate() {
        let layer_id = group_layer_id(group.label.as_deref(), group.id.as_deref(), i + 1);
        vector_data.add(lc, Some(layer_id))?;
    }

    tracing::debug!(
        layers = vector_data.count(),
        groups = document.groups.len(),
        "imported multilayer svg"
    );

    let (width, height) = resolve_size(&page, vector_data.bounds(None));
    Ok(SvgImport {
        data: vector_data,
        width,
        height,
    })
}

fn simplifier(config: &ImportConfig) -> Option<&'static dyn Simplifier> {
    config
        .simplify
        .then_some(&RamerDouglasPeucker as &'static dyn Simplifier)
}

/// Page size from the geometry, or from the content's far corner when unresolved
fn resolve_size(page: &PageGeometry, bounds: Result<Rect<f64>>) -> (f64, f64) {
    if let (Some(width), Some(height)) = (page.width, page.height) {
        return (width, height);
    }

    match bounds {
        Ok(rect) => (rect.max().x, rect.max().y),
        Err(_) => {
            tracing::warn!("document has no view box and no geometry, page size set to 0");
            (0.0, 0.0)
        }
    }
}

/// Layer id of a top-level group
///
/// `ordinal` is the group's 1-based position and is used when neither the label nor the
/// id contain a usable number.
fn group_layer_id(label: Option<&str>, id: Option<&str>, ordinal: usize) -> LayerId {
    let digits = [label, id]
        .into_iter()
        .flatten()
        .map(|s| s.chars().filter(char::is_ascii_digit).collect::<String>())
        .find(|d| !d.is_empty());

    let Some(digits) = digits else {
        return ordinal as LayerId;
    };

    match digits.parse::<LayerId>() {
        Ok(0) => 1,
        Ok(layer_id) => layer_id,
        Err(_) => {
            tracing::warn!(%digits, ordinal, "layer number out of range, using group position");
            ordinal as LayerId
        }
    }
}

/// A drawable element converted to a path, with its owning top-level group
#[derive(Debug)]
struct DocumentPath {
    group: Option<usize>,
    path: BezPath,
}

/// Top-level group attributes relevant to layer assignment
#[derive(Debug, Default)]
struct TopLevelGroup {
    label: Option<String>,
    id: Option<String>,
}

/// Element stack entry while walking the document
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Element whose children are walked, with the accumulated transform
    Container { transform: Affine, opens_group: bool },
    /// Element whose children are not imported
    Skipped,
}

/// Attributes of one element, keys as written (prefix included)
struct ElementAttributes(Vec<(String, String)>);

impl ElementAttributes {
    /// Read and unescape all attributes, resolving `entities` declared by the document
    fn read(element: &BytesStart, entities: &HashMap<String, String>) -> Result<Self> {
        let attributes = element
            .attributes()
            .map(|attr| -> Result<(String, String)> {
                let attr = attr?;
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value_with(|name| entities.get(name).map(String::as_str))?
                    .into_owned();
                Ok((key, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(attributes))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Length attribute in user units, 0 when absent
    fn length(&self, key: &str) -> Result<f64> {
        self.get(key).map_or(Ok(0.0), convert_length)
    }

    fn transform(&self) -> Result<Affine> {
        self.get("transform").map_or(Ok(Affine::IDENTITY), parse_transform)
    }
}

/// Drawable content and root attributes of a document
#[derive(Debug, Default)]
struct Document {
    view_box: Option<String>,
    width: Option<String>,
    height: Option<String>,
    /// Drawable paths in document order
    paths: Vec<DocumentPath>,
    groups: Vec<TopLevelGroup>,
}

impl Document {
    fn parse(svg: &str) -> Result<Self> {
        let mut reader = Reader::from_str(svg);
        reader.trim_text(true);

        let mut document = Document::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut current_group: Option<usize> = None;
        let mut inkscape_prefix = DEFAULT_INKSCAPE_PREFIX.to_string();
        let mut entities: HashMap<String, String> = HashMap::new();
        let mut found_root = false;

        loop {
            let (element, has_children) = match reader.read_event()? {
                Event::Start(e) => (e, true),
                Event::Empty(e) => (e, false),
                Event::End(_) => {
                    if let Some(Frame::Container {
                        opens_group: true, ..
                    }) = stack.pop()
                    {
                        current_group = None;
                    }
                    continue;
                }
                Event::DocType(doctype) => {
                    entities.extend(parse_entity_declarations(&String::from_utf8_lossy(
                        &doctype,
                    )));
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            if !found_root {
                if element.local_name().as_ref() != b"svg" {
                    return Err(DataError::Parse(
                        "root element is not <svg>".to_string(),
                    ));
                }
                found_root = true;
                let attributes = ElementAttributes::read(&element, &entities)?;
                document.view_box = attributes.get("viewBox").map(str::to_string);
                document.width = attributes.get("width").map(str::to_string);
                document.height = attributes.get("height").map(str::to_string);
                if let Some((key, _)) =
                    attributes.0.iter().find(|(_, v)| v == INKSCAPE_NAMESPACE)
                {
                    if let Some(prefix) = key.strip_prefix("xmlns:") {
                        inkscape_prefix = prefix.to_string();
                    }
                }
                if has_children {
                    stack.push(Frame::Container {
                        transform: Affine::IDENTITY,
                        opens_group: false,
                    });
                }
                continue;
            }

            let parent = match stack.last() {
                Some(Frame::Container { transform, .. }) => *transform,
                // Content after the root element, or inside an ignored element
                Some(Frame::Skipped) | None => {
                    if has_children {
                        stack.push(Frame::Skipped);
                    }
                    continue;
                }
            };

            let frame = match element.local_name().as_ref() {
                b"g" | b"a" | b"switch" | b"svg" => {
                    let attributes = ElementAttributes::read(&element, &entities)?;
                    let transform = parent * attributes.transform()?;

                    let opens_group = element.local_name().as_ref() == b"g" && stack.len() == 1;
                    if opens_group {
                        let label_key = format!("{inkscape_prefix}:label");
                        document.groups.push(TopLevelGroup {
                            label: attributes.get(&label_key).map(str::to_string),
                            id: attributes.get("id").map(str::to_string),
                        });
                        current_group = Some(document.groups.len() - 1);
                    }
                    Frame::Container {
                        transform,
                        opens_group,
                    }
                }
                b"path" | b"line" | b"polyline" | b"polygon" | b"rect" | b"circle"
                | b"ellipse" => {
                    let attributes = ElementAttributes::read(&element, &entities)?;
                    if let Some(mut path) = element_path(element.local_name().as_ref(), &attributes)? {
                        path.apply_affine(parent * attributes.transform()?);
                        document.paths.push(DocumentPath {
                            group: current_group,
                            path,
                        });
                    }
                    Frame::Skipped
                }
                b"text" | b"image" | b"use" => {
                    tracing::warn!(
                        element = %String::from_utf8_lossy(element.local_name().as_ref()),
                        "unsupported element ignored"
                    );
                    Frame::Skipped
                }
                // defs, clipPath, mask, symbol, metadata, style, title, desc, ...
                _ => Frame::Skipped,
            };

            if has_children {
                stack.push(frame);
            } else if let Frame::Container {
                opens_group: true, ..
            } = frame
            {
                // Empty group: the layer exists but holds nothing
                current_group = None;
            }
        }

        if !found_root {
            return Err(DataError::Parse("document has no <svg> root".to_string()));
        }

        tracing::debug!(
            paths = document.paths.len(),
            groups = document.groups.len(),
            "parsed svg document"
        );
        Ok(document)
    }

    fn page_geometry(&self) -> Result<PageGeometry> {
        PageGeometry::from_attributes(
            self.view_box.as_deref(),
            self.width.as_deref(),
            self.height.as_deref(),
        )
    }
}

/// General entities declared in a DOCTYPE internal subset
///
/// Only internal entities (`<!ENTITY name "value">`) are collected. Parameter and external
/// entities are skipped.
fn parse_entity_declarations(doctype: &str) -> HashMap<String, String> {
    const DECLARATION: &str = "<!ENTITY";

    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(pos) = rest.find(DECLARATION) {
        rest = rest[pos + DECLARATION.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_end);
        let after = after.trim_start();
        rest = after;

        let Some(quote) = after.chars().next().filter(|&c| c == '"' || c == '\'') else {
            continue;
        };
        let Some(value_len) = after[1..].find(quote) else {
            break;
        };
        entities.insert(name.to_string(), after[1..1 + value_len].to_string());
        rest = &after[value_len + 2..];
    }
    entities
}

fn parse_transform(value: &str) -> Result<Affine> {
    let t: svgtypes::Transform = value
        .parse()
        .map_err(|e| DataError::Parse(format!("invalid transform {value:?}: {e}")))?;
    Ok(Affine::new([t.a, t.b, t.c, t.d, t.e, t.f]))
}

/// Outline of a drawable element in its own user space
///
/// Returns `None` for elements that draw nothing (no points, non-positive radius or size).
fn element_path(name: &[u8], attributes: &ElementAttributes) -> Result<Option<BezPath>> {
    let path = match name {
        b"path" => {
            let Some(d) = attributes.get("d") else {
                return Ok(None);
            };
            let path = BezPath::from_svg(d)
                .map_err(|e| DataError::Parse(format!("invalid path data {d:?}: {e}")))?;
            if path.elements().is_empty() {
                return Ok(None);
            }
            path
        }
        b"line" => {
            let mut path = BezPath::new();
            path.move_to((attributes.length("x1")?, attributes.length("y1")?));
            path.line_to((attributes.length("x2")?, attributes.length("y2")?));
            path
        }
        b"polyline" | b"polygon" => {
            let points = attributes.get("points").unwrap_or_default();
            let mut path = BezPath::new();
            for (i, (x, y)) in svgtypes::PointsParser::from(points).enumerate() {
                if i == 0 {
                    path.move_to((x, y));
                } else {
                    path.line_to((x, y));
                }
            }
            if path.elements().len() < 2 {
                return Ok(None);
            }
            if name == b"polygon" {
                path.close_path();
            }
            path
        }
        b"rect" => {
            let (x, y) = (attributes.length("x")?, attributes.length("y")?);
            let (width, height) = (attributes.length("width")?, attributes.length("height")?);
            if width <= 0.0 || height <= 0.0 {
                return Ok(None);
            }
            // A single corner radius applies to both axes
            let rx = attributes.get("rx").map(convert_length).transpose()?;
            let ry = attributes.get("ry").map(convert_length).transpose()?;
            let radius = match (rx, ry) {
                (Some(rx), Some(ry)) => rx.min(ry),
                (Some(r), None) | (None, Some(r)) => r,
                (None, None) => 0.0,
            }
            .clamp(0.0, width.min(height) / 2.0);
            if radius > 0.0 {
                RoundedRect::new(x, y, x + width, y + height, radius).to_path(SHAPE_TOLERANCE)
            } else {
                BoxRect::new(x, y, x + width, y + height).to_path(SHAPE_TOLERANCE)
            }
        }
        b"circle" => {
            let r = attributes.length("r")?;
            if r <= 0.0 {
                return Ok(None);
            }
            let center = Point::new(attributes.length("cx")?, attributes.length("cy")?);
            Circle::new(center, r).to_path(SHAPE_TOLERANCE)
        }
        b"ellipse" => {
            let (rx, ry) = (attributes.length("rx")?, attributes.length("ry")?);
            if rx <= 0.0 || ry <= 0.0 {
                return Ok(None);
            }
            let center = Point::new(attributes.length("cx")?, attributes.length("cy")?);
            Ellipse::new(center, (rx, ry), 0.0).to_path(SHAPE_TOLERANCE)
        }
        _ => return Ok(None),
    };
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, LineString};

    fn config() -> ImportConfig {
        ImportConfig::default()
    }

    fn assert_coord_near(actual: Coord<f64>, expected: (f64, f64)) {
        assert!(
            (actual.x - expected.0).abs() < 1e-9 && (actual.y - expected.1).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_view_box_scaling() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="50" height="50">
            <line x1="0" y1="0" x2="100" y2="100"/>
        </svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();

        assert_eq!(import.width, 50.0);
        assert_eq!(import.height, 50.0);
        assert_eq!(import.data.len(), 1);
        assert_eq!(
            import.data[0],
            LineString::from(vec![(0.0, 0.0), (50.0, 50.0)])
        );
    }

    #[test]
    fn test_size_from_bounds_without_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10cm">
            <path d="M 10 20 L 30 40"/>
        </svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        assert_eq!(import.width, 30.0);
        assert_eq!(import.height, 40.0);
    }

    #[test]
    fn test_empty_document_has_zero_size() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        assert!(import.data.is_empty());
        assert_eq!((import.width, import.height), (0.0, 0.0));

        let import = read_multilayer_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.count(), 0);
    }

    #[test]
    fn test_multilayer_layer_ids() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"
                xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
            <g inkscape:label="Layer 3"><path d="M 0 0 L 1 0"/></g>
            <g id="g2"><path d="M 0 1 L 1 1"/></g>
        </svg>"#;
        let import = read_multilayer_svg_str(svg, &config()).unwrap();

        assert_eq!(import.data.ids().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(
            import.data.get(3).unwrap()[0],
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])
        );
        assert_eq!(
            import.data.get(2).unwrap()[0],
            LineString::from(vec![(0.0, 1.0), (1.0, 1.0)])
        );
    }

    #[test]
    fn test_multilayer_fallbacks() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <path d="M 0 0 L 1 0"/>
            <g id="layer0"><path d="M 3 3 L 4 4"/></g>
            <g id="outline"><path d="M 5 5 L 6 6"/></g>
            <g id="g7"><path d="M 7 7 L 8 8"/></g>
            <g><path d="M 9 9 L 10 10"/></g>
        </svg>"#;
        let import = read_multilayer_svg_str(svg, &config()).unwrap();

        // Top-level element and "layer0" (0 becomes 1) share layer 1
        assert_eq!(import.data.get(1).unwrap().len(), 2);
        // Groups without digits use their position
        assert_eq!(import.data.get(2).unwrap().len(), 1);
        assert_eq!(import.data.get(4).unwrap().len(), 1);
        assert_eq!(import.data.get(7).unwrap().len(), 1);
        assert_eq!(import.data.ids().collect::<Vec<_>>(), vec![1, 2, 4, 7]);
    }

    #[test]
    fn test_group_layer_id_rules() {
        assert_eq!(group_layer_id(Some("Layer 3"), Some("g7"), 1), 3);
        assert_eq!(group_layer_id(Some("Background"), Some("g7"), 1), 7);
        assert_eq!(group_layer_id(None, Some("g7"), 1), 7);
        assert_eq!(group_layer_id(None, None, 4), 4);
        assert_eq!(group_layer_id(Some("0"), None, 4), 1);
        assert_eq!(group_layer_id(Some("99999999999999999999999"), None, 5), 5);
    }

    #[test]
    fn test_custom_inkscape_prefix() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"
                xmlns:ink="http://www.inkscape.org/namespaces/inkscape">
            <g ink:label="5"><path d="M 0 0 L 1 0"/></g>
        </svg>"#;
        let import = read_multilayer_svg_str(svg, &config()).unwrap();
        assert!(import.data.exists(5));
    }

    #[test]
    fn test_same_layer_id_extends() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <g id="layer1"><path d="M 0 0 L 1 0"/></g>
            <g id="1"><path d="M 2 0 L 3 0"/><path d="M 4 0 L 5 0"/></g>
        </svg>"#;
        let import = read_multilayer_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.count(), 1);
        assert_eq!(import.data.get(1).unwrap().len(), 3);
    }

    #[test]
    fn test_nested_groups_flatten_into_parent_layer() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <g id="layer2" transform="translate(10, 0)">
                <g transform="scale(2)">
                    <line x1="1" y1="1" x2="2" y2="1" transform="translate(0, 5)"/>
                </g>
            </g>
        </svg>"#;
        let import = read_multilayer_svg_str(svg, &config()).unwrap();
        let layer = import.data.get(2).unwrap();
        assert_eq!(layer.len(), 1);
        assert_coord_near(layer[0].0[0], (12.0, 12.0));
        assert_coord_near(layer[0].0[1], (14.0, 12.0));
    }

    #[test]
    fn test_ignored_containers() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <defs><path id="p" d="M 0 0 L 100 100"/></defs>
            <metadata><path d="M 0 0 L 100 100"/></metadata>
            <clipPath id="c"><rect x="0" y="0" width="5" height="5"/></clipPath>
            <path d="M 0 0 L 1 1"><title>kept</title></path>
        </svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.len(), 1);
    }

    #[test]
    fn test_shapes() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <rect x="0" y="0" width="10" height="5"/>
            <polygon points="0,0 10,0 10,10"/>
            <polyline points="0 0 5 5 10 0"/>
            <circle cx="50" cy="50" r="10"/>
            <ellipse cx="0" cy="0" rx="0" ry="3"/>
        </svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        let lc = import.data;
        assert_eq!(lc.len(), 4);

        // Rectangle and polygon come back closed
        assert_eq!(lc[0].0.first(), lc[0].0.last());
        assert!((crate::line::line_length(&lc[0]) - 30.0).abs() < 1e-9);
        assert_eq!(lc[1].0.first(), lc[1].0.last());
        assert_eq!(lc[2].0.len(), 3);

        // The circle is sampled, not kept as curves
        let circle = &lc[3];
        assert!(circle.0.len() > 100);
        for c in &circle.0 {
            let r = (c.x - 50.0).hypot(c.y - 50.0);
            assert!((r - 10.0).abs() < 0.01, "radius {r}");
        }
    }

    #[test]
    fn test_multiple_subpaths() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <path d="M 0 0 L 1 0 L 1 1 M 5 5 L 6 6"/>
        </svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.len(), 2);
        assert_eq!(import.data[0].0.len(), 3);
    }

    #[test]
    fn test_parse_errors() {
        let bad_view_box = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100"/>"#;
        assert!(matches!(
            read_svg_str(bad_view_box, &config()),
            Err(DataError::Parse(_))
        ));

        let bad_path = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 0 0 L foo"/></svg>"#;
        assert!(matches!(
            read_svg_str(bad_path, &config()),
            Err(DataError::Parse(_))
        ));

        let not_svg = r#"<html><body/></html>"#;
        assert!(matches!(
            read_svg_str(not_svg, &config()),
            Err(DataError::Parse(_))
        ));

        let mismatched = r#"<svg xmlns="http://www.w3.org/2000/svg"><g></svg>"#;
        assert!(matches!(
            read_svg_str(mismatched, &config()),
            Err(DataError::Xml(_))
        ));
    }

    #[test]
    fn test_doctype_entities() {
        let svg = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [
	<!ENTITY ns_extend "http://ns.adobe.com/Extensibility/1.0/">
	<!ENTITY ns_svg "http://www.w3.org/2000/svg">
	<!ENTITY ns_xlink "http://www.w3.org/1999/xlink">
	<!ENTITY layer_name 'Layer 4'>
]>
<svg version="1.1" xmlns:x="&ns_extend;" xmlns="&ns_svg;" xmlns:xlink="&ns_xlink;"
        xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
        viewBox="0 0 10 10" width="10" height="10">
    <g inkscape:label="&layer_name;"><path d="M 0 0 L 1 1"/></g>
</svg>"#;
        let import = read_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.len(), 1);
        assert_eq!(import.width, 10.0);

        let import = read_multilayer_svg_str(svg, &config()).unwrap();
        assert_eq!(import.data.ids().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_undeclared_entity_is_an_error() {
        let svg = r#"<svg xmlns="&ns_svg;"><path d="M 0 0 L 1 1"/></svg>"#;
        assert!(matches!(read_svg_str(svg, &config()), Err(DataError::Xml(_))));
    }

    #[test]
    fn test_parse_entity_declarations() {
        let entities = parse_entity_declarations(
            r#"svg [ <!ENTITY % params "ignored"> <!ENTITY a "one"> <!ENTITY ext SYSTEM "x.ent">
               <!ENTITY b 'two "quoted"'> ]"#,
        );
        assert_eq!(entities.len(), 2);
        assert_eq!(entities["a"], "one");
        assert_eq!(entities["b"], r#"two "quoted""#);
        assert!(parse_entity_declarations("svg").is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_svg("/nonexistent/drawing.svg", &config()),
            Err(DataError::Io(_))
        ));
    }

    #[test]
    fn test_simplify_option() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <circle cx="0" cy="0" r="50"/>
        </svg>"#;
        let raw = read_svg_str(svg, &config()).unwrap();
        let simplified = read_svg_str(
            svg,
            &ImportConfig {
                quantization: 0.5,
                simplify: true,
            },
        )
        .unwrap();
        assert!(simplified.data[0].0.len() < raw.data[0].0.len());
    }
}
