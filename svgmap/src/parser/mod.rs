//! Extraction des géométries d'un document SVG
//!
//! Les éléments sont recherchés globalement sous l'élément `<svg>`, quelle
//! que soit leur profondeur d'imbrication (les `<g>` et leurs transformations
//! sont ignorés).

pub mod attr;
pub mod points;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, trace};

use crate::types::{
    ParsedDocument, PathRecord, ShapeGeometry, ShapeRecord, TextRecord, ViewBox, DEFAULT_FONT_SIZE,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use crate::SvgMapError;

/// Ordre de collecte des formes primitives
const SHAPE_KINDS: [&str; 4] = ["rect", "polygon", "circle", "ellipse"];

/// Parse un document SVG en mémoire
///
/// # Errors
///
/// Retourne `SvgMapError::InvalidDocument` si le XML est mal formé ou si
/// aucun élément `<svg>` n'est présent.
pub fn parse(markup: &str) -> Result<ParsedDocument, SvgMapError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(markup, options)
        .map_err(|e| SvgMapError::invalid_document(format!("Malformed markup: {}", e)))?;

    let svg = doc
        .descendants()
        .find(|n| is_element(*n, "svg"))
        .ok_or_else(|| SvgMapError::invalid_document("No <svg> element found"))?;

    let width = attr::number_or(svg, "width", DEFAULT_WIDTH);
    let height = attr::number_or(svg, "height", DEFAULT_HEIGHT);

    let view_box = match svg.attribute("viewBox") {
        Some(raw) => attr::parse_view_box(raw).unwrap_or_else(|| {
            debug!(view_box = raw, "Malformed viewBox, deriving from width/height");
            ViewBox::from_size(width, height)
        }),
        None => ViewBox::from_size(width, height),
    };

    let paths = collect_paths(svg);
    let shapes = SHAPE_KINDS
        .iter()
        .flat_map(|kind| collect_shapes(svg, kind))
        .collect::<Vec<_>>();
    let labels = collect_texts(svg);

    debug!(
        width,
        height,
        paths = paths.len(),
        shapes = shapes.len(),
        labels = labels.len(),
        "Parsed SVG document"
    );

    Ok(ParsedDocument {
        width,
        height,
        view_box,
        paths,
        shapes,
        labels,
    })
}

/// Vérifie le nom local d'un élément (namespace ignoré)
#[inline]
fn is_element(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Itère sur les descendants `<name>` de la racine, dans l'ordre du document
fn elements<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    root.descendants()
        .skip(1)
        .filter(move |n| is_element(*n, name))
}

/// Collecte les `<path>` ayant des données `d`
///
/// L'index positionnel compte aussi les paths ignorés.
fn collect_paths(svg: Node<'_, '_>) -> Vec<PathRecord> {
    elements(svg, "path")
        .enumerate()
        .filter_map(|(index, node)| {
            let Some(commands) = attr::non_empty(node, "d") else {
                trace!(index, "Skipping <path> without path data");
                return None;
            };

            Some(PathRecord {
                id: attr::resolve_id(node, "path", index),
                commands: commands.to_string(),
                style: attr::style(node),
            })
        })
        .collect()
}

/// Collecte les formes d'un type donné
fn collect_shapes(svg: Node<'_, '_>, kind: &str) -> Vec<ShapeRecord> {
    elements(svg, kind)
        .enumerate()
        .filter_map(|(index, node)| {
            let geometry = shape_geometry(node, kind)?;
            Some(ShapeRecord {
                id: attr::resolve_id(node, kind, index),
                geometry,
                style: attr::style(node),
            })
        })
        .collect()
}

/// Lit la géométrie propre au type de forme (attributs manquants = 0)
fn shape_geometry(node: Node<'_, '_>, kind: &str) -> Option<ShapeGeometry> {
    let num = |name: &str| attr::number_or(node, name, 0.0);

    let geometry = match kind {
        "rect" => ShapeGeometry::Rect {
            x: num("x"),
            y: num("y"),
            width: num("width"),
            height: num("height"),
        },
        "polygon" => {
            let raw = node.attribute("points").unwrap_or("");
            ShapeGeometry::Polygon {
                points: points::parse_points(raw),
                raw: raw.to_string(),
            }
        }
        "circle" => ShapeGeometry::Circle {
            cx: num("cx"),
            cy: num("cy"),
            r: num("r"),
        },
        "ellipse" => ShapeGeometry::Ellipse {
            cx: num("cx"),
            cy: num("cy"),
            rx: num("rx"),
            ry: num("ry"),
        },
        _ => return None,
    };

    Some(geometry)
}

/// Collecte les `<text>`
fn collect_texts(svg: Node<'_, '_>) -> Vec<TextRecord> {
    elements(svg, "text")
        .enumerate()
        .map(|(index, node)| TextRecord {
            id: attr::resolve_id(node, "text", index),
            x: attr::number_or(node, "x", 0.0),
            y: attr::number_or(node, "y", 0.0),
            content: text_content(node),
            font_size: attr::number_or(node, "font-size", DEFAULT_FONT_SIZE),
            fill: attr::non_empty(node, "fill").map(str::to_string),
        })
        .collect()
}

/// Concatène les noeuds texte descendants (équivalent `textContent`)
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
