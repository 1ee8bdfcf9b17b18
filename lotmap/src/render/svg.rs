//! Écriture SVG d'une carte colorée
//!
//! Chaque géométrie porte `data-id` et `data-interactive` pour que le
//! client puisse brancher les clics sans recalculer les décisions.

use std::fmt::{self, Write};

use svgmap::{MapConfig, PathRecord, ShapeGeometry, ShapeRecord, TextRecord};
use tracing::debug;

use super::{RenderContext, RenderDecision, Target};
use crate::config::RenderSettings;
use crate::estate::EstateCatalog;
use crate::sales::SalesState;

const GRID_AXIS_STROKE: &str = "#64748b";
const GRID_STROKE: &str = "#cbd5e1";
const LABEL_FILL: &str = "#1f2937";
const TEXT_DEFAULT_FILL: &str = "#000000";

/// Décalage vertical de la mention "PURCHASED" sous le numéro
const PURCHASED_TAG_OFFSET: f64 = 20.0;
const PURCHASED_TAG_FONT_SIZE: f64 = 10.0;

/// Rend une carte en SVG
pub fn render_svg(
    config: &MapConfig,
    catalog: &EstateCatalog,
    sales: &SalesState,
    options: &RenderSettings,
) -> String {
    let mut out = String::new();
    // L'écriture dans une String n'échoue pas
    let _ = write_svg(&mut out, config, catalog, sales, options);
    out
}

/// Écrit une carte en SVG dans `out`
pub fn write_svg<W: Write>(
    out: &mut W,
    config: &MapConfig,
    catalog: &EstateCatalog,
    sales: &SalesState,
    options: &RenderSettings,
) -> fmt::Result {
    let (width, height) = (config.width(), config.height());
    let ctx = RenderContext {
        catalog,
        sales,
        width,
        height,
    };

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    )?;

    if options.show_grid {
        write_grid(out, width, height, options.grid_interval)?;
    }

    match config {
        MapConfig::Single(ward) => {
            write_path(out, &ward.boundary, &ctx.decide(Target::Path(&ward.boundary)), options)?;

            writeln!(out, r#"<g class="roads">"#)?;
            for overlay in &ward.overlays {
                write_path(out, overlay, &ctx.decide(Target::Path(overlay)), options)?;
            }
            writeln!(out, "</g>")?;

            writeln!(out, r#"<g class="buildings">"#)?;
            for shape in &ward.buildings {
                write_shape(out, shape, &ctx.decide(Target::Shape(shape)), options)?;
            }
            writeln!(out, "</g>")?;
        }
        MapConfig::Multi(city) => {
            writeln!(out, r#"<g class="wards">"#)?;
            for region in &city.regions {
                write_path(out, &region.path, &ctx.decide(Target::Region(region)), options)?;
            }
            writeln!(out, "</g>")?;
        }
    }

    write_labels(out, config.labels())?;
    writeln!(out, "</svg>")
}

/// Nombre maximal de lignes de grille par axe
const MAX_GRID_LINES: usize = 1000;

/// Grille de coordonnées (axes plus marqués)
fn write_grid<W: Write>(out: &mut W, width: f64, height: f64, interval: f64) -> fmt::Result {
    writeln!(out, r#"<g class="grid" opacity="0.3">"#)?;

    if let Some(count) = grid_line_count(width, interval) {
        for i in 0..count {
            let x = i as f64 * interval;
            let (stroke, stroke_width) = grid_stroke(x);
            writeln!(
                out,
                r#"<line x1="{x}" y1="0" x2="{x}" y2="{height}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#
            )?;
        }
    }

    if let Some(count) = grid_line_count(height, interval) {
        for i in 0..count {
            let y = i as f64 * interval;
            let (stroke, stroke_width) = grid_stroke(y);
            writeln!(
                out,
                r#"<line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#
            )?;
        }
    }

    writeln!(out, "</g>")
}

/// Lignes à tracer sur un axe (0, interval, ... <= extent), `None` au-delà de la limite
fn grid_line_count(extent: f64, interval: f64) -> Option<usize> {
    if interval.is_nan() || interval <= 0.0 || extent.is_nan() || extent < 0.0 {
        return None;
    }
    let steps = (extent / interval).floor();
    if !steps.is_finite() || steps >= MAX_GRID_LINES as f64 {
        debug!(extent, interval, "Grid too dense, axis skipped");
        return None;
    }
    Some(steps as usize + 1)
}

fn grid_stroke(position: f64) -> (&'static str, f64) {
    if position == 0.0 {
        (GRID_AXIS_STROKE, 1.0)
    } else {
        (GRID_STROKE, 0.5)
    }
}

fn write_path<W: Write>(
    out: &mut W,
    path: &PathRecord,
    decision: &RenderDecision,
    options: &RenderSettings,
) -> fmt::Result {
    let element = format!(r#"<path d="{}""#, escape_xml(&path.commands));
    write_element(out, &element, &path.id, decision, options.label_font_size)
}

fn write_shape<W: Write>(
    out: &mut W,
    shape: &ShapeRecord,
    decision: &RenderDecision,
    options: &RenderSettings,
) -> fmt::Result {
    let element = match &shape.geometry {
        ShapeGeometry::Rect {
            x,
            y,
            width,
            height,
        } => format!(r#"<rect x="{x}" y="{y}" width="{width}" height="{height}""#),
        ShapeGeometry::Polygon { raw, .. } => {
            format!(r#"<polygon points="{}""#, escape_xml(raw))
        }
        ShapeGeometry::Circle { cx, cy, r } => format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}""#),
        ShapeGeometry::Ellipse { cx, cy, rx, ry } => {
            format!(r#"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}""#)
        }
    };
    write_element(out, &element, &shape.id, decision, options.label_font_size - 2.0)
}

/// Complète un élément ouvert (`<path d=".."`) avec style et attributs data
fn write_element<W: Write>(
    out: &mut W,
    element: &str,
    id: &str,
    decision: &RenderDecision,
    label_font_size: f64,
) -> fmt::Result {
    let id = escape_xml(id);

    match decision {
        RenderDecision::Plain {
            fill,
            stroke,
            stroke_width,
            interactive,
        } => writeln!(
            out,
            r#"{element} data-id="{id}" data-interactive="{interactive}" fill="{}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            escape_xml(fill),
            escape_xml(stroke)
        ),
        RenderDecision::Estate {
            fill,
            stroke,
            stroke_width,
            interactive,
            label,
            centroid,
            purchased,
        } => {
            writeln!(out, r#"<g class="estate" data-estate="{id}">"#)?;
            writeln!(
                out,
                r#"{element} data-id="{id}" data-interactive="{interactive}" fill="{fill}" stroke="{}" stroke-width="{stroke_width}"/>"#,
                escape_xml(stroke)
            )?;
            writeln!(
                out,
                r#"<text x="{}" y="{}" font-size="{label_font_size}" font-weight="bold" fill="{LABEL_FILL}" text-anchor="middle" dominant-baseline="middle" pointer-events="none">{}</text>"#,
                centroid.x,
                centroid.y,
                escape_xml(label)
            )?;
            if *purchased {
                writeln!(
                    out,
                    r##"<text x="{}" y="{}" font-size="{PURCHASED_TAG_FONT_SIZE}" font-weight="bold" fill="#ffffff" text-anchor="middle" dominant-baseline="middle" pointer-events="none">PURCHASED</text>"##,
                    centroid.x,
                    centroid.y + PURCHASED_TAG_OFFSET
                )?;
            }
            writeln!(out, "</g>")
        }
    }
}

fn write_labels<W: Write>(out: &mut W, labels: &[TextRecord]) -> fmt::Result {
    writeln!(out, r#"<g class="labels">"#)?;
    for label in labels {
        writeln!(
            out,
            r#"<text data-id="{}" x="{}" y="{}" font-size="{}" fill="{}">{}</text>"#,
            escape_xml(&label.id),
            label.x,
            label.y,
            label.font_size,
            escape_xml(label.fill.as_deref().unwrap_or(TEXT_DEFAULT_FILL)),
            escape_xml(&label.content)
        )?;
    }
    writeln!(out, "</g>")
}

/// Échappe une chaîne pour un attribut ou un texte XML
fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}
