//! Point d'ancrage des labels
//!
//! Le "centroïde" d'un path est la moyenne arithmétique des coordonnées
//! littérales extraites de ses commandes, pas un centroïde surfacique.
//!
//! Limites connues (conservées pour ne pas déplacer les labels existants):
//! - seules `M`, `L`, `H` et `V` mettent à jour le curseur;
//! - les commandes relatives (minuscules) sont lues comme absolues;
//! - courbes et arcs (`C`, `S`, `Q`, `T`, `A`) sont lus comme une suite de
//!   paires (x, y) brutes, points de contrôle et drapeaux d'arc compris.

use std::sync::OnceLock;

use geo::Coord;
use regex::Regex;

use crate::types::ShapeGeometry;

/// Découpe par lettre de commande
fn command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[MLHVCSQTAZmlhvcsqtaz][^MLHVCSQTAZmlhvcsqtaz]*").expect("valid regex")
    })
}

/// Nombres d'une liste d'arguments (`1.5.5` → 1.5, 0.5)
fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("valid regex")
    })
}

/// Extrait les points enregistrés en parcourant les commandes d'un path
pub fn path_points(commands: &str) -> Vec<Coord> {
    let mut points = Vec::new();
    let mut cursor = Coord { x: 0.0, y: 0.0 };

    for token in command_regex().find_iter(commands) {
        let token = token.as_str();
        let Some(letter) = token.chars().next() else {
            continue;
        };
        let args: Vec<f64> = number_regex()
            .find_iter(&token[letter.len_utf8()..])
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect();

        match letter.to_ascii_uppercase() {
            'M' | 'L' => {
                for pair in args.chunks_exact(2) {
                    cursor = Coord {
                        x: pair[0],
                        y: pair[1],
                    };
                    points.push(cursor);
                }
            }
            'H' => {
                for &x in &args {
                    cursor.x = x;
                    points.push(cursor);
                }
            }
            'V' => {
                for &y in &args {
                    cursor.y = y;
                    points.push(cursor);
                }
            }
            _ => {
                // Approximation: paires brutes, sans sémantique de curseur
                points.extend(args.chunks_exact(2).map(|pair| Coord {
                    x: pair[0],
                    y: pair[1],
                }));
            }
        }
    }

    points
}

/// Moyenne des points, `None` si la liste est vide
pub fn mean(points: &[Coord]) -> Option<Coord> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    Some(Coord {
        x: sum_x / n,
        y: sum_y / n,
    })
}

/// Calcule le point d'ancrage d'un path
///
/// Ne échoue jamais: retourne le centre `(width/2, height/2)` du document
/// quand aucune coordonnée n'est extractible.
pub fn path_centroid(commands: &str, width: f64, height: f64) -> Coord {
    mean(&path_points(commands)).unwrap_or(Coord {
        x: width / 2.0,
        y: height / 2.0,
    })
}

/// Centre d'une forme primitive (polygone vide → `None`)
pub fn shape_center(geometry: &ShapeGeometry) -> Option<Coord> {
    match geometry {
        ShapeGeometry::Rect {
            x,
            y,
            width,
            height,
        } => Some(Coord {
            x: x + width / 2.0,
            y: y + height / 2.0,
        }),
        ShapeGeometry::Polygon { points, .. } => mean(points),
        ShapeGeometry::Circle { cx, cy, .. } | ShapeGeometry::Ellipse { cx, cy, .. } => {
            Some(Coord { x: *cx, y: *cy })
        }
    }
}
