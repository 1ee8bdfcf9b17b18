//! Parser pour l'attribut `points` des polygones

use geo::Coord;
use tracing::trace;

use super::attr::parse_float;

/// Parse une liste de points `"x1,y1 x2,y2 ..."`
///
/// Chaque token séparé par des espaces doit contenir exactement deux
/// nombres séparés par une virgule; les autres tokens sont ignorés.
pub fn parse_points(raw: &str) -> Vec<Coord> {
    raw.split_whitespace()
        .filter_map(|token| {
            let point = parse_pair(token);
            if point.is_none() {
                trace!(token = token, "Dropping malformed polygon point");
            }
            point
        })
        .collect()
}

/// Parse un token `x,y`
fn parse_pair(token: &str) -> Option<Coord> {
    let mut parts = token.split(',');
    let x = parse_float(parts.next()?)?;
    let y = parse_float(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coord { x, y })
}
