//! Lecture des attributs: nombres, viewBox, identifiants, styles

use roxmltree::Node;

use crate::types::{Style, ViewBox, DEFAULT_STROKE_WIDTH};

/// Parse le préfixe numérique d'une chaîne (sémantique `parseFloat`):
/// `"800px"` → 800, `" 12.5 "` → 12.5, `"abc"` → None.
///
/// Les valeurs non finies sont rejetées.
#[inline]
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let (value, consumed) = fast_float::parse_partial::<f64, _>(trimmed).ok()?;
    if consumed == 0 || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Lit un attribut texte non vide
#[inline]
pub fn non_empty<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.is_empty())
}

/// Lit un attribut numérique avec valeur par défaut (absent ou illisible)
pub fn number_or(node: Node<'_, '_>, name: &str, default: f64) -> f64 {
    node.attribute(name)
        .and_then(parse_float)
        .unwrap_or(default)
}

/// Parse un attribut `viewBox` (4 nombres séparés par espaces ou virgules)
///
/// Un viewBox mal formé est traité comme absent.
pub fn parse_view_box(raw: &str) -> Option<ViewBox> {
    let mut values = [0.0_f64; 4];
    let mut count = 0;

    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if count == 4 {
            return None;
        }
        values[count] = parse_float(token)?;
        count += 1;
    }

    if count != 4 {
        return None;
    }

    let [x, y, width, height] = values;
    Some(ViewBox {
        x,
        y,
        width,
        height,
    })
}

/// Résout l'identifiant d'un élément: data-id > id > fallback positionnel
pub fn resolve_id(node: Node<'_, '_>, kind: &str, index: usize) -> String {
    non_empty(node, "data-id")
        .or_else(|| non_empty(node, "id"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-{}", kind, index))
}

/// Extrait les attributs de style communs (fill, stroke, stroke-width)
pub fn style(node: Node<'_, '_>) -> Style {
    Style {
        fill: non_empty(node, "fill").map(str::to_string),
        stroke: non_empty(node, "stroke").map(str::to_string),
        stroke_width: number_or(node, "stroke-width", DEFAULT_STROKE_WIDTH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("800"), Some(800.0));
        assert_eq!(parse_float("800px"), Some(800.0));
        assert_eq!(parse_float("  12.5"), Some(12.5));
        assert_eq!(parse_float("-3e2"), Some(-300.0));
        assert_eq!(parse_float(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_float_invalid() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("   "), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("inf"), None);
    }

    #[test]
    fn test_parse_view_box() {
        let vb = parse_view_box("0 0 1323 915").unwrap();
        assert_eq!(vb, ViewBox::from_size(1323.0, 915.0));

        let vb = parse_view_box("10,20, 300 400").unwrap();
        assert_eq!(vb.x, 10.0);
        assert_eq!(vb.y, 20.0);
        assert_eq!(vb.width, 300.0);
        assert_eq!(vb.height, 400.0);
    }

    #[test]
    fn test_parse_view_box_malformed() {
        assert!(parse_view_box("").is_none());
        assert!(parse_view_box("0 0 100").is_none());
        assert!(parse_view_box("0 0 100 100 5").is_none());
        assert!(parse_view_box("0 0 wide 100").is_none());
    }

    #[test]
    fn test_resolve_id_precedence() {
        let doc = roxmltree::Document::parse(
            r#"<svg><path data-id="estate-07" id="path99"/><path id="road"/><path data-id="" id="x"/><path/></svg>"#,
        )
        .unwrap();
        let paths: Vec<_> = doc
            .descendants()
            .filter(|n| n.has_tag_name("path"))
            .collect();

        assert_eq!(resolve_id(paths[0], "path", 0), "estate-07");
        assert_eq!(resolve_id(paths[1], "path", 1), "road");
        assert_eq!(resolve_id(paths[2], "path", 2), "x");
        assert_eq!(resolve_id(paths[3], "path", 3), "path-3");
    }

    #[test]
    fn test_style_defaults() {
        let doc = roxmltree::Document::parse(r#"<rect stroke-width="oops"/>"#).unwrap();
        let style = style(doc.root_element());
        assert_eq!(style.fill, None);
        assert_eq!(style.stroke, None);
        assert_eq!(style.stroke_width, 1.0);
    }
}
