//! Types de données pour le crate svgmap

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Largeur par défaut quand l'attribut `width` est absent ou illisible
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Hauteur par défaut quand l'attribut `height` est absent ou illisible
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// Taille de police par défaut des labels
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Épaisseur de trait par défaut
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Résultat de l'extraction d'un document SVG
///
/// Instantané immuable: l'ordre des collections est l'ordre du document
/// (le premier path sert de contour implicite en mode "single").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Largeur nominale (défaut: 800)
    pub width: f64,

    /// Hauteur nominale (défaut: 600)
    pub height: f64,

    /// Repère logique
    pub view_box: ViewBox,

    /// Paths dans l'ordre du document
    pub paths: Vec<PathRecord>,

    /// Formes primitives (rect, polygon, circle, ellipse)
    pub shapes: Vec<ShapeRecord>,

    /// Textes
    pub labels: Vec<TextRecord>,
}

/// Repère logique `viewBox`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Repère dérivé des dimensions, origine (0,0)
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// Attributs de style communs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,

    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Un élément `<path>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Identifiant résolu (data-id > id > `path-<index>`)
    pub id: String,

    /// Données brutes de l'attribut `d`
    pub commands: String,

    #[serde(flatten)]
    pub style: Style,
}

/// Une forme primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Identifiant résolu (data-id > id > `<kind>-<index>`)
    pub id: String,

    #[serde(flatten)]
    pub geometry: ShapeGeometry,

    #[serde(flatten)]
    pub style: Style,
}

/// Géométrie propre à chaque type de forme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        /// Sommets valides, dans l'ordre
        points: Vec<Coord>,
        /// Attribut `points` brut (réutilisé tel quel au rendu)
        raw: String,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
}

impl ShapeGeometry {
    /// Nom de l'élément SVG correspondant
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Polygon { .. } => "polygon",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
        }
    }
}

/// Un élément `<text>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,

    /// Contenu textuel (concaténation des noeuds texte descendants)
    pub content: String,

    pub font_size: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}
