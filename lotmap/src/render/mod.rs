//! Décisions de rendu: couleur, interactivité et label de chaque géométrie
//!
//! Une géométrie dont l'identifiant figure au catalogue est un lot; les
//! autres (contour, routes, bâtiments) gardent leur propre style.

pub mod svg;

use geo::Coord;
use svgmap::centroid::{path_centroid, shape_center};
use svgmap::{PathRecord, Region, ShapeRecord};

use crate::estate::{Estate, EstateCatalog, EstateStatus};
use crate::sales::SalesState;

pub const PURCHASED_FILL: &str = "#3b82f6";
pub const SELECTED_FILL: &str = "#10b981";
pub const RESERVED_FILL: &str = "#8b5cf6";
pub const AVAILABLE_FILL: &str = "#fbbf24";

pub const PATH_DEFAULT_FILL: &str = "none";
pub const PATH_DEFAULT_STROKE: &str = "#000000";
pub const PATH_DEFAULT_STROKE_WIDTH: f64 = 1.0;

pub const SHAPE_DEFAULT_FILL: &str = "#e5e7eb";
pub const SHAPE_DEFAULT_STROKE: &str = "#1f2937";
pub const SHAPE_DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Événement émis par un clic sur une géométrie interactive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEvent {
    /// Clic sur un lot achetable
    Estate(String),
    /// Clic sur une région (vue ville)
    Region(String),
}

/// Géométrie à rendre
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// Contour ou overlay d'une vue quartier
    Path(&'a PathRecord),
    /// Forme primitive d'une vue quartier
    Shape(&'a ShapeRecord),
    /// Région d'une vue ville
    Region(&'a Region),
}

impl<'a> Target<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Target::Path(p) => &p.id,
            Target::Shape(s) => &s.id,
            Target::Region(r) => &r.id,
        }
    }
}

/// Décision de rendu d'une géométrie
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDecision {
    /// Géométrie rattachée à un lot du catalogue
    Estate {
        fill: &'static str,
        stroke: String,
        stroke_width: f64,
        interactive: bool,
        /// Numéro du lot
        label: String,
        /// Point d'ancrage du label
        centroid: Coord,
        purchased: bool,
    },
    /// Géométrie hors catalogue
    Plain {
        fill: String,
        stroke: String,
        stroke_width: f64,
        interactive: bool,
    },
}

impl RenderDecision {
    pub fn fill(&self) -> &str {
        match self {
            RenderDecision::Estate { fill, .. } => *fill,
            RenderDecision::Plain { fill, .. } => fill.as_str(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        match self {
            RenderDecision::Estate { interactive, .. } | RenderDecision::Plain { interactive, .. } => {
                *interactive
            }
        }
    }

    /// Événement à émettre pour un clic sur cette géométrie
    pub fn click_event(&self, id: &str) -> Option<ClickEvent> {
        match self {
            RenderDecision::Estate {
                interactive: true, ..
            } => Some(ClickEvent::Estate(id.to_string())),
            RenderDecision::Plain {
                interactive: true, ..
            } => Some(ClickEvent::Region(id.to_string())),
            _ => None,
        }
    }
}

/// Contexte partagé par les décisions d'une même carte
pub struct RenderContext<'a> {
    pub catalog: &'a EstateCatalog,
    pub sales: &'a SalesState,
    /// Dimensions de la carte, pour le repli du centroïde
    pub width: f64,
    pub height: f64,
}

impl RenderContext<'_> {
    /// Décide du rendu d'une géométrie
    pub fn decide(&self, target: Target<'_>) -> RenderDecision {
        match target {
            Target::Path(path) => self.decide_path(path, false),
            Target::Region(region) => self.decide_path(&region.path, true),
            Target::Shape(shape) => self.decide_shape(shape),
        }
    }

    fn decide_path(&self, path: &PathRecord, region: bool) -> RenderDecision {
        let stroke = path
            .style
            .stroke
            .clone()
            .unwrap_or_else(|| PATH_DEFAULT_STROKE.to_string());
        let stroke_width = or_default(path.style.stroke_width, PATH_DEFAULT_STROKE_WIDTH);

        match self.catalog.get(&path.id) {
            Some(estate) => {
                let centroid = path_centroid(&path.commands, self.width, self.height);
                self.estate_decision(estate, centroid, stroke, stroke_width)
            }
            None => RenderDecision::Plain {
                fill: path
                    .style
                    .fill
                    .clone()
                    .unwrap_or_else(|| PATH_DEFAULT_FILL.to_string()),
                stroke,
                stroke_width,
                interactive: region,
            },
        }
    }

    fn decide_shape(&self, shape: &ShapeRecord) -> RenderDecision {
        let stroke = shape
            .style
            .stroke
            .clone()
            .unwrap_or_else(|| SHAPE_DEFAULT_STROKE.to_string());
        let stroke_width = or_default(shape.style.stroke_width, SHAPE_DEFAULT_STROKE_WIDTH);

        match self.catalog.get(&shape.id) {
            Some(estate) => {
                let centroid = shape_center(&shape.geometry).unwrap_or(Coord {
                    x: self.width / 2.0,
                    y: self.height / 2.0,
                });
                self.estate_decision(estate, centroid, stroke, stroke_width)
            }
            None => RenderDecision::Plain {
                fill: shape
                    .style
                    .fill
                    .clone()
                    .unwrap_or_else(|| SHAPE_DEFAULT_FILL.to_string()),
                stroke,
                stroke_width,
                interactive: false,
            },
        }
    }

    fn estate_decision(
        &self,
        estate: &Estate,
        centroid: Coord,
        stroke: String,
        stroke_width: f64,
    ) -> RenderDecision {
        let status = self.sales.status_of(estate);
        let purchased = status == EstateStatus::Purchased;

        RenderDecision::Estate {
            fill: estate_fill(status, self.sales.is_selected(&estate.shape_id)),
            stroke,
            stroke_width,
            interactive: self.sales.is_purchasable(estate),
            label: estate.lot_number.to_string(),
            centroid,
            purchased,
        }
    }
}

/// Couleur d'un lot: vendu > sélectionné > réservé > disponible
pub fn estate_fill(status: EstateStatus, selected: bool) -> &'static str {
    match status {
        EstateStatus::Purchased => PURCHASED_FILL,
        _ if selected => SELECTED_FILL,
        EstateStatus::Reserved => RESERVED_FILL,
        EstateStatus::Available => AVAILABLE_FILL,
    }
}

/// Épaisseur nulle ou invalide → valeur par défaut
fn or_default(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}
