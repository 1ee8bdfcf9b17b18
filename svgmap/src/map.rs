//! Classification et construction des configurations de carte
//!
//! Deux formes de sortie:
//! - `single` (vue "quartier"): un contour, des overlays (routes ou lots,
//!   indistincts jusqu'à la jointure avec le catalogue), des bâtiments;
//! - `multi` (vue "ville"): chaque path est une région indépendante.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ParsedDocument, PathRecord, ShapeRecord, TextRecord};
use crate::SvgMapError;

/// Longueur (en caractères) au-delà de laquelle un path est "large"
pub const LARGE_PATH_THRESHOLD: usize = 100;

/// Nombre de paths larges à partir duquel le document est une vue multi-régions
pub const MULTI_REGION_MIN_LARGE_PATHS: usize = 3;

/// Type de carte détecté ou imposé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Une seule région (contour + overlays + bâtiments)
    Single,
    /// Plusieurs régions indépendantes
    Multi,
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Single => write!(f, "single"),
            MapKind::Multi => write!(f, "multi"),
        }
    }
}

impl FromStr for MapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "ward" => Ok(MapKind::Single),
            "multi" | "city" => Ok(MapKind::Multi),
            _ => Err(format!("Invalid map kind: {}. Use: single, multi", s)),
        }
    }
}

/// Configuration "single" (vue quartier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMapConfig {
    pub width: f64,
    pub height: f64,

    /// Premier path du document
    pub boundary: PathRecord,

    /// Paths restants: routes ou contours de lots, résolus au rendu
    pub overlays: Vec<PathRecord>,

    pub buildings: Vec<ShapeRecord>,
    pub labels: Vec<TextRecord>,
}

/// Une région de la vue multi-régions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub path: PathRecord,
    pub name: String,
}

/// Configuration "multi" (vue ville)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRegionMapConfig {
    pub width: f64,
    pub height: f64,
    pub regions: Vec<Region>,

    /// Toujours vide: la vue multi-régions n'affiche pas le détail des routes
    pub roads: Vec<PathRecord>,

    pub labels: Vec<TextRecord>,
}

/// Configuration de carte construite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapConfig {
    Single(RegionMapConfig),
    Multi(MultiRegionMapConfig),
}

impl MapConfig {
    pub fn kind(&self) -> MapKind {
        match self {
            MapConfig::Single(_) => MapKind::Single,
            MapConfig::Multi(_) => MapKind::Multi,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            MapConfig::Single(c) => c.width,
            MapConfig::Multi(c) => c.width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            MapConfig::Single(c) => c.height,
            MapConfig::Multi(c) => c.height,
        }
    }

    pub fn labels(&self) -> &[TextRecord] {
        match self {
            MapConfig::Single(c) => &c.labels,
            MapConfig::Multi(c) => &c.labels,
        }
    }

    /// Tous les paths de la configuration, dans l'ordre de rendu
    pub fn paths(&self) -> Vec<&PathRecord> {
        match self {
            MapConfig::Single(c) => std::iter::once(&c.boundary)
                .chain(c.overlays.iter())
                .collect(),
            MapConfig::Multi(c) => c.regions.iter().map(|r| &r.path).collect(),
        }
    }

    /// Formes primitives (vide en mode multi)
    pub fn shapes(&self) -> &[ShapeRecord] {
        match self {
            MapConfig::Single(c) => &c.buildings,
            MapConfig::Multi(_) => &[],
        }
    }
}

/// Compte les paths dont les données dépassent le seuil
pub fn count_large_paths(doc: &ParsedDocument) -> usize {
    doc.paths
        .iter()
        .filter(|p| p.commands.chars().count() > LARGE_PATH_THRESHOLD)
        .count()
}

/// Détecte le type de carte (heuristique, best-effort)
///
/// Plusieurs contours complexes comparables indiquent une vue ville; un
/// contour dominant et de petits overlays indiquent une vue quartier.
pub fn classify(doc: &ParsedDocument) -> MapKind {
    let large = count_large_paths(doc);
    let kind = if large >= MULTI_REGION_MIN_LARGE_PATHS {
        MapKind::Multi
    } else {
        MapKind::Single
    };

    debug!(large_paths = large, total_paths = doc.paths.len(), kind = %kind, "Classified map");
    kind
}

/// Construit la configuration pour le type demandé
///
/// # Errors
///
/// `SvgMapError::MissingBoundary` en mode `Single` si le document n'a aucun path.
pub fn build(doc: &ParsedDocument, kind: MapKind) -> Result<MapConfig, SvgMapError> {
    match kind {
        MapKind::Single => build_single(doc).map(MapConfig::Single),
        MapKind::Multi => Ok(MapConfig::Multi(build_multi(doc))),
    }
}

/// Construit une configuration "single"
pub fn build_single(doc: &ParsedDocument) -> Result<RegionMapConfig, SvgMapError> {
    let (boundary, overlays) = doc
        .paths
        .split_first()
        .ok_or(SvgMapError::MissingBoundary)?;

    Ok(RegionMapConfig {
        width: doc.view_box.width,
        height: doc.view_box.height,
        boundary: boundary.clone(),
        overlays: overlays.to_vec(),
        buildings: doc.shapes.clone(),
        labels: doc.labels.clone(),
    })
}

/// Construit une configuration "multi"
pub fn build_multi(doc: &ParsedDocument) -> MultiRegionMapConfig {
    let regions = doc
        .paths
        .iter()
        .enumerate()
        .map(|(index, path)| Region {
            id: path.id.clone(),
            path: path.clone(),
            name: format!("Region {}", index + 1),
        })
        .collect();

    MultiRegionMapConfig {
        width: doc.view_box.width,
        height: doc.view_box.height,
        regions,
        roads: Vec::new(),
        labels: doc.labels.clone(),
    }
}
