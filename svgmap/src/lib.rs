//! # svgmap
//!
//! Conversion de plans SVG (lotissements, quartiers, villes) en configurations
//! de carte typées.
//!
//! ## Features
//!
//! - Extraction des paths, formes primitives et textes (`roxmltree`)
//! - Détection automatique vue quartier (`single`) / vue ville (`multi`)
//! - Calcul de points d'ancrage pour les labels (moyenne des coordonnées)
//! - Décodage des fichiers selon la déclaration XML (`encoding_rs`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use svgmap::{to_map_config, MapConfig};
//!
//! let config = to_map_config(&std::fs::read_to_string("ward.svg")?)?;
//! match config {
//!     MapConfig::Single(ward) => println!("{} overlays", ward.overlays.len()),
//!     MapConfig::Multi(city) => println!("{} regions", city.regions.len()),
//! }
//! ```

pub mod centroid;
pub mod error;
pub mod map;
pub mod parser;
pub mod source;
pub mod types;

pub use error::SvgMapError;
pub use map::{MapConfig, MapKind, MultiRegionMapConfig, Region, RegionMapConfig};
pub use parser::parse;
pub use types::{ParsedDocument, PathRecord, ShapeGeometry, ShapeRecord, Style, TextRecord, ViewBox};

use std::path::Path;

/// Convertit un SVG en configuration de carte (type détecté automatiquement)
///
/// # Errors
///
/// `InvalidDocument` si le document est illisible, `MissingBoundary` si le
/// document est classé `single` sans aucun path.
pub fn to_map_config(markup: &str) -> Result<MapConfig, SvgMapError> {
    to_map_config_as(markup, None)
}

/// Convertit un SVG en imposant éventuellement le type de carte
pub fn to_map_config_as(markup: &str, kind: Option<MapKind>) -> Result<MapConfig, SvgMapError> {
    let doc = parse(markup)?;
    let kind = kind.unwrap_or_else(|| map::classify(&doc));
    map::build(&doc, kind)
}

/// Lit, décode et parse un fichier SVG
pub fn parse_file(path: &Path) -> Result<ParsedDocument, SvgMapError> {
    let markup = source::read(path)?;
    parse(&markup)
}
