//! Modules d'export (GeoJSON)

pub mod geojson;

pub use geojson::{collect_lots, export_to_geojson, LotFeature};
