//! Export des lots en GeoJSON avec geozero (streaming)
//!
//! Les coordonnées restent dans le repère SVG (y vers le bas, sans CRS).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, Geometry, LineString, Point, Polygon};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use svgmap::centroid::{path_centroid, path_points, shape_center};
use svgmap::{MapConfig, ShapeGeometry};
use tracing::debug;

use crate::estate::{Estate, EstateCatalog, EstateStatus};
use crate::sales::SalesState;

/// Lot prêt à exporter
#[derive(Debug, Clone)]
pub struct LotFeature<'a> {
    pub estate: &'a Estate,
    /// Statut effectif (achats de la session compris)
    pub status: EstateStatus,
    pub geometry: Geometry<f64>,
}

/// Joint la carte et le catalogue; la géométrie hors catalogue est ignorée
pub fn collect_lots<'a>(
    config: &MapConfig,
    catalog: &'a EstateCatalog,
    sales: &SalesState,
) -> Vec<LotFeature<'a>> {
    let (width, height) = (config.width(), config.height());
    let mut lots = Vec::new();

    for path in config.paths() {
        if let Some(estate) = catalog.get(&path.id) {
            let geometry = outline(path_points(&path.commands))
                .unwrap_or_else(|| Point::from(path_centroid(&path.commands, width, height)).into());
            lots.push(LotFeature {
                estate,
                status: sales.status_of(estate),
                geometry,
            });
        }
    }

    for shape in config.shapes() {
        if let Some(estate) = catalog.get(&shape.id) {
            let Some(geometry) = shape_geometry(&shape.geometry) else {
                debug!(shape_id = %shape.id, "Skipping estate without coordinates");
                continue;
            };
            lots.push(LotFeature {
                estate,
                status: sales.status_of(estate),
                geometry,
            });
        }
    }

    lots
}

/// Contour fermé (au moins trois points)
fn outline(mut points: Vec<Coord>) -> Option<Geometry<f64>> {
    if points.len() < 3 {
        return None;
    }
    if points.first() != points.last() {
        points.push(points[0]);
    }
    Some(Polygon::new(LineString::from(points), vec![]).into())
}

fn shape_geometry(geometry: &ShapeGeometry) -> Option<Geometry<f64>> {
    match geometry {
        ShapeGeometry::Rect {
            x,
            y,
            width,
            height,
        } => outline(vec![
            Coord { x: *x, y: *y },
            Coord { x: x + width, y: *y },
            Coord {
                x: x + width,
                y: y + height,
            },
            Coord { x: *x, y: y + height },
        ]),
        ShapeGeometry::Polygon { points, .. } => outline(points.clone())
            .or_else(|| shape_center(geometry).map(|c| Point::from(c).into())),
        ShapeGeometry::Circle { .. } | ShapeGeometry::Ellipse { .. } => {
            shape_center(geometry).map(|c| Point::from(c).into())
        }
    }
}

/// Exporte des lots en GeoJSON, retourne le nombre de features écrites
pub fn export_to_geojson(lots: &[LotFeature<'_>], output_path: &Path) -> Result<usize> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_feature_collection(&mut writer, lots)?;
    writer.flush()?;

    Ok(lots.len())
}

/// Écrit une FeatureCollection complète
pub fn write_feature_collection<W: Write>(writer: &mut W, lots: &[LotFeature<'_>]) -> Result<()> {
    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;
    for (i, lot) in lots.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, lot)?;
    }
    write!(writer, "]}}")?;
    Ok(())
}

/// Écrit un lot en GeoJSON
fn write_feature<W: Write>(writer: &mut W, lot: &LotFeature<'_>) -> Result<()> {
    let estate = lot.estate;

    write!(
        writer,
        r#"{{"type":"Feature","id":"{}","#,
        escape_json(&estate.shape_id)
    )?;

    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    lot.geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(
        writer,
        r#","properties":{{"shapeId":"{}","lotNumber":{},"status":"{}","price":{},"area":{}"#,
        escape_json(&estate.shape_id),
        estate.lot_number,
        lot.status,
        estate.price,
        estate.area
    )?;
    if let Some(street) = &estate.street_facing {
        write!(writer, r#","streetFacing":"{}""#, escape_json(street))?;
    }
    write!(writer, "}}}}")?;

    Ok(())
}

/// Échappe une chaîne pour JSON
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARD: &str = r#"<svg viewBox="0 0 100 100">
        <path id="boundary" d="M0 0 H100 V100 H0 Z"/>
        <path id="estate-01" d="M10 10 L20 10 L20 20 L10 20 Z"/>
        <path id="estate-02" d="M30 30"/>
        <path id="road" d="M0 50 H100"/>
        <circle id="estate-03" cx="70" cy="70" r="5"/>
    </svg>"#;

    fn catalog() -> EstateCatalog {
        let estate = |id: &str, lot| Estate {
            shape_id: id.to_string(),
            lot_number: lot,
            status: EstateStatus::Available,
            price: 50000.0,
            area: 800.0,
            street_facing: Some("Main \"Street\"".to_string()),
        };
        EstateCatalog::new(vec![
            estate("estate-01", 1),
            estate("estate-02", 2),
            estate("estate-03", 3),
            estate("estate-99", 99),
        ])
    }

    #[test]
    fn test_collect_lots() {
        let config = svgmap::to_map_config(WARD).unwrap();
        let catalog = catalog();
        let sales = SalesState::default().with_purchased(["estate-02"]);

        let lots = collect_lots(&config, &catalog, &sales);
        let ids: Vec<&str> = lots.iter().map(|l| l.estate.shape_id.as_str()).collect();
        assert_eq!(ids, vec!["estate-01", "estate-02", "estate-03"]);

        assert!(matches!(lots[0].geometry, Geometry::Polygon(_)));
        // Un seul point: repli sur le centroïde
        assert_eq!(lots[1].geometry, Geometry::Point(Point::new(30.0, 30.0)));
        assert_eq!(lots[1].status, EstateStatus::Purchased);
        assert_eq!(lots[2].geometry, Geometry::Point(Point::new(70.0, 70.0)));
    }

    #[test]
    fn test_outline_closes_ring() {
        let Some(Geometry::Polygon(polygon)) = outline(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        ]) else {
            panic!("Expected polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 4);
        assert!(outline(vec![Coord { x: 0.0, y: 0.0 }]).is_none());
    }

    #[test]
    fn test_write_feature_collection() {
        let config = svgmap::to_map_config(WARD).unwrap();
        let catalog = catalog();
        let lots = collect_lots(&config, &catalog, &SalesState::default());

        let mut buffer = Vec::new();
        write_feature_collection(&mut buffer, &lots).unwrap();
        let json = String::from_utf8(buffer).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 3);

        let first = &value["features"][0];
        assert_eq!(first["id"], "estate-01");
        assert_eq!(first["geometry"]["type"], "Polygon");
        assert_eq!(first["properties"]["lotNumber"], 1);
        assert_eq!(first["properties"]["status"], "available");
        assert_eq!(first["properties"]["streetFacing"], "Main \"Street\"");
    }

    #[test]
    fn test_export_to_geojson() {
        let config = svgmap::to_map_config(WARD).unwrap();
        let catalog = catalog();
        let lots = collect_lots(&config, &catalog, &SalesState::default());

        let output_path = std::env::temp_dir().join("lotmap_test_export.geojson");
        let count = export_to_geojson(&lots, &output_path).unwrap();
        assert_eq!(count, 3);

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains(r#""type":"FeatureCollection""#));

        std::fs::remove_file(output_path).ok();
    }

    #[test]
    fn test_escape_json() {
        assert_eq!(escape_json("hello"), "hello");
        assert_eq!(escape_json("hello\"world"), "hello\\\"world");
        assert_eq!(escape_json("line\nbreak"), "line\\nbreak");
    }
}
