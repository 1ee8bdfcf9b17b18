//! Tests d'intégration sur les plans SVG de référence

use std::path::{Path, PathBuf};

use svgmap::centroid::path_centroid;
use svgmap::map::{self, MapConfig, MapKind};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_parse_all_fixtures() {
    let pattern = format!("{}/tests/fixtures/*.svg", env!("CARGO_MANIFEST_DIR"));
    let files: Vec<PathBuf> = glob::glob(&pattern)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();

    assert!(files.len() >= 2, "Should find the reference fixtures");

    for file in &files {
        let first = svgmap::parse_file(file).unwrap();
        let second = svgmap::parse_file(file).unwrap();
        assert_eq!(first, second, "Parsing must be deterministic: {}", file.display());

        let kind = map::classify(&first);
        assert!(
            map::build(&first, kind).is_ok(),
            "Auto-classified build failed for {}",
            file.display()
        );
    }
}

#[test]
fn test_ward_plan_forced_single() {
    let doc = svgmap::parse_file(&fixture("ward.svg")).unwrap();

    assert_eq!(doc.width, 1323.0);
    assert_eq!(doc.height, 915.0);
    assert_eq!(doc.paths.len(), 52);
    // Fond + rectangle du clipPath: la recherche est globale
    assert_eq!(doc.shapes.len(), 2);
    assert_eq!(doc.shapes[0].id, "rect-0");

    let MapConfig::Single(ward) = map::build(&doc, MapKind::Single).unwrap() else {
        panic!("Expected single config");
    };
    assert_eq!(ward.boundary.id, "ward-boundary");
    assert_eq!(ward.boundary.style.stroke_width, 19.0);
    assert_eq!(ward.overlays.len(), 51);
    assert_eq!(ward.overlays[0].id, "estate-01");
    assert_eq!(ward.overlays[50].id, "estate-51");
}

#[test]
fn test_ward_plan_auto_detection_is_heuristic() {
    // Le contour et cinq lots aux contours détaillés dépassent le seuil:
    // le plan est classé "multi" bien qu'il s'agisse d'un quartier.
    let doc = svgmap::parse_file(&fixture("ward.svg")).unwrap();
    assert_eq!(map::count_large_paths(&doc), 6);
    assert_eq!(map::classify(&doc), MapKind::Multi);
}

#[test]
fn test_city_plan() {
    let markup = std::fs::read_to_string(fixture("city.svg")).unwrap();
    let config = svgmap::to_map_config(&markup).unwrap();

    let MapConfig::Multi(city) = config else {
        panic!("Expected multi config");
    };
    let names: Vec<&str> = city.regions.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Region 1", "Region 2", "Region 3"]);
    assert_eq!(city.regions[1].id, "ward-2");
    assert!(city.roads.is_empty());
    assert_eq!(city.labels.len(), 1);
    assert_eq!(city.labels[0].content, "Township");
}

#[test]
fn test_estate_centroid_inside_bounds() {
    let doc = svgmap::parse_file(&fixture("ward.svg")).unwrap();
    let estate = doc.paths.iter().find(|p| p.id == "estate-01").unwrap();

    let c = path_centroid(&estate.commands, doc.view_box.width, doc.view_box.height);
    assert!((760.0..=805.0).contains(&c.x), "x = {}", c.x);
    assert!((305.0..=382.0).contains(&c.y), "y = {}", c.y);
}
