//! Définition et implémentation des commandes CLI
//!
//! - `convert`: SVG → configuration de carte JSON (dossiers en parallèle)
//! - `render`: SVG + catalogue → SVG coloré
//! - `export`: SVG + catalogue → GeoJSON des lots
//! - `inspect`: rapport de conversion
//! - `grid`: lotissement en grille

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use rayon::prelude::*;
use svgmap::{map, MapConfig, ParsedDocument};
use tracing::{debug, info, warn};

use lotmap::config::{load_config, MapMode, RenderSettings};
use lotmap::export::{collect_lots, export_to_geojson};
use lotmap::render::svg::render_svg;
use lotmap::report::ConversionReport;
use lotmap::sales::SalesState;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert SVG site plans into map configurations (JSON)
    Convert {
        /// Path to an SVG file or a directory of SVG files
        #[arg(short, long)]
        path: PathBuf,

        /// Output directory for JSON files
        #[arg(short, long)]
        output: PathBuf,

        /// Map kind: auto, single (ward), multi (city)
        #[arg(long, default_value = "auto")]
        mode: MapMode,
    },

    /// Render an SVG site plan coloured by estate status
    Render {
        /// Path to the SVG site plan
        #[arg(short, long)]
        path: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,

        /// Estate catalog preset (demo) or path to a JSON config
        #[arg(long, default_value = "demo")]
        config: String,

        /// Map kind: auto, single (ward), multi (city)
        #[arg(long, default_value = "auto")]
        mode: MapMode,

        /// Estates already purchased (comma-separated shape ids)
        #[arg(long, value_delimiter = ',')]
        purchased: Vec<String>,

        /// Estate currently selected
        #[arg(long)]
        selected: Option<String>,

        /// Hide the coordinate grid (default: LOTMAP_SHOW_GRID, shown)
        #[arg(long)]
        no_grid: bool,
    },

    /// Export estates to GeoJSON (SVG coordinates)
    Export {
        /// Path to the SVG site plan
        #[arg(short, long)]
        path: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Estate catalog preset (demo) or path to a JSON config
        #[arg(long, default_value = "demo")]
        config: String,

        /// Map kind: auto, single (ward), multi (city)
        #[arg(long, default_value = "auto")]
        mode: MapMode,
    },

    /// Print a conversion report
    Inspect {
        /// Path to the SVG site plan
        #[arg(short, long)]
        path: PathBuf,

        /// Estate catalog preset (demo) or path to a JSON config
        #[arg(long, default_value = "demo")]
        config: String,

        /// Map kind: auto, single (ward), multi (city)
        #[arg(long, default_value = "auto")]
        mode: MapMode,

        /// Human-readable output instead of JSON
        #[arg(long)]
        human: bool,

        /// Also save the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate a grid layout of lots with roads
    Grid {
        /// Config preset (demo) or path to a JSON config with a `grid` block
        #[arg(long, default_value = "demo")]
        config: String,

        /// Output file (.svg or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Exécute la commande convert
pub fn cmd_convert(path: &Path, output: &Path, mode: MapMode) -> Result<()> {
    info!(
        path = %path.display(),
        output = %output.display(),
        mode = ?mode,
        "Starting conversion"
    );

    std::fs::create_dir_all(output)?;

    if path.is_dir() {
        convert_directory(path, output, mode)
    } else {
        let config = convert_single_file(path, output, mode)?;
        println!(
            "Converted {} → {} map ({} paths)",
            path.display(),
            config.kind(),
            config.paths().len()
        );
        Ok(())
    }
}

/// Convertit un dossier de SVG en parallèle
fn convert_directory(path: &Path, output: &Path, mode: MapMode) -> Result<()> {
    let files = collect_svgs(path)?;

    if files.is_empty() {
        anyhow::bail!("No SVG files found in {}", path.display());
    }

    info!("Found {} SVG files to convert", files.len());

    let success_count = Arc::new(AtomicUsize::new(0));
    let error_count = Arc::new(AtomicUsize::new(0));
    let multi_count = Arc::new(AtomicUsize::new(0));

    files.par_iter().for_each(|file| {
        match convert_single_file(file, output, mode) {
            Ok(config) => {
                success_count.fetch_add(1, Ordering::Relaxed);
                if config.kind() == svgmap::MapKind::Multi {
                    multi_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                warn!("Failed to convert {}: {:#}", file.display(), e);
                error_count.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);
    let multi = multi_count.load(Ordering::Relaxed);

    println!(
        "Conversion complete: {}/{} files ({} single, {} multi)",
        success,
        files.len(),
        success - multi,
        multi
    );

    if errors > 0 {
        warn!("{} files failed", errors);
    }

    Ok(())
}

/// Convertit un fichier et écrit `<nom>.json` dans `output`
fn convert_single_file(path: &Path, output: &Path, mode: MapMode) -> Result<MapConfig> {
    let (_, config) = load_map(path, mode)?;

    let output_file = output.join(format!("{}.json", get_svg_basename(path)));
    let json = serde_json::to_string_pretty(&config)?;
    std::fs::write(&output_file, json)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;

    debug!(output = %output_file.display(), kind = %config.kind(), "Wrote map config");
    Ok(config)
}

/// Exécute la commande render
pub fn cmd_render(
    path: &Path,
    output: &Path,
    config_spec: &str,
    mode: MapMode,
    purchased: Vec<String>,
    selected: Option<String>,
    no_grid: bool,
) -> Result<()> {
    let (_, map_config) = load_map(path, mode)?;
    let config = load_config(config_spec)?;
    let catalog = config.catalog();

    let mut sales = SalesState::from_catalog(&catalog).with_purchased(purchased);
    if let Some(id) = selected {
        sales
            .select(&catalog, &id)
            .with_context(|| format!("Cannot select estate {}", id))?;
    }

    let mut settings = RenderSettings::from_env();
    if no_grid {
        settings.show_grid = false;
    }

    let svg = render_svg(&map_config, &catalog, &sales, &settings);
    std::fs::write(output, svg).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("=== {} ===", config.project.name);
    if !config.project.location.is_empty() {
        println!("Location: {}", config.project.location);
    }
    println!("Map: {} ({} x {})", map_config.kind(), map_config.width(), map_config.height());
    println!("{}", sales.summary(&catalog).display());
    println!("Rendered to {}", output.display());

    Ok(())
}

/// Exécute la commande export
pub fn cmd_export(path: &Path, output: &Path, config_spec: &str, mode: MapMode) -> Result<()> {
    info!(path = %path.display(), output = %output.display(), "Export vers GeoJSON");

    let (_, map_config) = load_map(path, mode)?;
    let catalog = load_config(config_spec)?.catalog();
    let sales = SalesState::from_catalog(&catalog);

    let lots = collect_lots(&map_config, &catalog, &sales);
    if lots.len() < catalog.len() {
        warn!(
            "{} estates have no geometry in {}",
            catalog.len() - lots.len(),
            path.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let count = export_to_geojson(&lots, output)?;

    println!("Export complete: {} estates to {}", count, output.display());
    Ok(())
}

/// Exécute la commande inspect
pub fn cmd_inspect(
    path: &Path,
    config_spec: &str,
    mode: MapMode,
    human: bool,
    report_path: Option<&Path>,
) -> Result<()> {
    let (doc, map_config) = load_map(path, mode)?;
    let catalog = load_config(config_spec)?.catalog();
    let sales = SalesState::from_catalog(&catalog);

    let report = ConversionReport::new(&get_svg_basename(path), &doc, &map_config, &catalog)?
        .with_source_checksum(path)?
        .with_sales(sales.summary(&catalog));

    info!("{}", report.summary());

    if human {
        report.display();
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(report_path) = report_path {
        report
            .save_to_file(report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        info!(report = %report_path.display(), "Report saved");
    }

    Ok(())
}

/// Exécute la commande grid
pub fn cmd_grid(config_spec: &str, output: &Path) -> Result<()> {
    let config = load_config(config_spec)?;
    let grid = config
        .grid
        .as_ref()
        .with_context(|| format!("No grid block in config {}", config_spec))?;

    let layout = lotmap::grid::generate(grid);
    let catalog = layout.catalog();
    let sales = SalesState::from_catalog(&catalog);

    let is_json = output
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(&layout)?
    } else {
        layout.to_svg(grid.cell_size, grid.road_width)
    };
    std::fs::write(output, content).with_context(|| format!("Failed to write {}", output.display()))?;

    let (matrix_rows, matrix_cols) = layout.matrix_size();
    println!(
        "Grid: {} x {} lots, {} x {} cells",
        grid.rows, grid.cols, matrix_rows, matrix_cols
    );
    println!("{}", sales.summary(&catalog).display());
    println!("Written to {}", output.display());

    Ok(())
}

/// Lit, parse et construit la carte d'un fichier SVG
fn load_map(path: &Path, mode: MapMode) -> Result<(ParsedDocument, MapConfig)> {
    let doc = svgmap::parse_file(path).with_context(|| format!("Failed to parse {}", path.display()))?;

    let kind = mode.forced_kind().unwrap_or_else(|| map::classify(&doc));
    let config = map::build(&doc, kind)
        .with_context(|| format!("Failed to build {} map from {}", kind, path.display()))?;

    Ok((doc, config))
}

/// Extrait le nom de base d'un fichier SVG (sans .svg)
fn get_svg_basename(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    name.strip_suffix(".svg")
        .or_else(|| name.strip_suffix(".SVG"))
        .unwrap_or(name)
        .to_string()
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"))
}

/// Collecte récursivement les fichiers SVG
fn collect_svgs(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_svg(path) {
            files.push(path.to_path_buf());
        }
        return Ok(files);
    }

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        if entry_path.is_dir() {
            files.extend(collect_svgs(&entry_path)?);
        } else if is_svg(&entry_path) {
            files.push(entry_path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../svgmap/tests/fixtures")
            .join(name)
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lotmap-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_get_svg_basename() {
        assert_eq!(get_svg_basename(Path::new("ward.svg")), "ward");
        assert_eq!(get_svg_basename(Path::new("/path/to/CITY.SVG")), "CITY");
        assert_eq!(get_svg_basename(Path::new("noextension")), "noextension");
    }

    #[test]
    fn test_collect_svgs() {
        let dir = temp_dir("collect");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("a.svg"), "<svg/>").unwrap();
        std::fs::write(dir.join("nested/b.SVG"), "<svg/>").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();

        let files = collect_svgs(&dir).unwrap();
        assert_eq!(files.len(), 2);
        assert!(collect_svgs(&dir.join("notes.txt")).unwrap().is_empty());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_map_forced_mode() {
        let (doc, config) = load_map(&fixture("ward.svg"), MapMode::Single).unwrap();
        assert_eq!(doc.paths.len(), 52);
        assert_eq!(config.kind(), svgmap::MapKind::Single);

        let (_, config) = load_map(&fixture("ward.svg"), MapMode::Auto).unwrap();
        assert_eq!(config.kind(), svgmap::MapKind::Multi);
    }

    #[test]
    fn test_convert_single_file() {
        let output = temp_dir("convert");
        let config = convert_single_file(&fixture("city.svg"), &output, MapMode::Auto).unwrap();
        assert_eq!(config.kind(), svgmap::MapKind::Multi);

        let json = std::fs::read_to_string(output.join("city.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "multi");
        assert_eq!(value["regions"].as_array().unwrap().len(), 3);

        std::fs::remove_dir_all(output).ok();
    }

    #[test]
    fn test_inspect_saves_report() {
        let output = temp_dir("inspect");
        let report_path = output.join("ward-report.json");

        cmd_inspect(&fixture("ward.svg"), "demo", MapMode::Single, false, Some(&report_path)).unwrap();

        let json = std::fs::read_to_string(&report_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "ward");
        assert_eq!(value["kind"], "single");
        assert_eq!(value["matched_estates"], 51);
        assert_eq!(value["sales"]["available"], 51);

        std::fs::remove_dir_all(output).ok();
    }

    #[test]
    fn test_load_map_missing_file() {
        assert!(load_map(Path::new("/nonexistent/plan.svg"), MapMode::Auto).is_err());
    }
}
