//! Configuration du projet: catalogue des lots, grille, réglages de rendu

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use svgmap::MapKind;

use crate::estate::{Estate, EstateCatalog};

/// Configuration principale
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectInfo,

    /// Lots à vendre, rattachés aux géométries par `shapeId`
    #[serde(default)]
    pub estates: Vec<Estate>,

    /// Lotissement en grille (optionnel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
}

/// Informations affichées en en-tête
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub location: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "Real Estate Development".into(),
            location: String::new(),
        }
    }
}

/// Paramètres du générateur de grille
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,

    /// Route horizontale toutes les N rangées
    #[serde(default)]
    pub horizontal_road_interval: Option<usize>,

    /// Route verticale toutes les M colonnes
    #[serde(default)]
    pub vertical_road_interval: Option<usize>,

    /// Positions explicites, utilisées quand l'intervalle est absent
    #[serde(default)]
    pub horizontal_roads: Vec<usize>,

    #[serde(default)]
    pub vertical_roads: Vec<usize>,

    #[serde(default = "default_min_price")]
    pub min_price: f64,

    #[serde(default = "default_max_price")]
    pub max_price: f64,

    #[serde(default = "default_price_step")]
    pub price_step: f64,

    /// Numéros des lots déjà vendus
    #[serde(default)]
    pub sold: Vec<u32>,

    /// Côté d'une cellule de lot (rendu SVG)
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,

    /// Largeur d'une route (rendu SVG)
    #[serde(default = "default_road_width")]
    pub road_width: f64,
}

fn default_min_price() -> f64 {
    50000.0
}

fn default_max_price() -> f64 {
    80000.0
}

fn default_price_step() -> f64 {
    2500.0
}

fn default_cell_size() -> f64 {
    60.0
}

fn default_road_width() -> f64 {
    20.0
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "demo" => Self::load_embedded(include_str!("presets/demo.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: demo", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Index des lots par identifiant de géométrie
    pub fn catalog(&self) -> EstateCatalog {
        EstateCatalog::new(self.estates.clone())
    }
}

/// Charge un preset (`demo`) ou un fichier JSON
pub fn load_config(name: &str) -> Result<Config> {
    match name {
        "demo" => Config::from_preset(name),
        _ => Config::load(Path::new(name)),
    }
}

/// Choix du type de carte en CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapMode {
    /// Détection heuristique
    #[default]
    Auto,
    Single,
    Multi,
}

impl MapMode {
    /// Type imposé, `None` en mode automatique
    pub fn forced_kind(self) -> Option<MapKind> {
        match self {
            MapMode::Auto => None,
            MapMode::Single => Some(MapKind::Single),
            MapMode::Multi => Some(MapKind::Multi),
        }
    }
}

impl FromStr for MapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "detect" => Ok(MapMode::Auto),
            "single" | "ward" => Ok(MapMode::Single),
            "multi" | "city" => Ok(MapMode::Multi),
            _ => Err(format!("Invalid map mode: {}. Use: auto, single, multi", s)),
        }
    }
}

/// Réglages du rendu SVG
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub show_grid: bool,
    pub grid_interval: f64,
    /// Taille du numéro de lot sur les paths (formes: 2 points de moins)
    pub label_font_size: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_interval: 50.0,
            label_font_size: 16.0,
        }
    }
}

impl RenderSettings {
    /// Charge les réglages depuis les variables d'environnement
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            show_grid: std::env::var("LOTMAP_SHOW_GRID")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.show_grid),
            grid_interval: std::env::var("LOTMAP_GRID_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&v: &f64| v > 0.0)
                .unwrap_or(defaults.grid_interval),
            label_font_size: std::env::var("LOTMAP_LABEL_FONT_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&v: &f64| v > 0.0)
                .unwrap_or(defaults.label_font_size),
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estate::EstateStatus;

    #[test]
    fn test_demo_preset() {
        let config = Config::from_preset("demo").unwrap();
        assert_eq!(config.project.name, "Real Estate Development");
        assert_eq!(config.project.location, "Yangon, Myanmar");
        assert_eq!(config.estates.len(), 51);
        assert!(config
            .estates
            .iter()
            .all(|e| e.status == EstateStatus::Available));

        let catalog = config.catalog();
        let last = catalog.get("estate-51").unwrap();
        assert_eq!(last.lot_number, 51);
        assert_eq!(last.price, 80000.0);
        assert_eq!(last.street_facing.as_deref(), Some("Sunset Blvd"));

        let grid = config.grid.unwrap();
        assert_eq!((grid.rows, grid.cols), (6, 8));
        assert_eq!(grid.cell_size, 60.0);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Config::from_preset("full").is_err());
        assert!(load_config("/nonexistent/lotmap.json").is_err());
    }

    #[test]
    fn test_minimal_config() {
        let config: Config = serde_json::from_str(r#"{"estates":[]}"#).unwrap();
        assert!(config.estates.is_empty());
        assert!(config.grid.is_none());
        assert_eq!(config.project.name, "Real Estate Development");
    }

    #[test]
    fn test_map_mode_from_str() {
        assert_eq!("auto".parse::<MapMode>(), Ok(MapMode::Auto));
        assert_eq!("Ward".parse::<MapMode>(), Ok(MapMode::Single));
        assert_eq!("multi".parse::<MapMode>(), Ok(MapMode::Multi));
        assert!("both".parse::<MapMode>().is_err());

        assert_eq!(MapMode::Auto.forced_kind(), None);
        assert_eq!(MapMode::Multi.forced_kind(), Some(MapKind::Multi));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_render_settings_default() {
        let settings = RenderSettings::default();
        assert!(settings.show_grid);
        assert_eq!(settings.grid_interval, 50.0);
        assert_eq!(settings.label_font_size, 16.0);
    }
}
