//! Rapport de conversion d'un plan SVG
//!
//! Résume ce que l'extraction a trouvé, le type de carte retenu et la
//! jointure avec le catalogue (lots sans géométrie, géométrie hors catalogue).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use svgmap::{map, MapConfig, MapKind, ParsedDocument};

use crate::estate::EstateCatalog;
use crate::sales::SalesSummary;

/// Rapport complet de conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Nom du fichier source
    pub source: String,
    /// Checksum blake3 du fichier source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_checksum: Option<String>,
    /// Empreinte blake3 du document extrait (détection de non-déterminisme)
    pub fingerprint: String,

    /// Type retenu
    pub kind: MapKind,
    /// Type proposé par l'heuristique
    pub detected_kind: MapKind,

    pub width: f64,
    pub height: f64,
    pub paths: usize,
    pub shapes: usize,
    pub labels: usize,
    pub large_paths: usize,

    /// Lots du catalogue présents sur la carte
    pub matched_estates: usize,
    /// Lots du catalogue absents de la carte (jamais affichés)
    pub unmatched_estates: Vec<String>,
    /// Géométrie sans lot (rendue avec son propre style)
    pub unmatched_geometry: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<SalesSummary>,

    pub warnings: Vec<String>,
}

impl ConversionReport {
    /// Construit le rapport d'un document converti
    pub fn new(
        source: &str,
        doc: &ParsedDocument,
        config: &MapConfig,
        catalog: &EstateCatalog,
    ) -> Result<Self> {
        let geometry_ids: Vec<&str> = config
            .paths()
            .into_iter()
            .map(|p| p.id.as_str())
            .chain(config.shapes().iter().map(|s| s.id.as_str()))
            .collect();
        let on_map: HashSet<&str> = geometry_ids.iter().copied().collect();

        let (matched, unmatched_estates): (Vec<_>, Vec<_>) = catalog
            .iter()
            .map(|e| e.shape_id.as_str())
            .partition(|id| on_map.contains(id));

        let unmatched_geometry = geometry_ids
            .iter()
            .filter(|id| !catalog.contains(id))
            .map(|id| id.to_string())
            .collect();

        let detected_kind = map::classify(doc);
        let mut warnings = Vec::new();
        if detected_kind != config.kind() {
            warnings.push(format!(
                "Map kind forced to {} (detected: {})",
                config.kind(),
                detected_kind
            ));
        }
        if on_map.len() != geometry_ids.len() {
            warnings.push(format!(
                "{} duplicate geometry ids",
                geometry_ids.len() - on_map.len()
            ));
        }

        Ok(Self {
            source: source.to_string(),
            source_checksum: None,
            fingerprint: fingerprint(doc)?,
            kind: config.kind(),
            detected_kind,
            width: config.width(),
            height: config.height(),
            paths: doc.paths.len(),
            shapes: doc.shapes.len(),
            labels: doc.labels.len(),
            large_paths: map::count_large_paths(doc),
            matched_estates: matched.len(),
            unmatched_estates: unmatched_estates.into_iter().map(str::to_string).collect(),
            unmatched_geometry,
            sales: None,
            warnings,
        })
    }

    /// Ajoute le checksum du fichier source
    pub fn with_source_checksum(mut self, path: &Path) -> Result<Self> {
        self.source_checksum = Some(file_checksum(path)?);
        Ok(self)
    }

    pub fn with_sales(mut self, summary: SalesSummary) -> Self {
        self.sales = Some(summary);
        self
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONVERSION REPORT - {}", self.source);
        println!("{}", "=".repeat(60));

        println!("\nKind: {} (detected: {})", self.kind, self.detected_kind);
        println!("Size: {} x {}", self.width, self.height);
        println!("Fingerprint: {}", self.fingerprint);
        if let Some(checksum) = &self.source_checksum {
            println!("Source checksum: {}", checksum);
        }

        println!("\n--- GEOMETRY ---");
        println!(
            "{} paths ({} large), {} shapes, {} labels",
            self.paths, self.large_paths, self.shapes, self.labels
        );

        println!("\n--- ESTATES ---");
        println!("{} matched", self.matched_estates);
        if !self.unmatched_estates.is_empty() {
            println!(
                "{} without geometry: {}",
                self.unmatched_estates.len(),
                preview(&self.unmatched_estates, 10)
            );
        }
        if !self.unmatched_geometry.is_empty() {
            println!(
                "{} geometry without estate: {}",
                self.unmatched_geometry.len(),
                preview(&self.unmatched_geometry, 10)
            );
        }

        if let Some(sales) = &self.sales {
            println!("\n--- SALES ---");
            println!("{}", sales.display());
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in &self.warnings {
                println!("  {}", w);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} map, {} paths, {} shapes, {} estates matched",
            self.source, self.kind, self.paths, self.shapes, self.matched_estates
        )
    }
}

/// Empreinte blake3 (hex) de la forme sérialisée d'un document
pub fn fingerprint(doc: &ParsedDocument) -> Result<String> {
    let bytes = serde_json::to_vec(doc).context("Failed to serialize parsed document")?;
    Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
}

/// Calcule le checksum blake3 d'un fichier
pub fn file_checksum(path: &Path) -> Result<String> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 65536];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize().as_bytes()))
}

fn preview(ids: &[String], limit: usize) -> String {
    let mut shown = ids.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if ids.len() > limit {
        shown.push_str(&format!(", ... and {} more", ids.len() - limit));
    }
    shown
}
