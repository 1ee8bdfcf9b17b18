//! # lotmap
//!
//! Carte de vente de lots: plans SVG convertis par `svgmap`, joints à un
//! catalogue de lots, avec parcours d'achat en mémoire.
//!
//! ## Features
//!
//! - Catalogue de lots (JSON ou preset embarqué `demo`)
//! - Décisions de rendu (couleur, interactivité, labels) et rendu SVG
//! - Parcours d'achat: sélection, confirmation, annulation
//! - Export GeoJSON des lots, rapport de conversion
//! - Lotissement en grille avec routes
//!
//! ## Usage CLI
//!
//! ```bash
//! # Plan SVG → configuration JSON
//! lotmap convert --path ./ward.svg --output ./maps/
//!
//! # Rendu coloré avec deux lots vendus
//! lotmap render --path ./ward.svg --output ./ward-status.svg --mode single --purchased estate-01,estate-07
//!
//! # Rapport de conversion
//! lotmap inspect --path ./ward.svg --human
//! ```

pub mod config;
pub mod estate;
pub mod export;
pub mod grid;
pub mod render;
pub mod report;
pub mod sales;

pub use config::{Config, MapMode, RenderSettings};
pub use estate::{Estate, EstateCatalog, EstateStatus};
pub use render::{ClickEvent, RenderDecision};
pub use report::ConversionReport;
pub use sales::{SalesError, SalesState, SalesSummary};
