//! Parcours d'achat: sélection, confirmation, annulation
//!
//! Le statut des lots n'est jamais écrit dans la géométrie: il vit ici et
//! est joint par identifiant au moment du rendu.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::estate::{Estate, EstateCatalog, EstateStatus};
use crate::render::ClickEvent;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SalesError {
    #[error("Unknown estate: {0}")]
    UnknownEstate(String),

    #[error("Estate {id} is not available ({status})")]
    NotAvailable { id: String, status: EstateStatus },

    #[error("No estate selected")]
    NothingSelected,
}

/// Résultat d'un clic sur la carte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Lot sélectionné, en attente de confirmation
    Selected(String),
    /// Navigation vers une région (vue ville)
    Navigate(String),
    /// Géométrie non interactive
    Ignored,
}

/// État de vente d'une session
#[derive(Debug, Clone, Default)]
pub struct SalesState {
    purchased: BTreeSet<String>,
    selected: Option<String>,
}

impl SalesState {
    /// Initialise l'état avec les lots déjà vendus du catalogue
    pub fn from_catalog(catalog: &EstateCatalog) -> Self {
        let purchased = catalog
            .iter()
            .filter(|e| e.status == EstateStatus::Purchased)
            .map(|e| e.shape_id.clone())
            .collect();
        Self {
            purchased,
            selected: None,
        }
    }

    /// Marque des lots comme vendus (ex: `--purchased` en CLI)
    pub fn with_purchased<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.purchased.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, shape_id: &str) -> bool {
        self.selected.as_deref() == Some(shape_id)
    }

    pub fn is_purchased(&self, shape_id: &str) -> bool {
        self.purchased.contains(shape_id)
    }

    pub fn purchased(&self) -> impl Iterator<Item = &str> {
        self.purchased.iter().map(String::as_str)
    }

    /// Statut effectif d'un lot (les achats de la session priment)
    pub fn status_of(&self, estate: &Estate) -> EstateStatus {
        if self.is_purchased(&estate.shape_id) {
            EstateStatus::Purchased
        } else {
            estate.status
        }
    }

    /// Un lot est achetable s'il est disponible et pas encore acheté
    pub fn is_purchasable(&self, estate: &Estate) -> bool {
        self.status_of(estate) == EstateStatus::Available
    }

    /// Sélectionne un lot disponible
    pub fn select(&mut self, catalog: &EstateCatalog, shape_id: &str) -> Result<(), SalesError> {
        let estate = catalog
            .get(shape_id)
            .ok_or_else(|| SalesError::UnknownEstate(shape_id.to_string()))?;

        if !self.is_purchasable(estate) {
            return Err(SalesError::NotAvailable {
                id: shape_id.to_string(),
                status: self.status_of(estate),
            });
        }

        debug!(shape_id, lot = estate.lot_number, "Estate selected");
        self.selected = Some(shape_id.to_string());
        Ok(())
    }

    /// Confirme l'achat du lot sélectionné et retourne son identifiant
    pub fn confirm(&mut self) -> Result<String, SalesError> {
        let id = self.selected.take().ok_or(SalesError::NothingSelected)?;
        info!(shape_id = %id, "Purchase confirmed");
        self.purchased.insert(id.clone());
        Ok(id)
    }

    /// Abandonne la sélection en cours
    pub fn cancel(&mut self) {
        if let Some(id) = self.selected.take() {
            debug!(shape_id = %id, "Selection cancelled");
        }
    }

    /// Traite un clic: seuls les lots achetables et les régions réagissent
    pub fn click(&mut self, catalog: &EstateCatalog, event: &ClickEvent) -> ClickOutcome {
        match event {
            ClickEvent::Region(id) => ClickOutcome::Navigate(id.clone()),
            ClickEvent::Estate(id) => match self.select(catalog, id) {
                Ok(()) => ClickOutcome::Selected(id.clone()),
                Err(e) => {
                    debug!(shape_id = %id, reason = %e, "Click ignored");
                    ClickOutcome::Ignored
                }
            },
        }
    }

    /// Statistiques de vente
    pub fn summary(&self, catalog: &EstateCatalog) -> SalesSummary {
        let mut summary = SalesSummary {
            total: catalog.len(),
            ..Default::default()
        };
        let mut available_price = 0.0;

        for estate in catalog.iter() {
            match self.status_of(estate) {
                EstateStatus::Available => {
                    summary.available += 1;
                    available_price += estate.price;
                }
                EstateStatus::Purchased => summary.purchased += 1,
                EstateStatus::Reserved => summary.reserved += 1,
            }
        }

        if summary.available > 0 {
            summary.average_available_price = available_price / summary.available as f64;
        }
        summary
    }
}

/// Statistiques du tableau de bord
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub total: usize,
    pub available: usize,
    pub purchased: usize,
    pub reserved: usize,
    /// 0 quand aucun lot n'est disponible
    pub average_available_price: f64,
}

impl SalesSummary {
    pub fn display(&self) -> String {
        format!(
            "{} lots: {} available, {} purchased, {} reserved, avg price {:.0}",
            self.total, self.available, self.purchased, self.reserved, self.average_available_price
        )
    }
}
