//! Catalogue des lots (estates) et jointure avec la géométrie SVG

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Statut commercial d'un lot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstateStatus {
    #[default]
    Available,
    Purchased,
    Reserved,
}

impl fmt::Display for EstateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstateStatus::Available => write!(f, "available"),
            EstateStatus::Purchased => write!(f, "purchased"),
            EstateStatus::Reserved => write!(f, "reserved"),
        }
    }
}

/// Lot à vendre, rattaché à une géométrie par `shape_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estate {
    /// Identifiant de la géométrie SVG (data-id, id ou id généré)
    pub shape_id: String,
    pub lot_number: u32,
    #[serde(default)]
    pub status: EstateStatus,
    pub price: f64,
    /// Surface en m²
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_facing: Option<String>,
}

/// Catalogue indexé par identifiant de géométrie
///
/// En cas de doublon, la dernière entrée l'emporte pour la recherche;
/// l'ordre de déclaration est conservé pour l'itération.
#[derive(Debug, Clone, Default)]
pub struct EstateCatalog {
    estates: Vec<Estate>,
    by_shape: HashMap<String, usize>,
}

impl EstateCatalog {
    pub fn new(estates: Vec<Estate>) -> Self {
        let by_shape = estates
            .iter()
            .enumerate()
            .map(|(i, e)| (e.shape_id.clone(), i))
            .collect();
        Self { estates, by_shape }
    }

    /// Recherche un lot par identifiant de géométrie
    pub fn get(&self, shape_id: &str) -> Option<&Estate> {
        self.by_shape.get(shape_id).map(|&i| &self.estates[i])
    }

    pub fn contains(&self, shape_id: &str) -> bool {
        self.by_shape.contains_key(shape_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Estate> {
        self.estates.iter()
    }

    pub fn len(&self) -> usize {
        self.estates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estates.is_empty()
    }
}

impl FromIterator<Estate> for EstateCatalog {
    fn from_iter<I: IntoIterator<Item = Estate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
