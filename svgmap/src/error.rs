//! Types d'erreurs pour le crate svgmap

use thiserror::Error;

/// Erreurs pouvant survenir lors de la conversion SVG → carte
///
/// Seules `InvalidDocument` et `MissingBoundary` sont produites par le
/// pipeline de conversion; toutes les autres anomalies (viewBox mal formé,
/// attributs manquants, points de polygone illisibles...) sont absorbées
/// par des valeurs par défaut.
#[derive(Debug, Error)]
pub enum SvgMapError {
    /// Erreur d'I/O lors de la lecture d'un fichier SVG
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document illisible ou sans élément <svg>
    #[error("Invalid SVG: {0}")]
    InvalidDocument(String),

    /// Mode "single" demandé sur un document sans aucun <path>
    #[error("No boundary path found in SVG")]
    MissingBoundary,

    /// Encodage déclaré non supporté
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

impl SvgMapError {
    /// Crée une erreur de document invalide avec contexte
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SvgMapError::invalid_document("No <svg> element found").to_string(),
            "Invalid SVG: No <svg> element found"
        );
        assert_eq!(
            SvgMapError::MissingBoundary.to_string(),
            "No boundary path found in SVG"
        );
    }
}
