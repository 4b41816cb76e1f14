// src/error.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration errors. Any of these aborts scene generation with no partial output.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown color scheme '{scheme}' (valid choices: {})", .valid.join(", "))]
    UnknownColorScheme { scheme: String, valid: Vec<String> },

    #[error("color scheme '{scheme}' cannot be used: {reason}")]
    InvalidColorScheme { scheme: String, reason: String },

    #[error("color scheme '{scheme}' refers to a categorical site property, which is not supported yet")]
    UnsupportedColorScheme { scheme: String },

    #[error("unknown radius strategy '{strategy}' (valid choices: {})", .valid.join(", "))]
    UnknownRadiusStrategy { strategy: String, valid: Vec<String> },

    #[error("site property '{name}' is required: {reason}")]
    MissingSiteProperty { name: String, reason: String },

    #[error("display window axis {axis} has min {min} greater than max {max}")]
    InvalidDisplayWindow { axis: usize, min: i32, max: i32 },

    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("invalid bonding graph: {0}")]
    InvalidGraph(String),

    #[error("{format} line {line}: {reason}")]
    Parse {
        format: &'static str,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Recoverable, per-item problems. Scene generation continues past these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneWarning {
    OxidationStateFallback { reason: String },
    MissingRadius { species: String, strategy: String },
    MissingColor { element: String, scheme: String },
    PaletteExhausted { elements: usize, colors: usize },
    DegenerateHull { center: usize, reason: String },
    BondingUnavailable { reason: String },
    GreedyPolyhedraSelection { labels: usize },
}

impl fmt::Display for SceneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneWarning::OxidationStateFallback { reason } => write!(
                f,
                "Could not determine oxidation states ({}), using average ionic radii",
                reason
            ),
            SceneWarning::MissingRadius { species, strategy } => write!(
                f,
                "No {} radius tabulated for {}, using 1.0",
                strategy, species
            ),
            SceneWarning::MissingColor { element, scheme } => {
                write!(f, "No {} color for {}, using default", scheme, element)
            }
            SceneWarning::PaletteExhausted { elements, colors } => write!(
                f,
                "{} elements but only {} accessible colors, some sites get the default color",
                elements, colors
            ),
            SceneWarning::DegenerateHull { center, reason } => {
                write!(f, "Skipping polyhedron around atom {}: {}", center, reason)
            }
            SceneWarning::BondingUnavailable { reason } => {
                write!(f, "Bonding graph unavailable ({}), drawing without bonds", reason)
            }
            SceneWarning::GreedyPolyhedraSelection { labels } => write!(
                f,
                "{} polyhedron types is too many for an exhaustive search, default set chosen greedily",
                labels
            ),
        }
    }
}

/// Collects warnings for one scene build. Each distinct warning is logged once.
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    items: Vec<SceneWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: SceneWarning) {
        if self.items.contains(&warning) {
            return;
        }
        log::warn!("{}", warning);
        self.items.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[SceneWarning] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<SceneWarning> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scheme_lists_choices() {
        let err = SceneError::UnknownColorScheme {
            scheme: "rainbow".into(),
            valid: vec!["Jmol".into(), "VESTA".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("rainbow"));
        assert!(msg.contains("Jmol, VESTA"));
    }

    #[test]
    fn test_warnings_are_deduplicated() {
        let mut warnings = Warnings::new();
        let w = SceneWarning::MissingRadius {
            species: "Xx".into(),
            strategy: "covalent".into(),
        };
        warnings.push(w.clone());
        warnings.push(w);
        assert_eq!(warnings.len(), 1);
    }
}
