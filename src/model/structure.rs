// src/model/structure.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{SceneError, SceneResult};
use crate::utils::linalg;

/// Occupancies on a site must sum to one within this tolerance
pub const OCCUPANCY_TOLERANCE: f64 = 1e-4;

/// A chemical species: element plus an optional formal oxidation state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Species {
    pub element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxidation_state: Option<i8>,
}

impl Species {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            oxidation_state: None,
        }
    }

    pub fn with_oxidation_state(element: &str, oxidation_state: i8) -> Self {
        Self {
            element: element.to_string(),
            oxidation_state: Some(oxidation_state),
        }
    }
}

impl fmt::Display for Species {
    /// "Fe", "Fe3+", "Na+", "O2-"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oxidation_state {
            None => write!(f, "{}", self.element),
            Some(oxi) => {
                let sign = if oxi < 0 { "-" } else { "+" };
                let magnitude = oxi.unsigned_abs();
                if magnitude == 1 {
                    write!(f, "{}{}", self.element, sign)
                } else {
                    write!(f, "{}{}{}", self.element, magnitude, sign)
                }
            }
        }
    }
}

/// One species component of a site with its fractional occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesOccupancy {
    #[serde(flatten)]
    pub species: Species,
    pub occu: f64,
}

impl SpeciesOccupancy {
    pub fn new(species: Species, occu: f64) -> Self {
        Self { species, occu }
    }
}

/// A crystallographic site. Components keep their input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub species: Vec<SpeciesOccupancy>,
    /// Fractional coordinates, wrapped into [0, 1)
    pub abc: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Site {
    /// Fully occupied single-species site
    pub fn ordered(element: &str, abc: [f64; 3]) -> Self {
        Self {
            species: vec![SpeciesOccupancy::new(Species::new(element), 1.0)],
            abc,
            label: None,
        }
    }

    pub fn disordered(components: Vec<SpeciesOccupancy>, abc: [f64; 3]) -> Self {
        Self {
            species: components,
            abc,
            label: None,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.species.len() == 1
    }
}

/// Lattice vectors as rows, in Angstroms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lattice {
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    pub fn new(matrix: [[f64; 3]; 3]) -> Self {
        Self { matrix }
    }

    pub fn cubic(a: f64) -> Self {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        linalg::frac_to_cart(frac, &self.matrix)
    }

    pub fn volume(&self) -> f64 {
        linalg::cell_volume(&self.matrix).abs()
    }
}

/// Immutable periodic structure. Validated on construction, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStructure")]
pub struct Structure {
    lattice: Lattice,
    sites: Vec<Site>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    site_properties: IndexMap<String, Vec<Value>>,
}

#[derive(Deserialize)]
struct RawStructure {
    lattice: Lattice,
    sites: Vec<Site>,
    #[serde(default)]
    site_properties: IndexMap<String, Vec<Value>>,
}

impl TryFrom<RawStructure> for Structure {
    type Error = SceneError;

    fn try_from(raw: RawStructure) -> Result<Self, Self::Error> {
        let mut structure = Structure::new(raw.lattice, raw.sites)?;
        for (name, values) in raw.site_properties {
            structure = structure.with_site_property(&name, values)?;
        }
        Ok(structure)
    }
}

impl Structure {
    pub fn new(lattice: Lattice, mut sites: Vec<Site>) -> SceneResult<Self> {
        if lattice.volume() < 1e-8 {
            return Err(SceneError::InvalidStructure(
                "lattice matrix is singular".to_string(),
            ));
        }

        for (idx, site) in sites.iter_mut().enumerate() {
            if site.species.is_empty() {
                return Err(SceneError::InvalidStructure(format!(
                    "site {} has no species",
                    idx
                )));
            }
            if let Some(bad) = site.species.iter().find(|c| !(c.occu > 0.0)) {
                return Err(SceneError::InvalidStructure(format!(
                    "site {} has non-positive occupancy {} for {}",
                    idx, bad.occu, bad.species
                )));
            }
            let total: f64 = site.species.iter().map(|c| c.occu).sum();
            if (total - 1.0).abs() > OCCUPANCY_TOLERANCE {
                return Err(SceneError::InvalidStructure(format!(
                    "site {} occupancies sum to {:.4}, expected 1",
                    idx, total
                )));
            }
            for x in site.abc.iter_mut() {
                if !x.is_finite() {
                    return Err(SceneError::InvalidStructure(format!(
                        "site {} has a non-finite coordinate",
                        idx
                    )));
                }
                *x = wrap_unit(*x);
            }
        }

        Ok(Self {
            lattice,
            sites,
            site_properties: IndexMap::new(),
        })
    }

    /// Attach a per-site property. The sequence must have one value per site.
    pub fn with_site_property(mut self, name: &str, values: Vec<Value>) -> SceneResult<Self> {
        if values.len() != self.sites.len() {
            return Err(SceneError::InvalidStructure(format!(
                "site property '{}' has {} values for {} sites",
                name,
                values.len(),
                self.sites.len()
            )));
        }
        self.site_properties.insert(name.to_string(), values);
        Ok(self)
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, idx: usize) -> Option<&Site> {
        self.sites.get(idx)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn site_properties(&self) -> &IndexMap<String, Vec<Value>> {
        &self.site_properties
    }

    pub fn site_property(&self, name: &str) -> Option<&[Value]> {
        self.site_properties.get(name).map(|v| v.as_slice())
    }

    pub fn is_ordered(&self) -> bool {
        self.sites.iter().all(Site::is_ordered)
    }

    /// Distinct element symbols in order of first appearance
    pub fn elements(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for site in &self.sites {
            for comp in &site.species {
                if !seen.contains(&comp.species.element.as_str()) {
                    seen.push(comp.species.element.as_str());
                }
            }
        }
        seen
    }
}

fn wrap_unit(x: f64) -> f64 {
    let wrapped = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negatives
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
