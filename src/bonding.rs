// src/bonding.rs
// Bonding graph providers. A supplied graph is authoritative; an oracle is asked only
// when none is given or the caller says bonding options changed.

use thiserror::Error;

use crate::error::{SceneWarning, Warnings};
use crate::model::elements::covalent_radius;
use crate::model::{BondEdge, BondingGraph, Site, Structure};
use crate::utils::geometry::len;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no covalent radius for {0}")]
    MissingRadius(String),

    #[error("{0}")]
    Failed(String),
}

pub trait BondingOracle: Send + Sync {
    fn name(&self) -> &str;
    fn bonds(&self, structure: &Structure) -> Result<BondingGraph, OracleError>;
}

// --- CutoffBonding ---

const MIN_BOND_LENGTH: f64 = 0.4;

/// Bonds any two sites closer than the sum of their covalent radii times `tolerance`,
/// searching images up to one cell away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffBonding {
    pub tolerance: f64,
}

impl Default for CutoffBonding {
    fn default() -> Self {
        Self { tolerance: 1.15 }
    }
}

// Majority component decides the radius of a disordered site
fn site_radius(site: &Site) -> Result<f64, OracleError> {
    let main = site
        .species
        .iter()
        .max_by(|a, b| a.occu.total_cmp(&b.occu))
        .ok_or_else(|| OracleError::Failed("site without species".to_string()))?;
    covalent_radius(&main.species.element)
        .ok_or_else(|| OracleError::MissingRadius(main.species.element.clone()))
}

impl BondingOracle for CutoffBonding {
    fn name(&self) -> &str {
        "cutoff"
    }

    fn bonds(&self, structure: &Structure) -> Result<BondingGraph, OracleError> {
        let radii: Vec<f64> = structure
            .sites()
            .iter()
            .map(site_radius)
            .collect::<Result<_, _>>()?;

        let lattice = structure.lattice();
        let sites = structure.sites();
        let mut edges = Vec::new();

        for (i, a) in sites.iter().enumerate() {
            for (j, b) in sites.iter().enumerate().skip(i) {
                let max_bond_dist = (radii[i] + radii[j]) * self.tolerance;

                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            let image = [dx, dy, dz];
                            if i == j && image == [0, 0, 0] {
                                continue;
                            }
                            let delta = [
                                b.abc[0] + dx as f64 - a.abc[0],
                                b.abc[1] + dy as f64 - a.abc[1],
                                b.abc[2] + dz as f64 - a.abc[2],
                            ];
                            let dist = len(lattice.frac_to_cart(delta));
                            if dist > MIN_BOND_LENGTH && dist < max_bond_dist {
                                edges.push(BondEdge::new(i, j, image));
                            }
                        }
                    }
                }
            }
        }

        // Self-image pairs show up in both directions; the graph collapses them
        let graph = BondingGraph::new(edges);
        log::debug!(
            "{} oracle found {} bonds (tolerance {})",
            self.name(),
            graph.len(),
            self.tolerance
        );
        Ok(graph)
    }
}

/// Pick the graph to draw with. Oracle failures degrade to an empty graph.
pub fn resolve_graph(
    structure: &Structure,
    supplied: Option<BondingGraph>,
    oracle: &dyn BondingOracle,
    bonding_options_changed: bool,
    warnings: &mut Warnings,
) -> BondingGraph {
    if let Some(graph) = supplied {
        if !bonding_options_changed {
            return graph;
        }
        log::info!("Bonding options changed, recomputing bonds with {}", oracle.name());
    }

    match oracle.bonds(structure) {
        Ok(graph) => graph,
        Err(e) => {
            warnings.push(SceneWarning::BondingUnavailable {
                reason: e.to_string(),
            });
            BondingGraph::empty()
        }
    }
}
