// src/rendering/polyhedra.rs
// COORDINATION POLYHEDRA - detection from the bonding graph, hulls, default type selection

use chull::ConvexHullWrapper;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::atoms::AtomRecord;
use super::images::{AtomArena, AtomKey};
use super::legend::SiteColors;
use super::primitives::{Convex, Primitive};
use crate::error::{SceneWarning, Warnings};
use crate::model::graph::{add_image, Adjacency};
use crate::model::{Site, Structure};
use crate::utils::geometry::is_coplanar;

/// Above this many polyhedron types the default set is chosen greedily
pub const MAX_EXACT_LABELS: usize = 16;

const COPLANAR_TOLERANCE: f64 = 1e-6;

/// A coordination polyhedron around a drawn atom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyhedron {
    pub center: usize,             // Atom index of the central atom
    pub vertices: Vec<usize>,      // Atom indices of the coordinating atoms
    pub hull: Vec<[usize; 3]>,     // Triangles, indexing into `vertices`/`positions`
    pub positions: Vec<[f64; 3]>,  // Vertex positions
    pub color: String,
}

impl Polyhedron {
    pub fn to_primitive(&self, opacity: Option<f64>, visible: Option<bool>) -> Primitive {
        Primitive::Convex(Convex {
            positions: self.positions.clone(),
            hull: self.hull.clone(),
            color: Some(self.color.clone()),
            opacity,
            visible,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolyhedraSummary {
    pub polyhedra_by_type: BTreeMap<String, Vec<Polyhedron>>,
    /// All self-consistent types, sorted
    pub polyhedra_types: Vec<String>,
    /// Mutually compatible subset shown by default
    pub default_polyhedra_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HullError {
    TooFewPoints(usize),
    Coplanar,
    Failed(String),
    UnmatchedVertex,
}

impl fmt::Display for HullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HullError::TooFewPoints(n) => write!(f, "{} points cannot enclose a volume", n),
            HullError::Coplanar => write!(f, "neighbors are coplanar"),
            HullError::Failed(e) => write!(f, "hull computation failed: {}", e),
            HullError::UnmatchedVertex => write!(f, "hull vertex does not match any input point"),
        }
    }
}

/// Triangulated convex hull of `points`, as index triples into `points`
pub fn convex_hull(points: &[[f64; 3]]) -> Result<Vec<[usize; 3]>, HullError> {
    if points.len() < 4 {
        return Err(HullError::TooFewPoints(points.len()));
    }
    if is_coplanar(points, COPLANAR_TOLERANCE) {
        return Err(HullError::Coplanar);
    }

    let points_for_hull: Vec<Vec<f64>> = points.iter().map(|p| p.to_vec()).collect();
    let hull = ConvexHullWrapper::try_new(&points_for_hull, None)
        .map_err(|e| HullError::Failed(format!("{:?}", e)))?;
    let (verts, indices) = hull.vertices_indices();

    // The hull reports its own vertex list; map it back onto the input order
    let to_input: Vec<usize> = verts
        .iter()
        .map(|v| {
            points
                .iter()
                .position(|p| p[0] == v[0] && p[1] == v[1] && p[2] == v[2])
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(HullError::UnmatchedVertex)?;

    Ok(indices
        .chunks_exact(3)
        .map(|tri| [to_input[tri[0]], to_input[tri[1]], to_input[tri[2]]])
        .collect())
}

/// "Ti-centered", or "Fe, Co-centered" for a mixed site
pub fn polyhedron_label(site: &Site) -> String {
    let species: Vec<String> = site.species.iter().map(|c| c.species.to_string()).collect();
    format!("{}-centered", species.join(", "))
}

// ===== STEP 1: complete environments with a valid hull =====

pub fn find_candidates(
    structure: &Structure,
    adjacency: &Adjacency,
    arena: &AtomArena,
    atoms: &[AtomRecord],
    colors: &SiteColors,
    warnings: &mut Warnings,
) -> Vec<(String, Polyhedron)> {
    let mut candidates = Vec::new();

    for (site_idx, site) in structure.sites().iter().enumerate() {
        let cn = adjacency.coordination_number(site_idx);
        if cn <= 2 {
            continue;
        }
        let label = polyhedron_label(site);

        for (center, image) in arena.images_of(site_idx) {
            let vertices: Vec<usize> = adjacency
                .neighbors(site_idx)
                .iter()
                .filter_map(|n| arena.index_of(&AtomKey::new(n.site, add_image(image, n.offset))))
                .collect();

            if vertices.len() != cn {
                log::debug!(
                    "Atom {} has {} of {} neighbors drawn, no polyhedron",
                    center,
                    vertices.len(),
                    cn
                );
                continue;
            }

            let positions: Vec<[f64; 3]> = vertices
                .iter()
                .filter_map(|&v| atoms.get(v).map(|a| a.position))
                .collect();

            match convex_hull(&positions) {
                Ok(hull) => candidates.push((
                    label.clone(),
                    Polyhedron {
                        center,
                        vertices,
                        hull,
                        positions,
                        color: colors.bond_color(site_idx).to_hex(),
                    },
                )),
                Err(e) => warnings.push(SceneWarning::DegenerateHull {
                    center,
                    reason: e.to_string(),
                }),
            }
        }
    }

    candidates
}

// ===== STEP 2-3: grouping and self-consistency =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSets {
    pub centers: BTreeSet<usize>,
    pub vertices: BTreeSet<usize>,
}

impl LabelSets {
    fn from_polyhedra(polyhedra: &[Polyhedron]) -> Self {
        let mut sets = LabelSets::default();
        for p in polyhedra {
            sets.centers.insert(p.center);
            sets.vertices.extend(p.vertices.iter().copied());
        }
        sets
    }

    /// True when some vertex of `self` is a center of `other`
    fn covers_center_of(&self, other: &LabelSets) -> bool {
        self.vertices.iter().any(|v| other.centers.contains(v))
    }
}

// ===== STEP 4: compatible default subset =====

/// Labels whose polyhedra never use another shown label's centers as vertices.
/// Exhaustive over the power set: most centers covered, then more labels, then
/// lexicographically smallest label list.
pub fn select_default_types(sets: &BTreeMap<String, LabelSets>, warnings: &mut Warnings) -> Vec<String> {
    let labels: Vec<&String> = sets.keys().collect();
    let n = labels.len();
    if n == 0 {
        return Vec::new();
    }

    let groups: Vec<&LabelSets> = sets.values().collect();
    let conflict = |i: usize, j: usize| {
        groups[i].covers_center_of(groups[j]) || groups[j].covers_center_of(groups[i])
    };

    if n > MAX_EXACT_LABELS {
        warnings.push(SceneWarning::GreedyPolyhedraSelection { labels: n });
        return greedy_selection(&labels, &groups, conflict);
    }

    let mut best_mask = 0u32;
    let mut best_score = (0usize, 0usize);

    for mask in 1u32..(1u32 << n) {
        let members: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
        let valid = members
            .iter()
            .enumerate()
            .all(|(a, &i)| members[a + 1..].iter().all(|&j| !conflict(i, j)));
        if !valid {
            continue;
        }

        let covered: BTreeSet<usize> = members
            .iter()
            .flat_map(|&i| groups[i].centers.iter().copied())
            .collect();
        let score = (covered.len(), members.len());

        let better = score > best_score
            || (score == best_score && subset_names(&labels, mask) < subset_names(&labels, best_mask));
        if better {
            best_score = score;
            best_mask = mask;
        }
    }

    subset_names(&labels, best_mask)
        .into_iter()
        .cloned()
        .collect()
}

fn subset_names<'a>(labels: &[&'a String], mask: u32) -> Vec<&'a String> {
    labels
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, l)| *l)
        .collect()
}

fn greedy_selection(
    labels: &[&String],
    groups: &[&LabelSets],
    conflict: impl Fn(usize, usize) -> bool,
) -> Vec<String> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        groups[b]
            .centers
            .len()
            .cmp(&groups[a].centers.len())
            .then_with(|| labels[a].cmp(labels[b]))
    });

    let mut chosen: Vec<usize> = Vec::new();
    for i in order {
        if chosen.iter().all(|&j| !conflict(i, j)) {
            chosen.push(i);
        }
    }
    chosen.sort_unstable();
    chosen.into_iter().map(|i| labels[i].clone()).collect()
}

pub fn build_polyhedra(
    structure: &Structure,
    adjacency: &Adjacency,
    arena: &AtomArena,
    atoms: &[AtomRecord],
    colors: &SiteColors,
    warnings: &mut Warnings,
) -> PolyhedraSummary {
    let mut by_type: BTreeMap<String, Vec<Polyhedron>> = BTreeMap::new();
    for (label, polyhedron) in find_candidates(structure, adjacency, arena, atoms, colors, warnings) {
        by_type.entry(label).or_default().push(polyhedron);
    }

    // A type whose vertices include its own centers would draw overlapping hulls
    let mut sets: BTreeMap<String, LabelSets> = BTreeMap::new();
    by_type.retain(|label, polyhedra| {
        let group = LabelSets::from_polyhedra(polyhedra);
        if group.covers_center_of(&group) {
            log::debug!("Discarding {} polyhedra: vertices coincide with centers", label);
            false
        } else {
            sets.insert(label.clone(), group);
            true
        }
    });

    let default_polyhedra_types = select_default_types(&sets, warnings);
    log::debug!(
        "Polyhedra types {:?}, shown by default {:?}",
        sets.keys().collect::<Vec<_>>(),
        default_polyhedra_types
    );

    PolyhedraSummary {
        polyhedra_types: by_type.keys().cloned().collect(),
        polyhedra_by_type: by_type,
        default_polyhedra_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(centers: &[usize], vertices: &[usize]) -> LabelSets {
        LabelSets {
            centers: centers.iter().copied().collect(),
            vertices: vertices.iter().copied().collect(),
        }
    }

    #[test]
    fn test_tetrahedron_hull() {
        let points = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let hull = convex_hull(&points).unwrap();
        assert_eq!(hull.len(), 4);
        let used: BTreeSet<usize> = hull.iter().flatten().copied().collect();
        assert_eq!(used.len(), 4);
    }

    #[test]
    fn test_octahedron_hull() {
        let points = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let hull = convex_hull(&points).unwrap();
        assert_eq!(hull.len(), 8);
        assert!(hull.iter().flatten().all(|&i| i < 6));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(
            convex_hull(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            Err(HullError::TooFewPoints(3))
        );
        let square = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
        ];
        assert_eq!(convex_hull(&square), Err(HullError::Coplanar));
    }

    #[test]
    fn test_selection_prefers_coverage() {
        // A's vertices are B's centers, so A and B cannot both be shown
        let mut groups = BTreeMap::new();
        groups.insert("A-centered".to_string(), sets(&[0, 1], &[10, 11]));
        groups.insert("B-centered".to_string(), sets(&[10, 11, 12], &[0, 1]));
        groups.insert("C-centered".to_string(), sets(&[20], &[30]));

        let chosen = select_default_types(&groups, &mut Warnings::new());
        assert_eq!(chosen, vec!["B-centered", "C-centered"]);
    }

    #[test]
    fn test_selection_tie_breaks_lexicographically() {
        let mut groups = BTreeMap::new();
        groups.insert("Zn-centered".to_string(), sets(&[0, 1], &[5, 6]));
        groups.insert("Al-centered".to_string(), sets(&[5, 6], &[0, 1]));

        let chosen = select_default_types(&groups, &mut Warnings::new());
        assert_eq!(chosen, vec!["Al-centered"]);
    }

    #[test]
    fn test_selection_non_overlap() {
        let mut groups = BTreeMap::new();
        for i in 0..6usize {
            // Every label's vertices hit the next label's centers
            groups.insert(
                format!("X{}-centered", i),
                sets(&[i * 10], &[((i + 1) % 6) * 10]),
            );
        }
        let chosen = select_default_types(&groups, &mut Warnings::new());
        assert_eq!(chosen.len(), 3);
        for a in &chosen {
            for b in &chosen {
                if a != b {
                    assert!(!groups[a].covers_center_of(&groups[b]));
                }
            }
        }
    }

    #[test]
    fn test_greedy_beyond_limit() {
        let mut groups = BTreeMap::new();
        for i in 0..(MAX_EXACT_LABELS + 2) {
            groups.insert(format!("L{:02}-centered", i), sets(&[i], &[1000 + i]));
        }
        let mut warnings = Warnings::new();
        let chosen = select_default_types(&groups, &mut warnings);
        assert_eq!(chosen.len(), MAX_EXACT_LABELS + 2);
        assert_eq!(warnings.len(), 1);
    }
}
