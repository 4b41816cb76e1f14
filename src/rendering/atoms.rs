// src/rendering/atoms.rs
// Drawn atoms as sphere fragments, one per species component

use serde::Serialize;
use std::f64::consts::TAU;

use super::images::{AtomArena, DisplayWindow};
use super::legend::SiteColors;
use super::primitives::{Primitive, Spheres};
use super::radius::SiteRadii;
use crate::model::graph::Image;
use crate::model::{Lattice, Site, Structure};
use crate::utils::geometry::sub;

/// One slice of a sphere. Ordered sites have a single fragment covering [0, 2π).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereFragment {
    /// Tooltip text, e.g. "Fe" or "Fe (50% occupancy)"
    pub label: String,
    pub color: String,
    pub radius: f64,
    pub phi_start: f64,
    pub phi_end: f64,
}

impl SphereFragment {
    pub fn is_full_sphere(&self) -> bool {
        self.phi_start == 0.0 && self.phi_end == TAU
    }

    pub fn to_primitive(&self, position: [f64; 3]) -> Primitive {
        let (phi_start, phi_end) = if self.is_full_sphere() {
            (None, None)
        } else {
            (Some(self.phi_start), Some(self.phi_end))
        };
        Primitive::Sphere(Spheres {
            positions: vec![position],
            color: Some(self.color.clone()),
            radius: Some(self.radius),
            phi_start,
            phi_end,
            visible: None,
        })
    }
}

/// A drawn (site, image) pair with its arena index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomRecord {
    pub index: usize,
    pub site: usize,
    pub image: Image,
    pub position: [f64; 3],
    pub fragments: Vec<SphereFragment>,
}

/// Window midpoint mapped to Cartesian space; every position is relative to it
pub fn geometric_center(lattice: &Lattice, window: &DisplayWindow) -> [f64; 3] {
    lattice.frac_to_cart(window.center_frac())
}

pub fn atom_position(lattice: &Lattice, site: &Site, image: Image, center: [f64; 3]) -> [f64; 3] {
    let frac = [
        site.abc[0] + image[0] as f64,
        site.abc[1] + image[1] as f64,
        site.abc[2] + image[2] as f64,
    ];
    sub(lattice.frac_to_cart(frac), center)
}

/// Fragments tile [0, 2π) contiguously in component order; the last one ends exactly at 2π
pub fn site_fragments(site: &Site, site_idx: usize, colors: &SiteColors, radii: &SiteRadii) -> Vec<SphereFragment> {
    let last = site.species.len().saturating_sub(1);
    let mut phi = 0.0;

    site.species
        .iter()
        .enumerate()
        .map(|(k, comp)| {
            let phi_end = if k == last { TAU } else { phi + comp.occu * TAU };
            let label = if site.is_ordered() {
                comp.species.to_string()
            } else {
                format!("{} ({:.0}% occupancy)", comp.species, comp.occu * 100.0)
            };
            let fragment = SphereFragment {
                label,
                color: colors.component(site_idx, k).to_hex(),
                radius: radii.component(site_idx, k),
                phi_start: phi,
                phi_end,
            };
            phi = phi_end;
            fragment
        })
        .collect()
}

pub fn build_atoms(
    structure: &Structure,
    arena: &AtomArena,
    colors: &SiteColors,
    radii: &SiteRadii,
    center: [f64; 3],
) -> Vec<AtomRecord> {
    // Fragments depend on the site only, so compute them once per site
    let per_site: Vec<Vec<SphereFragment>> = structure
        .sites()
        .iter()
        .enumerate()
        .map(|(idx, site)| site_fragments(site, idx, colors, radii))
        .collect();

    arena
        .keys()
        .iter()
        .enumerate()
        .filter_map(|(index, key)| {
            let site = structure.site(key.site)?;
            Some(AtomRecord {
                index,
                site: key.site,
                image: key.image,
                position: atom_position(structure.lattice(), site, key.image, center),
                fragments: per_site[key.site].clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Warnings;
    use crate::model::{BondingGraph, Species, SpeciesOccupancy};
    use crate::rendering::images::enumerate_images;
    use crate::rendering::legend::{resolve_colors, ColorScheme};
    use crate::rendering::radius::{resolve_radii, RadiusStrategy};

    fn styles(s: &Structure) -> (SiteColors, SiteRadii) {
        let mut w = Warnings::new();
        (
            resolve_colors(s, &ColorScheme::Jmol, None, &mut w).unwrap(),
            resolve_radii(s, RadiusStrategy::Covalent, &mut w).unwrap(),
        )
    }

    #[test]
    fn test_occupancy_tiling() {
        let s = Structure::new(
            Lattice::cubic(4.0),
            vec![Site::disordered(
                vec![
                    SpeciesOccupancy::new(Species::new("Fe"), 0.5),
                    SpeciesOccupancy::new(Species::new("Co"), 0.3),
                    SpeciesOccupancy::new(Species::new("Ni"), 0.2),
                ],
                [0.0; 3],
            )],
        )
        .unwrap();
        let (colors, radii) = styles(&s);
        let frags = site_fragments(&s.sites()[0], 0, &colors, &radii);

        assert_eq!(frags.len(), 3);
        assert_eq!(frags[0].phi_start, 0.0);
        for pair in frags.windows(2) {
            assert_eq!(pair[0].phi_end, pair[1].phi_start);
        }
        assert_eq!(frags[2].phi_end, TAU);
        assert!((frags[0].phi_end - 0.5 * TAU).abs() < 1e-12);
        assert_eq!(frags[1].label, "Co (30% occupancy)");
        assert!((frags[2].radius - 1.24).abs() < 1e-12);
        assert!(frags.iter().all(|f| !f.is_full_sphere()));
    }

    #[test]
    fn test_ordered_site_full_sphere() {
        let s = Structure::new(Lattice::cubic(4.0), vec![Site::ordered("O", [0.5; 3])]).unwrap();
        let (colors, radii) = styles(&s);
        let frags = site_fragments(&s.sites()[0], 0, &colors, &radii);
        assert_eq!(frags.len(), 1);
        assert!(frags[0].is_full_sphere());
        match frags[0].to_primitive([0.0; 3]) {
            Primitive::Sphere(sp) => {
                assert!(sp.phi_start.is_none());
                assert!(sp.phi_end.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_positions_relative_to_window_center() {
        let s = Structure::new(
            Lattice::cubic(4.0),
            vec![Site::ordered("Cs", [0.0; 3]), Site::ordered("Cl", [0.5; 3])],
        )
        .unwrap();
        let adj = BondingGraph::empty().adjacency(2).unwrap();
        let window = DisplayWindow::default();
        let arena = enumerate_images(&s, &adj, &window, false, false);
        let (colors, radii) = styles(&s);
        let center = geometric_center(s.lattice(), &window);
        assert_eq!(center, [2.0, 2.0, 2.0]);

        let atoms = build_atoms(&s, &arena, &colors, &radii, center);
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].position, [-2.0, -2.0, -2.0]);
        assert_eq!(atoms[1].position, [0.0, 0.0, 0.0]);
        assert_eq!(atoms[1].index, 1);
    }
}
