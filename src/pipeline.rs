// src/pipeline.rs
// Structure + bonding graph + style options -> scene, legend and polyhedra summary

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SceneOptions;
use crate::error::{SceneError, SceneResult, SceneWarning, Warnings};
use crate::model::{BondingGraph, Structure};
use crate::rendering::atoms::{build_atoms, geometric_center, AtomRecord};
use crate::rendering::bonds::{bond_primitives, build_bonds, Bond, DanglingBond};
use crate::rendering::images::{enumerate_images, DisplayWindow};
use crate::rendering::legend::{resolve_colors, Legend, SiteColors};
use crate::rendering::polyhedra::{build_polyhedra, PolyhedraSummary};
use crate::rendering::radius::{resolve_radii, SiteRadii};
use crate::rendering::scene::Scene;
use crate::rendering::unit_cell::unit_cell_lines;

/// Everything one scene depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRequest {
    pub structure: Structure,
    #[serde(default)]
    pub graph: BondingGraph,
    #[serde(default)]
    pub window: DisplayWindow,
    #[serde(default)]
    pub options: SceneOptions,
}

impl SceneRequest {
    pub fn new(structure: Structure, graph: BondingGraph) -> Self {
        Self {
            structure,
            graph,
            window: DisplayWindow::default(),
            options: SceneOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneOutput {
    pub scene: Scene,
    pub legend: Legend,
    pub polyhedra: PolyhedraSummary,
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<Bond>,
    pub dangling_bonds: Vec<DanglingBond>,
    pub warnings: Vec<SceneWarning>,
}

/// Per-site colors and radii for one build
#[derive(Debug, Clone)]
pub struct SiteStyles {
    pub colors: SiteColors,
    pub radii: SiteRadii,
}

pub fn resolve_styles(
    structure: &Structure,
    options: &SceneOptions,
    warnings: &mut Warnings,
) -> SceneResult<SiteStyles> {
    let colors = resolve_colors(structure, &options.color_scheme, options.color_range, warnings)?;
    let radii = resolve_radii(structure, options.radius_strategy, warnings)?;
    Ok(SiteStyles { colors, radii })
}

pub fn build_scene(request: &SceneRequest) -> SceneResult<SceneOutput> {
    build_scene_from(&request.structure, &request.graph, &request.window, &request.options)
}

pub fn build_scene_from(
    structure: &Structure,
    graph: &BondingGraph,
    window: &DisplayWindow,
    options: &SceneOptions,
) -> SceneResult<SceneOutput> {
    // ===== Configuration checks: fail before producing anything =====
    window.validate()?;
    let adjacency = graph.adjacency(structure.len())?;
    let groups = match &options.group_by_site_property {
        Some(name) => Some(group_labels(structure, name)?),
        None => None,
    };

    let mut warnings = Warnings::new();
    let styles = resolve_styles(structure, options, &mut warnings)?;

    // ===== Geometry =====
    let arena = enumerate_images(
        structure,
        &adjacency,
        window,
        options.draw_image_atoms,
        options.bonded_sites_outside_unit_cell,
    );
    let center = geometric_center(structure.lattice(), window);
    let atoms = build_atoms(structure, &arena, &styles.colors, &styles.radii, center);
    let bond_set = build_bonds(
        structure,
        &adjacency,
        &arena,
        center,
        options.hide_incomplete_bonds,
    );
    let polyhedra = build_polyhedra(
        structure,
        &adjacency,
        &arena,
        &atoms,
        &styles.colors,
        &mut warnings,
    );

    // ===== Scene tree =====
    let mut root = Scene::new(&options.scene_name);
    root.push_scene(atoms_scene(&atoms, groups.as_deref()));

    let mut bonds = Scene::new("bonds");
    for primitive in bond_primitives(
        &bond_set,
        &atoms,
        &styles.colors,
        options.bond_radius,
        options.incomplete_bond_length_scale,
    ) {
        bonds.push_primitive(primitive);
    }
    root.push_scene(bonds);

    let mut polyhedra_scene = Scene::new("polyhedra");
    for (label, members) in &polyhedra.polyhedra_by_type {
        let mut child = Scene::new(label);
        if !polyhedra.default_polyhedra_types.contains(label) {
            child.visible = Some(false);
        }
        for p in members {
            child.push_primitive(p.to_primitive(options.polyhedron_opacity, None));
        }
        polyhedra_scene.push_scene(child);
    }
    root.push_scene(polyhedra_scene);

    let mut cell = Scene::new("unit_cell");
    cell.push_primitive(unit_cell_lines(structure.lattice(), center));
    root.push_scene(cell);

    root.merge_primitives();

    log::info!(
        "Scene '{}': {} atoms ({} in window), {} bonds, {} dangling, {} polyhedra types",
        root.name,
        atoms.len(),
        arena.window_len(),
        bond_set.bonds.len(),
        bond_set.dangling.len(),
        polyhedra.polyhedra_types.len()
    );

    Ok(SceneOutput {
        scene: root,
        legend: styles.colors.legend,
        polyhedra,
        atoms,
        bonds: bond_set.bonds,
        dangling_bonds: bond_set.dangling,
        warnings: warnings.into_vec(),
    })
}

/// Independent requests built on the rayon pool; results keep request order
pub fn build_scenes(requests: &[SceneRequest]) -> Vec<SceneResult<SceneOutput>> {
    requests.par_iter().map(build_scene).collect()
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn group_labels(structure: &Structure, name: &str) -> SceneResult<Vec<String>> {
    let values = structure
        .site_property(name)
        .ok_or_else(|| SceneError::MissingSiteProperty {
            name: name.to_string(),
            reason: "requested for atom grouping".to_string(),
        })?;
    Ok(values.iter().map(value_label).collect())
}

// One child per group value, in first-appearance order
fn atoms_scene(atoms: &[AtomRecord], groups: Option<&[String]>) -> Scene {
    let mut scene = Scene::new("atoms");

    match groups {
        None => {
            for atom in atoms {
                for fragment in &atom.fragments {
                    scene.push_primitive(fragment.to_primitive(atom.position));
                }
            }
        }
        Some(labels) => {
            let mut children: IndexMap<&str, Scene> = IndexMap::new();
            for atom in atoms {
                let label = labels.get(atom.site).map(String::as_str).unwrap_or_default();
                let child = children.entry(label).or_insert_with(|| Scene::new(label));
                for fragment in &atom.fragments {
                    child.push_primitive(fragment.to_primitive(atom.position));
                }
            }
            for (_, child) in children {
                scene.push_scene(child);
            }
        }
    }

    scene
}
