// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::SceneResult;
use crate::rendering::images::DisplayWindow;
use crate::rendering::legend::ColorScheme;
use crate::rendering::radius::RadiusStrategy;

// --- SceneOptions ---
// Declarative style options; every field has a default so partial documents load

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
  pub color_scheme: ColorScheme,
  pub radius_strategy: RadiusStrategy,

  /// Repeat sites lying on a cell face on the opposite face
  pub draw_image_atoms: bool,
  /// Add the far end of bonds that leave the window
  pub bonded_sites_outside_unit_cell: bool,
  /// Drop bonds with an undrawn endpoint instead of drawing stubs
  pub hide_incomplete_bonds: bool,

  pub bond_radius: f64,
  /// Stub length as a fraction of the full bond, when incomplete bonds are shown
  pub incomplete_bond_length_scale: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub polyhedron_opacity: Option<f64>,

  /// Explicit [min, max] for site property coloring
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color_range: Option<[f64; 2]>,
  /// Split the atoms scene into one child scene per value of this property
  #[serde(skip_serializing_if = "Option::is_none")]
  pub group_by_site_property: Option<String>,

  pub scene_name: String,
}

impl Default for SceneOptions {
  fn default() -> Self {
    Self {
      color_scheme: ColorScheme::Jmol,
      radius_strategy: RadiusStrategy::Uniform,
      draw_image_atoms: true,
      bonded_sites_outside_unit_cell: false,
      hide_incomplete_bonds: true,
      bond_radius: 0.1,
      incomplete_bond_length_scale: 0.3,
      polyhedron_opacity: None,
      color_range: None,
      group_by_site_property: None,
      scene_name: "StructureScene".to_string(),
    }
  }
}

// --- Main Config Struct ---

fn default_cache_capacity() -> usize {
  32
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub scene: SceneOptions,

  #[serde(default)]
  pub window: DisplayWindow,

  /// Number of scenes kept by the scene cache
  #[serde(default = "default_cache_capacity")]
  pub cache_capacity: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      scene: SceneOptions::default(),
      window: DisplayWindow::default(),
      cache_capacity: default_cache_capacity(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/cview-scene/settings.json).
  /// Falls back to defaults if the file is missing or unreadable.
  pub fn load() -> Self {
    let path = Self::get_path();
    if !path.exists() {
      log::info!("No config found. Using defaults.");
      return Self::default();
    }
    match Self::load_from(&path) {
      Ok(cfg) => {
        log::info!("Config loaded from {:?}", path);
        cfg
      }
      Err(e) => {
        log::warn!("Error reading config {:?}: {}", path, e);
        Self::default()
      }
    }
  }

  pub fn load_from(path: &Path) -> SceneResult<Self> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> SceneResult<PathBuf> {
    let path = Self::get_path();
    self.save_to(&path)?;
    log::info!("Config saved to {:?}", path);
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> SceneResult<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "cview-scene") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
