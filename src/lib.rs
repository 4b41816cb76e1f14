// src/lib.rs
pub mod bonding;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod pipeline;
pub mod rendering;
pub mod utils;

pub use bonding::{resolve_graph, BondingOracle, CutoffBonding, OracleError};
pub use config::{Config, SceneOptions};
pub use error::{SceneError, SceneResult, SceneWarning, Warnings};
pub use model::{BondEdge, BondingGraph, Lattice, Site, Species, SpeciesOccupancy, Structure};
pub use pipeline::{build_scene, build_scenes, SceneOutput, SceneRequest};
pub use rendering::{ColorScheme, DisplayWindow, RadiusStrategy, Scene, SceneCache};
