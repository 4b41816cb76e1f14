//src/model/mod.rs
pub mod elements;
pub mod graph;
pub mod properties;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::Rgb;
pub use graph::{Adjacency, BondEdge, BondingGraph, Image, Neighbor};
pub use properties::{classify_site_properties, PropertyClassification, PropertyKind};
pub use structure::{Lattice, Site, Species, SpeciesOccupancy, Structure};
