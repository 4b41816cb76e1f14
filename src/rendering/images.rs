// src/rendering/images.rs
// Which periodic images of each site are drawn, and their stable atom indices

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{SceneError, SceneResult};
use crate::model::graph::{add_image, Adjacency, Image};
use crate::model::Structure;

/// Sites this close (fractional) to a cell face are repeated on the opposite face
pub const BOUNDARY_TOLERANCE: f64 = 0.05;

/// Integer range of periodic images per lattice axis, `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayWindow {
    pub ranges: [[i32; 2]; 3],
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self::uniform(0, 1)
    }
}

impl DisplayWindow {
    pub fn new(ranges: [[i32; 2]; 3]) -> Self {
        Self { ranges }
    }

    pub fn uniform(min: i32, max: i32) -> Self {
        Self::new([[min, max]; 3])
    }

    pub fn validate(&self) -> SceneResult<()> {
        for (axis, [min, max]) in self.ranges.iter().enumerate() {
            if min > max {
                return Err(SceneError::InvalidDisplayWindow {
                    axis,
                    min: *min,
                    max: *max,
                });
            }
        }
        Ok(())
    }

    /// Window midpoint in fractional coordinates
    pub fn center_frac(&self) -> [f64; 3] {
        let mid = |axis: usize| 0.5 * (self.ranges[axis][0] + self.ranges[axis][1]) as f64;
        [mid(0), mid(1), mid(2)]
    }

    /// Candidate integer images along one axis
    fn candidates(&self, axis: usize, draw_image_atoms: bool) -> RangeInclusive<i32> {
        let [min, max] = self.ranges[axis];
        if draw_image_atoms {
            (min - 1)..=max
        } else {
            // Empty when min == max
            min..=(max - 1)
        }
    }

    /// Upper bound on per-site candidate images, for callers that want to cap window size
    pub fn image_count(&self, draw_image_atoms: bool) -> u64 {
        (0..3)
            .map(|axis| self.candidates(axis, draw_image_atoms).count() as u64)
            .product()
    }

    fn contains(&self, point: [f64; 3], tolerance: f64) -> bool {
        (0..3).all(|axis| {
            let [min, max] = self.ranges[axis];
            point[axis] >= min as f64 - tolerance && point[axis] <= max as f64 + tolerance
        })
    }
}

/// Identity of a drawn atom: a site and the periodic image it sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtomKey {
    pub site: usize,
    pub image: Image,
}

impl AtomKey {
    pub fn new(site: usize, image: Image) -> Self {
        Self { site, image }
    }
}

/// Assigns each atom key a stable index on first insertion
#[derive(Debug, Clone, Default)]
pub struct AtomArena {
    keys: Vec<AtomKey>,
    index: FxHashMap<AtomKey, usize>,
    /// Keys below this index came from the window itself, the rest from bond extension
    window_len: usize,
}

impl AtomArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key's index and whether it was newly added
    pub fn insert(&mut self, key: AtomKey) -> (usize, bool) {
        if let Some(&idx) = self.index.get(&key) {
            return (idx, false);
        }
        let idx = self.keys.len();
        self.keys.push(key);
        self.index.insert(key, idx);
        (idx, true)
    }

    pub fn index_of(&self, key: &AtomKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn key(&self, idx: usize) -> Option<AtomKey> {
        self.keys.get(idx).copied()
    }

    pub fn keys(&self) -> &[AtomKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Indices of the drawn images of one site
    pub fn images_of(&self, site: usize) -> impl Iterator<Item = (usize, Image)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(move |(_, k)| k.site == site)
            .map(|(idx, k)| (idx, k.image))
    }
}

/// Enumerate drawn atoms: every in-window image of every site, then (optionally)
/// one pass adding the far ends of bonds leaving the window.
pub fn enumerate_images(
    structure: &Structure,
    adjacency: &Adjacency,
    window: &DisplayWindow,
    draw_image_atoms: bool,
    bonded_sites_outside_unit_cell: bool,
) -> AtomArena {
    let mut arena = AtomArena::new();
    let tolerance = if draw_image_atoms { BOUNDARY_TOLERANCE } else { 0.0 };

    for (site_idx, site) in structure.sites().iter().enumerate() {
        for i in window.candidates(0, draw_image_atoms) {
            for j in window.candidates(1, draw_image_atoms) {
                for k in window.candidates(2, draw_image_atoms) {
                    let point = [
                        site.abc[0] + i as f64,
                        site.abc[1] + j as f64,
                        site.abc[2] + k as f64,
                    ];
                    if window.contains(point, tolerance) {
                        arena.insert(AtomKey::new(site_idx, [i, j, k]));
                    }
                }
            }
        }
    }
    arena.window_len = arena.len();

    if bonded_sites_outside_unit_cell {
        // Not transitive: only atoms from the window seed the extension
        for idx in 0..arena.window_len {
            let key = arena.keys[idx];
            for neighbor in adjacency.neighbors(key.site) {
                let far = AtomKey::new(neighbor.site, add_image(key.image, neighbor.offset));
                let (_, added) = arena.insert(far);
                if added {
                    log::debug!(
                        "Extension added site {} at image {:?}",
                        far.site,
                        far.image
                    );
                }
            }
        }
    }

    log::debug!(
        "{} atoms drawn ({} from window, {} from bonds)",
        arena.len(),
        arena.window_len,
        arena.len() - arena.window_len
    );
    arena
}
