// src/rendering/unit_cell.rs

use super::primitives::{Lines, Primitive};
use crate::model::Lattice;
use crate::utils::geometry::sub;

// Corner i sits at fractional (i & 1, i >> 1 & 1, i >> 2 & 1)
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (1, 3),
    (1, 5),
    (2, 3),
    (2, 6),
    (4, 5),
    (4, 6),
    (7, 6),
    (7, 5),
    (7, 3),
];

pub fn cell_corners(lattice: &Lattice, center: [f64; 3]) -> [[f64; 3]; 8] {
    let mut corners = [[0.0; 3]; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let frac = [(i & 1) as f64, (i >> 1 & 1) as f64, (i >> 2 & 1) as f64];
        *corner = sub(lattice.frac_to_cart(frac), center);
    }
    corners
}

/// The 12 cell edges as a single lines primitive (start/end pairs)
pub fn unit_cell_lines(lattice: &Lattice, center: [f64; 3]) -> Primitive {
    let corners = cell_corners(lattice, center);
    let positions = EDGES
        .iter()
        .flat_map(|&(start, end)| [corners[start], corners[end]])
        .collect();

    Primitive::Lines(Lines {
        positions,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::distance;

    #[test]
    fn test_twelve_edges() {
        let lattice = Lattice::cubic(3.0);
        match unit_cell_lines(&lattice, [1.5; 3]) {
            Primitive::Lines(lines) => {
                assert_eq!(lines.positions.len(), 24);
                assert_eq!(lines.positions[0], [-1.5, -1.5, -1.5]);
                for pair in lines.positions.chunks_exact(2) {
                    assert!((distance(pair[0], pair[1]) - 3.0).abs() < 1e-12);
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_oblique_cell_corners() {
        let lattice = Lattice::new([[2.0, 0.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
        let corners = cell_corners(&lattice, [0.0; 3]);
        assert_eq!(corners[0], [0.0, 0.0, 0.0]);
        assert_eq!(corners[3], [3.0, 2.0, 0.0]);
        assert_eq!(corners[7], [3.0, 2.0, 3.0]);
    }
}
