// src/io/poscar.rs

use std::fs;
use std::path::Path;

use crate::error::{SceneError, SceneResult};
use crate::model::{Lattice, Site, Structure};
use crate::utils::linalg::cart_to_frac;

const FORMAT: &str = "POSCAR";

fn err(line: usize, reason: impl Into<String>) -> SceneError {
    SceneError::Parse {
        format: FORMAT,
        line,
        reason: reason.into(),
    }
}

fn parse_floats(line: &str, n: usize, line_no: usize) -> SceneResult<Vec<f64>> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(n)
        .map(|x| x.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| err(line_no, format!("invalid number: {}", e)))?;
    if values.len() < n {
        return Err(err(line_no, format!("expected {} numbers", n)));
    }
    Ok(values)
}

pub fn parse(path: &Path) -> SceneResult<Structure> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// VASP 4 and 5 POSCAR/CONTCAR. Without a species line, species names are
/// taken from the comment line.
pub fn parse_str(text: &str) -> SceneResult<Structure> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut next = |what: &str| {
        lines
            .next()
            .ok_or_else(|| err(0, format!("unexpected end of file, missing {}", what)))
    };

    let (_, comment) = next("comment")?;

    // Scale; negative means target cell volume
    let (ln, scale_line) = next("scale")?;
    let scale = parse_floats(scale_line, 1, ln)?[0];

    let mut matrix = [[0.0; 3]; 3];
    for row in matrix.iter_mut() {
        let (ln, line) = next("lattice")?;
        let v = parse_floats(line, 3, ln)?;
        row.copy_from_slice(&v);
    }
    let factor = if scale < 0.0 {
        let volume = Lattice::new(matrix).volume();
        if volume < 1e-8 {
            return Err(err(ln, "cannot rescale a singular lattice"));
        }
        (-scale / volume).cbrt()
    } else {
        scale
    };
    for row in matrix.iter_mut() {
        for x in row.iter_mut() {
            *x *= factor;
        }
    }

    // Elements & Counts
    let (ln6, line6) = next("species or counts")?;
    let starts_alpha = line6
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic());
    let (names, (ln_counts, counts_line)) = if starts_alpha {
        (line6.split_whitespace().collect::<Vec<_>>(), next("counts")?)
    } else {
        (comment.split_whitespace().collect(), (ln6, line6))
    };
    let counts: Vec<usize> = counts_line
        .split_whitespace()
        .map(|x| x.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| err(ln_counts, format!("invalid count: {}", e)))?;
    if names.len() < counts.len() {
        return Err(err(
            ln_counts,
            format!("{} counts but only {} species names", counts.len(), names.len()),
        ));
    }

    // Mode, after an optional selective dynamics line
    let (mut ln_mode, mut mode_line) = next("coordinate mode")?;
    if mode_line.trim_start().starts_with(['S', 's']) {
        (ln_mode, mode_line) = next("coordinate mode")?;
    }
    let is_direct = !mode_line.trim_start().starts_with(['C', 'c', 'K', 'k']);

    let mut sites = Vec::with_capacity(counts.iter().sum());
    for (element, &count) in names.iter().zip(&counts) {
        for _ in 0..count {
            let (ln, line) = next("atom position")?;
            let v = parse_floats(line, 3, ln)?;
            let mut pos = [v[0], v[1], v[2]];
            if !is_direct {
                let cart = pos.map(|x| x * factor);
                pos = cart_to_frac(cart, &matrix)
                    .ok_or_else(|| err(ln_mode, "singular lattice"))?;
            }
            sites.push(Site::ordered(element, pos));
        }
    }

    Structure::new(Lattice::new(matrix), sites)
}
