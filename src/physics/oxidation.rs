// src/physics/oxidation.rs
// Oxidation-state guessing by charge balance over common oxidation states

use thiserror::Error;

use crate::model::elements::common_oxidation_states;
use crate::model::Structure;

/// Beyond this many distinct elements the combination search is not attempted
pub const MAX_ELEMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OxidationError {
    #[error("structure is disordered")]
    Disordered,
    #[error("no known oxidation states for {0}")]
    UnknownElement(String),
    #[error("no charge-neutral combination of common oxidation states")]
    NotChargeBalanced,
    #[error("too many distinct elements ({0})")]
    TooManyElements(usize),
}

/// Oxidation state of every site of an ordered structure.
///
/// Explicit oxidation states on the input species are kept as given. The
/// remaining elements each receive one state from their common-state list;
/// among all charge-neutral combinations the one using the most common states
/// (lowest summed list position) wins, first found on ties.
pub fn assign_oxidation_states(structure: &Structure) -> Result<Vec<i8>, OxidationError> {
    if !structure.is_ordered() {
        return Err(OxidationError::Disordered);
    }

    let species: Vec<_> = structure.sites().iter().map(|s| &s.species[0].species).collect();

    if species.iter().all(|sp| sp.oxidation_state.is_some()) {
        return Ok(species.iter().filter_map(|sp| sp.oxidation_state).collect());
    }

    // Explicitly charged sites contribute a fixed charge
    let fixed_charge: i64 = species
        .iter()
        .filter_map(|sp| sp.oxidation_state)
        .map(i64::from)
        .sum();

    // Distinct free elements in order of appearance, with site counts
    let mut elements: Vec<(&str, i64)> = Vec::new();
    for sp in species.iter().filter(|sp| sp.oxidation_state.is_none()) {
        match elements.iter_mut().find(|(e, _)| *e == sp.element) {
            Some((_, count)) => *count += 1,
            None => elements.push((sp.element.as_str(), 1)),
        }
    }

    if elements.len() > MAX_ELEMENTS {
        return Err(OxidationError::TooManyElements(elements.len()));
    }

    // Elemental solids are neutral
    if elements.len() == 1 && fixed_charge == 0 && structure.elements().len() == 1 {
        return Ok(vec![0; species.len()]);
    }

    let mut choices: Vec<&'static [i8]> = Vec::with_capacity(elements.len());
    for (element, _) in &elements {
        let states = common_oxidation_states(element);
        if states.is_empty() {
            return Err(OxidationError::UnknownElement(element.to_string()));
        }
        choices.push(states);
    }

    let n = elements.len();
    let mut idx = vec![0usize; n];
    let mut best: Option<(usize, Vec<usize>)> = None;

    'search: loop {
        let charge: i64 = fixed_charge
            + (0..n)
                .map(|k| i64::from(choices[k][idx[k]]) * elements[k].1)
                .sum::<i64>();
        if charge == 0 {
            let score: usize = idx.iter().sum();
            if best.as_ref().map_or(true, |(s, _)| score < *s) {
                best = Some((score, idx.clone()));
            }
        }

        // Advance the odometer
        let mut k = 0;
        loop {
            if k == n {
                break 'search;
            }
            idx[k] += 1;
            if idx[k] < choices[k].len() {
                break;
            }
            idx[k] = 0;
            k += 1;
        }
    }

    let (_, chosen) = best.ok_or(OxidationError::NotChargeBalanced)?;

    Ok(species
        .iter()
        .map(|sp| match sp.oxidation_state {
            Some(oxi) => oxi,
            None => {
                let k = elements
                    .iter()
                    .position(|(e, _)| *e == sp.element)
                    .unwrap_or(0);
                choices[k][chosen[k]]
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lattice, Site, Species, SpeciesOccupancy};

    fn structure(elements: &[&str]) -> Structure {
        let sites = elements
            .iter()
            .enumerate()
            .map(|(i, e)| Site::ordered(e, [0.1 * i as f64, 0.0, 0.0]))
            .collect();
        Structure::new(Lattice::cubic(5.0), sites).unwrap()
    }

    #[test]
    fn test_rock_salt() {
        let s = structure(&["Na", "Cl"]);
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![1, -1]);
    }

    #[test]
    fn test_hematite_prefers_fe3() {
        let s = structure(&["Fe", "Fe", "O", "O", "O"]);
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![3, 3, -2, -2, -2]);
    }

    #[test]
    fn test_wustite_falls_back_to_fe2() {
        let s = structure(&["Fe", "O"]);
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![2, -2]);
    }

    #[test]
    fn test_perovskite() {
        let s = structure(&["Sr", "Ti", "O", "O", "O"]);
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![2, 4, -2, -2, -2]);
    }

    #[test]
    fn test_elemental_is_neutral() {
        let s = structure(&["Cu", "Cu"]);
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_failures() {
        assert_eq!(
            assign_oxidation_states(&structure(&["Na", "Xx"])),
            Err(OxidationError::UnknownElement("Xx".into()))
        );
        assert_eq!(
            assign_oxidation_states(&structure(&["Na", "Mg"])),
            Err(OxidationError::NotChargeBalanced)
        );

        let disordered = Structure::new(
            Lattice::cubic(4.0),
            vec![Site::disordered(
                vec![
                    SpeciesOccupancy::new(Species::new("Fe"), 0.5),
                    SpeciesOccupancy::new(Species::new("Co"), 0.5),
                ],
                [0.0; 3],
            )],
        )
        .unwrap();
        assert_eq!(
            assign_oxidation_states(&disordered),
            Err(OxidationError::Disordered)
        );
    }

    #[test]
    fn test_explicit_states_respected() {
        let sites = vec![
            Site {
                species: vec![SpeciesOccupancy::new(Species::with_oxidation_state("Fe", 2), 1.0)],
                abc: [0.0; 3],
                label: None,
            },
            Site::ordered("O", [0.5; 3]),
        ];
        let s = Structure::new(Lattice::cubic(4.0), sites).unwrap();
        assert_eq!(assign_oxidation_states(&s).unwrap(), vec![2, -2]);
    }
}
