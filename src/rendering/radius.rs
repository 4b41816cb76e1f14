// src/rendering/radius.rs
// Display radius per (site, component) under a selectable strategy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SceneError, SceneResult, SceneWarning, Warnings};
use crate::model::elements;
use crate::model::{SpeciesOccupancy, Structure};
use crate::physics::assign_oxidation_states;

pub const UNIFORM_RADIUS: f64 = 0.5;
/// Used when a species has no tabulated radius for the chosen strategy
pub const FALLBACK_RADIUS: f64 = 1.0;
/// Scalar site property read by [`RadiusStrategy::Specified`]
pub const OVERRIDE_PROPERTY: &str = "display_radius";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RadiusStrategy {
    #[default]
    Uniform,
    Covalent,
    AverageIonic,
    VanDerWaals,
    /// Ionic radius for the species' oxidation state, average ionic if unknown
    SpecifiedOrAverageIonic,
    /// Per-site override from the `display_radius` property
    Specified,
}

impl RadiusStrategy {
    pub const ALL: [RadiusStrategy; 6] = [
        RadiusStrategy::Uniform,
        RadiusStrategy::Covalent,
        RadiusStrategy::AverageIonic,
        RadiusStrategy::VanDerWaals,
        RadiusStrategy::SpecifiedOrAverageIonic,
        RadiusStrategy::Specified,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RadiusStrategy::Uniform => "uniform",
            RadiusStrategy::Covalent => "covalent",
            RadiusStrategy::AverageIonic => "average_ionic",
            RadiusStrategy::VanDerWaals => "van_der_waals",
            RadiusStrategy::SpecifiedOrAverageIonic => "specified_or_average_ionic",
            RadiusStrategy::Specified => "specified",
        }
    }

    fn resolver(self) -> Resolver {
        match self {
            RadiusStrategy::Uniform => uniform,
            RadiusStrategy::Covalent => covalent,
            RadiusStrategy::AverageIonic => average_ionic,
            RadiusStrategy::VanDerWaals => van_der_waals,
            RadiusStrategy::SpecifiedOrAverageIonic => oxidation_aware_ionic,
            RadiusStrategy::Specified => site_override,
        }
    }
}

impl FromStr for RadiusStrategy {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RadiusStrategy::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| SceneError::UnknownRadiusStrategy {
                strategy: s.to_string(),
                valid: RadiusStrategy::ALL.iter().map(|r| r.name().to_string()).collect(),
            })
    }
}

impl TryFrom<String> for RadiusStrategy {
    type Error = SceneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RadiusStrategy> for String {
    fn from(r: RadiusStrategy) -> Self {
        r.name().to_string()
    }
}

impl fmt::Display for RadiusStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Data a resolver may need beyond the species itself
struct RadiusContext {
    /// Charge-balanced oxidation state per site, when assignment succeeded
    oxidation_states: Option<Vec<i8>>,
    /// Per-site override radii
    overrides: Option<Vec<f64>>,
}

type Resolver = fn(&RadiusContext, usize, &SpeciesOccupancy) -> Option<f64>;

fn uniform(_: &RadiusContext, _: usize, _: &SpeciesOccupancy) -> Option<f64> {
    Some(UNIFORM_RADIUS)
}

fn covalent(_: &RadiusContext, _: usize, comp: &SpeciesOccupancy) -> Option<f64> {
    elements::covalent_radius(&comp.species.element)
}

fn average_ionic(_: &RadiusContext, _: usize, comp: &SpeciesOccupancy) -> Option<f64> {
    elements::average_ionic_radius(&comp.species.element)
}

fn van_der_waals(_: &RadiusContext, _: usize, comp: &SpeciesOccupancy) -> Option<f64> {
    elements::van_der_waals_radius(&comp.species.element)
}

fn oxidation_aware_ionic(ctx: &RadiusContext, site: usize, comp: &SpeciesOccupancy) -> Option<f64> {
    let element = comp.species.element.as_str();
    let oxidation_state = comp
        .species
        .oxidation_state
        .or_else(|| ctx.oxidation_states.as_ref().and_then(|o| o.get(site).copied()));

    oxidation_state
        .and_then(|oxi| elements::ionic_radius(element, oxi))
        .or_else(|| elements::average_ionic_radius(element))
}

fn site_override(ctx: &RadiusContext, site: usize, _: &SpeciesOccupancy) -> Option<f64> {
    ctx.overrides.as_ref().and_then(|r| r.get(site).copied())
}

/// Radii for every (site, component)
#[derive(Debug, Clone)]
pub struct SiteRadii {
    pub radii: Vec<Vec<f64>>,
}

impl SiteRadii {
    pub fn component(&self, site: usize, component: usize) -> f64 {
        self.radii
            .get(site)
            .and_then(|r| r.get(component))
            .copied()
            .unwrap_or(FALLBACK_RADIUS)
    }
}

pub fn resolve_radii(
    structure: &Structure,
    strategy: RadiusStrategy,
    warnings: &mut Warnings,
) -> SceneResult<SiteRadii> {
    let ctx = RadiusContext {
        oxidation_states: match strategy {
            RadiusStrategy::SpecifiedOrAverageIonic => oxidation_states(structure, warnings),
            _ => None,
        },
        overrides: match strategy {
            RadiusStrategy::Specified => Some(override_radii(structure)?),
            _ => None,
        },
    };

    let resolve = strategy.resolver();
    let radii = structure
        .sites()
        .iter()
        .enumerate()
        .map(|(idx, site)| {
            site.species
                .iter()
                .map(|comp| {
                    resolve(&ctx, idx, comp).unwrap_or_else(|| {
                        warnings.push(SceneWarning::MissingRadius {
                            species: comp.species.to_string(),
                            strategy: strategy.name().to_string(),
                        });
                        FALLBACK_RADIUS
                    })
                })
                .collect()
        })
        .collect();

    Ok(SiteRadii { radii })
}

fn oxidation_states(structure: &Structure, warnings: &mut Warnings) -> Option<Vec<i8>> {
    let all_explicit = structure
        .sites()
        .iter()
        .flat_map(|s| s.species.iter())
        .all(|c| c.species.oxidation_state.is_some());
    if all_explicit {
        return None;
    }

    match assign_oxidation_states(structure) {
        Ok(states) => {
            log::debug!("Assigned oxidation states {:?}", states);
            Some(states)
        }
        Err(e) => {
            warnings.push(SceneWarning::OxidationStateFallback {
                reason: e.to_string(),
            });
            None
        }
    }
}

fn override_radii(structure: &Structure) -> SceneResult<Vec<f64>> {
    let missing = |reason: &str| SceneError::MissingSiteProperty {
        name: OVERRIDE_PROPERTY.to_string(),
        reason: reason.to_string(),
    };

    let values = structure
        .site_property(OVERRIDE_PROPERTY)
        .ok_or_else(|| missing("the 'specified' radius strategy reads it"))?;

    values
        .iter()
        .map(|v| match v.as_f64() {
            Some(r) if r > 0.0 => Ok(r),
            _ => Err(missing("every value must be a positive number")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lattice, Site, Species};
    use serde_json::json;

    fn structure(elements: &[&str]) -> Structure {
        let sites = elements
            .iter()
            .enumerate()
            .map(|(i, e)| Site::ordered(e, [0.2 * i as f64, 0.0, 0.0]))
            .collect();
        Structure::new(Lattice::cubic(5.0), sites).unwrap()
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("covalent".parse::<RadiusStrategy>().unwrap(), RadiusStrategy::Covalent);
        match "huge".parse::<RadiusStrategy>() {
            Err(SceneError::UnknownRadiusStrategy { strategy, valid }) => {
                assert_eq!(strategy, "huge");
                assert_eq!(valid.len(), 6);
                assert!(valid.contains(&"van_der_waals".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
        let json = serde_json::to_string(&RadiusStrategy::AverageIonic).unwrap();
        assert_eq!(json, "\"average_ionic\"");
        assert!(serde_json::from_str::<RadiusStrategy>("\"huge\"").is_err());
    }

    #[test]
    fn test_uniform_and_covalent() {
        let s = structure(&["Na", "Cl"]);
        let mut w = Warnings::new();
        let uniform = resolve_radii(&s, RadiusStrategy::Uniform, &mut w).unwrap();
        assert_eq!(uniform.component(1, 0), UNIFORM_RADIUS);

        let cov = resolve_radii(&s, RadiusStrategy::Covalent, &mut w).unwrap();
        assert!((cov.component(0, 0) - 1.66).abs() < 1e-10);
        assert!((cov.component(1, 0) - 1.02).abs() < 1e-10);
        assert!(w.is_empty());
    }

    #[test]
    fn test_missing_radius_defaults_with_warning() {
        let s = structure(&["Fe", "Fe", "O"]);
        let mut w = Warnings::new();
        let vdw = resolve_radii(&s, RadiusStrategy::VanDerWaals, &mut w).unwrap();
        assert_eq!(vdw.component(0, 0), FALLBACK_RADIUS);
        assert!((vdw.component(2, 0) - 1.52).abs() < 1e-10);
        // One warning per species
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_oxidation_aware_ionic() {
        let s = structure(&["Fe", "Fe", "O", "O", "O"]);
        let mut w = Warnings::new();
        let ionic = resolve_radii(&s, RadiusStrategy::SpecifiedOrAverageIonic, &mut w).unwrap();
        assert!((ionic.component(0, 0) - 0.785).abs() < 1e-10);
        assert!((ionic.component(2, 0) - 1.26).abs() < 1e-10);
        assert!(w.is_empty());
    }

    #[test]
    fn test_oxidation_failure_falls_back_to_average() {
        let s = structure(&["Na", "Mg"]);
        let mut w = Warnings::new();
        let ionic = resolve_radii(&s, RadiusStrategy::SpecifiedOrAverageIonic, &mut w).unwrap();
        assert!((ionic.component(1, 0) - 0.86).abs() < 1e-10);
        assert!(matches!(
            w.as_slice()[0],
            SceneWarning::OxidationStateFallback { .. }
        ));
    }

    #[test]
    fn test_explicit_oxidation_state_used() {
        let sites = vec![Site {
            species: vec![SpeciesOccupancy::new(Species::with_oxidation_state("Fe", 2), 1.0)],
            abc: [0.0; 3],
            label: None,
        }];
        let s = Structure::new(Lattice::cubic(3.0), sites).unwrap();
        let ionic = resolve_radii(&s, RadiusStrategy::SpecifiedOrAverageIonic, &mut Warnings::new())
            .unwrap();
        assert!((ionic.component(0, 0) - 0.92).abs() < 1e-10);
    }

    #[test]
    fn test_site_override() {
        let s = structure(&["Na", "Cl"]);
        assert!(matches!(
            resolve_radii(&s, RadiusStrategy::Specified, &mut Warnings::new()),
            Err(SceneError::MissingSiteProperty { .. })
        ));

        let s = s
            .with_site_property(OVERRIDE_PROPERTY, vec![json!(0.3), json!(0.9)])
            .unwrap();
        let radii = resolve_radii(&s, RadiusStrategy::Specified, &mut Warnings::new()).unwrap();
        assert_eq!(radii.component(0, 0), 0.3);
        assert_eq!(radii.component(1, 0), 0.9);
    }
}
