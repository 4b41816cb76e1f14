// src/rendering/legend.rs
// Color resolution per (site, component) and the color -> label legend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{SceneError, SceneResult, SceneWarning, Warnings};
use crate::model::elements::{self, Rgb};
use crate::model::properties::{classify_property, classify_site_properties, PropertyKind};
use crate::model::Structure;

/// Color for species missing from a table and for null property values
pub const DEFAULT_COLOR: Rgb = Rgb(0, 0, 0);

/// Bond color of a site whose components have different colors
pub const MIXED_SITE_COLOR: Rgb = Rgb(0x55, 0x55, 0x55);

// Okabe & Ito colorblind-safe palette
const ACCESSIBLE_PALETTE: [Rgb; 9] = [
    Rgb(0, 0, 0),
    Rgb(230, 159, 0),
    Rgb(86, 180, 233),
    Rgb(0, 158, 115),
    Rgb(240, 228, 66),
    Rgb(0, 114, 178),
    Rgb(213, 94, 0),
    Rgb(204, 121, 167),
    Rgb(255, 255, 255),
];

// CPK-like palette slot per element
const ACCESSIBLE_PREFERRED: [(&str, usize); 11] = [
    ("O", 6),
    ("N", 2),
    ("C", 0),
    ("H", 8),
    ("F", 3),
    ("Cl", 3),
    ("Fe", 1),
    ("Br", 7),
    ("I", 7),
    ("P", 1),
    ("S", 4),
];

// (position, color) stops, linearly interpolated
const COOLWARM: [(f64, Rgb); 5] = [
    (0.0, Rgb(59, 76, 192)),
    (0.25, Rgb(141, 176, 254)),
    (0.5, Rgb(221, 221, 221)),
    (0.75, Rgb(244, 154, 123)),
    (1.0, Rgb(180, 4, 38)),
];

const VIRIDIS: [(f64, Rgb); 5] = [
    (0.0, Rgb(68, 1, 84)),
    (0.25, Rgb(59, 82, 139)),
    (0.5, Rgb(33, 145, 140)),
    (0.75, Rgb(94, 201, 98)),
    (1.0, Rgb(253, 231, 37)),
];

/// Which coloring to apply. Built-in names are matched case-insensitively;
/// anything else names a site property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorScheme {
    #[default]
    Jmol,
    Vesta,
    Accessible,
    SiteProperty(String),
}

impl ColorScheme {
    pub const BUILT_IN: [&'static str; 3] = ["Jmol", "VESTA", "accessible"];

    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Jmol => "Jmol",
            ColorScheme::Vesta => "VESTA",
            ColorScheme::Accessible => "accessible",
            ColorScheme::SiteProperty(name) => name,
        }
    }
}

impl FromStr for ColorScheme {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "jmol" => ColorScheme::Jmol,
            "vesta" => ColorScheme::Vesta,
            "accessible" => ColorScheme::Accessible,
            _ => ColorScheme::SiteProperty(s.to_string()),
        })
    }
}

impl From<String> for ColorScheme {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(scheme) => scheme,
            Err(never) => match never {},
        }
    }
}

impl From<ColorScheme> for String {
    fn from(scheme: ColorScheme) -> Self {
        scheme.name().to_string()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// hex color -> label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Legend(BTreeMap<String, String>);

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors shared by several labels keep every label, comma separated
    pub fn insert(&mut self, color: Rgb, label: &str) {
        let entry = self.0.entry(color.to_hex()).or_default();
        if entry.is_empty() {
            entry.push_str(label);
        } else if !entry.split(", ").any(|l| l == label) {
            entry.push_str(", ");
            entry.push_str(label);
        }
    }

    pub fn get(&self, hex: &str) -> Option<&str> {
        self.0.get(hex).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// Per-site, per-component colors plus the legend
#[derive(Debug, Clone)]
pub struct SiteColors {
    pub colors: Vec<Vec<Rgb>>,
    pub legend: Legend,
}

impl SiteColors {
    pub fn component(&self, site: usize, component: usize) -> Rgb {
        self.colors
            .get(site)
            .and_then(|c| c.get(component))
            .copied()
            .unwrap_or(DEFAULT_COLOR)
    }

    /// The site's color if all components agree, grey otherwise
    pub fn bond_color(&self, site: usize) -> Rgb {
        match self.colors.get(site).map(|c| c.as_slice()) {
            Some([first, rest @ ..]) if rest.iter().all(|c| c == first) => *first,
            Some([]) | None => DEFAULT_COLOR,
            Some(_) => MIXED_SITE_COLOR,
        }
    }
}

/// Resolve colors for every (site, component) under `scheme`
pub fn resolve_colors(
    structure: &Structure,
    scheme: &ColorScheme,
    color_range: Option<[f64; 2]>,
    warnings: &mut Warnings,
) -> SceneResult<SiteColors> {
    match scheme {
        ColorScheme::Jmol => Ok(table_colors(structure, scheme, elements::jmol_color, warnings)),
        ColorScheme::Vesta => Ok(table_colors(structure, scheme, elements::vesta_color, warnings)),
        ColorScheme::Accessible => Ok(accessible_colors(structure, warnings)),
        ColorScheme::SiteProperty(name) => property_colors(structure, name, color_range),
    }
}

fn table_colors(
    structure: &Structure,
    scheme: &ColorScheme,
    lookup: fn(&str) -> Option<Rgb>,
    warnings: &mut Warnings,
) -> SiteColors {
    let mut legend = Legend::new();
    let colors = structure
        .sites()
        .iter()
        .map(|site| {
            site.species
                .iter()
                .map(|comp| {
                    let element = comp.species.element.as_str();
                    let color = lookup(element).unwrap_or_else(|| {
                        warnings.push(SceneWarning::MissingColor {
                            element: element.to_string(),
                            scheme: scheme.name().to_string(),
                        });
                        DEFAULT_COLOR
                    });
                    legend.insert(color, element);
                    color
                })
                .collect()
        })
        .collect();

    SiteColors { colors, legend }
}

/// Palette slot per element. Elements are visited in symbol order: preferred
/// slots are claimed first-come, the rest take the unused slots from the end
/// of the palette. Elements beyond the palette size get no slot.
fn accessible_assignment(elements: &[&str]) -> BTreeMap<String, Rgb> {
    let mut sorted: Vec<&str> = elements.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut assigned: BTreeMap<String, Rgb> = BTreeMap::new();
    let mut used = [false; ACCESSIBLE_PALETTE.len()];
    for element in &sorted {
        let preferred = ACCESSIBLE_PREFERRED
            .iter()
            .find(|(e, _)| e == element)
            .map(|(_, slot)| *slot);
        if let Some(slot) = preferred {
            if !used[slot] {
                used[slot] = true;
                assigned.insert(element.to_string(), ACCESSIBLE_PALETTE[slot]);
            }
        }
    }

    let mut remaining = (0..ACCESSIBLE_PALETTE.len()).filter(|&i| !used[i]).rev();
    for element in sorted {
        if assigned.contains_key(element) {
            continue;
        }
        match remaining.next() {
            Some(slot) => {
                assigned.insert(element.to_string(), ACCESSIBLE_PALETTE[slot]);
            }
            None => break,
        }
    }
    assigned
}

fn accessible_colors(structure: &Structure, warnings: &mut Warnings) -> SiteColors {
    let elements = structure.elements();
    let assigned = accessible_assignment(&elements);
    if elements.len() > ACCESSIBLE_PALETTE.len() {
        warnings.push(SceneWarning::PaletteExhausted {
            elements: elements.len(),
            colors: ACCESSIBLE_PALETTE.len(),
        });
    }

    let mut legend = Legend::new();
    let colors = structure
        .sites()
        .iter()
        .map(|site| {
            site.species
                .iter()
                .map(|comp| {
                    let element = comp.species.element.as_str();
                    let color = assigned.get(element).copied().unwrap_or(DEFAULT_COLOR);
                    legend.insert(color, element);
                    color
                })
                .collect()
        })
        .collect();

    SiteColors { colors, legend }
}

fn valid_scheme_names(structure: &Structure) -> Vec<String> {
    let kinds = classify_site_properties(structure.site_properties());
    let mut valid: Vec<String> = ColorScheme::BUILT_IN.iter().map(|s| s.to_string()).collect();
    for kind in [PropertyKind::Scalar, PropertyKind::Categorical] {
        if let Some(names) = kinds.get(&kind) {
            valid.extend(names.iter().cloned());
        }
    }
    valid
}

fn property_colors(
    structure: &Structure,
    name: &str,
    color_range: Option<[f64; 2]>,
) -> SceneResult<SiteColors> {
    let unknown = || SceneError::UnknownColorScheme {
        scheme: name.to_string(),
        valid: valid_scheme_names(structure),
    };

    let values = structure.site_property(name).ok_or_else(unknown)?;
    match classify_property(values) {
        Some(PropertyKind::Scalar) => {}
        Some(PropertyKind::Categorical) => {
            return Err(SceneError::UnsupportedColorScheme {
                scheme: name.to_string(),
            })
        }
        _ => return Err(unknown()),
    }

    if !structure.is_ordered() {
        return Err(SceneError::InvalidColorScheme {
            scheme: name.to_string(),
            reason: "coloring by site property requires an ordered structure".to_string(),
        });
    }

    if let Some([min, max]) = color_range {
        if !(min <= max) {
            return Err(SceneError::InvalidColorScheme {
                scheme: name.to_string(),
                reason: format!("color range [{}, {}] has min above max", min, max),
            });
        }
    }

    let numbers: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
    let present = numbers.iter().flatten().copied();
    let (data_min, data_max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let mut legend = Legend::new();
    let colors = match color_range.or(if data_min <= data_max {
        Some([data_min, data_max])
    } else {
        None
    }) {
        // Nothing numeric to scale
        None => numbers.iter().map(|_| vec![DEFAULT_COLOR]).collect(),
        Some([min, max]) => {
            let scale = ColorScale::for_range(min, max);
            for value in [scale.lo, scale.hi, 0.5 * (scale.lo + scale.hi)] {
                legend.insert(scale.color(value), &format_value(value));
            }
            numbers
                .iter()
                .map(|v| vec![v.map_or(DEFAULT_COLOR, |x| scale.color(x))])
                .collect()
        }
    };

    Ok(SiteColors { colors, legend })
}

/// Linear map from a value range onto a palette
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    pub lo: f64,
    pub hi: f64,
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// coolwarm, centered on zero
    Diverging,
    /// viridis
    Sequential,
}

impl ColorScale {
    pub fn for_range(min: f64, max: f64) -> Self {
        if min < 0.0 && max > 0.0 {
            let m = min.abs().max(max.abs());
            Self {
                lo: -m,
                hi: m,
                palette: Palette::Diverging,
            }
        } else {
            Self {
                lo: min,
                hi: max,
                palette: Palette::Sequential,
            }
        }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.hi - self.lo;
        if width.abs() < f64::EPSILON {
            0.5
        } else {
            ((value - self.lo) / width).clamp(0.0, 1.0)
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        let t = self.normalize(value);
        match self.palette {
            Palette::Diverging => interpolate(&COOLWARM, t),
            Palette::Sequential => interpolate(&VIRIDIS, t),
        }
    }
}

fn interpolate(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f) / 255.0;
            return Rgb::from_unit(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2));
        }
    }
    stops.last().map(|(_, c)| *c).unwrap_or(DEFAULT_COLOR)
}

/// Up to three decimals, trailing zeros trimmed
fn format_value(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
