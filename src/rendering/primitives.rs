// src/rendering/primitives.rs
// Renderer-agnostic geometry. Only geometry and style, no identity.

use serde::{Deserialize, Serialize};

/// A batch of spheres (or sphere slices when phiStart/phiEnd are set)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spheres {
    #[serde(default)]
    pub positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi_end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cylinders {
    #[serde(default)]
    pub position_pairs: Vec<[[f64; 3]; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Line segments; positions come in start/end pairs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lines {
    #[serde(default)]
    pub positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Convex hull; `hull` indexes into `positions`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Convex {
    #[serde(default)]
    pub positions: Vec<[f64; 3]>,
    #[serde(default)]
    pub hull: Vec<[usize; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Sphere(Spheres),
    Cylinder(Cylinders),
    Lines(Lines),
    Convex(Convex),
}

/// Style identity of a mergeable primitive. Floats compared by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MergeKey {
    Sphere {
        color: Option<String>,
        radius: Option<u64>,
        phi_start: Option<u64>,
        phi_end: Option<u64>,
        visible: Option<bool>,
    },
    Cylinder {
        color: Option<String>,
        radius: Option<u64>,
        visible: Option<bool>,
    },
    Lines {
        color: Option<String>,
        line_width: Option<u64>,
        visible: Option<bool>,
    },
}

fn bits(x: Option<f64>) -> Option<u64> {
    x.map(f64::to_bits)
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere(_) => "sphere",
            Primitive::Cylinder(_) => "cylinder",
            Primitive::Lines(_) => "lines",
            Primitive::Convex(_) => "convex",
        }
    }

    /// Number of drawn items (spheres, cylinders, segments, hulls)
    pub fn item_count(&self) -> usize {
        match self {
            Primitive::Sphere(s) => s.positions.len(),
            Primitive::Cylinder(c) => c.position_pairs.len(),
            Primitive::Lines(l) => l.positions.len() / 2,
            Primitive::Convex(_) => 1,
        }
    }

    /// None for primitives that cannot be concatenated (convex hulls)
    pub fn merge_key(&self) -> Option<MergeKey> {
        match self {
            Primitive::Sphere(s) => Some(MergeKey::Sphere {
                color: s.color.clone(),
                radius: bits(s.radius),
                phi_start: bits(s.phi_start),
                phi_end: bits(s.phi_end),
                visible: s.visible,
            }),
            Primitive::Cylinder(c) => Some(MergeKey::Cylinder {
                color: c.color.clone(),
                radius: bits(c.radius),
                visible: c.visible,
            }),
            Primitive::Lines(l) => Some(MergeKey::Lines {
                color: l.color.clone(),
                line_width: bits(l.line_width),
                visible: l.visible,
            }),
            Primitive::Convex(_) => None,
        }
    }

    /// Append `other`'s positions. Callers check merge keys first.
    pub fn absorb(&mut self, other: Primitive) {
        match (self, other) {
            (Primitive::Sphere(a), Primitive::Sphere(b)) => a.positions.extend(b.positions),
            (Primitive::Cylinder(a), Primitive::Cylinder(b)) => {
                a.position_pairs.extend(b.position_pairs)
            }
            (Primitive::Lines(a), Primitive::Lines(b)) => a.positions.extend(b.positions),
            (a, b) => log::debug!("Refusing to merge {} into {}", b.kind(), a.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_trimmed() {
        let p = Primitive::Sphere(Spheres {
            positions: vec![[0.0, 0.0, 0.0]],
            color: Some("#ff0000".into()),
            radius: Some(0.5),
            ..Default::default()
        });
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            json!({"type": "sphere", "positions": [[0.0, 0.0, 0.0]], "color": "#ff0000", "radius": 0.5})
        );
    }

    #[test]
    fn test_camel_case_fields() {
        let p = Primitive::Cylinder(Cylinders {
            position_pairs: vec![[[0.0; 3], [1.0, 0.0, 0.0]]],
            radius: Some(0.1),
            ..Default::default()
        });
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("positionPairs").is_some());
        assert_eq!(v["type"], "cylinder");
    }

    #[test]
    fn test_merge_keys() {
        let a = Primitive::Sphere(Spheres {
            color: Some("#000000".into()),
            radius: Some(0.5),
            ..Default::default()
        });
        let mut b = a.clone();
        assert_eq!(a.merge_key(), b.merge_key());
        if let Primitive::Sphere(s) = &mut b {
            s.phi_end = Some(1.0);
        }
        assert_ne!(a.merge_key(), b.merge_key());
        assert!(Primitive::Convex(Convex::default()).merge_key().is_none());
    }
}
