// src/rendering/scene.rs
// Scene tree: named nodes holding primitives and child scenes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::primitives::{MergeKey, Primitive};
use crate::error::SceneResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneNode {
    Primitive(Primitive),
    Scene(Scene),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<SceneNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn push_primitive(&mut self, primitive: Primitive) {
        self.contents.push(SceneNode::Primitive(primitive));
    }

    pub fn push_scene(&mut self, scene: Scene) {
        self.contents.push(SceneNode::Scene(scene));
    }

    pub fn child(&self, name: &str) -> Option<&Scene> {
        self.contents.iter().find_map(|node| match node {
            SceneNode::Scene(s) if s.name == name => Some(s),
            _ => None,
        })
    }

    /// All primitives in this subtree, depth first
    pub fn primitives(&self) -> Vec<&Primitive> {
        let mut out = Vec::new();
        self.collect_primitives(&mut out);
        out
    }

    fn collect_primitives<'a>(&'a self, out: &mut Vec<&'a Primitive>) {
        for node in &self.contents {
            match node {
                SceneNode::Primitive(p) => out.push(p),
                SceneNode::Scene(s) => s.collect_primitives(out),
            }
        }
    }

    /// Concatenate same-kind primitives that share style, recursively.
    /// Groups keep the position of their first member; hulls and child scenes stay in place.
    pub fn merge_primitives(&mut self) {
        let mut merged: Vec<SceneNode> = Vec::with_capacity(self.contents.len());
        let mut slots: IndexMap<MergeKey, usize> = IndexMap::new();

        for node in self.contents.drain(..) {
            match node {
                SceneNode::Primitive(primitive) => match primitive.merge_key() {
                    Some(key) => match slots.get(&key) {
                        Some(&slot) => {
                            if let SceneNode::Primitive(target) = &mut merged[slot] {
                                target.absorb(primitive);
                            }
                        }
                        None => {
                            slots.insert(key, merged.len());
                            merged.push(SceneNode::Primitive(primitive));
                        }
                    },
                    None => merged.push(SceneNode::Primitive(primitive)),
                },
                SceneNode::Scene(mut child) => {
                    child.merge_primitives();
                    merged.push(SceneNode::Scene(child));
                }
            }
        }

        self.contents = merged;
    }

    /// Trimmed JSON document: unset attributes and empty child lists are omitted
    pub fn to_json(&self) -> SceneResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(value: Value) -> SceneResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::primitives::{Convex, Cylinders, Spheres};
    use serde_json::json;

    fn sphere(color: &str, x: f64) -> Primitive {
        Primitive::Sphere(Spheres {
            positions: vec![[x, 0.0, 0.0]],
            color: Some(color.into()),
            radius: Some(0.5),
            ..Default::default()
        })
    }

    #[test]
    fn test_merge_same_style() {
        let mut scene = Scene::new("atoms");
        scene.push_primitive(sphere("#ff0000", 0.0));
        scene.push_primitive(sphere("#00ff00", 1.0));
        scene.push_primitive(sphere("#ff0000", 2.0));
        scene.merge_primitives();

        assert_eq!(scene.contents.len(), 2);
        match &scene.contents[0] {
            SceneNode::Primitive(Primitive::Sphere(s)) => {
                assert_eq!(s.positions, vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_merge_is_recursive_and_keeps_hulls() {
        let mut child = Scene::new("bonds");
        for _ in 0..3 {
            child.push_primitive(Primitive::Cylinder(Cylinders {
                position_pairs: vec![[[0.0; 3], [1.0; 3]]],
                color: Some("#555555".into()),
                radius: Some(0.1),
                ..Default::default()
            }));
        }
        let mut root = Scene::new("root");
        root.push_primitive(Primitive::Convex(Convex::default()));
        root.push_primitive(Primitive::Convex(Convex::default()));
        root.push_scene(child);
        root.merge_primitives();

        assert_eq!(root.contents.len(), 3);
        let bonds = root.child("bonds").unwrap();
        assert_eq!(bonds.contents.len(), 1);
        assert_eq!(bonds.primitives()[0].item_count(), 3);
    }

    #[test]
    fn test_trimmed_roundtrip() {
        let mut root = Scene::new("StructureScene");
        root.push_primitive(sphere("#ff0000", 0.25));
        root.push_scene(Scene::new("empty"));

        let value = root.to_json().unwrap();
        assert_eq!(value["contents"][1], json!({"name": "empty"}));
        assert!(value.get("visible").is_none());

        let back = Scene::from_json(value).unwrap();
        assert_eq!(back, root);
    }
}
