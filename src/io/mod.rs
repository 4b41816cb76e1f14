// src/io/mod.rs
pub mod poscar;

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::SceneOptions;
use crate::error::SceneResult;
use crate::model::{BondingGraph, Structure};
use crate::rendering::images::DisplayWindow;

/// Scene input as read from disk. Absent parts are filled from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub structure: Structure,
    #[serde(default)]
    pub graph: Option<BondingGraph>,
    #[serde(default)]
    pub window: Option<DisplayWindow>,
    #[serde(default)]
    pub options: Option<SceneOptions>,
}

impl From<Structure> for InputDocument {
    fn from(structure: Structure) -> Self {
        Self {
            structure,
            graph: None,
            window: None,
            options: None,
        }
    }
}

/// `.json` documents carry a structure and optionally graph, window and options;
/// anything else is read as a POSCAR.
pub fn load_input(path: &Path) -> SceneResult<InputDocument> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    } else {
        Ok(poscar::parse(path)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cscl.json");
        let mut f = File::create(&path).unwrap();
        write!(
            f,
            r#"{{
                "structure": {{
                    "lattice": [[4.2, 0, 0], [0, 4.2, 0], [0, 0, 4.2]],
                    "sites": [
                        {{"species": [{{"element": "Cs", "occu": 1.0}}], "abc": [0, 0, 0]}},
                        {{"species": [{{"element": "Cl", "occu": 1.0}}], "abc": [0.5, 0.5, 0.5]}}
                    ]
                }},
                "graph": {{"edges": [{{"from": 0, "to": 1}}]}},
                "options": {{"radius_strategy": "covalent"}}
            }}"#
        )
        .unwrap();

        let doc = load_input(&path).unwrap();
        assert_eq!(doc.structure.len(), 2);
        assert_eq!(doc.graph.map(|g| g.len()), Some(1));
        assert!(doc.window.is_none());
        assert!(doc.options.is_some());
    }

    #[test]
    fn test_poscar_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("POSCAR");
        std::fs::write(&path, "Po\n1.0\n3.35 0 0\n0 3.35 0\n0 0 3.35\nPo\n1\nDirect\n0 0 0\n").unwrap();

        let doc = load_input(&path).unwrap();
        assert_eq!(doc.structure.len(), 1);
        assert!(doc.graph.is_none());
    }

    #[test]
    fn test_invalid_structure_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"structure": {"lattice": [[1,0,0],[0,1,0],[0,0,1]],
                "sites": [{"species": [{"element": "Fe", "occu": 0.6}], "abc": [0,0,0]}]}}"#,
        )
        .unwrap();
        assert!(load_input(&path).is_err());
    }
}
