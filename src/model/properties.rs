// src/model/properties.rs
// Classify auxiliary per-site data by the shape of its first value

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Scalar,
    Vector,
    Matrix,
    Categorical,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyKind::Scalar => "scalar",
            PropertyKind::Vector => "vector",
            PropertyKind::Matrix => "matrix",
            PropertyKind::Categorical => "categorical",
        };
        write!(f, "{}", s)
    }
}

/// kind -> property names, names in input order
pub type PropertyClassification = BTreeMap<PropertyKind, Vec<String>>;

fn is_triple_of_numbers(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.len() == 3 && items.iter().all(Value::is_number))
}

/// Kind of a single value, or None when the shape is not colorable/displayable
pub fn classify_value(value: &Value) -> Option<PropertyKind> {
    match value {
        Value::Number(_) => Some(PropertyKind::Scalar),
        Value::String(_) => Some(PropertyKind::Categorical),
        Value::Array(_) if is_triple_of_numbers(value) => Some(PropertyKind::Vector),
        Value::Array(rows) if rows.len() == 3 && rows.iter().all(is_triple_of_numbers) => {
            Some(PropertyKind::Matrix)
        }
        _ => None,
    }
}

/// Kind of a whole property, decided by its first value
pub fn classify_property(values: &[Value]) -> Option<PropertyKind> {
    values.first().and_then(classify_value)
}

pub fn classify_site_properties(properties: &IndexMap<String, Vec<Value>>) -> PropertyClassification {
    let mut kinds = PropertyClassification::new();
    for (name, values) in properties {
        match classify_property(values) {
            Some(kind) => kinds.entry(kind).or_default().push(name.clone()),
            None => log::debug!("Site property '{}' has no displayable kind, skipped", name),
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_shapes() {
        assert_eq!(classify_value(&json!(1.5)), Some(PropertyKind::Scalar));
        assert_eq!(classify_value(&json!(-2)), Some(PropertyKind::Scalar));
        assert_eq!(classify_value(&json!([0.0, 0.0, 1.0])), Some(PropertyKind::Vector));
        assert_eq!(
            classify_value(&json!([[1, 0, 0], [0, 1, 0], [0, 0, 1]])),
            Some(PropertyKind::Matrix)
        );
        assert_eq!(classify_value(&json!("4a")), Some(PropertyKind::Categorical));
    }

    #[test]
    fn test_unrecognized_shapes_omitted() {
        assert_eq!(classify_value(&json!(true)), None);
        assert_eq!(classify_value(&json!(null)), None);
        assert_eq!(classify_value(&json!([1.0, 2.0])), None);
        assert_eq!(classify_value(&json!({"x": 1})), None);
        assert_eq!(classify_property(&[]), None);
    }

    #[test]
    fn test_classify_site_properties() {
        let mut props = IndexMap::new();
        props.insert("magmom".to_string(), vec![json!(2.0), json!(-2.0)]);
        props.insert("forces".to_string(), vec![json!([0, 0, 1]), json!([0, 0, -1])]);
        props.insert("charge".to_string(), vec![json!(0.1), json!(-0.1)]);
        props.insert("wyckoff".to_string(), vec![json!("1a"), json!("1b")]);
        props.insert("flags".to_string(), vec![json!(true), json!(false)]);

        let kinds = classify_site_properties(&props);

        assert_eq!(kinds[&PropertyKind::Scalar], vec!["magmom", "charge"]);
        assert_eq!(kinds[&PropertyKind::Vector], vec!["forces"]);
        assert_eq!(kinds[&PropertyKind::Categorical], vec!["wyckoff"]);
        assert!(!kinds.contains_key(&PropertyKind::Matrix));
        assert_eq!(kinds.values().map(Vec::len).sum::<usize>(), 4);
    }
}
