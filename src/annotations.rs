//! Arbitrary per-vertex metadata with explicit registration.
//!
//! An annotation is registered once with a default value; afterwards every
//! vertex reads the default until a value is set for it. The kind of a value
//! is fixed by its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AnnotationValue {
    fn same_kind(&self, other: &AnnotationValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    defaults: BTreeMap<String, AnnotationValue>,
    values: BTreeMap<(usize, String), AnnotationValue>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, default: AnnotationValue) -> Result<(), AnnotationError> {
        if self.defaults.contains_key(name) {
            return Err(AnnotationError::Duplicate {
                name: name.to_string(),
            });
        }
        self.defaults.insert(name.to_string(), default);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    pub fn set(
        &mut self,
        vertex_id: usize,
        name: &str,
        value: AnnotationValue,
    ) -> Result<(), AnnotationError> {
        let default = self
            .defaults
            .get(name)
            .ok_or_else(|| AnnotationError::NotRegistered {
                name: name.to_string(),
            })?;
        if !default.same_kind(&value) {
            return Err(AnnotationError::TypeMismatch {
                name: name.to_string(),
            });
        }
        self.values.insert((vertex_id, name.to_string()), value);
        Ok(())
    }

    pub fn get(&self, vertex_id: usize, name: &str) -> Result<&AnnotationValue, AnnotationError> {
        let default = self
            .defaults
            .get(name)
            .ok_or_else(|| AnnotationError::NotRegistered {
                name: name.to_string(),
            })?;
        Ok(self
            .values
            .get(&(vertex_id, name.to_string()))
            .unwrap_or(default))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defaults.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_until_set() {
        let mut ann = Annotations::new();
        ann.register("label", AnnotationValue::Text("none".into())).unwrap();
        assert_eq!(ann.get(3, "label").unwrap().as_text(), Some("none"));
        ann.set(3, "label", AnnotationValue::Text("alpha".into())).unwrap();
        assert_eq!(ann.get(3, "label").unwrap().as_text(), Some("alpha"));
        assert_eq!(ann.get(4, "label").unwrap().as_text(), Some("none"));
    }

    #[test]
    fn misuse_fails_fast() {
        let mut ann = Annotations::new();
        ann.register("weight", AnnotationValue::Float(1.0)).unwrap();
        assert_eq!(
            ann.register("weight", AnnotationValue::Float(2.0)),
            Err(AnnotationError::Duplicate {
                name: "weight".into()
            })
        );
        assert_eq!(
            ann.get(0, "missing"),
            Err(AnnotationError::NotRegistered {
                name: "missing".into()
            })
        );
        assert_eq!(
            ann.set(0, "weight", AnnotationValue::Int(2)),
            Err(AnnotationError::TypeMismatch {
                name: "weight".into()
            })
        );
        assert!(ann.set(0, "nope", AnnotationValue::Bool(true)).is_err());
    }

    #[test]
    fn names_are_sorted() {
        let mut ann = Annotations::new();
        ann.register("b", AnnotationValue::Bool(false)).unwrap();
        ann.register("a", AnnotationValue::Int(0)).unwrap();
        assert_eq!(ann.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(ann.is_registered("a"));
    }
}
