//! Validate artifact documents against a compiled model.
//!
//! Every violation is collected together with its JSON Pointer, so a caller
//! can show the whole list at once. A document that passes is rebuilt as an
//! [`Artifact`]: known fields only, in model order, integral floats coerced.
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ir::{Model, Ty};

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    NotAnObject,
    Missing,
    TypeMismatch { expected: String, found: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,        // JSON Pointer, "" for the root
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub model: String,
    pub violations: Vec<Violation>,
}

/// A validated artifact instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    #[serde(skip)]
    pub model: String,
    #[serde(flatten)]
    pub values: IndexMap<String, Value>,
}

impl Artifact {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl Model {
    pub fn validate(&self, value: &Value) -> Result<Artifact, ValidationReport> {
        let mut violations = Vec::new();
        let values = check_record(self, value, "", &mut violations);
        match values {
            Some(values) if violations.is_empty() => Ok(Artifact { model: self.name.clone(), values }),
            _ => Err(ValidationReport { model: self.name.clone(), violations }),
        }
    }
}

fn check_record(
    model: &Model,
    value: &Value,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<IndexMap<String, Value>> {
    let Some(object) = value.as_object() else {
        violations.push(Violation { path: path.to_string(), kind: ViolationKind::NotAnObject });
        return None;
    };

    let mut out = IndexMap::with_capacity(model.fields.len());
    for field in &model.fields {
        let field_path = format!("{path}/{}", escape_pointer(&field.name));
        match object.get(&field.name) {
            None => violations.push(Violation { path: field_path, kind: ViolationKind::Missing }),
            Some(v) => {
                if let Some(v) = check_ty(&field.ty, v, &field_path, violations) {
                    out.insert(field.name.clone(), v);
                }
            }
        }
    }
    Some(out)
}

fn check_ty(ty: &Ty, value: &Value, path: &str, violations: &mut Vec<Violation>) -> Option<Value> {
    let mismatch = |violations: &mut Vec<Violation>| -> Option<Value> {
        violations.push(Violation {
            path: path.to_string(),
            kind: ViolationKind::TypeMismatch { expected: ty.label(), found: kind_name(value) },
        });
        None
    };

    match (ty, value) {
        (Ty::Any, v) => Some(v.clone()),
        (Ty::Bool, Value::Bool(_)) | (Ty::String, Value::String(_)) | (Ty::Map, Value::Object(_)) => {
            Some(value.clone())
        }
        (Ty::Number, Value::Number(_)) => Some(value.clone()),
        (Ty::Integer, Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Some(value.clone())
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Some(Value::from(f as i64))
                    }
                    _ => mismatch(violations),
                }
            }
        }
        (Ty::List(item), Value::Array(elems)) => {
            let before = violations.len();
            let out: Vec<Value> = elems
                .iter()
                .enumerate()
                .filter_map(|(i, e)| check_ty(item, e, &format!("{path}/{i}"), violations))
                .collect();
            (violations.len() == before).then_some(Value::Array(out))
        }
        (Ty::Object(model), Value::Object(_)) => {
            let before = violations.len();
            let fields = check_record(model, value, path, violations)?;
            (violations.len() == before)
                .then(|| Value::Object(fields.into_iter().collect::<Map<String, Value>>()))
        }
        _ => mismatch(violations),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// RFC 6901: `~` → `~0`, `/` → `~1`
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            ViolationKind::NotAnObject => write!(f, "{path}: expected an object"),
            ViolationKind::Missing => write!(f, "{path}: field required"),
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s) for {}", self.violations.len(), self.model)?;
        for v in &self.violations {
            write!(f, "\n  {v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
