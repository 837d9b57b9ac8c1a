//! Schema compiler: JSON Schema document → `ir::Model`.
//!
//! The compiler is deliberately permissive. It never rejects a schema for its
//! content: unknown or missing `type` values become `Ty::Any`, missing
//! `properties` give an empty record. The only hard failure is nesting deeper
//! than `max_depth`.
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ir::{Field, Model, Ty};

pub const DEFAULT_MODEL_NAME: &str = "DynamicModel";
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Maps a JSON Schema `type` keyword to its primitive semantic type.
pub fn primitive_ty(json_type: Option<&str>) -> Ty {
    match json_type {
        Some("integer") => Ty::Integer,
        Some("string") => Ty::String,
        Some("number") => Ty::Number,
        Some("boolean") => Ty::Bool,
        Some("object") => Ty::Map,
        Some("array") => Ty::any_list(),
        _ => Ty::Any,
    }
}

/// Parse stored schema text, failing with `MalformedSchema`.
pub fn parse_schema(src: &str) -> Result<Value> {
    crate::path_de::from_str_with_path::<Value>(src)
        .map_err(|err| Error::MalformedSchema { path: err.path, message: err.message })
}

/// Compile with the default nesting bound.
pub fn compile(schema: &Value, name: &str) -> Result<Model> {
    Compiler::new().compile(schema, name)
}

#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    max_depth: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nested records allowed below the root model.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn compile(&self, schema: &Value, name: &str) -> Result<Model> {
        self.compile_model(schema, name, 0)
    }

    /// Parse then compile; this is what config consumers call.
    pub fn compile_str(&self, src: &str, name: &str) -> Result<Model> {
        let schema = parse_schema(src)?;
        self.compile(&schema, name)
    }

    fn compile_model(&self, schema: &Value, name: &str, depth: usize) -> Result<Model> {
        if depth > self.max_depth {
            return Err(Error::DepthExceeded { model: name.to_string(), max_depth: self.max_depth });
        }

        let mut model = Model::new(name);
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            debug!(model = name, "schema has no properties; empty model");
            return Ok(model);
        };

        for (prop_name, prop_attrs) in properties {
            let field = match prop_attrs.as_object() {
                Some(attrs) => self.compile_field(prop_name, attrs, prop_attrs, depth)?,
                None => {
                    warn!(model = name, field = %prop_name, "property attributes are not an object; typed as any");
                    Field::required(prop_name.clone(), Ty::Any, None)
                }
            };
            model.fields.push(field);
        }

        debug!(model = name, fields = model.fields.len(), depth, "compiled model");
        Ok(model)
    }

    fn compile_field(
        &self,
        prop_name: &str,
        attrs: &Map<String, Value>,
        prop_attrs: &Value,
        depth: usize,
    ) -> Result<Field> {
        let prop_type = attrs.get("type").and_then(Value::as_str);
        let description = attrs.get("description").and_then(Value::as_str).map(str::to_string);

        let ty = match prop_type {
            Some("object") => {
                let nested = self.compile_model(prop_attrs, &capitalize(prop_name), depth + 1)?;
                Ty::Object(nested)
            }
            Some("array") => {
                let empty = Value::Object(Map::new());
                let items = attrs.get("items").filter(|v| v.is_object()).unwrap_or(&empty);
                match items.get("type").and_then(Value::as_str) {
                    Some("object") => {
                        let nested = self.compile_model(items, DEFAULT_MODEL_NAME, depth + 1)?;
                        Ty::List(Box::new(Ty::Object(nested)))
                    }
                    item_type => Ty::List(Box::new(primitive_ty(item_type))),
                }
            }
            other => {
                let ty = primitive_ty(other);
                if ty == Ty::Any {
                    warn!(field = %prop_name, json_type = ?attrs.get("type"), "unrecognized type; typed as any");
                }
                ty
            }
        };

        Ok(Field::required(prop_name, ty, description))
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
