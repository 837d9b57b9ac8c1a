//! Emit strict Rust (serde) types for a compiled model.
//!
//! Models keep schema property names verbatim; this is the one place where
//! they have to become Rust identifiers. Keywords go through raw identifiers
//! (`r#type`) when the language allows it; everything else is sanitised and
//! keeps its exact wire name via `#[serde(rename = "...")]`.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{Model, Ty};

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

// type names the generated file refers to unqualified
const IN_SCOPE_TYPES: &[&str] = &[
    "String", "Vec", "Option", "Box", "Serialize", "Deserialize", "Debug", "Clone", "PartialEq",
    "bool", "i64", "f64",
];

#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
    used_types: HashSet<String>,
}

struct RenderedField {
    ident: String,
    rename: Option<String>,
    ty: String,
    description: Option<String>,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `model` (and every nested model) with `root_name` as the
    /// top-level type; returns the identifier actually used.
    pub fn emit(&mut self, model: &Model, root_name: &str) -> String {
        self.emit_model(model, root_name)
    }

    pub fn into_string(self) -> String {
        let mut src = String::from("// Generated by artifact-schema. Do not edit.\n");
        src.push_str("#![allow(non_snake_case, non_camel_case_types)]\n\n");
        src.push_str("use serde::{Deserialize, Serialize};\n");
        src.push_str(&self.out);
        src
    }

    fn emit_model(&mut self, model: &Model, name: &str) -> String {
        let type_name = self.claim_type_name(name);

        let mut used_fields = HashSet::new();
        let mut fields = Vec::with_capacity(model.fields.len());
        for field in &model.fields {
            let (base, mut renamed) = field_ident(&field.name);
            let mut ident = base.clone();
            let mut n = 2;
            while !used_fields.insert(ident.clone()) {
                ident = format!("{base}{n}");
                renamed = true;
                n += 1;
            }
            fields.push(RenderedField {
                ident,
                rename: renamed.then(|| field.name.clone()),
                ty: self.render_ty(&field.ty),
                description: field.description.clone(),
            });
        }

        self.out.push('\n');
        self.out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        self.out.push_str(&format!("pub struct {type_name} {{\n"));
        for f in fields {
            if let Some(desc) = &f.description {
                for line in desc.lines() {
                    self.out.push_str(&format!("    /// {line}\n"));
                }
            }
            if let Some(rename) = &f.rename {
                self.out.push_str(&format!("    #[serde(rename = {rename:?})]\n"));
            }
            self.out.push_str(&format!("    pub {}: {},\n", f.ident, f.ty));
        }
        self.out.push_str("}\n");

        type_name
    }

    fn render_ty(&mut self, ty: &Ty) -> String {
        match ty {
            Ty::Any => "serde_json::Value".to_string(),
            Ty::Bool => "bool".to_string(),
            Ty::Integer => "i64".to_string(),
            Ty::Number => "f64".to_string(),
            Ty::String => "String".to_string(),
            Ty::Map => "serde_json::Map<String, serde_json::Value>".to_string(),
            Ty::List(item) => format!("Vec<{}>", self.render_ty(item)),
            Ty::Object(nested) => self.emit_model(nested, &nested.name),
        }
    }

    fn claim_type_name(&mut self, name: &str) -> String {
        let base = type_ident(name);
        let mut candidate = base.clone();
        let mut n = 2;
        while IN_SCOPE_TYPES.contains(&candidate.as_str()) || !self.used_types.insert(candidate.clone()) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        candidate
    }
}

/// Returns the identifier and whether it differs from the wire name.
fn field_ident(name: &str) -> (String, bool) {
    if IDENT.is_match(name) && !name.chars().all(|c| c == '_') {
        if NON_RAW_KEYWORDS.contains(&name) {
            return (format!("{name}_"), true);
        }
        if KEYWORDS.contains(&name) {
            return (format!("r#{name}"), false);
        }
        return (name.to_string(), false);
    }
    (sanitize(name, "field"), true)
}

fn type_ident(name: &str) -> String {
    let ident = sanitize(name, "Model");
    if ident.starts_with('_') && name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("M{ident}");
    }
    ident
}

fn sanitize(name: &str, fallback: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.chars().all(|c| c == '_') {
        ident = format!("{fallback}{ident}");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) || NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Field;

    fn generate(model: &Model, root: &str) -> String {
        let mut cg = Codegen::new();
        cg.emit(model, root);
        cg.into_string()
    }

    #[test]
    fn reserved_names_are_escaped_not_renamed() {
        let model = Model::new("DynamicModel")
            .with_field(Field::required("type", Ty::String, None))
            .with_field(Field::required("self", Ty::Bool, None))
            .with_field(Field::required("first-name", Ty::String, None))
            .with_field(Field::required("2nd", Ty::Integer, None));
        let src = generate(&model, "Root");
        assert!(src.contains("    pub r#type: String,\n"));
        assert!(src.contains("    #[serde(rename = \"self\")]\n    pub self_: bool,\n"));
        assert!(src.contains("    #[serde(rename = \"first-name\")]\n    pub first_name: String,\n"));
        assert!(src.contains("    #[serde(rename = \"2nd\")]\n    pub _2nd: i64,\n"));
    }

    #[test]
    fn sanitised_collisions_get_suffixes() {
        let model = Model::new("M")
            .with_field(Field::required("a_b", Ty::Any, None))
            .with_field(Field::required("a-b", Ty::Any, None));
        let src = generate(&model, "M");
        assert!(src.contains("    pub a_b: serde_json::Value,\n"));
        assert!(src.contains("    #[serde(rename = \"a-b\")]\n    pub a_b2: serde_json::Value,\n"));
    }

    #[test]
    fn nested_models_are_emitted_with_unique_names() {
        let item = Model::new("DynamicModel").with_field(Field::required("x", Ty::Integer, None));
        let model = Model::new("DynamicModel")
            .with_field(Field::required("points", Ty::List(Box::new(Ty::Object(item))), Some("All points".into())))
            .with_field(Field::required("self", Ty::Object(Model::new("Self")), None));
        let src = generate(&model, "DynamicModel");
        assert!(src.contains("pub struct DynamicModel {\n"));
        assert!(src.contains("pub struct DynamicModel2 {\n    pub x: i64,\n}"));
        assert!(src.contains("    /// All points\n    pub points: Vec<DynamicModel2>,\n"));
        assert!(src.contains("pub struct Self_ {\n}"));
        assert!(src.contains("    pub self_: Self_,\n"));
    }

    #[test]
    fn model_names_never_shadow_types_in_scope() {
        let model = Model::new("Root")
            .with_field(Field::required(
                "string",
                Ty::Object(Model::new("String").with_field(Field::required("x", Ty::Integer, None))),
                None,
            ))
            .with_field(Field::required("serialize", Ty::Object(Model::new("Serialize")), None))
            .with_field(Field::required("title", Ty::String, None));
        let src = generate(&model, "Root");
        assert!(!src.contains("pub struct String {"));
        assert!(!src.contains("pub struct Serialize {"));
        assert!(src.contains("pub struct String2 {\n    pub x: i64,\n}"));
        assert!(src.contains("pub struct Serialize2 {\n}"));
        assert!(src.contains("    pub string: String2,\n    pub serialize: Serialize2,\n    pub title: String,\n"));
    }
}
