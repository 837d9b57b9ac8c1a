//! Model → JSON Schema, in the layout the host framework stores artifacts in.
use serde_json::{Map, Value, json};

use crate::ir::{Field, Model, Ty};

impl Model {
    /// Nested records are inlined rather than pulled into `$defs`, so a
    /// compiled model comes straight back from `compile` unchanged. `Ty::Map`
    /// is the exception: it emits a bare `{"type": "object"}`, which compiles
    /// to an empty nested record. `compile` itself never produces `Map`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field_schema(field));
        }
        let required: Vec<Value> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| Value::String(f.name.clone()))
            .collect();

        json!({
            "properties": properties,
            "required": required,
            "title": self.name,
            "type": "object",
        })
    }

    /// Two-space indented schema text, as stored in the persona config.
    pub fn to_schema_string(&self) -> String {
        // serializing a Value cannot fail
        serde_json::to_string_pretty(&self.to_json_schema()).unwrap_or_default()
    }
}

fn field_schema(field: &Field) -> Value {
    let mut out = Map::new();
    if let Some(desc) = &field.description {
        out.insert("description".into(), Value::String(desc.clone()));
    }
    out.insert("title".into(), Value::String(field_title(&field.name)));
    merge(&mut out, ty_schema(&field.ty));
    Value::Object(out)
}

fn ty_schema(ty: &Ty) -> Map<String, Value> {
    let json_type = match ty {
        Ty::Any => return Map::new(),
        Ty::Bool => "boolean",
        Ty::Integer => "integer",
        Ty::Number => "number",
        Ty::String => "string",
        Ty::Map => "object",
        Ty::List(item) => {
            let mut out = Map::new();
            out.insert("items".into(), Value::Object(ty_schema(item)));
            out.insert("type".into(), json!("array"));
            return out;
        }
        Ty::Object(model) => {
            return match model.to_json_schema() {
                Value::Object(nested) => nested,
                _ => Map::new(),
            };
        }
    };
    let mut out = Map::new();
    out.insert("type".into(), json!(json_type));
    out
}

// the field title wins over a nested model's own title
fn merge(into: &mut Map<String, Value>, from: Map<String, Value>) {
    for (k, v) in from {
        if k == "title" && into.contains_key("title") {
            continue;
        }
        into.insert(k, v);
    }
}

/// `final_response` → `Final Response`
pub fn field_title(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::compile;

    #[test]
    fn titles_from_snake_case() {
        assert_eq!(field_title("final_response"), "Final Response");
        assert_eq!(field_title("x"), "X");
        assert_eq!(field_title("_private__name"), "Private Name");
    }

    #[test]
    fn emits_required_and_nested_items() {
        let point = Model::new("DynamicModel").with_field(Field::required("x", Ty::Integer, None));
        let model = Model::new("Shape")
            .with_field(Field::required("points", Ty::List(Box::new(Ty::Object(point))), None))
            .with_field(Field::required("meta", Ty::Any, Some("free form".into())));
        let schema = model.to_json_schema();
        assert_eq!(schema["required"], json!(["points", "meta"]));
        assert_eq!(schema["properties"]["points"]["items"]["properties"]["x"]["type"], "integer");
        assert_eq!(schema["properties"]["meta"], json!({ "description": "free form", "title": "Meta" }));
    }

    #[test]
    fn emitted_schema_compiles_back() {
        let inner = Model::new("Outline").with_field(Field::required("title", Ty::String, None));
        let model = Model::new("DynamicModel")
            .with_field(Field::required("outline", Ty::Object(inner), Some("doc".into())))
            .with_field(Field::required("scores", Ty::List(Box::new(Ty::Number)), None))
            .with_field(Field::required("done", Ty::Bool, None));
        let back = compile(&model.to_json_schema(), "DynamicModel").unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn nested_record_keeps_field_title() {
        let inner = Model::new("Main_section").with_field(Field::required("x", Ty::Integer, None));
        let model = Model::new("Doc").with_field(Field::required("main_section", Ty::Object(inner), None));
        let schema = model.to_json_schema();
        assert_eq!(schema["properties"]["main_section"]["title"], "Main Section");
        assert_eq!(schema["properties"]["main_section"]["properties"]["x"]["type"], "integer");
    }

    #[test]
    fn map_fields_come_back_as_empty_records() {
        let model = Model::new("DynamicModel").with_field(Field::required("meta", Ty::Map, None));
        let schema = model.to_json_schema();
        assert_eq!(schema["properties"]["meta"], json!({ "title": "Meta", "type": "object" }));
        let back = compile(&schema, "DynamicModel").unwrap();
        assert_eq!(back.fields[0].ty, Ty::Object(Model::new("Meta")));
    }
}
