// Strongly-typed IR for compiled artifact models. No serde_json::Value here.

/// Semantic type of one compiled field.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Any,                     // unknown / missing schema type, accepts anything
    Bool,
    Integer,
    Number,
    String,
    Map,                     // generic key -> any mapping
    List(Box<Ty>),           // ordered sequence; generic sequence is List(Any)
    Object(Model),           // nested record
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,        // exact property name, never renamed
    pub ty: Ty,
    pub required: bool,      // always true for compiled schemas
    pub description: Option<String>,
}

/// A named record type: one field per schema property, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Ty {
    /// The generic ordered sequence (`array` without routed items).
    pub fn any_list() -> Self {
        Ty::List(Box::new(Ty::Any))
    }

    /// Short human-readable label, e.g. `list<integer>`.
    pub fn label(&self) -> String {
        match self {
            Ty::Any => "any".to_string(),
            Ty::Bool => "boolean".to_string(),
            Ty::Integer => "integer".to_string(),
            Ty::Number => "number".to_string(),
            Ty::String => "string".to_string(),
            Ty::Map => "map".to_string(),
            Ty::List(item) => format!("list<{}>", item.label()),
            Ty::Object(model) => model.name.clone(),
        }
    }
}

impl Field {
    pub fn required(name: impl Into<String>, ty: Ty, description: Option<String>) -> Self {
        Self { name: name.into(), ty, required: true, description }
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Nesting depth of records below this one (0 for a flat model).
    pub fn depth(&self) -> usize {
        fn ty_depth(ty: &Ty) -> usize {
            match ty {
                Ty::Object(m) => 1 + m.depth(),
                Ty::List(item) => ty_depth(item),
                _ => 0,
            }
        }
        self.fields.iter().map(|f| ty_depth(&f.ty)).max().unwrap_or(0)
    }

    /// Indented tree view used by the CLI.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push('\n');
        self.render_fields(1, &mut out);
        out
    }

    fn render_fields(&self, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        for field in &self.fields {
            out.push_str(&format!("{pad}{}: {}", field.name, field.ty.label()));
            if let Some(desc) = &field.description {
                out.push_str(&format!("  # {desc}"));
            }
            out.push('\n');
            let mut ty = &field.ty;
            while let Ty::List(item) = ty {
                ty = item;
            }
            if let Ty::Object(nested) = ty {
                nested.render_fields(indent + 1, out);
            }
        }
    }
}
