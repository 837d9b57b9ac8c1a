//! Configuration record for the draft-outline feedback persona.
//!
//! Everything here is plain data handed to the host conversation engine. The
//! only behaviour is [`OutlineFeedbackConfig::artifact_model`], which compiles
//! the stored artifact schema on every call.
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ir::{Field, Model, Ty};
use crate::lower::{Compiler, DEFAULT_MODEL_NAME};

const DEFAULT_RULES: &[&str] = &[
    "Terminate the conversation immediately if the user asks for harmful or inappropriate content.",
    "If the conversation is complete due to the user wanting the outline updated, set the conversation_status to update_outline.",
    "If the conversation is complete due to the user ready to move on to drafting the paper, set the conversation_state to user_completed.",
];

const DEFAULT_CONVERSATION_FLOW: &str = "
1. Start by asking the user to review the drafted outline.
2. Answer any questions about the outline or the drafting process the user might want to explore.
3. At any time, if the user asks for a change to the outline or updates the attachment file list, consider the conversation complete.
In this scenario, your final message should inform the user that a new outline is being generated based off the new info or request.
4. At any time, if the user is good with the outline in its current form and ready to move on to drafting a paper from it, consider the
conversation complete.  In this scenario, your final message should inform the user that you will start drafting the beginning of the
document based on this outline.
";

const DEFAULT_CONTEXT: &str = "
You are working with a user on drafting an outline. The current drafted outline is provided, along with any filenames
that were used to help draft the outline. You do not have access to the content within the filenames that were used to help draft the outline.
 Your purpose here is to help the user decide on any changes to the outline they might want or answer questions about it.
";

/// The artifact the agent fills in when no custom schema is configured.
pub fn default_artifact_model() -> Model {
    Model::new("ArtifactModel")
        .with_field(Field::required(
            "final_response",
            Ty::String,
            Some("The final response from the agent to the user.".into()),
        ))
        .with_field(Field::required(
            "conversation_status",
            Ty::String,
            Some("The status of the conversation.".into()),
        ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceConstraintUnit {
    Seconds,
    Minutes,
    Turns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceConstraintMode {
    /// Pace the conversation to use exactly the quantity.
    Exact,
    /// Pace the conversation to use at most the quantity.
    Maximum,
}

/// Pacing budget for the dialogue loop. Carried, not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConstraint {
    pub quantity: f64,
    pub unit: ResourceConstraintUnit,
    pub mode: ResourceConstraintMode,
}

impl Default for ResourceConstraint {
    fn default() -> Self {
        Self { quantity: 5.0, unit: ResourceConstraintUnit::Turns, mode: ResourceConstraintMode::Maximum }
    }
}

impl ResourceConstraint {
    /// A quantity of zero or less disables the constraint.
    pub fn is_enabled(&self) -> bool {
        self.quantity > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineFeedbackConfig {
    pub enabled: bool,
    /// JSON Schema of the artifact, stored as text.
    pub artifact: String,
    pub rules: Vec<String>,
    pub conversation_flow: String,
    pub context: String,
    pub resource_constraint: ResourceConstraint,
}

impl Default for OutlineFeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            artifact: default_artifact_model().to_schema_string(),
            rules: DEFAULT_RULES.iter().map(|r| r.to_string()).collect(),
            conversation_flow: DEFAULT_CONVERSATION_FLOW.trim().to_string(),
            context: DEFAULT_CONTEXT.trim().to_string(),
            resource_constraint: ResourceConstraint::default(),
        }
    }
}

impl OutlineFeedbackConfig {
    pub fn from_json_str(src: &str) -> Result<Self> {
        Ok(crate::path_de::from_str_with_path::<Self>(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&src)?;
        debug!(path = %path.display(), enabled = config.enabled, "loaded persona config");
        Ok(config)
    }

    /// Parse and compile the stored artifact schema.
    pub fn artifact_model(&self) -> Result<Model> {
        self.artifact_model_with(&Compiler::new())
    }

    pub fn artifact_model_with(&self, compiler: &Compiler) -> Result<Model> {
        compiler.compile_str(&self.artifact, DEFAULT_MODEL_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_artifact_compiles_to_two_text_fields() {
        let model = OutlineFeedbackConfig::default().artifact_model().unwrap();
        assert_eq!(model.name, "DynamicModel");
        assert_eq!(model.field_names(), vec!["final_response", "conversation_status"]);
        assert!(model.fields.iter().all(|f| f.required && f.ty == Ty::String));
        assert_eq!(
            model.fields[1].description.as_deref(),
            Some("The status of the conversation.")
        );
    }

    #[test]
    fn default_artifact_text_is_pretty_schema() {
        let config = OutlineFeedbackConfig::default();
        assert!(config.artifact.starts_with("{\n  \"properties\": {\n    \"final_response\": {"));
        let schema: serde_json::Value = serde_json::from_str(&config.artifact).unwrap();
        assert_eq!(schema["required"], json!(["final_response", "conversation_status"]));
        assert_eq!(schema["title"], "ArtifactModel");
        assert_eq!(schema["properties"]["final_response"]["title"], "Final Response");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = OutlineFeedbackConfig::from_json_str(
            r#"{ "enabled": true, "resource_constraint": { "quantity": 0, "mode": "exact" } }"#,
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.rules.len(), 3);
        assert!(config.conversation_flow.starts_with("1. Start by asking"));
        assert_eq!(config.resource_constraint.unit, ResourceConstraintUnit::Turns);
        assert_eq!(config.resource_constraint.mode, ResourceConstraintMode::Exact);
        assert!(!config.resource_constraint.is_enabled());
    }

    #[test]
    fn bad_unit_reports_path() {
        let err = OutlineFeedbackConfig::from_json_str(r#"{ "resource_constraint": { "unit": "days" } }"#)
            .expect_err("unknown unit");
        assert!(matches!(err, Error::InvalidConfig { path, .. } if path == "resource_constraint.unit"));
    }

    #[test]
    fn malformed_artifact_surfaces() {
        let config = OutlineFeedbackConfig { artifact: "{ not json".into(), ..Default::default() };
        let err = config.artifact_model().expect_err("malformed schema");
        assert!(matches!(err, Error::MalformedSchema { .. }));
    }

    #[test]
    fn serializes_enums_lowercase() {
        let value = serde_json::to_value(ResourceConstraint::default()).unwrap();
        assert_eq!(value, json!({ "quantity": 5.0, "unit": "turns", "mode": "maximum" }));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let path = std::env::temp_dir().join("artifact-schema-missing/persona.json");
        let err = OutlineFeedbackConfig::load(&path).expect_err("file does not exist");
        assert!(matches!(err, Error::Io { path: p, .. } if p == path));
    }
}
