//! Artifact schema compiler for the draft-outline feedback persona.
//!
//! A persona config stores its artifact shape as JSON Schema text. The
//! compiler turns that text into an `ir::Model`, a type-descriptor tree that
//! validates artifact documents, re-emits JSON Schema, and generates Rust.
pub mod codegen;
pub mod config;
pub mod emit;
pub mod error;
pub mod ir;
pub mod lower;
pub mod path_de;
pub mod validate;

pub use config::{OutlineFeedbackConfig, ResourceConstraint, ResourceConstraintMode, ResourceConstraintUnit};
pub use error::{Error, Result};
pub use ir::{Field, Model, Ty};
pub use lower::{Compiler, compile, parse_schema, DEFAULT_MAX_DEPTH, DEFAULT_MODEL_NAME};
pub use validate::{Artifact, ValidationReport, Violation, ViolationKind};
