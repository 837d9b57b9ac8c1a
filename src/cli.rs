//! Minimal CLI: schema → (model | rust | validation), persona config helpers
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use artifact_schema::codegen::Codegen;
use artifact_schema::{Compiler, DEFAULT_MAX_DEPTH, DEFAULT_MODEL_NAME, Model, OutlineFeedbackConfig};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::info;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile JSON Schema artifact definitions into typed models, validate artifacts against them, or emit Rust
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile a schema and print the model tree
    Compile(CompileOut),
    /// compile a schema and emit a strict Rust data model
    Rust(RustOut),
    /// validate artifact documents against a schema
    Validate(ValidateIn),
    /// persona config helpers
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// JSON Schema file describing the artifact
    #[arg(long, short)]
    schema: PathBuf,

    /// model name for the root record
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    name: String,

    /// maximum number of nested records below the root
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(clap::Parser, Debug)]
struct CompileOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// print the re-emitted JSON Schema instead of the tree view
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// top-level Rust type name
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ValidateIn {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// One or more artifact documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// print the default persona config as JSON
    Default,
    /// load a persona config and print its compiled artifact model
    Model {
        /// persona config file (JSON)
        #[arg(long, short)]
        config: PathBuf,

        /// maximum number of nested records below the root
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load_model(&self) -> Result<Model> {
        let source = std::fs::read_to_string(&self.schema)
            .with_context(|| format!("failed to read schema file {}", self.schema.display()))?;
        let model = Compiler::new()
            .with_max_depth(self.max_depth)
            .compile_str(&source, &self.name)
            .with_context(|| format!("failed to compile schema {}", self.schema.display()))?;
        info!(schema = %self.schema.display(), fields = model.fields.len(), "compiled schema");
        Ok(model)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Compile(target) => {
                let model = target.schema_settings.load_model()?;
                if target.json {
                    println!("{}", model.to_schema_string());
                } else {
                    print!("{}", model.render_tree());
                }
            }
            Command::Rust(target) => {
                let model = target.schema_settings.load_model()?;
                let mut cg = Codegen::new();
                cg.emit(&model, &target.root_type);
                let rust_src = cg.into_string();
                write_or_print(target.out.as_deref(), &rust_src)?;
            }
            Command::Validate(target) => {
                let model = target.schema_settings.load_model()?;
                let source_paths = resolve_file_path_patterns(&target.input)?;
                let outcomes: Vec<(PathBuf, Result<(), String>)> = source_paths
                    .into_par_iter()
                    .map(|path| {
                        let outcome = validate_file(&model, &path);
                        (path, outcome)
                    })
                    .collect();

                let mut failed = 0usize;
                for (path, outcome) in &outcomes {
                    match outcome {
                        Ok(()) => println!("{} {}", "✓".green(), path.display()),
                        Err(report) => {
                            failed += 1;
                            println!("{} {}\n  {}", "✗".red(), path.display(), report.replace('\n', "\n  "));
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} artifact(s) failed validation", outcomes.len());
                }
            }
            Command::Config(ConfigCommand::Default) => {
                let config = OutlineFeedbackConfig::default();
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            Command::Config(ConfigCommand::Model { config, max_depth }) => {
                let persona = OutlineFeedbackConfig::load(config)?;
                let model = persona
                    .artifact_model_with(&Compiler::new().with_max_depth(*max_depth))
                    .context("persona config has an unusable artifact schema")?;
                print!("{}", model.render_tree());
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn validate_file(model: &Model, path: &Path) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|error| format!("failed to read: {error}"))?;
    let value = serde_json::from_str::<serde_json::Value>(&source)
        .map_err(|error| format!("failed to parse JSON: {error}"))?;
    model.validate(&value).map(|_| ()).map_err(|report| report.to_string())
}

fn write_or_print(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
