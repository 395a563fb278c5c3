use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Default config file name
pub const DEFAULT_CONFIG_PATH: &str = "platform-ui.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Settings for the design-token scanner and fixer
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TokensConfig {
    /// Directories to scan, relative to the working directory
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,
    /// File extensions to scan
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
    /// Glob patterns of primitive files allowed to render raw HTML
    #[serde(default = "default_primitive_files")]
    pub primitive_files: Vec<String>,
    /// Glob patterns of files never scanned
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Class names accepted without the token prefix
    #[serde(default)]
    pub allowed_classes: Vec<String>,
    /// Design-token prefix, `ds` for `--ds-*` variables and `ds-*` classes
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
}

/// Paths used by the design workflow
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorkflowConfig {
    #[serde(default = "default_specs_dir")]
    pub specs_dir: String,
    #[serde(default = "default_product_dir")]
    pub product_dir: String,
    /// Markdown templates overriding the built-in ones
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            primitive_files: default_primitive_files(),
            exclude: default_exclude(),
            allowed_classes: vec![],
            token_prefix: default_token_prefix(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            specs_dir: default_specs_dir(),
            product_dir: default_product_dir(),
            templates_dir: default_templates_dir(),
            export_dir: default_export_dir(),
        }
    }
}

fn default_roots() -> Vec<String> {
    vec!["src".into()]
}

fn default_extensions() -> Vec<String> {
    vec!["ts".into(), "tsx".into(), "jsx".into()]
}

fn default_skip_dirs() -> Vec<String> {
    [
        "node_modules",
        "dist",
        ".git",
        "build",
        "coverage",
        "storybook-static",
        ".storybook",
        "__tests__",
        "__mocks__",
        "test",
        "tests",
        "stories",
        "e2e",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_primitive_files() -> Vec<String> {
    vec!["**/primitives/**".into()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "**/*.test.*".into(),
        "**/*.spec.*".into(),
        "**/*.stories.*".into(),
    ]
}

fn default_token_prefix() -> String {
    "ds".into()
}

fn default_specs_dir() -> String {
    "specs".into()
}

fn default_product_dir() -> String {
    "product".into()
}

fn default_templates_dir() -> String {
    ".design-workflow/templates".into()
}

fn default_export_dir() -> String {
    "export".into()
}

impl Config {
    /// Load config from `path`, falling back to defaults when the file does not exist.
    ///
    /// `overrides` are `key.path=value` pairs applied before deserialization.
    pub fn load(path: &str, overrides: &[String]) -> anyhow::Result<Self> {
        let mut table = if Path::new(path).exists() {
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            toml::from_str::<toml::Table>(&content)
                .with_context(|| format!("Failed to parse {}", path))?
        } else {
            debug!("Config file {} not found, using defaults", path);
            toml::Table::new()
        };

        for raw in overrides {
            apply_override(&mut table, raw)?;
        }

        let config: Self = toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("Invalid config in {}", path))?;
        trace!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Render the config as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the default config to `path`
    pub fn init(path: &str, overwrite: bool) -> anyhow::Result<()> {
        if Path::new(path).exists() && !overwrite {
            bail!("{} already exists (use --override to replace it)", path);
        }
        let content = Self::default().to_toml()?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
        Ok(())
    }
}

/// Apply a single `a.b.c=value` override to a TOML table
fn apply_override(table: &mut toml::Table, raw: &str) -> anyhow::Result<()> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid config override '{}', expected key=value", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid config override '{}', empty key", raw);
    }
    debug!("Applying config override {}", raw);

    let mut segments: Vec<&str> = key.split('.').collect();
    let Some(leaf) = segments.pop() else {
        bail!("Invalid config override '{}'", raw);
    };

    let mut current = table;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        current = match entry {
            toml::Value::Table(t) => t,
            _ => bail!("Config override '{}': '{}' is not a table", raw, segment),
        };
    }
    current.insert(leaf.to_string(), parse_override_value(value.trim()));
    Ok(())
}

/// Parse a TOML scalar or array, treating anything else as a bare string
fn parse_override_value(value: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {}", value))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(value.to_string()))
}
