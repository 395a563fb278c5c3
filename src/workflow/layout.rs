use crate::config::WorkflowConfig;
use anyhow::Context;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const SPEC_FILE: &str = "SPEC.md";
pub const COMPOSE_FILE: &str = "COMPOSE.json";
pub const TESTIDS_FILE: &str = "TESTIDS.json";
pub const APPROVAL_FILE: &str = "APPROVAL.json";

/// Every artifact a component directory must contain
pub const ARTIFACT_FILES: [&str; 4] = [SPEC_FILE, COMPOSE_FILE, TESTIDS_FILE, APPROVAL_FILE];

static KEBAB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Product-level documents produced by the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductDoc {
    Vision,
    Roadmap,
    DataModel,
}

impl ProductDoc {
    pub const ALL: [Self; 3] = [Self::Vision, Self::Roadmap, Self::DataModel];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Vision => "product-overview.md",
            Self::Roadmap => "product-roadmap.md",
            Self::DataModel => "data-model.md",
        }
    }

    /// Template (and subcommand) name
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Vision => "product-vision",
            Self::Roadmap => "product-roadmap",
            Self::DataModel => "data-model",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Vision => "Product Vision",
            Self::Roadmap => "Product Roadmap",
            Self::DataModel => "Data Model",
        }
    }
}

/// Resolved workflow paths under a project root
#[derive(Debug, Clone)]
pub struct Layout {
    pub specs_dir: PathBuf,
    pub product_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Layout {
    pub fn new(config: &WorkflowConfig, root: &Path) -> Self {
        Self {
            specs_dir: root.join(&config.specs_dir),
            product_dir: root.join(&config.product_dir),
            templates_dir: root.join(&config.templates_dir),
            export_dir: root.join(&config.export_dir),
        }
    }

    pub fn component_dir(&self, name: &str) -> PathBuf {
        self.specs_dir.join(name)
    }

    pub fn artifact(&self, name: &str, file: &str) -> PathBuf {
        self.component_dir(name).join(file)
    }

    pub fn product_doc(&self, doc: ProductDoc) -> PathBuf {
        self.product_dir.join(doc.file_name())
    }

    /// Component directory names under the specs directory, sorted.
    ///
    /// A missing specs directory yields an empty list.
    pub fn components(&self) -> anyhow::Result<Vec<String>> {
        if !self.specs_dir.is_dir() {
            return Ok(vec![]);
        }
        let mut names = Vec::new();
        let entries = std::fs::read_dir(&self.specs_dir)
            .with_context(|| format!("Failed to read {}", self.specs_dir.display()))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// `season-allocation` style names
pub fn is_valid_component_name(name: &str) -> bool {
    KEBAB_PATTERN.is_match(name)
}

/// `season-allocation` -> `SeasonAllocation`
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `season-allocation` -> `Season Allocation`
pub fn to_title(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(to_pascal_case)
        .collect::<Vec<_>>()
        .join(" ")
}
