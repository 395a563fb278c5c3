use super::artifact::{self, Approval, Compose, SpecFrontMatter, TestIds};
use super::issue::Issue;
use super::layout::{
    APPROVAL_FILE, COMPOSE_FILE, Layout, ProductDoc, SPEC_FILE, TESTIDS_FILE,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FRONT_MATTER_DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Product documents and every component's artifacts as JSON
    #[default]
    Full,
    /// Component artifacts only, as JSON
    Specs,
    /// Product documents and SPEC.md files as one Markdown document
    Markdown,
}

impl ExportMode {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Full | Self::Specs => "json",
            Self::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductExport {
    pub vision: Option<String>,
    pub roadmap: Option<String>,
    pub data_model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentExport {
    pub name: String,
    pub front_matter: Option<SpecFrontMatter>,
    pub spec: Option<String>,
    pub compose: Option<Compose>,
    pub test_ids: Option<TestIds>,
    pub approval: Option<Approval>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignExport {
    pub generated_at: DateTime<Utc>,
    pub mode: ExportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductExport>,
    pub components: Vec<ComponentExport>,
}

/// Read a text file; a missing file is logged and skipped
fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        warn!("Skipping missing {}", path.display());
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn read_optional_json<T: DeserializeOwned>(
    name: &str,
    path: &Path,
    issues: &mut Vec<Issue>,
) -> Option<T> {
    if !path.exists() {
        warn!("Missing {}", path.display());
        issues.push(Issue::component(name, path.display().to_string(), "file is missing"));
        return None;
    }
    match artifact::read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{:#}", e);
            issues.push(Issue::component(name, path.display().to_string(), format!("{:#}", e)));
            None
        }
    }
}

/// Read SPEC.md and its front matter, recording a missing file or bad front matter
fn read_spec(
    layout: &Layout,
    name: &str,
    issues: &mut Vec<Issue>,
) -> anyhow::Result<(Option<String>, Option<SpecFrontMatter>)> {
    let path = layout.artifact(name, SPEC_FILE);
    let Some(text) = read_optional(&path)? else {
        issues.push(Issue::component(name, path.display().to_string(), "file is missing"));
        return Ok((None, None));
    };
    let front_matter = match artifact::parse_front_matter(&text) {
        Ok(front_matter) => front_matter,
        Err(e) => {
            warn!("{}: {:#}", path.display(), e);
            issues.push(Issue::component(name, path.display().to_string(), format!("{:#}", e)));
            None
        }
    };
    Ok((Some(text), front_matter))
}

fn product(layout: &Layout) -> anyhow::Result<ProductExport> {
    Ok(ProductExport {
        vision: read_optional(&layout.product_doc(ProductDoc::Vision))?,
        roadmap: read_optional(&layout.product_doc(ProductDoc::Roadmap))?,
        data_model: read_optional(&layout.product_doc(ProductDoc::DataModel))?,
    })
}

fn component(layout: &Layout, name: &str, issues: &mut Vec<Issue>) -> anyhow::Result<ComponentExport> {
    debug!("Exporting {}", name);
    let (spec, front_matter) = read_spec(layout, name, issues)?;
    Ok(ComponentExport {
        name: name.to_string(),
        front_matter,
        spec,
        compose: read_optional_json(name, &layout.artifact(name, COMPOSE_FILE), issues),
        test_ids: read_optional_json(name, &layout.artifact(name, TESTIDS_FILE), issues),
        approval: read_optional_json(name, &layout.artifact(name, APPROVAL_FILE), issues),
    })
}

/// Collect the JSON export for `full` or `specs` mode
pub fn build(layout: &Layout, mode: ExportMode) -> anyhow::Result<(DesignExport, Vec<Issue>)> {
    let mut issues = Vec::new();
    let product = match mode {
        ExportMode::Full => Some(product(layout)?),
        _ => None,
    };
    let mut components = Vec::new();
    for name in layout.components()? {
        components.push(component(layout, &name, &mut issues)?);
    }
    let export = DesignExport {
        generated_at: Utc::now(),
        mode,
        product,
        components,
    };
    Ok((export, issues))
}

/// Drop a leading `---` fenced block
fn strip_front_matter(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FRONT_MATTER_DELIMITER) else {
        return text;
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return text;
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            return rest[offset..].trim_start_matches(['\r', '\n']);
        }
    }
    text
}

/// Product documents followed by every SPEC.md body
pub fn render_markdown(layout: &Layout) -> anyhow::Result<(String, Vec<Issue>)> {
    let mut issues = Vec::new();
    let mut sections = Vec::new();

    for doc in ProductDoc::ALL {
        if let Some(text) = read_optional(&layout.product_doc(doc))? {
            sections.push(text.trim_end().to_string());
        }
    }

    for name in layout.components()? {
        let (Some(text), _) = read_spec(layout, &name, &mut issues)? else {
            continue;
        };
        sections.push(format!(
            "<!-- {}/{} -->\n\n{}",
            name,
            SPEC_FILE,
            strip_front_matter(&text).trim_end()
        ));
    }

    let mut output = format!(
        "# Design Export\n\n_Generated: {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );
    for section in sections {
        output.push_str("\n\n");
        output.push_str(&section);
    }
    output.push('\n');
    Ok((output, issues))
}

/// `<export_dir>/design-export.<ext>`
pub fn default_output(layout: &Layout, mode: ExportMode) -> PathBuf {
    layout
        .export_dir
        .join(format!("design-export.{}", mode.extension()))
}

/// Write the export; returns the path written and any missing or unparsable component files
pub fn export(
    layout: &Layout,
    mode: ExportMode,
    output: Option<&Path>,
) -> anyhow::Result<(PathBuf, Vec<Issue>)> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(layout, mode));
    if path.extension().and_then(|e| e.to_str()) != Some(mode.extension()) {
        warn!(
            "Output {} does not end with .{} for {:?} mode",
            path.display(),
            mode.extension(),
            mode
        );
    }

    let (content, issues) = match mode {
        ExportMode::Markdown => render_markdown(layout)?,
        ExportMode::Full | ExportMode::Specs => {
            let (export, issues) = build(layout, mode)?;
            (artifact::to_json(&export)?, issues)
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Export written to {}", path.display());
    Ok((path, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::workflow::scaffold;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(&WorkflowConfig::default(), dir.path());
        scaffold::section_spec(&layout, "card").unwrap();
        scaffold::product_doc(&layout, ProductDoc::Vision, false).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_strip_front_matter() {
        assert_eq!(strip_front_matter("---\na: 1\n---\n\n# Title\n"), "# Title\n");
        assert_eq!(strip_front_matter("# Title\n"), "# Title\n");
        assert_eq!(strip_front_matter("---\nunterminated\n"), "---\nunterminated\n");
    }

    #[test]
    fn test_build_full_and_specs() {
        let (_dir, layout) = setup();

        let (full, issues) = build(&layout, ExportMode::Full).unwrap();
        assert!(issues.is_empty());
        let product = full.product.unwrap();
        assert!(product.vision.unwrap().starts_with("# Product Vision"));
        assert!(product.roadmap.is_none());
        assert_eq!(full.components.len(), 1);
        let card = &full.components[0];
        assert_eq!(card.front_matter.as_ref().unwrap().component, "card");
        assert_eq!(card.compose.as_ref().unwrap().component, "Card");

        let (specs, _) = build(&layout, ExportMode::Specs).unwrap();
        assert!(specs.product.is_none());
        let json = serde_json::to_value(&specs).unwrap();
        assert_eq!(json["mode"], "specs");
        assert!(json.get("product").is_none());
        assert_eq!(json["components"][0]["testIds"]["testIds"]["root"], "card");
    }

    #[test]
    fn test_missing_and_invalid_files_are_counted() {
        let (_dir, layout) = setup();
        fs::write(layout.artifact("card", COMPOSE_FILE), "[").unwrap();
        fs::remove_file(layout.artifact("card", APPROVAL_FILE)).unwrap();

        let (export, issues) = build(&layout, ExportMode::Specs).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].path.ends_with("COMPOSE.json"));
        assert!(issues[0].message.starts_with("Invalid JSON in"));
        assert_eq!(issues[1].message, "file is missing");
        assert!(export.components[0].compose.is_none());
        assert!(export.components[0].approval.is_none());
    }

    #[test]
    fn test_render_markdown() {
        let (_dir, layout) = setup();
        let (text, issues) = render_markdown(&layout).unwrap();
        assert!(issues.is_empty());
        assert!(text.starts_with("# Design Export\n"));
        assert!(text.contains("# Product Vision"));
        assert!(text.contains("<!-- card/SPEC.md -->\n\n# Card"));
        assert!(!text.contains("component: card"));
    }

    #[test]
    fn test_export_default_and_custom_path() {
        let (dir, layout) = setup();

        let (path, issues) = export(&layout, ExportMode::Full, None).unwrap();
        assert!(issues.is_empty());
        assert_eq!(path, dir.path().join("export/design-export.json"));
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["mode"], "full");

        let custom = dir.path().join("out/spec.md");
        let (path, _) = export(&layout, ExportMode::Markdown, Some(&custom)).unwrap();
        assert_eq!(path, custom);
        assert!(fs::read_to_string(&custom).unwrap().contains("# Card"));
    }
}
