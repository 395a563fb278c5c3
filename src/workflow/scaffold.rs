use super::artifact::{self, Approval, Compose, ComposeNode, TestIds};
use super::layout::{
    self, APPROVAL_FILE, COMPOSE_FILE, Layout, ProductDoc, SPEC_FILE, TESTIDS_FILE,
};
use super::template;
use anyhow::{Context, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Import path of the layout primitives used for the root node
const PRIMITIVES_IMPORT: &str = "@platform-ui/primitives";

/// What happened to a file the scaffolder touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Overwritten,
    /// File already existed and was kept
    Kept,
}

fn write_file(path: &Path, content: &str, force: bool) -> anyhow::Result<WriteStatus> {
    let exists = path.exists();
    if exists && !force {
        debug!("Keeping existing {}", path.display());
        return Ok(WriteStatus::Kept);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(if exists {
        WriteStatus::Overwritten
    } else {
        WriteStatus::Created
    })
}

fn log_status(path: &Path, status: WriteStatus) {
    match status {
        WriteStatus::Created => info!("Created {}", path.display()),
        WriteStatus::Overwritten => info!("Overwrote {}", path.display()),
        WriteStatus::Kept => info!("{} already exists, kept (use --force to overwrite)", path.display()),
    }
}

/// Render a product document (vision, roadmap, data model) from its template
pub fn product_doc(layout: &Layout, doc: ProductDoc, force: bool) -> anyhow::Result<(PathBuf, WriteStatus)> {
    let template = template::load(layout, doc.template_name())?;
    let date = template::today();
    let content = template::render(&template, &[("title", doc.title()), ("date", date.as_str())]);
    let path = layout.product_doc(doc);
    let status = write_file(&path, &content, force)?;
    log_status(&path, status);
    Ok((path, status))
}

/// Skeleton COMPOSE.json for a new component
pub fn skeleton_compose(name: &str) -> Compose {
    Compose {
        component: layout::to_pascal_case(name),
        description: None,
        composition: vec![ComposeNode {
            component: "Stack".into(),
            import_from: Some(PRIMITIVES_IMPORT.into()),
            test_id: Some(name.to_string()),
            children: vec![],
        }],
    }
}

/// Skeleton TESTIDS.json for a new component
pub fn skeleton_test_ids(name: &str) -> TestIds {
    TestIds {
        component: name.to_string(),
        test_ids: BTreeMap::from([("root".to_string(), name.to_string())]),
    }
}

/// Create `specs/<name>/` with SPEC.md and skeleton JSON artifacts; existing files are kept
pub fn section_spec(layout: &Layout, name: &str) -> anyhow::Result<Vec<(PathBuf, WriteStatus)>> {
    if !layout::is_valid_component_name(name) {
        bail!(
            "Invalid component name '{}', use kebab-case like 'season-allocation'",
            name
        );
    }

    let template = template::load(layout, template::SECTION_SPEC)?;
    let title = layout::to_title(name);
    let pascal = layout::to_pascal_case(name);
    let date = template::today();
    let spec = template::render(
        &template,
        &[
            ("component", name),
            ("title", title.as_str()),
            ("pascal", pascal.as_str()),
            ("date", date.as_str()),
        ],
    );

    let files = [
        (SPEC_FILE, spec),
        (COMPOSE_FILE, artifact::to_json(&skeleton_compose(name))?),
        (TESTIDS_FILE, artifact::to_json(&skeleton_test_ids(name))?),
        (APPROVAL_FILE, artifact::to_json(&Approval::draft())?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (file, content) in files {
        let path = layout.artifact(name, file);
        let status = write_file(&path, &content, false)?;
        log_status(&path, status);
        written.push((path, status));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;

    fn layout(dir: &Path) -> Layout {
        Layout::new(&WorkflowConfig::default(), dir)
    }

    #[test]
    fn test_product_doc_created_then_kept() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());

        let (path, status) = product_doc(&layout, ProductDoc::Roadmap, false).unwrap();
        assert_eq!(status, WriteStatus::Created);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Product Roadmap"));
        assert!(!text.contains("{{date}}"));

        std::fs::write(&path, "edited").unwrap();
        let (_, status) = product_doc(&layout, ProductDoc::Roadmap, false).unwrap();
        assert_eq!(status, WriteStatus::Kept);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "edited");

        let (_, status) = product_doc(&layout, ProductDoc::Roadmap, true).unwrap();
        assert_eq!(status, WriteStatus::Overwritten);
    }

    #[test]
    fn test_section_spec_creates_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());

        let written = section_spec(&layout, "season-allocation").unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|(_, s)| *s == WriteStatus::Created));

        let compose: Compose =
            artifact::read_json(&layout.artifact("season-allocation", COMPOSE_FILE)).unwrap();
        assert_eq!(compose.component, "SeasonAllocation");
        assert_eq!(compose.test_ids(), vec!["season-allocation"]);

        let spec = std::fs::read_to_string(layout.artifact("season-allocation", SPEC_FILE)).unwrap();
        let fm = artifact::parse_front_matter(&spec).unwrap().unwrap();
        assert_eq!(fm.component, "season-allocation");
        assert_eq!(fm.title.as_deref(), Some("Season Allocation"));
    }

    #[test]
    fn test_section_spec_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        let spec = layout.artifact("card", SPEC_FILE);
        std::fs::create_dir_all(spec.parent().unwrap()).unwrap();
        std::fs::write(&spec, "mine").unwrap();

        let written = section_spec(&layout, "card").unwrap();
        assert_eq!(written[0].1, WriteStatus::Kept);
        assert_eq!(std::fs::read_to_string(&spec).unwrap(), "mine");
        assert_eq!(written[1].1, WriteStatus::Created);
    }

    #[test]
    fn test_section_spec_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(section_spec(&layout(dir.path()), "SeasonAllocation").is_err());
        assert!(!dir.path().join("specs").exists());
    }
}
