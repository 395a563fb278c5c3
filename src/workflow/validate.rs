use super::artifact::{self, Approval, ApprovalStatus, Compose, TestIds};
use super::issue::Issue;
use super::layout::{
    self, APPROVAL_FILE, ARTIFACT_FILES, COMPOSE_FILE, Layout, SPEC_FILE, TESTIDS_FILE,
};
use crate::tokens::mapping;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `Button`, `List.Item`
static COMPONENT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*(\.[A-Z][A-Za-z0-9]*)*$").unwrap());

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Read a JSON artifact, turning a failure into an issue
fn read_artifact<T: serde::de::DeserializeOwned>(
    name: &str,
    path: &Path,
    issues: &mut Vec<Issue>,
) -> Option<T> {
    if !path.exists() {
        return None;
    }
    match artifact::read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{:#}", e);
            issues.push(Issue::component(name, display(path), format!("{:#}", e)));
            None
        }
    }
}

/// Check COMPOSE.json contents
pub fn check_compose(name: &str, path: &str, compose: &Compose) -> Vec<Issue> {
    let mut issues = Vec::new();
    if compose.component.trim().is_empty() {
        issues.push(Issue::component(name, path, "component name is empty"));
    } else if !COMPONENT_NAME_PATTERN.is_match(&compose.component) {
        issues.push(Issue::component(
            name,
            path,
            format!("component '{}' is not PascalCase", compose.component),
        ));
    }

    for node in compose.nodes() {
        if COMPONENT_NAME_PATTERN.is_match(&node.component) {
            continue;
        }
        let message = match mapping::suggestion(&node.component) {
            Some(suggestion) => format!(
                "composition uses raw HTML element '{}', {}",
                node.component, suggestion
            ),
            None if mapping::is_html_element(&node.component) => {
                format!("composition uses raw HTML element '{}'", node.component)
            }
            None => format!(
                "composition component '{}' is not PascalCase",
                node.component
            ),
        };
        issues.push(Issue::component(name, path, message));
    }
    issues
}

/// Check TESTIDS.json contents
pub fn check_test_ids(name: &str, path: &str, test_ids: &TestIds) -> Vec<Issue> {
    let mut issues = Vec::new();
    if test_ids.component != name {
        issues.push(Issue::component(
            name,
            path,
            format!(
                "component '{}' does not match directory '{}'",
                test_ids.component, name
            ),
        ));
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (key, id) in &test_ids.test_ids {
        if !layout::is_valid_component_name(id) {
            issues.push(Issue::component(
                name,
                path,
                format!("test id '{}' ({}) is not kebab-case", id, key),
            ));
        }
        let prefixed = id
            .strip_prefix(name)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'));
        if !prefixed {
            issues.push(Issue::component(
                name,
                path,
                format!("test id '{}' ({}) does not start with '{}'", id, key, name),
            ));
        }
        if let Some(first) = seen.insert(id.as_str(), key.as_str()) {
            issues.push(Issue::component(
                name,
                path,
                format!("test id '{}' is used by both '{}' and '{}'", id, first, key),
            ));
        }
    }
    issues
}

/// Every `testId` in COMPOSE.json must be declared in TESTIDS.json
pub fn check_cross_references(
    name: &str,
    path: &str,
    compose: &Compose,
    test_ids: &TestIds,
) -> Vec<Issue> {
    compose
        .test_ids()
        .into_iter()
        .filter(|id| !test_ids.test_ids.values().any(|declared| declared == id))
        .map(|id| {
            Issue::component(
                name,
                path,
                format!("test id '{}' is not declared in {}", id, TESTIDS_FILE),
            )
        })
        .collect()
}

fn check_spec(name: &str, path: &Path, issues: &mut Vec<Issue>) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            issues.push(Issue::component(name, display(path), format!("unreadable: {}", e)));
            return;
        }
    };
    match artifact::parse_front_matter(&text) {
        Ok(Some(fm)) if fm.component == name => {}
        Ok(Some(fm)) => issues.push(Issue::component(
            name,
            display(path),
            format!(
                "front matter component '{}' does not match directory '{}'",
                fm.component, name
            ),
        )),
        Ok(None) => issues.push(Issue::component(name, display(path), "missing front matter")),
        Err(e) => issues.push(Issue::component(name, display(path), format!("{:#}", e))),
    }
}

/// Validate one component directory
pub fn validate_component(layout: &Layout, name: &str) -> Vec<Issue> {
    debug!("Validating {}", name);
    let mut issues = Vec::new();
    let dir = layout.component_dir(name);

    if !layout::is_valid_component_name(name) {
        issues.push(Issue::component(
            name,
            display(&dir),
            "directory name is not kebab-case",
        ));
    }

    for file in ARTIFACT_FILES {
        let path = layout.artifact(name, file);
        if !path.exists() {
            warn!("Missing {}", path.display());
            issues.push(Issue::component(name, display(&path), "file is missing"));
        }
    }

    let spec_path = layout.artifact(name, SPEC_FILE);
    if spec_path.exists() {
        check_spec(name, &spec_path, &mut issues);
    }

    let compose_path = layout.artifact(name, COMPOSE_FILE);
    let compose: Option<Compose> = read_artifact(name, &compose_path, &mut issues);
    if let Some(compose) = &compose {
        issues.extend(check_compose(name, &display(&compose_path), compose));
    }

    let test_ids_path = layout.artifact(name, TESTIDS_FILE);
    let test_ids: Option<TestIds> = read_artifact(name, &test_ids_path, &mut issues);
    if let Some(test_ids) = &test_ids {
        issues.extend(check_test_ids(name, &display(&test_ids_path), test_ids));
    }

    if let (Some(compose), Some(test_ids)) = (&compose, &test_ids) {
        issues.extend(check_cross_references(
            name,
            &display(&compose_path),
            compose,
            test_ids,
        ));
    }

    let approval_path = layout.artifact(name, APPROVAL_FILE);
    let _: Option<Approval> = read_artifact(name, &approval_path, &mut issues);

    issues
}

/// Validate every component under the specs directory
pub fn validate_all(layout: &Layout) -> anyhow::Result<Vec<Issue>> {
    if !layout.specs_dir.is_dir() {
        return Ok(vec![Issue::workspace(
            display(&layout.specs_dir),
            "specs directory not found",
        )]);
    }
    let components = layout.components()?;
    if components.is_empty() {
        warn!("No components under {}", layout.specs_dir.display());
    }
    Ok(components
        .iter()
        .flat_map(|name| validate_component(layout, name))
        .collect())
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Check one component's sign-off
pub fn check_approval(layout: &Layout, name: &str) -> Vec<Issue> {
    let path = layout.artifact(name, APPROVAL_FILE);
    let shown = display(&path);
    if !path.exists() {
        return vec![Issue::component(name, shown, "file is missing")];
    }

    let mut issues = Vec::new();
    let Some(approval) = read_artifact::<Approval>(name, &path, &mut issues) else {
        return issues;
    };

    if approval.status != ApprovalStatus::Approved {
        issues.push(Issue::component(
            name,
            shown.as_str(),
            format!("status is '{}', expected 'approved'", approval.status),
        ));
    }
    if approval.approved_by.as_deref().is_none_or(|by| by.trim().is_empty()) {
        issues.push(Issue::component(name, shown.as_str(), "approvedBy is missing"));
    }
    match approval.approved_at {
        None => issues.push(Issue::component(name, shown.as_str(), "approvedAt is missing")),
        Some(approved_at) => {
            let spec_path = layout.artifact(name, SPEC_FILE);
            match modified_at(&spec_path) {
                None => issues.push(Issue::component(
                    name,
                    display(&spec_path),
                    "file is missing, approval cannot be checked for staleness",
                )),
                Some(modified) if modified > approved_at => issues.push(Issue::component(
                    name,
                    display(&spec_path),
                    format!(
                        "modified at {} after approval at {}, approval is stale",
                        modified.to_rfc3339(),
                        approved_at.to_rfc3339()
                    ),
                )),
                Some(_) => {}
            }
        }
    }
    issues
}

/// Check one named component, or all of them
pub fn check_approvals(layout: &Layout, name: Option<&str>) -> anyhow::Result<Vec<Issue>> {
    if let Some(name) = name {
        if !layout.component_dir(name).is_dir() {
            return Ok(vec![Issue::component(
                name,
                display(&layout.component_dir(name)),
                "component not found",
            )]);
        }
        return Ok(check_approval(layout, name));
    }

    let components = layout.components()?;
    if components.is_empty() {
        return Ok(vec![Issue::workspace(
            display(&layout.specs_dir),
            "no components found",
        )]);
    }
    Ok(components
        .iter()
        .flat_map(|name| check_approval(layout, name))
        .collect())
}

/// Overview of one component directory
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStatus {
    pub name: String,
    /// `None` when APPROVAL.json is missing or unreadable
    pub approval: Option<ApprovalStatus>,
    pub missing: Vec<&'static str>,
}

impl ComponentStatus {
    pub fn line(&self) -> String {
        let approval = self
            .approval
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        if self.missing.is_empty() {
            format!("{:<32} {:<10} complete", self.name, approval)
        } else {
            format!(
                "{:<32} {:<10} missing: {}",
                self.name,
                approval,
                self.missing.join(", ")
            )
        }
    }
}

/// Status of every component, sorted by name
pub fn list_components(layout: &Layout) -> anyhow::Result<Vec<ComponentStatus>> {
    Ok(layout
        .components()?
        .into_iter()
        .map(|name| {
            let missing = ARTIFACT_FILES
                .into_iter()
                .filter(|file| !layout.artifact(&name, file).exists())
                .collect();
            let approval = artifact::read_json::<Approval>(&layout.artifact(&name, APPROVAL_FILE))
                .ok()
                .map(|a| a.status);
            ComponentStatus {
                name,
                approval,
                missing,
            }
        })
        .collect())
}
