use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, info};

/// Issues not tied to a single component
const WORKSPACE_GROUP: &str = "(workspace)";

/// A problem found by a workflow check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub component: Option<String>,
    /// File the issue is about
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn component(component: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: Some(component.to_string()),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn workspace(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: None,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Render issues grouped by component, workspace issues first
pub fn format_issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues found".to_string();
    }

    let mut groups: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        let key = issue.component.as_deref().unwrap_or(WORKSPACE_GROUP);
        groups.entry(key).or_default().push(issue);
    }

    let mut output = String::new();
    for (component, group) in groups {
        output.push_str(&format!("{} ({} issues)\n", component, group.len()));
        for issue in group {
            output.push_str(&format!("  - {}\n", issue));
        }
    }
    output.push_str(&format!("Total: {} issues", issues.len()));
    output
}

/// Log the issue report; returns `true` when there were none
pub fn report_issues(issues: &[Issue]) -> bool {
    if issues.is_empty() {
        info!("No issues found");
        return true;
    }
    for line in format_issues(issues).lines() {
        error!("{}", line);
    }
    false
}
