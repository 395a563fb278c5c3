use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use gray_matter::Matter;
use gray_matter::engine::YAML;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// COMPOSE.json: which design-system components a spec is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Compose {
    /// PascalCase component name
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub composition: Vec<ComposeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeNode {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComposeNode>,
}

impl Compose {
    /// Every node in depth-first order
    pub fn nodes(&self) -> Vec<&ComposeNode> {
        fn walk<'a>(nodes: &'a [ComposeNode], out: &mut Vec<&'a ComposeNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.composition, &mut out);
        out
    }

    /// Test ids referenced anywhere in the composition
    pub fn test_ids(&self) -> Vec<&str> {
        self.nodes()
            .into_iter()
            .filter_map(|n| n.test_id.as_deref())
            .collect()
    }
}

/// TESTIDS.json: stable `data-testid` values keyed by role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestIds {
    /// Component directory name
    pub component: String,
    #[serde(default)]
    pub test_ids: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// APPROVAL.json: design sign-off for a spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Approval {
    pub fn draft() -> Self {
        Self {
            status: ApprovalStatus::Draft,
            approved_by: None,
            approved_at: None,
            notes: None,
        }
    }
}

/// YAML front matter at the top of SPEC.md
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecFrontMatter {
    pub component: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Which artifact a schema is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactKind {
    Compose,
    Testids,
    Approval,
}

/// JSON schema of an artifact file
pub fn schema(kind: ArtifactKind) -> anyhow::Result<String> {
    let schema = match kind {
        ArtifactKind::Compose => schemars::schema_for!(Compose),
        ArtifactKind::Testids => schemars::schema_for!(TestIds),
        ArtifactKind::Approval => schemars::schema_for!(Approval),
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Read and deserialize a JSON artifact
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Serialize an artifact as pretty JSON with a trailing newline
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Parse SPEC.md front matter; `None` when the file has none
pub fn parse_front_matter(text: &str) -> anyhow::Result<Option<SpecFrontMatter>> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<SpecFrontMatter>(text)
        .map_err(|e| anyhow!("Invalid front matter: {}", e))?;
    Ok(parsed.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_nodes_and_test_ids() {
        let compose: Compose = serde_json::from_str(
            r#"{
                "component": "SeasonAllocation",
                "composition": [
                    {"component": "Stack", "testId": "season-allocation", "children": [
                        {"component": "Heading"},
                        {"component": "Button", "importFrom": "@digdir/designsystemet-react", "testId": "season-allocation-submit"}
                    ]},
                    {"component": "Table", "testId": "season-allocation-table"}
                ]
            }"#,
        )
        .unwrap();
        let names: Vec<_> = compose.nodes().iter().map(|n| n.component.as_str()).collect();
        assert_eq!(names, vec!["Stack", "Heading", "Button", "Table"]);
        assert_eq!(
            compose.test_ids(),
            vec![
                "season-allocation",
                "season-allocation-submit",
                "season-allocation-table"
            ]
        );
    }

    #[test]
    fn test_approval_parses_rfc3339() {
        let approval: Approval = serde_json::from_str(
            r#"{"status": "approved", "approvedBy": "design-lead", "approvedAt": "2026-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(approval.status, ApprovalStatus::Approved);
        assert_eq!(
            approval.approved_at.unwrap().to_rfc3339(),
            "2026-03-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_approval_unknown_status_fails() {
        assert!(serde_json::from_str::<Approval>(r#"{"status": "done"}"#).is_err());
    }

    #[test]
    fn test_draft_json_is_minimal() {
        assert_eq!(to_json(&Approval::draft()).unwrap(), "{\n  \"status\": \"draft\"\n}\n");
    }

    #[test]
    fn test_front_matter() {
        let text = "---\ncomponent: season-allocation\ntitle: Season Allocation\n---\n# Season Allocation\n";
        let fm = parse_front_matter(text).unwrap().unwrap();
        assert_eq!(fm.component, "season-allocation");
        assert_eq!(fm.title.as_deref(), Some("Season Allocation"));
        assert!(fm.status.is_none());
    }

    #[test]
    fn test_front_matter_missing() {
        assert!(parse_front_matter("# Just a heading\n").unwrap().is_none());
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = schema(ArtifactKind::Approval).unwrap();
        assert!(schema.contains("approvedAt"));
        assert!(schema.contains("rejected"));
    }
}
