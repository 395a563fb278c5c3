use super::mapping::{self, ElementMapping};
use super::scanner::ScanOutcome;
use super::types::{DesignTokenViolation, ViolationKind};
use anyhow::bail;
use serde::Serialize;
use tracing::info;

/// Report rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    /// Format implied by an output file extension (.md or .json)
    pub fn from_output_path(path: &str) -> anyhow::Result<Self> {
        if path.ends_with(".json") {
            Ok(Self::Json)
        } else if path.ends_with(".md") {
            Ok(Self::Markdown)
        } else {
            bail!("Output file must end with .md or .json")
        }
    }
}

/// Violation counts per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub raw_html: usize,
    pub inline_style: usize,
    pub custom_class: usize,
    pub files_scanned: usize,
}

impl Summary {
    pub fn new(violations: &[DesignTokenViolation], files_scanned: usize) -> Self {
        let count = |kind| violations.iter().filter(|v| v.kind == kind).count();
        Self {
            total: violations.len(),
            raw_html: count(ViolationKind::RawHtml),
            inline_style: count(ViolationKind::InlineStyle),
            custom_class: count(ViolationKind::CustomClass),
            files_scanned,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    violations: &'a [DesignTokenViolation],
    /// Mapping entries for the raw elements found
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mappings: Vec<&'static ElementMapping>,
}

/// Group violations by type in report order, keeping traversal order within a group
pub fn group_by_kind(
    violations: &[DesignTokenViolation],
) -> Vec<(ViolationKind, Vec<&DesignTokenViolation>)> {
    ViolationKind::ALL
        .into_iter()
        .map(|kind| (kind, violations.iter().filter(|v| v.kind == kind).collect::<Vec<_>>()))
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

/// Mapping entries for the raw-html violations, first occurrence order, no duplicates
pub fn mappings_for<'a>(
    violations: impl IntoIterator<Item = &'a DesignTokenViolation>,
) -> Vec<&'static ElementMapping> {
    let mut found: Vec<&'static ElementMapping> = Vec::new();
    for v in violations {
        if v.kind != ViolationKind::RawHtml {
            continue;
        }
        let Some(m) = v.element.as_deref().and_then(mapping::lookup) else {
            continue;
        };
        if !found.iter().any(|f| f.element == m.element) {
            found.push(m);
        }
    }
    found
}

fn detail(violation: &DesignTokenViolation) -> String {
    match violation.kind {
        ViolationKind::RawHtml => {
            let element = violation.element.as_deref().unwrap_or_default();
            match mapping::suggestion(element) {
                Some(suggestion) => format!("<{}>: {}", element, suggestion),
                None => format!("<{}>", element),
            }
        }
        ViolationKind::InlineStyle => "literal value, use design-token variables".to_string(),
        ViolationKind::CustomClass => format!(
            "class '{}' is not a design-system class",
            violation.class_name.as_deref().unwrap_or_default()
        ),
    }
}

/// Plain-text report, one line per violation under a heading per type
pub fn format_text(outcome: &ScanOutcome) -> String {
    if outcome.violations.is_empty() {
        return format!(
            "No design-token violations found ({} files scanned)",
            outcome.files_scanned
        );
    }

    let mut output = String::new();
    for (kind, group) in group_by_kind(&outcome.violations) {
        output.push_str(&format!("{} ({}):\n", kind.title(), group.len()));
        for v in &group {
            output.push_str(&format!("  {}:{}  {}\n", v.file, v.line, detail(v)));
            output.push_str(&format!("      {}\n", v.content));
        }
        let guides = mappings_for(group.iter().copied());
        if !guides.is_empty() {
            output.push_str("  Decision guide:\n");
            for m in guides {
                output.push_str(&format!(
                    "    <{}>: {} (e.g. {})\n",
                    m.element, m.decision_guide, m.example
                ));
            }
        }
        output.push('\n');
    }
    let summary = Summary::new(&outcome.violations, outcome.files_scanned);
    output.push_str(&format_summary(&summary));
    output
}

/// Markdown report
pub fn format_markdown(outcome: &ScanOutcome) -> String {
    if outcome.violations.is_empty() {
        return "No design-token violations found".to_string();
    }

    let mut output = String::from("# Design-token violations\n\n");
    for (kind, group) in group_by_kind(&outcome.violations) {
        output.push_str(&format!("## {} ({})\n\n", kind.title(), group.len()));
        for v in &group {
            output.push_str(&format!(
                "- `{}:{}` {}\n  ```tsx\n  {}\n  ```\n",
                v.file,
                v.line,
                detail(v),
                v.content
            ));
        }
        let guides = mappings_for(group.iter().copied());
        if !guides.is_empty() {
            output.push_str("\n**Decision guide:**\n");
            for m in guides {
                output.push_str(&format!(
                    "- `<{}>`: {} (e.g. `{}`, see {})\n",
                    m.element, m.decision_guide, m.example, m.lexicon_ref
                ));
            }
        }
        output.push('\n');
    }
    let summary = Summary::new(&outcome.violations, outcome.files_scanned);
    output.push_str(&format_summary(&summary));
    output.trim_end().to_string()
}

/// JSON report with summary and flat violation list
pub fn format_json(outcome: &ScanOutcome) -> anyhow::Result<String> {
    let report = JsonReport {
        summary: Summary::new(&outcome.violations, outcome.files_scanned),
        violations: &outcome.violations,
        mappings: mappings_for(&outcome.violations),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Total: {} violations in {} files scanned (raw-html: {}, inline-style: {}, custom-class: {})\n",
        summary.total,
        summary.files_scanned,
        summary.raw_html,
        summary.inline_style,
        summary.custom_class
    )
}

pub fn render(format: ReportFormat, outcome: &ScanOutcome) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(format_text(outcome)),
        ReportFormat::Markdown => Ok(format_markdown(outcome)),
        ReportFormat::Json => format_json(outcome),
    }
}

/// Emit a rendered report through the log, line by line
pub fn print_report(report: &str) {
    for line in report.lines() {
        info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(kind: ViolationKind, line: usize) -> DesignTokenViolation {
        DesignTokenViolation {
            file: "src/Card.tsx".into(),
            line,
            kind,
            element: (kind == ViolationKind::RawHtml).then(|| "button".to_string()),
            class_name: (kind == ViolationKind::CustomClass).then(|| "card".to_string()),
            content: "<button className=\"card\">".into(),
        }
    }

    fn outcome(violations: Vec<DesignTokenViolation>) -> ScanOutcome {
        ScanOutcome {
            violations,
            files_scanned: 3,
            unreadable: vec![],
        }
    }

    #[test]
    fn test_group_by_kind_fixed_order() {
        let violations = vec![
            violation(ViolationKind::CustomClass, 1),
            violation(ViolationKind::RawHtml, 2),
            violation(ViolationKind::CustomClass, 3),
        ];
        let groups = group_by_kind(&violations);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, ViolationKind::RawHtml);
        assert_eq!(groups[1].0, ViolationKind::CustomClass);
        let lines: Vec<_> = groups[1].1.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_summary_counts() {
        let violations = vec![
            violation(ViolationKind::RawHtml, 1),
            violation(ViolationKind::InlineStyle, 2),
            violation(ViolationKind::InlineStyle, 3),
        ];
        let summary = Summary::new(&violations, 9);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.raw_html, 1);
        assert_eq!(summary.inline_style, 2);
        assert_eq!(summary.custom_class, 0);
        assert_eq!(summary.files_scanned, 9);
    }

    #[test]
    fn test_format_text_empty() {
        assert_eq!(
            format_text(&outcome(vec![])),
            "No design-token violations found (3 files scanned)"
        );
    }

    #[test]
    fn test_format_text_includes_suggestion() {
        let text = format_text(&outcome(vec![violation(ViolationKind::RawHtml, 4)]));
        assert!(text.starts_with("Raw HTML elements (1):\n"));
        assert!(text.contains("src/Card.tsx:4  <button>: use Button from @digdir/designsystemet-react"));
        assert!(text.contains("  Decision guide:\n    <button>: Button for actions, Link when the click navigates"));
    }

    #[test]
    fn test_format_text_decision_guide_once() {
        let text = format_text(&outcome(vec![
            violation(ViolationKind::RawHtml, 1),
            violation(ViolationKind::RawHtml, 2),
            violation(ViolationKind::CustomClass, 3),
        ]));
        assert_eq!(text.matches("Decision guide:").count(), 1);
        assert_eq!(text.matches("<button>: Button for actions").count(), 1);
        assert!(text.contains("Total: 1 violations in 3 files scanned"));
    }

    #[test]
    fn test_format_markdown_decision_guide_once() {
        let md = format_markdown(&outcome(vec![
            violation(ViolationKind::RawHtml, 1),
            violation(ViolationKind::RawHtml, 2),
        ]));
        assert!(md.starts_with("# Design-token violations"));
        assert_eq!(md.matches("**Decision guide:**").count(), 1);
        assert_eq!(md.matches("- `<button>`: Button for actions").count(), 1);
    }

    #[test]
    fn test_format_json_shape() {
        let json = format_json(&outcome(vec![violation(ViolationKind::CustomClass, 7)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["customClass"], 1);
        assert_eq!(value["summary"]["filesScanned"], 3);
        assert_eq!(value["violations"][0]["type"], "custom-class");
        assert_eq!(value["violations"][0]["line"], 7);
        assert!(value.get("mappings").is_none());
    }

    #[test]
    fn test_format_json_includes_mappings() {
        let json = format_json(&outcome(vec![
            violation(ViolationKind::RawHtml, 1),
            violation(ViolationKind::RawHtml, 2),
        ]))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mappings"].as_array().unwrap().len(), 1);
        assert_eq!(value["mappings"][0]["preferred"], "Button");
        assert_eq!(value["mappings"][0]["importFrom"], "@digdir/designsystemet-react");
        assert_eq!(value["mappings"][0]["alternatives"][0], "Link");
    }

    #[test]
    fn test_format_from_output_path() {
        assert_eq!(ReportFormat::from_output_path("r.json").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::from_output_path("r.md").unwrap(), ReportFormat::Markdown);
        assert!(ReportFormat::from_output_path("r.txt").is_err());
    }
}
