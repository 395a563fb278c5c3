use super::scanner::{LineFilter, ScanOptions, scan_source, style_ranges};
use super::types::{DesignTokenViolation, ViolationKind};
use super::walk::SourceFile;
use crate::config::TokensConfig;
use anyhow::Context;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Largest pixel value with a size token (`--ds-size-30`)
const MAX_SIZE_PX: u32 = 120;
/// Pixels per size-token step
const SIZE_STEP_PX: u32 = 4;

/// Candidate literal values inside a style block; group 1 holds a leading minus sign
static FIXABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?)\b\d+(?:\.\d+)?px\b|#[0-9a-fA-F]{3,8}\b").unwrap()
});

/// Any `var(...)` expression, left untouched by the fixer
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"var\([^)]*\)").unwrap());

/// A rewritten source line
#[derive(Debug, Clone, PartialEq)]
pub struct LineChange {
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// Result of fixing a single source text
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSource {
    pub text: String,
    pub changes: Vec<LineChange>,
}

/// Totals across a fix run
#[derive(Debug, Default)]
pub struct FixOutcome {
    pub files_changed: usize,
    pub changes: usize,
    /// Inline-style violations the fixer could not resolve
    pub remaining: Vec<DesignTokenViolation>,
    pub files_scanned: usize,
}

/// Rewrites literal style values that have an unambiguous design token
#[derive(Debug, Clone)]
pub struct Fixer {
    prefix: String,
    scan: ScanOptions,
}

impl Fixer {
    pub fn new(config: &TokensConfig) -> anyhow::Result<Self> {
        Ok(Self {
            prefix: config.token_prefix.trim_matches('-').to_string(),
            scan: ScanOptions::from_config(config)?,
        })
    }

    /// Token replacement for a literal, if one exists
    pub fn replacement(&self, literal: &str) -> Option<String> {
        if let Some(px) = literal.strip_suffix("px") {
            let px: u32 = px.parse().ok()?;
            if px == 0 || px > MAX_SIZE_PX || px % SIZE_STEP_PX != 0 {
                return None;
            }
            return Some(format!("var(--{}-size-{})", self.prefix, px / SIZE_STEP_PX));
        }
        let role = match literal.to_ascii_lowercase().as_str() {
            "#fff" | "#ffffff" => "neutral-background-default",
            "#000" | "#000000" => "neutral-text-default",
            _ => return None,
        };
        Some(format!("var(--{}-color-{})", self.prefix, role))
    }

    fn fix_segment(&self, segment: &str) -> String {
        let protected: Vec<Range<usize>> = VAR_PATTERN
            .find_iter(segment)
            .map(|m| m.range())
            .collect();

        let mut output = String::with_capacity(segment.len());
        let mut last = 0;
        for cap in FIXABLE_PATTERN.captures_iter(segment) {
            // Negative lengths have no size token
            if cap.get(1).is_some_and(|sign| !sign.is_empty()) {
                continue;
            }
            let Some(m) = cap.get(0) else {
                continue;
            };
            if protected
                .iter()
                .any(|p| m.start() < p.end && p.start < m.end())
            {
                continue;
            }
            if let Some(token) = self.replacement(m.as_str()) {
                output.push_str(&segment[last..m.start()]);
                output.push_str(&token);
                last = m.end();
            }
        }
        output.push_str(&segment[last..]);
        output
    }

    fn fix_line(&self, line: &str, ranges: Vec<Range<usize>>) -> String {
        let mut output = String::with_capacity(line.len());
        let mut last = 0;
        for range in ranges {
            output.push_str(&line[last..range.start]);
            output.push_str(&self.fix_segment(&line[range.clone()]));
            last = range.end;
        }
        output.push_str(&line[last..]);
        output
    }

    /// Rewrite every fixable literal in `text`, preserving line endings.
    ///
    /// Comment lines and lines under an ignore directive are left as-is.
    pub fn fix_source(&self, text: &str) -> FixedSource {
        let mut output = String::with_capacity(text.len());
        let mut changes = Vec::new();
        let mut in_style = false;
        let mut filter = LineFilter::default();

        for (idx, chunk) in text.split_inclusive('\n').enumerate() {
            let (line, ending) = split_line_ending(chunk);
            let ranges = style_ranges(line, &mut in_style);
            if filter.skips(line) {
                output.push_str(chunk);
                continue;
            }
            let fixed = self.fix_line(line, ranges);
            if fixed != line {
                changes.push(LineChange {
                    line: idx + 1,
                    before: line.trim().to_string(),
                    after: fixed.trim().to_string(),
                });
            }
            output.push_str(&fixed);
            output.push_str(ending);
        }

        FixedSource {
            text: output,
            changes,
        }
    }

    /// Fix every file; with `dry_run` nothing is written
    pub fn fix_files(
        &self,
        files: &[SourceFile],
        dry_run: bool,
        verbose: bool,
    ) -> anyhow::Result<FixOutcome> {
        let mut outcome = FixOutcome::default();

        for file in files {
            let text = match std::fs::read_to_string(&file.path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read {}: {}", file.display, e);
                    continue;
                }
            };
            outcome.files_scanned += 1;

            let fixed = self.fix_source(&text);
            if !fixed.changes.is_empty() {
                for change in &fixed.changes {
                    if verbose || dry_run {
                        info!(
                            "{}:{}: {} -> {}",
                            file.display, change.line, change.before, change.after
                        );
                    } else {
                        debug!(
                            "{}:{}: {} -> {}",
                            file.display, change.line, change.before, change.after
                        );
                    }
                }
                if dry_run {
                    info!("Would update {} ({} changes)", file.display, fixed.changes.len());
                } else {
                    std::fs::write(&file.path, &fixed.text)
                        .with_context(|| format!("Failed to write {}", file.display))?;
                    info!("Updated {} ({} changes)", file.display, fixed.changes.len());
                }
                outcome.files_changed += 1;
                outcome.changes += fixed.changes.len();
            }

            outcome.remaining.extend(
                scan_source(&file.display, &fixed.text, &self.scan)
                    .into_iter()
                    .filter(|v| v.kind == ViolationKind::InlineStyle),
            );
        }

        Ok(outcome)
    }
}

fn split_line_ending(chunk: &str) -> (&str, &str) {
    if let Some(line) = chunk.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = chunk.strip_suffix('\n') {
        (line, "\n")
    } else {
        (chunk, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixer() -> Fixer {
        Fixer::new(&TokensConfig::default()).unwrap()
    }

    #[test]
    fn test_replacement_px_scale() {
        let f = fixer();
        assert_eq!(f.replacement("16px").as_deref(), Some("var(--ds-size-4)"));
        assert_eq!(f.replacement("4px").as_deref(), Some("var(--ds-size-1)"));
        assert_eq!(f.replacement("120px").as_deref(), Some("var(--ds-size-30)"));
        assert_eq!(f.replacement("0px"), None);
        assert_eq!(f.replacement("10px"), None);
        assert_eq!(f.replacement("124px"), None);
        assert_eq!(f.replacement("1.5px"), None);
    }

    #[test]
    fn test_replacement_colours() {
        let f = fixer();
        assert_eq!(
            f.replacement("#FFF").as_deref(),
            Some("var(--ds-color-neutral-background-default)")
        );
        assert_eq!(
            f.replacement("#000000").as_deref(),
            Some("var(--ds-color-neutral-text-default)")
        );
        assert_eq!(f.replacement("#ff0000"), None);
    }

    #[test]
    fn test_fix_source_rewrites_only_style_blocks() {
        let src = "const W = '16px';\n<Box style={{ padding: '8px 16px', color: '#fff', margin: '10px' }} />\n";
        let fixed = fixer().fix_source(src);
        assert_eq!(
            fixed.text,
            "const W = '16px';\n<Box style={{ padding: 'var(--ds-size-2) var(--ds-size-4)', color: 'var(--ds-color-neutral-background-default)', margin: '10px' }} />\n"
        );
        assert_eq!(fixed.changes.len(), 1);
        assert_eq!(fixed.changes[0].line, 2);
    }

    #[test]
    fn test_fix_source_leaves_var_fallbacks() {
        let src = "<Box style={{ gap: 'var(--my-gap, 8px)' }} />";
        let fixed = fixer().fix_source(src);
        assert_eq!(fixed.text, src);
        assert!(fixed.changes.is_empty());
    }

    #[test]
    fn test_fix_source_preserves_crlf_and_multiline() {
        let src = "<Box\r\n  style={{\r\n    gap: '24px',\r\n  }}\r\n/>";
        let fixed = fixer().fix_source(src);
        assert_eq!(
            fixed.text,
            "<Box\r\n  style={{\r\n    gap: 'var(--ds-size-6)',\r\n  }}\r\n/>"
        );
        assert_eq!(fixed.changes[0].line, 3);
        assert_eq!(fixed.changes[0].before, "gap: '24px',");
    }

    #[test]
    fn test_fix_source_leaves_negative_lengths() {
        let src = "<Box style={{ marginTop: '-16px', width: 'calc(100% - 8px)' }} />";
        let fixed = fixer().fix_source(src);
        assert_eq!(
            fixed.text,
            "<Box style={{ marginTop: '-16px', width: 'calc(100% - var(--ds-size-2))' }} />"
        );
        assert!(!fixed.text.contains("-var("));
    }

    #[test]
    fn test_fix_source_honours_ignore_directives() {
        let src = "<Box style={{ padding: '16px' }} /> // design-tokens-ignore\n\
                   {/* design-tokens-ignore-next-line */}\n\
                   <Box style={{ padding: '16px' }} />\n\
                   // <Box style={{ padding: '16px' }} />\n\
                   <Box style={{ padding: '16px' }} />\n";
        let fixed = fixer().fix_source(src);
        assert_eq!(fixed.changes.len(), 1);
        assert_eq!(fixed.changes[0].line, 5);
        assert_eq!(
            fixed.text.lines().filter(|l| l.contains("'16px'")).count(),
            3
        );
    }

    #[test]
    fn test_fix_files_dry_run_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Card.tsx");
        let src = "<Box style={{ padding: '16px', color: '#123456' }} />\n";
        std::fs::write(&path, src).unwrap();
        let files = vec![SourceFile {
            path: path.clone(),
            display: "Card.tsx".into(),
        }];
        let f = fixer();

        let dry = f.fix_files(&files, true, false).unwrap();
        assert_eq!(dry.files_changed, 1);
        assert_eq!(dry.changes, 1);
        assert_eq!(dry.remaining.len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), src);

        let real = f.fix_files(&files, false, true).unwrap();
        assert_eq!(real.files_changed, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<Box style={{ padding: 'var(--ds-size-4)', color: '#123456' }} />\n"
        );
        assert_eq!(real.remaining.len(), 1);

        let again = f.fix_files(&files, false, false).unwrap();
        assert_eq!(again.files_changed, 0);
    }
}
