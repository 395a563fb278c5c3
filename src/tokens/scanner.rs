use super::mapping;
use super::types::{DesignTokenViolation, ViolationKind};
use super::walk::{SourceFile, build_globset};
use crate::config::TokensConfig;
use globset::GlobSet;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

/// Suppresses every check on the line that carries it
pub const IGNORE_LINE: &str = "design-tokens-ignore";
/// Suppresses every check on the following line
pub const IGNORE_NEXT_LINE: &str = "design-tokens-ignore-next-line";

/// Opening of a lowercase JSX intrinsic element
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-z][a-z0-9]*)(?:[\s/>]|$)").unwrap());

/// Start of an inline style object
static STYLE_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"style\s*=\s*\{\s*\{").unwrap());

/// Literal px, hex, rgb(a) and hsl(a) values
pub static LITERAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?px\b|#[0-9a-fA-F]{3,8}\b|\brgba?\(|\bhsla?\(").unwrap()
});

/// String-literal className values; template literals only without interpolation
static CLASS_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"className\s*=\s*(?:"([^"]*)"|'([^']*)'|\{\s*"([^"]*)"\s*\}|\{\s*'([^']*)'\s*\}|\{\s*`([^`$]*)`\s*\})"#,
    )
    .unwrap()
});

/// Compiled scanner settings
#[derive(Debug, Clone)]
pub struct ScanOptions {
    primitive_files: GlobSet,
    allowed_classes: Vec<String>,
    class_prefix: String,
    token_var: Regex,
}

impl ScanOptions {
    pub fn from_config(config: &TokensConfig) -> anyhow::Result<Self> {
        let prefix = config.token_prefix.trim_matches('-');
        Ok(Self {
            primitive_files: build_globset(&config.primitive_files, "primitive")?,
            allowed_classes: config.allowed_classes.clone(),
            class_prefix: format!("{}-", prefix),
            token_var: token_var_pattern(prefix)?,
        })
    }

    /// Whether raw HTML is allowed in this file
    pub fn is_primitive(&self, display_path: &str) -> bool {
        self.primitive_files.is_match(display_path)
    }

    fn is_allowed_class(&self, class: &str) -> bool {
        class.starts_with(&self.class_prefix) || self.allowed_classes.iter().any(|c| c == class)
    }

    /// Remove every `var(--<prefix>-...)` expression from `text`
    pub fn strip_token_vars<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.token_var.replace_all(text, "")
    }
}

/// Matches `var(--<prefix>-...)` up to the first closing parenthesis
pub fn token_var_pattern(prefix: &str) -> anyhow::Result<Regex> {
    Ok(Regex::new(&format!(r"var\(\s*--{}-[^)]*\)", regex::escape(prefix)))?)
}

/// Result of scanning a set of files
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub violations: Vec<DesignTokenViolation>,
    pub files_scanned: usize,
    /// Files that could not be read
    pub unreadable: Vec<String>,
}

/// Byte ranges of `line` that sit inside `style={{ ... }}` blocks.
///
/// `in_style` carries an unclosed block over to the next line.
pub fn style_ranges(line: &str, in_style: &mut bool) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut pos = 0;
    loop {
        if *in_style {
            match line[pos..].find("}}") {
                Some(end) => {
                    ranges.push(pos..pos + end);
                    pos += end + 2;
                    *in_style = false;
                }
                None => {
                    ranges.push(pos..line.len());
                    break;
                }
            }
        } else {
            match STYLE_OPEN_PATTERN.find(&line[pos..]) {
                Some(m) => {
                    pos += m.end();
                    *in_style = true;
                }
                None => break,
            }
        }
    }
    ranges
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Ignore directives and comment lines, tracked line by line through a file
#[derive(Debug, Default)]
pub struct LineFilter {
    suppress_next: bool,
}

impl LineFilter {
    /// Whether `line` is exempt from checks; call once per line, in order
    pub fn skips(&mut self, line: &str) -> bool {
        if line.contains(IGNORE_NEXT_LINE) {
            self.suppress_next = true;
            return true;
        }
        let suppressed = std::mem::take(&mut self.suppress_next);
        suppressed || line.contains(IGNORE_LINE) || is_comment(line)
    }
}

/// Scan one file's text; `file` is the path recorded on each violation
pub fn scan_source(file: &str, text: &str, opts: &ScanOptions) -> Vec<DesignTokenViolation> {
    let primitive = opts.is_primitive(file);
    if primitive {
        trace!("{} is a primitive file, raw HTML allowed", file);
    }

    let mut violations = Vec::new();
    let mut in_style = false;
    let mut filter = LineFilter::default();

    for (idx, line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let ranges = style_ranges(line, &mut in_style);
        if filter.skips(line) {
            continue;
        }

        let content = line.trim().to_string();
        let violation = |kind, element, class_name| DesignTokenViolation {
            file: file.to_string(),
            line: line_number,
            kind,
            element,
            class_name,
            content: content.clone(),
        };

        if !primitive {
            for cap in TAG_PATTERN.captures_iter(line) {
                let tag = &cap[1];
                if mapping::is_html_element(tag) {
                    violations.push(violation(ViolationKind::RawHtml, Some(tag.to_string()), None));
                }
            }
        }

        let has_literal = ranges.into_iter().any(|range| {
            let stripped = opts.strip_token_vars(&line[range]);
            LITERAL_PATTERN.is_match(&stripped)
        });
        if has_literal {
            violations.push(violation(ViolationKind::InlineStyle, None, None));
        }

        for cap in CLASS_NAME_PATTERN.captures_iter(line) {
            let Some(value) = cap.iter().skip(1).flatten().next() else {
                continue;
            };
            for class in value.as_str().split_whitespace() {
                if !opts.is_allowed_class(class) {
                    violations.push(violation(
                        ViolationKind::CustomClass,
                        None,
                        Some(class.to_string()),
                    ));
                }
            }
        }
    }

    violations
}

/// Read and scan every file, in order
pub fn scan_files(files: &[SourceFile], opts: &ScanOptions) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for file in files {
        let text = match std::fs::read_to_string(&file.path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read {}: {}", file.display, e);
                outcome.unreadable.push(file.display.clone());
                continue;
            }
        };
        let found = scan_source(&file.display, &text, opts);
        if !found.is_empty() {
            debug!("{}: {} violations", file.display, found.len());
        }
        outcome.files_scanned += 1;
        outcome.violations.extend(found);
    }
    outcome
}
