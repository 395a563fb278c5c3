use super::layout::Layout;
use anyhow::Context;
use tracing::debug;

/// Template name for component specs
pub const SECTION_SPEC: &str = "section-spec";

const PRODUCT_VISION: &str = r#"# {{title}}

_Last updated: {{date}}_

## Problem

What problem does the product solve, and for whom?

## Users

- Primary:
- Secondary:

## Key capabilities

1.

## Success measures

-
"#;

const PRODUCT_ROADMAP: &str = r#"# {{title}}

_Last updated: {{date}}_

## Sections

| Section | Components | Status |
|---------|------------|--------|
|         |            | draft  |

## Milestones

- [ ]
"#;

const DATA_MODEL: &str = r#"# {{title}}

_Last updated: {{date}}_

## Entities

### Entity

| Field | Type | Notes |
|-------|------|-------|
| id    | string | |

## Relationships

-
"#;

const SECTION_SPEC_TEMPLATE: &str = r#"---
component: {{component}}
title: {{title}}
status: draft
---
# {{title}}

_Created: {{date}}_

## Purpose

## Composition

Built from design-system components listed in `COMPOSE.json`. Root component: `{{pascal}}`.

## States

- Default
- Loading
- Empty
- Error

## Test ids

Stable `data-testid` values live in `TESTIDS.json` and start with `{{component}}`.

## Accessibility

## Open questions
"#;

fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "product-vision" => Some(PRODUCT_VISION),
        "product-roadmap" => Some(PRODUCT_ROADMAP),
        "data-model" => Some(DATA_MODEL),
        SECTION_SPEC => Some(SECTION_SPEC_TEMPLATE),
        _ => None,
    }
}

/// Load `<templates_dir>/<name>.md`, falling back to the built-in template
pub fn load(layout: &Layout, name: &str) -> anyhow::Result<String> {
    let path = layout.templates_dir.join(format!("{}.md", name));
    if path.is_file() {
        debug!("Using template {}", path.display());
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()));
    }
    builtin(name)
        .map(str::to_string)
        .with_context(|| format!("Unknown template '{}'", name))
}

/// Replace every `{{key}}` placeholder; unknown placeholders are left as-is
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{{{}}}}}", key), value)
    })
}

/// Today's date for the `{{date}}` placeholder
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
