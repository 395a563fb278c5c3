use serde::Serialize;

const DS_REACT: &str = "@digdir/designsystemet-react";
const PRIMITIVES: &str = "@platform-ui/primitives";

/// Suggested replacement for a raw HTML element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMapping {
    pub element: &'static str,
    /// Component to reach for first
    pub preferred: &'static str,
    pub alternatives: &'static [&'static str],
    /// One-line guidance for picking between preferred and alternatives
    pub decision_guide: &'static str,
    pub import_from: &'static str,
    pub example: &'static str,
    /// Entry in the component lexicon
    pub lexicon_ref: &'static str,
}

macro_rules! mapping {
    ($element:literal => $preferred:literal, [$($alt:literal),*], $guide:literal, $from:expr, $example:literal) => {
        ElementMapping {
            element: $element,
            preferred: $preferred,
            alternatives: &[$($alt),*],
            decision_guide: $guide,
            import_from: $from,
            example: $example,
            lexicon_ref: concat!("lexicon/", $preferred, ".md"),
        }
    };
}

static MAPPINGS: &[ElementMapping] = &[
    mapping!("div" => "Stack", ["Box", "Grid", "Card"],
        "Stack for one-dimensional layout, Grid for two, Box for a plain styled container, Card for grouped content",
        PRIMITIVES, "<Stack direction=\"vertical\" gap=\"4\">...</Stack>"),
    mapping!("span" => "Text", ["Box"],
        "Text for inline copy, Box when only spacing or colour is needed",
        PRIMITIVES, "<Text as=\"span\">...</Text>"),
    mapping!("p" => "Paragraph", [],
        "Paragraph for body text",
        DS_REACT, "<Paragraph>...</Paragraph>"),
    mapping!("h1" => "Heading", [],
        "Heading with level 1",
        DS_REACT, "<Heading level={1}>...</Heading>"),
    mapping!("h2" => "Heading", [],
        "Heading with level 2",
        DS_REACT, "<Heading level={2}>...</Heading>"),
    mapping!("h3" => "Heading", [],
        "Heading with level 3",
        DS_REACT, "<Heading level={3}>...</Heading>"),
    mapping!("h4" => "Heading", [],
        "Heading with level 4",
        DS_REACT, "<Heading level={4}>...</Heading>"),
    mapping!("h5" => "Heading", [],
        "Heading with level 5",
        DS_REACT, "<Heading level={5}>...</Heading>"),
    mapping!("h6" => "Heading", [],
        "Heading with level 6",
        DS_REACT, "<Heading level={6}>...</Heading>"),
    mapping!("button" => "Button", ["Link"],
        "Button for actions, Link when the click navigates",
        DS_REACT, "<Button variant=\"primary\">Save</Button>"),
    mapping!("a" => "Link", ["Button"],
        "Link for navigation, Button with asChild when it must look like a button",
        DS_REACT, "<Link href=\"/bookings\">Bookings</Link>"),
    mapping!("input" => "Textfield", ["Checkbox", "Radio", "Switch", "Search"],
        "Textfield for text input, Checkbox/Radio/Switch for choices, Search for search boxes",
        DS_REACT, "<Textfield label=\"Name\" />"),
    mapping!("textarea" => "Textarea", ["Textfield"],
        "Textarea for multi-line input",
        DS_REACT, "<Textarea aria-label=\"Comment\" />"),
    mapping!("select" => "Select", ["Combobox"],
        "Select for short option lists, Combobox when filtering is needed",
        DS_REACT, "<Select aria-label=\"Season\">...</Select>"),
    mapping!("label" => "Label", ["Field"],
        "Label for standalone labels, Field to group label, input and description",
        DS_REACT, "<Label>Name</Label>"),
    mapping!("ul" => "List.Unordered", ["Stack"],
        "List.Unordered for bullet lists, Stack for repeated layout items",
        DS_REACT, "<List.Unordered><List.Item>...</List.Item></List.Unordered>"),
    mapping!("ol" => "List.Ordered", [],
        "List.Ordered for numbered lists",
        DS_REACT, "<List.Ordered><List.Item>...</List.Item></List.Ordered>"),
    mapping!("li" => "List.Item", [],
        "List.Item inside List.Unordered or List.Ordered",
        DS_REACT, "<List.Item>...</List.Item>"),
    mapping!("table" => "Table", ["DataTable"],
        "Table for static data, DataTable when sorting or selection is needed",
        DS_REACT, "<Table><Table.Head>...</Table.Head></Table>"),
    mapping!("form" => "Stack", ["Fieldset"],
        "Keep a semantic form via Stack as=\"form\", Fieldset to group related fields",
        PRIMITIVES, "<Stack as=\"form\" onSubmit={handleSubmit}>...</Stack>"),
    mapping!("fieldset" => "Fieldset", [],
        "Fieldset with a legend for grouped inputs",
        DS_REACT, "<Fieldset legend=\"Contact\">...</Fieldset>"),
    mapping!("img" => "Image", ["Avatar"],
        "Image for content images, Avatar for people",
        PRIMITIVES, "<Image src={url} alt=\"\" />"),
    mapping!("section" => "Stack", ["Card"],
        "Stack as=\"section\" for page sections, Card for boxed content",
        PRIMITIVES, "<Stack as=\"section\">...</Stack>"),
    mapping!("header" => "Stack", [],
        "Stack as=\"header\"",
        PRIMITIVES, "<Stack as=\"header\">...</Stack>"),
    mapping!("footer" => "Stack", [],
        "Stack as=\"footer\"",
        PRIMITIVES, "<Stack as=\"footer\">...</Stack>"),
    mapping!("nav" => "Stack", ["Tabs", "Pagination"],
        "Stack as=\"nav\" for link groups, Tabs or Pagination when they fit",
        PRIMITIVES, "<Stack as=\"nav\">...</Stack>"),
    mapping!("main" => "Stack", [],
        "Stack as=\"main\"",
        PRIMITIVES, "<Stack as=\"main\">...</Stack>"),
    mapping!("article" => "Card", ["Stack"],
        "Card for self-contained content, Stack as=\"article\" otherwise",
        DS_REACT, "<Card>...</Card>"),
    mapping!("aside" => "Stack", ["Alert"],
        "Stack as=\"aside\", Alert for callouts",
        PRIMITIVES, "<Stack as=\"aside\">...</Stack>"),
    mapping!("hr" => "Divider", [],
        "Divider",
        DS_REACT, "<Divider />"),
    mapping!("dialog" => "Dialog", ["Popover"],
        "Dialog for modal flows, Popover for anchored content",
        DS_REACT, "<Dialog>...</Dialog>"),
    mapping!("details" => "Details", [],
        "Details for disclosure",
        DS_REACT, "<Details><Details.Summary>...</Details.Summary></Details>"),
    mapping!("summary" => "Details.Summary", [],
        "Details.Summary inside Details",
        DS_REACT, "<Details.Summary>...</Details.Summary>"),
];

/// Intrinsic elements without a mapping that still count as raw HTML
static OTHER_ELEMENTS: &[&str] = &[
    "abbr", "audio", "b", "blockquote", "br", "canvas", "caption", "code", "col", "colgroup",
    "dd", "dl", "dt", "em", "figcaption", "figure", "i", "iframe", "legend", "mark", "meter",
    "optgroup", "option", "output", "path", "picture", "pre", "progress", "small", "source",
    "strong", "sub", "sup", "svg", "tbody", "td", "tfoot", "th", "thead", "time", "tr", "u",
    "video",
];

/// Look up the mapping for a raw element
pub fn lookup(element: &str) -> Option<&'static ElementMapping> {
    MAPPINGS.iter().find(|m| m.element == element)
}

/// Whether `name` is a lowercase intrinsic HTML element
pub fn is_html_element(name: &str) -> bool {
    lookup(name).is_some() || OTHER_ELEMENTS.contains(&name)
}

/// One-line suggestion shown next to a raw-html violation
pub fn suggestion(element: &str) -> Option<String> {
    lookup(element).map(|m| {
        let mut text = format!("use {} from {}", m.preferred, m.import_from);
        if !m.alternatives.is_empty() {
            text.push_str(&format!(" (alternatives: {})", m.alternatives.join(", ")));
        }
        text
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_element() {
        let m = lookup("button").unwrap();
        assert_eq!(m.preferred, "Button");
        assert_eq!(m.import_from, DS_REACT);
        assert_eq!(m.lexicon_ref, "lexicon/Button.md");
    }

    #[test]
    fn test_lookup_unknown_element() {
        assert!(lookup("string").is_none());
        assert!(!is_html_element("string"));
    }

    #[test]
    fn test_unmapped_intrinsic_is_html() {
        assert!(lookup("svg").is_none());
        assert!(is_html_element("svg"));
    }

    #[test]
    fn test_elements_are_unique() {
        let mut names: Vec<_> = MAPPINGS.iter().map(|m| m.element).collect();
        names.extend(OTHER_ELEMENTS);
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_suggestion_lists_alternatives() {
        assert_eq!(
            suggestion("a").unwrap(),
            "use Link from @digdir/designsystemet-react (alternatives: Button)"
        );
        assert_eq!(
            suggestion("p").unwrap(),
            "use Paragraph from @digdir/designsystemet-react"
        );
        assert!(suggestion("svg").is_none());
    }
}
