//! Fixed allow-list policy
//!
//! The policy is a set of static tables. It is a constant of the system and
//! deliberately has no constructor or builder.

/// Maximum depth of open allowed elements; deeper elements are unwrapped
pub const MAX_NESTING_DEPTH: usize = 256;

/// An allowed element and the attributes it may carry beyond the global set
#[derive(Debug, PartialEq, Eq)]
pub struct ElementPolicy {
    /// Canonical lowercase element name
    pub name: &'static str,
    /// Element-specific attributes
    pub attributes: &'static [&'static str],
    /// Void elements have no end tag and no children
    pub void: bool,
}

const fn element(name: &'static str, attributes: &'static [&'static str]) -> ElementPolicy {
    ElementPolicy {
        name,
        attributes,
        void: false,
    }
}

const fn void_element(name: &'static str, attributes: &'static [&'static str]) -> ElementPolicy {
    ElementPolicy {
        name,
        attributes,
        void: true,
    }
}

/// Structural and typographic elements allowed through the gate
pub static ALLOWED_ELEMENTS: &[ElementPolicy] = &[
    // Paragraphs and blocks
    element("p", &[]),
    element("div", &[]),
    element("span", &[]),
    void_element("br", &[]),
    void_element("hr", &[]),
    element("blockquote", &[]),
    element("pre", &[]),
    element("code", &[]),
    // Headings
    element("h1", &[]),
    element("h2", &[]),
    element("h3", &[]),
    element("h4", &[]),
    element("h5", &[]),
    element("h6", &[]),
    // Lists
    element("ul", &[]),
    element("ol", &["start", "reversed"]),
    element("li", &[]),
    // Emphasis
    element("strong", &[]),
    element("b", &[]),
    element("em", &[]),
    element("i", &[]),
    element("u", &[]),
    element("s", &[]),
    element("strike", &[]),
    element("del", &[]),
    element("ins", &[]),
    element("sub", &[]),
    element("sup", &[]),
    element("mark", &[]),
    element("small", &[]),
    // Links and images
    element("a", &["href", "target", "rel"]),
    void_element("img", &["src", "alt", "width", "height"]),
    // Tables
    element("table", &[]),
    element("thead", &[]),
    element("tbody", &[]),
    element("tfoot", &[]),
    element("tr", &[]),
    element("th", &["colspan", "rowspan", "scope"]),
    element("td", &["colspan", "rowspan"]),
    element("caption", &[]),
    element("colgroup", &["span"]),
    void_element("col", &["span"]),
];

/// Attributes allowed on every allowed element
pub const GLOBAL_ATTRIBUTES: &[&str] = &["class", "title", "lang", "dir"];

/// Elements removed together with everything inside them
pub const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "applet", "frame", "frameset", "noscript",
    "noembed", "noframes", "template", "textarea", "select", "svg", "math", "xmp", "title",
    "base", "link", "meta", "head", "plaintext",
];

/// HTML void elements, allowed or not; these never open a subtree
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Attributes whose value must be a non-negative integer
const NUMERIC_ATTRIBUTES: &[&str] = &["width", "height", "colspan", "rowspan", "start", "span"];

/// Attributes whose value is a URL
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Schemes allowed in any URL attribute
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Inline image types allowed in `img src` data URLs
const SAFE_DATA_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/gif",
    "image/jpeg",
    "image/jpg",
    "image/webp",
];

/// Allowed elements whose start tag closes an open `p`
const CLOSES_PARAGRAPH: &[&str] = &[
    "p", "div", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "hr", "table",
];

/// Open elements a `p` search never looks past
const PARAGRAPH_SCOPE: &[&str] = &["table", "td", "th", "caption"];

/// Open elements an `li` search never looks past
const LIST_ITEM_SCOPE: &[&str] = &[
    "ul", "ol", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "table", "td", "th",
    "caption",
];

const TABLE_SCOPE: &[&str] = &["table"];

/// An open element that a start tag closes implicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpliedEnd {
    /// Any of these, if found, is closed with everything above it
    pub targets: &'static [&'static str],
    /// The search stops at the first of these
    pub scope: &'static [&'static str],
}

/// Implied end tags for an allowed start tag, innermost rule first
///
/// `<p>a<p>b` is two sibling paragraphs, not nested ones; the same holds for
/// list items, table cells, rows and row groups.
pub fn implied_ends(name: &str) -> Vec<ImpliedEnd> {
    let mut ends = Vec::with_capacity(2);
    match name {
        "li" => ends.push(ImpliedEnd {
            targets: &["li"],
            scope: LIST_ITEM_SCOPE,
        }),
        "td" | "th" => ends.push(ImpliedEnd {
            targets: &["td", "th"],
            scope: TABLE_SCOPE,
        }),
        "tr" => ends.push(ImpliedEnd {
            targets: &["tr"],
            scope: TABLE_SCOPE,
        }),
        "thead" | "tbody" | "tfoot" => ends.push(ImpliedEnd {
            targets: &["thead", "tbody", "tfoot"],
            scope: TABLE_SCOPE,
        }),
        _ => {}
    }
    if CLOSES_PARAGRAPH.contains(&name) {
        ends.push(ImpliedEnd {
            targets: &["p"],
            scope: PARAGRAPH_SCOPE,
        });
    }
    ends
}

/// Open elements an end tag for `name` never looks past
pub fn end_tag_scope(name: &str) -> &'static [&'static str] {
    match name {
        "p" => PARAGRAPH_SCOPE,
        "li" => LIST_ITEM_SCOPE,
        "td" | "th" | "tr" | "thead" | "tbody" | "tfoot" | "caption" | "colgroup" => TABLE_SCOPE,
        _ => &[],
    }
}

/// What the gate does with an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementDisposition {
    /// Emit the element with filtered attributes
    Allow(&'static ElementPolicy),
    /// Remove the tag but keep its children
    Unwrap,
    /// Remove the element and all of its content
    Drop,
}

/// Why an attribute was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRejection {
    /// Name is not on the allow-list for this element
    NotAllowed,
    /// URL uses a scheme outside the allow-list
    BlockedUrl,
    /// Value has the wrong shape (e.g. non-numeric width)
    InvalidValue,
}

/// Decision for a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDecision {
    /// Keep the attribute as-is
    Keep,
    /// Remove the attribute
    Reject(AttributeRejection),
}

/// Looks up the disposition of an element by lowercase name
pub fn element_disposition(name: &str) -> ElementDisposition {
    if let Some(policy) = ALLOWED_ELEMENTS.iter().find(|e| e.name == name) {
        ElementDisposition::Allow(policy)
    } else if DROPPED_ELEMENTS.contains(&name) {
        ElementDisposition::Drop
    } else {
        ElementDisposition::Unwrap
    }
}

/// Returns true for elements that never have an end tag
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Decides whether `name="value"` may stay on `element`
pub fn check_attribute(element: &ElementPolicy, name: &str, value: &str) -> AttributeDecision {
    if !GLOBAL_ATTRIBUTES.contains(&name) && !element.attributes.contains(&name) {
        return AttributeDecision::Reject(AttributeRejection::NotAllowed);
    }

    if NUMERIC_ATTRIBUTES.contains(&name)
        && (value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()))
    {
        return AttributeDecision::Reject(AttributeRejection::InvalidValue);
    }

    if URL_ATTRIBUTES.contains(&name) && !is_safe_url(element.name, value) {
        return AttributeDecision::Reject(AttributeRejection::BlockedUrl);
    }

    AttributeDecision::Keep
}

/// Checks a decoded URL against the scheme allow-list
///
/// Browsers ignore ASCII whitespace and control characters inside a scheme,
/// so those are removed before the scheme is read.
pub fn is_safe_url(element: &str, value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match url_scheme(&normalized) {
        None => true,
        Some(scheme) if SAFE_SCHEMES.contains(&scheme) => true,
        Some("data") if element == "img" => is_safe_data_image(&normalized),
        Some(_) => false,
    }
}

/// Returns the scheme of an absolute URL, `None` for a relative one
fn url_scheme(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let before = &url[..colon];
    if before.contains(|c| matches!(c, '/' | '?' | '#')) {
        None
    } else {
        Some(before)
    }
}

fn is_safe_data_image(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("data:") else {
        return false;
    };
    SAFE_DATA_IMAGE_TYPES.iter().any(|mime| {
        rest.strip_prefix(mime)
            .is_some_and(|tail| tail.starts_with(';') || tail.starts_with(','))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(name: &str) -> &'static ElementPolicy {
        match element_disposition(name) {
            ElementDisposition::Allow(p) => p,
            other => panic!("expected {} to be allowed, got {:?}", name, other),
        }
    }

    #[test]
    fn test_element_dispositions() {
        assert!(matches!(element_disposition("p"), ElementDisposition::Allow(_)));
        assert!(matches!(element_disposition("table"), ElementDisposition::Allow(_)));
        assert_eq!(element_disposition("script"), ElementDisposition::Drop);
        assert_eq!(element_disposition("iframe"), ElementDisposition::Drop);
        assert_eq!(element_disposition("object"), ElementDisposition::Drop);
        assert_eq!(element_disposition("font"), ElementDisposition::Unwrap);
        assert_eq!(element_disposition("form"), ElementDisposition::Unwrap);
        assert_eq!(element_disposition("custom-widget"), ElementDisposition::Unwrap);
    }

    #[test]
    fn test_allowed_elements_are_unique() {
        for (i, a) in ALLOWED_ELEMENTS.iter().enumerate() {
            assert!(
                ALLOWED_ELEMENTS[i + 1..].iter().all(|b| b.name != a.name),
                "duplicate entry for {}",
                a.name
            );
            assert!(!DROPPED_ELEMENTS.contains(&a.name));
        }
    }

    #[test]
    fn test_allowed_void_elements_match_html() {
        for element in ALLOWED_ELEMENTS {
            assert_eq!(element.void, is_void(element.name), "{}", element.name);
        }
    }

    #[test]
    fn test_event_handlers_never_allowed() {
        for element in ALLOWED_ELEMENTS {
            for attr in element.attributes.iter().chain(GLOBAL_ATTRIBUTES) {
                assert!(!attr.starts_with("on"), "{} allows {}", element.name, attr);
                assert_ne!(*attr, "style");
            }
        }
        assert_eq!(
            check_attribute(policy("img"), "onerror", "alert(1)"),
            AttributeDecision::Reject(AttributeRejection::NotAllowed)
        );
    }

    #[test]
    fn test_global_attributes() {
        assert_eq!(check_attribute(policy("p"), "class", "ql-align-center"), AttributeDecision::Keep);
        assert_eq!(check_attribute(policy("h2"), "dir", "rtl"), AttributeDecision::Keep);
        assert_eq!(
            check_attribute(policy("p"), "style", "color:red"),
            AttributeDecision::Reject(AttributeRejection::NotAllowed)
        );
        assert_eq!(
            check_attribute(policy("p"), "href", "/x"),
            AttributeDecision::Reject(AttributeRejection::NotAllowed)
        );
    }

    #[test]
    fn test_numeric_attributes() {
        assert_eq!(check_attribute(policy("td"), "colspan", "2"), AttributeDecision::Keep);
        assert_eq!(
            check_attribute(policy("img"), "width", "100%"),
            AttributeDecision::Reject(AttributeRejection::InvalidValue)
        );
        assert_eq!(
            check_attribute(policy("img"), "height", ""),
            AttributeDecision::Reject(AttributeRejection::InvalidValue)
        );
    }

    #[test]
    fn test_safe_urls() {
        assert!(is_safe_url("a", "https://example.com"));
        assert!(is_safe_url("a", "HTTP://EXAMPLE.COM"));
        assert!(is_safe_url("a", "mailto:me@example.com"));
        assert!(is_safe_url("a", "/relative/path:with-colon"));
        assert!(is_safe_url("a", "?q=a:b"));
        assert!(is_safe_url("a", "#anchor"));
        assert!(is_safe_url("img", "x"));
        assert!(is_safe_url("img", "data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_blocked_urls() {
        assert!(!is_safe_url("a", "javascript:alert(1)"));
        assert!(!is_safe_url("a", "JaVaScRiPt:alert(1)"));
        assert!(!is_safe_url("a", " java\tscript:alert(1)"));
        assert!(!is_safe_url("a", "java\u{0}script:alert(1)"));
        assert!(!is_safe_url("a", "vbscript:msgbox"));
        assert!(!is_safe_url("a", "data:text/html,<script>"));
        assert!(!is_safe_url("a", "data:image/png;base64,AAAA"));
        assert!(!is_safe_url("img", "data:image/svg+xml,<svg onload=x>"));
        assert!(!is_safe_url("img", "data:image/pngx,AAAA"));
        assert!(!is_safe_url("a", ":nothing"));
    }
}
