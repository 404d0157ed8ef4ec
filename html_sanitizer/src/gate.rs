//! The sanitization gate
//!
//! Walks the token stream once, keeps a stack of open allowed elements and
//! writes canonical markup: lowercase names, double-quoted attributes,
//! escaped text and an explicit end tag for every non-void element.

use crate::entities::{escape_attribute, escape_text};
use crate::policy::{
    self, AttributeDecision, AttributeRejection, ElementDisposition, ElementPolicy,
    MAX_NESTING_DEPTH,
};
use crate::tokenizer::{Attribute, Token, Tokenizer};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Markup that has passed through the gate
///
/// There is no public constructor from an arbitrary string, and no
/// `Deserialize`: the only way to obtain one is [`sanitize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    /// The empty document
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the markup as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the markup
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true if nothing survived sanitization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SanitizedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a sanitization pass removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeReport {
    /// Removed (dropped or unwrapped) elements by name
    pub removed_elements: BTreeMap<String, usize>,
    /// Attributes removed for any reason
    pub removed_attributes: usize,
    /// Subset of `removed_attributes` rejected for their URL scheme
    pub blocked_urls: usize,
}

impl SanitizeReport {
    /// Returns true if the input needed no changes to its element/attribute surface
    pub fn is_clean(&self) -> bool {
        self.removed_elements.is_empty() && self.removed_attributes == 0
    }

    /// Total number of removed elements
    pub fn removed_element_count(&self) -> usize {
        self.removed_elements.values().sum()
    }

    fn record_element(&mut self, name: &str) {
        *self.removed_elements.entry(name.to_string()).or_insert(0) += 1;
    }

    fn record_attribute(&mut self, rejection: AttributeRejection) {
        self.removed_attributes += 1;
        if rejection == AttributeRejection::BlockedUrl {
            self.blocked_urls += 1;
        }
    }
}

/// Sanitized markup together with its report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub html: SanitizedHtml,
    pub report: SanitizeReport,
}

/// Sanitizes untrusted HTML
///
/// Never fails. Safe children of removed wrappers are kept; unsafe wrappers,
/// attributes and active content are removed, not escaped into visible text.
pub fn sanitize(raw: &str) -> SanitizedHtml {
    sanitize_with_report(raw).html
}

/// Sanitizes untrusted HTML and returns the markup as a plain string
pub fn sanitize_to_string(raw: &str) -> String {
    sanitize(raw).into_string()
}

/// Sanitizes untrusted HTML and reports what was removed
pub fn sanitize_with_report(raw: &str) -> Sanitized {
    let mut gate = Gate::new(raw.len());
    gate.run(Tokenizer::new(raw));
    let Gate { out, report, .. } = gate;

    if !report.is_clean() {
        tracing::debug!(
            removed_elements = report.removed_element_count(),
            removed_attributes = report.removed_attributes,
            blocked_urls = report.blocked_urls,
            "sanitizer stripped markup"
        );
    }

    Sanitized {
        html: SanitizedHtml(out),
        report,
    }
}

/// A dropped element whose content is being skipped
struct Suppression {
    name: String,
    depth: usize,
}

struct Gate {
    out: String,
    open: Vec<&'static str>,
    suppressed: Option<Suppression>,
    report: SanitizeReport,
}

impl Gate {
    fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            open: Vec::new(),
            suppressed: None,
            report: SanitizeReport::default(),
        }
    }

    fn run(&mut self, tokens: Tokenizer<'_>) {
        for token in tokens {
            if self.skip_suppressed(&token) {
                continue;
            }
            match token {
                Token::Text(text) => escape_text(&text, &mut self.out),
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    if name == "plaintext" {
                        self.report.record_element(&name);
                        break;
                    }
                    self.start_tag(name, attributes, self_closing);
                }
                Token::EndTag { name } => self.end_tag(&name),
                // Raw-text bodies only exist inside dropped elements
                Token::RawText { .. } | Token::Comment(_) | Token::Declaration(_) => {}
            }
        }

        while let Some(name) = self.open.pop() {
            self.close(name);
        }
    }

    /// Consumes tokens inside a dropped element; returns true if `token` was skipped
    fn skip_suppressed(&mut self, token: &Token) -> bool {
        let Some(suppression) = self.suppressed.as_mut() else {
            return false;
        };
        match token {
            Token::StartTag {
                name,
                self_closing: false,
                ..
            } if *name == suppression.name => suppression.depth += 1,
            Token::EndTag { name } if *name == suppression.name => {
                suppression.depth -= 1;
                if suppression.depth == 0 {
                    self.suppressed = None;
                }
            }
            _ => {}
        }
        true
    }

    fn start_tag(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        match policy::element_disposition(&name) {
            ElementDisposition::Allow(element) => {
                for implied in policy::implied_ends(element.name) {
                    self.close_open(implied.targets, implied.scope);
                }
                if !element.void && self.open.len() >= MAX_NESTING_DEPTH {
                    self.report.record_element(&name);
                    return;
                }
                self.out.push('<');
                self.out.push_str(element.name);
                self.write_attributes(element, attributes);
                self.out.push('>');
                if !element.void {
                    self.open.push(element.name);
                }
            }
            ElementDisposition::Drop => {
                self.report.record_element(&name);
                // Raw-text bodies arrive as a single token and need no tracking
                let opens_subtree = !policy::is_void(&name)
                    && !self_closing
                    && !crate::tokenizer::RAW_TEXT_ELEMENTS.contains(&name.as_str());
                if opens_subtree {
                    self.suppressed = Some(Suppression { name, depth: 1 });
                }
            }
            ElementDisposition::Unwrap => self.report.record_element(&name),
        }
    }

    fn end_tag(&mut self, name: &str) {
        self.close_open(&[name], policy::end_tag_scope(name));
    }

    /// Closes the innermost open element named in `targets`, and everything
    /// above it, unless an element named in `scope` is reached first
    fn close_open(&mut self, targets: &[&str], scope: &[&str]) {
        let found = self
            .open
            .iter()
            .rev()
            .position(|open| targets.contains(open) || scope.contains(open))
            .map(|from_top| self.open.len() - 1 - from_top);
        let Some(index) = found.filter(|&index| targets.contains(&self.open[index])) else {
            return;
        };
        while self.open.len() > index {
            if let Some(open) = self.open.pop() {
                self.close(open);
            }
        }
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn write_attributes(&mut self, element: &'static ElementPolicy, attributes: Vec<Attribute>) {
        let mut seen: HashSet<String> = HashSet::with_capacity(attributes.len());
        let has_target = element.name == "a" && attributes.iter().any(|a| a.name == "target");

        for attribute in attributes {
            if !seen.insert(attribute.name.clone()) {
                continue;
            }

            // Linked pages opened in a new context never get an opener handle
            if has_target && attribute.name == "rel" {
                continue;
            }

            let value = attribute.value.unwrap_or_default();
            match policy::check_attribute(element, &attribute.name, &value) {
                AttributeDecision::Keep => self.write_attribute(&attribute.name, &value),
                AttributeDecision::Reject(rejection) => self.report.record_attribute(rejection),
            }
        }

        if has_target {
            self.write_attribute("rel", "noopener noreferrer");
        }
    }

    fn write_attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape_attribute(value, &mut self.out);
        self.out.push('"');
    }
}
