//! Presentational shell shared by both surfaces

use crate::RenderMode;
use html_sanitizer::entities::escape_attribute;
use serde::{Deserialize, Serialize};

/// Container styling applied identically in both modes
///
/// Values are configuration, not user content, but are still escaped when
/// written into markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellStyle {
    pub class_name: String,
    pub padding: String,
    pub border: String,
    pub border_radius: String,
    pub background: String,
    pub min_height: String,
}

impl Default for ShellStyle {
    fn default() -> Self {
        Self {
            class_name: "rich-text-shell".to_string(),
            padding: "1rem".to_string(),
            border: "1px solid #e5e7eb".to_string(),
            border_radius: "0.5rem".to_string(),
            background: "#ffffff".to_string(),
            min_height: "8rem".to_string(),
        }
    }
}

impl ShellStyle {
    /// Sets the container class name
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Sets the container padding
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Sets the container minimum height
    pub fn with_min_height(mut self, min_height: impl Into<String>) -> Self {
        self.min_height = min_height.into();
        self
    }

    /// Inline CSS declarations, empty properties omitted
    pub fn inline_style(&self) -> String {
        let declarations = [
            ("padding", &self.padding),
            ("border", &self.border),
            ("border-radius", &self.border_radius),
            ("background", &self.background),
            ("min-height", &self.min_height),
        ];

        declarations
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Opening container tag for `mode`
    pub fn open_tag(&self, mode: RenderMode) -> String {
        let mut tag = String::from("<div class=\"");
        escape_attribute(&self.class_name, &mut tag);
        tag.push_str("\" data-mode=\"");
        tag.push_str(mode.as_str());
        tag.push('"');

        let style = self.inline_style();
        if !style.is_empty() {
            tag.push_str(" style=\"");
            escape_attribute(&style, &mut tag);
            tag.push('"');
        }
        tag.push('>');
        tag
    }

    /// Wraps already-safe inner markup in the container
    pub fn wrap(&self, mode: RenderMode, inner: &str) -> String {
        let mut markup = self.open_tag(mode);
        markup.push_str(inner);
        markup.push_str("</div>");
        markup
    }
}
