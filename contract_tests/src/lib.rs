//! # Contract Tests
//!
//! "Golden" tests for the contracts at the edit/view boundary, so they don't
//! drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Contracts are written as code
//! - **Testability first**: Contract tests fail when behavior changes
//! - **Cross-crate**: Scenarios run the real gate, renderer and controller
//!
//! ## Structure
//!
//! - `document`: Stored document JSON shape
//! - `sanitizer`: Known attack vectors and their exact output
//! - `settings`: Settings file field names and versioning
//! - `tests/`: End-to-end mode boundary scenarios

pub mod document;
pub mod sanitizer;
pub mod settings;

/// Common test helpers
pub mod test_helpers {
    use core_types::DocumentId;
    use html_sanitizer::policy::{self, ElementDisposition};
    use html_sanitizer::tokenizer::{tokenize, Token};
    use services_mode_controller::PersistenceSink;

    /// Installs a test-writer subscriber; safe to call from every test
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    /// Persistence sink that records every write
    #[derive(Debug, Default)]
    pub struct RecordingPersistence {
        pub writes: Vec<(DocumentId, String)>,
    }

    impl RecordingPersistence {
        pub fn new() -> Self {
            Self::default()
        }

        /// Content of the most recent write
        pub fn last(&self) -> Option<&str> {
            self.writes.last().map(|(_, content)| content.as_str())
        }
    }

    impl PersistenceSink for RecordingPersistence {
        fn persist(&mut self, document_id: DocumentId, content: &str) {
            self.writes.push((document_id, content.to_string()));
        }
    }

    /// Asserts markup contains no executable content
    ///
    /// Re-tokenizes rather than searching for substrings, so escaped text
    /// that merely mentions `<script>` passes. Every element must be on the
    /// gate's allow-list and every URL must pass the gate's own scheme check,
    /// so obfuscated schemes are caught the same way the gate catches them.
    /// Attributes are not allow-list checked because rendered frames wrap the
    /// body in a shell that carries `data-mode` and `style`.
    pub fn assert_inert(markup: &str) {
        for token in tokenize(markup) {
            match token {
                Token::StartTag {
                    name, attributes, ..
                } => {
                    assert!(
                        matches!(
                            policy::element_disposition(&name),
                            ElementDisposition::Allow(_)
                        ),
                        "element {} is not allowed in {:?}",
                        name,
                        markup
                    );
                    for attribute in attributes {
                        assert!(
                            !attribute.name.starts_with("on"),
                            "event handler {} in {:?}",
                            attribute.name,
                            markup
                        );
                        if attribute.name == "href" || attribute.name == "src" {
                            let value = attribute.value.unwrap_or_default();
                            assert!(
                                policy::is_safe_url(&name, &value),
                                "unsafe url {:?} in {:?}",
                                value,
                                markup
                            );
                        }
                    }
                }
                Token::RawText { element, .. } => {
                    panic!("raw text element {} in {:?}", element, markup)
                }
                Token::Comment(_) | Token::Declaration(_) => {
                    panic!("comment or declaration in {:?}", markup)
                }
                Token::Text(_) | Token::EndTag { .. } => {}
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_assert_inert_accepts_shell_markup() {
            assert_inert(
                "<div class=\"rich-text-shell\" data-mode=\"view\" style=\"padding: 1rem\">\
                 <p>a <a href=\"https://ok.example\">b</a></p></div>",
            );
        }

        #[test]
        #[should_panic(expected = "unsafe url")]
        fn test_assert_inert_rejects_obfuscated_scheme() {
            assert_inert("<a href=\" jav&#x09;ascript:alert(1)\">x</a>");
        }

        #[test]
        #[should_panic(expected = "unsafe url")]
        fn test_assert_inert_rejects_data_url_on_link() {
            assert_inert("<a href=\"data:text/html,x\">x</a>");
        }

        #[test]
        #[should_panic(expected = "is not allowed")]
        fn test_assert_inert_rejects_unlisted_element() {
            assert_inert("<iframe></iframe>");
        }
    }
}
