//! Property tests for the sanitization gate
//!
//! Inputs are generated from a vocabulary of HTML fragments (allowed, dropped
//! and hostile) so the tokenizer sees realistic, badly nested markup rather
//! than uniformly random bytes.

use html_sanitizer::tokenizer::{tokenize, Token};
use html_sanitizer::{policy, sanitize_to_string};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<a href=\"/ok\">", "<a href=javascript:alert(1)>", "</a>",
    "<img src=x onerror=alert(1)>", "<script>", "</script>", "alert(1)", "<svg onload=x>",
    "</svg>", "<iframe srcdoc=\"<script>x</script>\">", "<!--", "-->", "<", ">", "&", "&amp;",
    "&#106;avascript:", "\"", "'", " ", "text", "<div class='c'>", "</div>", "<style>",
    "</style>", "<table><tr><td>", "</td></tr></table>", "<br/>", "<object>", "</object>",
    "<a target=_blank rel=opener href='https://x'>", "<li>", "<ul>", "</ul>", "=", "on",
    "<math>", "</math>", "<plaintext>", "\0", "é", "<!DOCTYPE html>",
];

fn html_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

fn assert_inert(output: &str) {
    for token in tokenize(output) {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => {
                assert!(
                    matches!(policy::element_disposition(&name), policy::ElementDisposition::Allow(_)),
                    "disallowed element <{}> in {:?}",
                    name,
                    output
                );
                for attribute in attributes {
                    assert!(
                        !attribute.name.starts_with("on"),
                        "event handler {} in {:?}",
                        attribute.name,
                        output
                    );
                    if attribute.name == "href" || attribute.name == "src" {
                        let value = attribute.value.unwrap_or_default();
                        assert!(policy::is_safe_url(&name, &value), "unsafe url {:?}", value);
                    }
                }
            }
            Token::RawText { element, .. } => panic!("raw-text element {} survived", element),
            Token::Comment(_) | Token::Declaration(_) => {
                panic!("comment or declaration survived in {:?}", output)
            }
            Token::Text(_) | Token::EndTag { .. } => {}
        }
    }
}

proptest! {
    #[test]
    fn prop_output_is_inert(input in html_soup()) {
        assert_inert(&sanitize_to_string(&input));
    }

    #[test]
    fn prop_arbitrary_strings_are_inert(input in any::<String>()) {
        assert_inert(&sanitize_to_string(&input));
    }

    #[test]
    fn prop_idempotent(input in html_soup()) {
        let once = sanitize_to_string(&input);
        prop_assert_eq!(sanitize_to_string(&once), once);
    }

    #[test]
    fn prop_idempotent_on_arbitrary_strings(input in any::<String>()) {
        let once = sanitize_to_string(&input);
        prop_assert_eq!(sanitize_to_string(&once), once);
    }

    #[test]
    fn prop_plain_text_survives(text in "[a-zA-Z0-9 .,!?]{0,64}") {
        prop_assert_eq!(sanitize_to_string(&format!("<p>{}</p>", text)), format!("<p>{}</p>", text));
    }

    #[test]
    fn prop_compliant_markup_is_unchanged(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
        tag in prop::sample::select(&["p", "h2", "blockquote", "li", "strong", "em", "td"][..]),
    ) {
        let body = words.join(" ");
        let input = format!("<{tag} class=\"x\">{body}</{tag}>");
        prop_assert_eq!(sanitize_to_string(&input), input);
    }
}
