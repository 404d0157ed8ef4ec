//! Sanitization contract
//!
//! Known attack vectors paired with the exact markup the gate emits for them.

/// `(input, expected output)` pairs
pub const GOLDEN_VECTORS: &[(&str, &str)] = &[
    ("<p>Hello</p>", "<p>Hello</p>"),
    ("Hello <b>world", "Hello <b>world</b>"),
    ("<script>alert(1)</script>", ""),
    ("<img src=x onerror=alert(1)>", "<img src=\"x\">"),
    ("<a href=\"javascript:alert(1)\">x</a>", "<a>x</a>"),
    ("<a href=\"&#106;avascript&#58;alert(1)\">x</a>", "<a>x</a>"),
    ("<iframe src=\"https://evil.example\"></iframe>", ""),
    ("<p style=\"color:red\">x</p>", "<p>x</p>"),
    ("<svg onload=alert(1)>", ""),
    ("<style>p { color: red }</style><p>x</p>", "<p>x</p>"),
    ("<details open ontoggle=alert(1)>", ""),
    ("<img src=\"data:text/html,x\">", "<img>"),
    (
        "<img src=\"data:image/png;base64,AAAA\">",
        "<img src=\"data:image/png;base64,AAAA\">",
    ),
    (
        "<a href=\"https://ok.example\" target=\"_blank\">ok</a>",
        "<a href=\"https://ok.example\" target=\"_blank\" rel=\"noopener noreferrer\">ok</a>",
    ),
    ("<!-- <script>x</script> -->visible", "visible"),
    ("<a href=\"javascript&colon;alert(1)\">x</a>", "<a>x</a>"),
    (
        "<p>&copy; 2024 &mdash; caf&eacute;</p>",
        "<p>\u{A9} 2024 \u{2014} caf\u{E9}</p>",
    ),
    ("<ul><li>a<li>b</ul>", "<ul><li>a</li><li>b</li></ul>"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::assert_inert;
    use html_sanitizer::sanitize_to_string;

    #[test]
    fn test_golden_vectors() {
        for (input, expected) in GOLDEN_VECTORS {
            assert_eq!(&sanitize_to_string(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_golden_outputs_are_inert_and_stable() {
        for (_, expected) in GOLDEN_VECTORS {
            assert_inert(expected);
            assert_eq!(&sanitize_to_string(expected), expected);
        }
    }
}
