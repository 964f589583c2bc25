//! Escaping passes applied before values are substituted into generated text
//!
//! Each generated artifact routes its free-text inputs through one of these
//! functions; nothing is concatenated raw.

/// Escape text for XML/HTML element content and double- or single-quoted
/// attribute values.
///
/// Line breaks and tabs become character references; a parser would
/// otherwise normalise them to spaces inside attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`xml_escape`].
pub fn xml_unescape(s: &str) -> String {
    s.replace("&#xA;", "\n")
        .replace("&#xD;", "\r")
        .replace("&#x9;", "\t")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Escape text for a C# regular string literal (without the surrounding
/// quotes).
///
/// Markup-significant characters are emitted as `\uXXXX` escapes as well,
/// so the literal can never close the surrounding `<% %>` block or open a
/// tag when embedded in a server page.
pub fn csharp_string_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' | '>' | '%' | '&' | '\'' => out.push_str(&format!("\\u{:04X}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Build a regex that matches exactly `literal` and nothing else.
pub fn anchored_regex(literal: &str) -> String {
    format!("^{}$", regex::escape(literal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_escape_handles_all_special_chars() {
        assert_eq!(
            xml_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn xml_escape_is_identity_for_plain_text() {
        assert_eq!(xml_escape("My Service 1.2"), "My Service 1.2");
    }

    #[test]
    fn xml_unescape_reverses_escape() {
        let raw = "a&b<c>d\"e'f &amp; &#xA; literal";
        assert_eq!(xml_unescape(&xml_escape(raw)), raw);
    }

    #[test]
    fn xml_escape_preserves_line_breaks_and_tabs() {
        let escaped = xml_escape("line1\r\nline2\tend");
        assert_eq!(escaped, "line1&#xD;&#xA;line2&#x9;end");
        assert!(!escaped.contains(['\n', '\r', '\t']));
        assert_eq!(xml_unescape(&escaped), "line1\r\nline2\tend");
    }

    #[test]
    fn csharp_escape_quotes_and_backslashes() {
        assert_eq!(csharp_string_escape(r#"My "Svc"\x"#), r#"My \"Svc\"\\x"#);
    }

    #[test]
    fn csharp_escape_neutralises_markup() {
        let escaped = csharp_string_escape("a%>b<c&d'e");
        assert_eq!(escaped, r"a\u0025\u003Eb\u003Cc\u0026d\u0027e");
        assert!(!escaped.contains("%>"));
        assert!(!escaped.contains('<'));
    }

    #[test]
    fn anchored_regex_matches_only_literal() {
        let path = r"C:\My (App)\v1.0";
        let re = regex::Regex::new(&anchored_regex(path)).unwrap();
        assert!(re.is_match(path));
        assert!(!re.is_match(r"C:\My (App)\v1x0"));
        assert!(!re.is_match(r"C:\My (App)\v1.0\bin"));
        assert!(!re.is_match(r"D:\C:\My (App)\v1.0"));
    }
}
