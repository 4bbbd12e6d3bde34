//! String literal escape handling.
//!
//! The parser stores string literals verbatim (quotes and backslash
//! sequences included); [`unescape`] cooks them into runtime text and
//! [`escape`] renders runtime text back into displayable literal form.

/// Resolve backslash escape sequences in the body of a string literal.
///
/// Unknown escapes keep the escaped character as-is (`\q` becomes `q`).
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Escape text for display inside a quoted string literal.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unescape_common_sequences() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn unescape_unknown_escape_keeps_char() {
        assert_eq!(unescape(r"\q"), "q");
    }

    #[test]
    fn escape_round_trip() {
        let text = "line\nwith\t\"quotes\" and \\";
        assert_eq!(unescape(&escape(text)), text);
    }
}
