use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Characters the schema dialect counts as whitespace on top of the
/// engine's `\s` class.
const EXTRA_SPACE_CHARS: &str = "\u{FEFF}\u{000B}\u{00A0}\u{2029}\u{2003}";

/// Translate a schema-dialect (ECMA 262) pattern into the syntax the
/// backing regex engine understands:
///
/// - `\w` -> `\pL`, `\d` -> `\pN`
/// - `\s` / `\S` are widened with the extra whitespace characters
/// - control escapes (`\cA` .. `\cZ`, `\c@`, `\c[`, ..., case-insensitive)
///   become the corresponding hex escape
///
/// The scan is escape-aware, so a literal `\\w` is left alone.
pub(crate) fn convert_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(current) = chars.next() {
        if current != '\\' {
            out.push(current);
            continue;
        }
        match chars.next() {
            Some('w') => out.push_str(r"\pL"),
            Some('d') => out.push_str(r"\pN"),
            Some('s') => {
                out.push_str(r"[\s");
                out.push_str(EXTRA_SPACE_CHARS);
                out.push(']');
            }
            Some('S') => {
                out.push_str(r"[^\s");
                out.push_str(EXTRA_SPACE_CHARS);
                out.push(']');
            }
            Some('c') => match chars.next() {
                Some(control) => {
                    let control = control.to_ascii_uppercase();
                    if ('@'..='_').contains(&control) {
                        out.push_str(&format!(r"\x{:02x}", (control as u8) ^ 0x40));
                    } else {
                        out.push_str(r"\c");
                        out.push(control);
                    }
                }
                None => out.push_str(r"\c"),
            },
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Undo the escaping a JSON-pointer segment may carry: percent-encoding
/// first, then the `~1` -> `/` and `~0` -> `~` pointer escapes.
pub(crate) fn unescape_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string());
    decoded.replace("~1", "/").replace("~0", "~")
}

/// Array indices in pointer walks; `+1` and leading zeros are not indices.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.starts_with('+') || (segment.starts_with('0') && segment.len() != 1) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r"^\w+$", r"^\pL+$")]
    #[test_case(r"\d{3}", r"\pN{3}")]
    #[test_case(r"a\\wb", r"a\\wb"; "escaped backslash is not a word escape")]
    #[test_case(r"\cA", r"\x01")]
    #[test_case(r"\ca", r"\x01"; "control escapes are case insensitive")]
    #[test_case(r"\cZ", r"\x1a")]
    #[test_case(r"\c@", r"\x00")]
    #[test_case(r"\c_", r"\x1f")]
    #[test_case(r"^abc$", r"^abc$"; "plain patterns are untouched")]
    fn regex_translation(pattern: &str, expected: &str) {
        assert_eq!(convert_regex(pattern), expected);
    }

    #[test]
    fn widened_space_class_compiles() {
        let translated = convert_regex(r"^\s$");
        let re = fancy_regex::Regex::new(&translated).unwrap();
        assert_eq!(re.is_match("\u{FEFF}").unwrap(), true);
        assert_eq!(re.is_match(" ").unwrap(), true);
        assert_eq!(re.is_match("x").unwrap(), false);
    }

    #[test_case("a~1b", "a/b")]
    #[test_case("a~0b", "a~b")]
    #[test_case("a%20b", "a b")]
    fn pointer_unescaping(segment: &str, expected: &str) {
        assert_eq!(unescape_pointer_segment(segment), expected);
    }

    #[test]
    fn indices_reject_sign_and_leading_zero() {
        assert_eq!(parse_index("3"), Some(3));
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("01"), None);
    }
}
