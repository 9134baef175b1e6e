//! Text neutralization for quoted TSPL string literals.
//!
//! Every user-controlled value (QR payloads, names, ids) ends up between
//! double quotes in a TSPL command. The printer firmware ends a literal at the
//! first `"` and ends a command at the first line break, so either character
//! leaking through would corrupt the rest of the program.
//!
//! Commas are left alone: TSPL tolerates them inside a quoted field.

/// Make `text` safe to embed inside a double-quoted TSPL literal.
///
/// - Each run of consecutive `\r`/`\n` characters becomes a single space.
/// - Every `"` becomes `'`.
/// - Everything else passes through untouched.
///
/// The result never contains `"`, `\r` or `\n`, and sanitizing twice is the
/// same as sanitizing once.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        match c {
            '\r' | '\n' => {
                if !in_break {
                    out.push(' ');
                    in_break = true;
                }
            }
            '"' => {
                out.push('\'');
                in_break = false;
            }
            _ => {
                out.push(c);
                in_break = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(sanitize("Widget 42"), "Widget 42");
    }

    #[test]
    fn empty_string() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn double_quotes_become_single() {
        assert_eq!(sanitize(r#"Widget "Pro""#), "Widget 'Pro'");
    }

    #[test]
    fn crlf_collapses_to_one_space() {
        assert_eq!(sanitize("line1\r\nline2"), "line1 line2");
    }

    #[test]
    fn long_break_run_collapses() {
        assert_eq!(sanitize("a\n\n\r\n\rb"), "a b");
    }

    #[test]
    fn separate_break_runs_each_become_a_space() {
        assert_eq!(sanitize("a\nb\nc"), "a b c");
        assert_eq!(sanitize("a\n \nb"), "a   b");
    }

    #[test]
    fn leading_and_trailing_breaks() {
        assert_eq!(sanitize("\nname\n"), " name ");
    }

    #[test]
    fn commas_survive() {
        assert_eq!(sanitize("a,b,\"c\""), "a,b,'c'");
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(sanitize("Café ☕ 東京"), "Café ☕ 東京");
    }

    #[test]
    fn existing_single_quotes_untouched() {
        assert_eq!(sanitize("it's"), "it's");
    }
}
