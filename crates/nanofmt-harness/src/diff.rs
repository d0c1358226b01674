//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
///
/// Formatted output is usually a single line, so each differing line also
/// gets a caret under the first byte that differs.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let mut expected_lines = expected.split('\n');
    let mut actual_lines = actual.split('\n');
    let mut line = 0;
    loop {
        line += 1;
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => break,
            (Some(e), Some(a)) if e == a => {}
            (e, a) => {
                out.push_str(&format!("@@ line {line} @@\n"));
                if let Some(e) = e {
                    out.push_str(&format!("-{e}\n"));
                }
                if let Some(a) = a {
                    out.push_str(&format!("+{a}\n"));
                }
                if let (Some(e), Some(a)) = (e, a) {
                    let column = first_difference(e.as_bytes(), a.as_bytes());
                    out.push_str(&format!(" {}^ byte {column}\n", " ".repeat(column)));
                }
            }
        }
    }
    out
}

fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical() {
        assert_eq!(render_diff("abc", "abc"), "[identical]");
    }

    #[test]
    fn marks_first_differing_byte() {
        let diff = render_diff("0x1a", "0X1a");
        assert!(diff.contains("-0x1a\n+0X1a\n"));
        assert!(diff.contains("  ^ byte 1"));
    }

    #[test]
    fn reports_length_difference() {
        let diff = render_diff("  42", "42");
        assert!(diff.contains("^ byte 0"));
        let diff = render_diff("abc", "abcd");
        assert!(diff.contains("^ byte 3"));
    }

    #[test]
    fn extra_lines() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2 @@\n+b\n"));
    }
}
