//! Text helpers shared by the printer

/// Leading spaces and tabs of the line containing `offset`.
pub(crate) fn line_indent(source: &str, offset: usize) -> String {
    let bytes = source.as_bytes();
    let offset = offset.min(bytes.len());
    let line_start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let width = bytes[line_start..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    source[line_start..line_start + width].to_string()
}

/// One indentation level as the unit writes it: a tab when the first
/// indented line starts with one, otherwise the narrowest space run.
/// Block comment continuation lines (` * ...`) are skipped. Two spaces
/// when nothing is indented.
pub(crate) fn detect_indent(source: &str) -> String {
    let mut narrowest: Option<usize> = None;
    for line in source.lines() {
        let rest = line.trim_start_matches([' ', '\t']);
        if rest.is_empty() || rest.len() == line.len() || rest.starts_with('*') {
            continue;
        }
        if line.starts_with('\t') {
            if narrowest.is_none() {
                return "\t".to_string();
            }
            continue;
        }
        let width = line.len() - line.trim_start_matches(' ').len();
        narrowest = Some(narrowest.map_or(width, |n| n.min(width)));
    }
    " ".repeat(narrowest.unwrap_or(2))
}

/// `"\r\n"` when the first line break of `source` is CRLF.
pub(crate) fn detect_newline(source: &str) -> &'static str {
    match source.find('\n') {
        Some(i) if i > 0 && source.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Maps an offset through a list of `(position, delta)` insertions made at
/// line starts, sorted by position.
pub(crate) fn shift_offset(offset: usize, edits: &[(usize, isize)]) -> usize {
    let delta: isize = edits
        .iter()
        .take_while(|(at, _)| *at <= offset)
        .map(|(_, delta)| delta)
        .sum();
    (offset as isize + delta).max(0) as usize
}

/// Double-quoted string literal for `value`.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Number literal text as JavaScript writes it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indent() {
        let source = "a\n  b\n\tc";
        assert_eq!(line_indent(source, 0), "");
        assert_eq!(line_indent(source, 4), "  ");
        assert_eq!(line_indent(source, 7), "\t");
        assert_eq!(line_indent(source, 100), "\t");
    }

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent("function f() {\n\tif (a) {\n\t\tb();\n\t}\n}\n"), "\t");
        assert_eq!(detect_indent("function f() {\n    if (a) {\n        b();\n    }\n}\n"), "    ");
        assert_eq!(detect_indent("/**\n * Doc\n */\nfunction f() {\n  a();\n}\n"), "  ");
        assert_eq!(detect_indent("a();\nb();\n"), "  ");
    }

    #[test]
    fn test_detect_newline() {
        assert_eq!(detect_newline("a();\r\nb();\r\n"), "\r\n");
        assert_eq!(detect_newline("a();\nb();\r\n"), "\n");
        assert_eq!(detect_newline("a();"), "\n");
    }

    #[test]
    fn test_shift_offset() {
        let edits = [(4, 2), (10, -1)];
        assert_eq!(shift_offset(2, &edits), 2);
        assert_eq!(shift_offset(4, &edits), 6);
        assert_eq!(shift_offset(12, &edits), 13);
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("size"), "\"size\"");
        assert_eq!(quote_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote_string("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
