//! JSON formatting for exported values

/// Write a JSON-escaped string directly into a buffer.
pub fn escape_json_into(s: &str, buf: &mut String) {
    for ch in s.chars() {
        match ch {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => buf.push(c),
        }
    }
}

/// Format a list of values as a JSON array string
pub fn format_json_array<S: AsRef<str>>(values: &[S]) -> String {
    let mut buf = String::with_capacity(values.len() * 32 + 2);
    buf.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        buf.push('"');
        escape_json_into(v.as_ref(), &mut buf);
        buf.push('"');
    }
    buf.push(']');
    buf
}

/// Parse an assignee list: a JSON string array, or a comma-separated list.
///
/// Blank entries are dropped. Returns `None` when nothing remains.
pub fn parse_login_list(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let logins: Vec<String> = if raw.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Ignoring malformed assignee list {:?}: {}", raw, e);
                return None;
            }
        }
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    let cleaned: Vec<String> = logins
        .into_iter()
        .map(|l| l.trim().trim_start_matches('@').to_string())
        .filter(|l| !l.is_empty())
        .collect();

    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_json_into_special_chars() {
        let mut buf = String::new();
        escape_json_into("a\nb\tc\\d\"e", &mut buf);
        assert_eq!(buf, "a\\nb\\tc\\\\d\\\"e");
    }

    #[test]
    fn test_format_json_array() {
        assert_eq!(format_json_array::<&str>(&[]), "[]");
        assert_eq!(
            format_json_array(&["Alice <a@x.com>", "Bob <b@y.com>"]),
            r#"["Alice <a@x.com>","Bob <b@y.com>"]"#
        );
    }

    #[test]
    fn test_format_json_array_control_chars() {
        let result = format_json_array(&["a\x00b", "c\x07d"]);
        assert!(result.contains("\\u0000"), "null byte should be escaped: {}", result);
        assert!(result.contains("\\u0007"), "bell should be escaped: {}", result);
    }

    #[test]
    fn test_json_array_matches_serde() {
        let cases: Vec<Vec<String>> = vec![
            vec![],
            vec!["Jos\u{e9} <j@x.es>".into()],
            vec!["with\"quote <q@x.io>".into(), "back\\slash <b@x.io>".into()],
            vec!["\u{4e16}\u{754c} <w@x.cn>".into(), "\u{1f680} <r@x.io>".into()],
        ];
        for values in &cases {
            let ours = format_json_array(values);
            let parsed: Vec<String> = serde_json::from_str(&ours)
                .unwrap_or_else(|e| panic!("Invalid JSON for {:?}: {} -> {}", values, ours, e));
            assert_eq!(&parsed, values);
        }
    }

    #[test]
    fn test_parse_login_list_json() {
        assert_eq!(
            parse_login_list(r#"["dave", " erin ", ""]"#),
            Some(vec!["dave".to_string(), "erin".to_string()])
        );
        assert_eq!(parse_login_list("[]"), None);
        assert_eq!(parse_login_list("[oops"), None);
    }

    #[test]
    fn test_parse_login_list_csv() {
        assert_eq!(
            parse_login_list("@dave, erin,,"),
            Some(vec!["dave".to_string(), "erin".to_string()])
        );
        assert_eq!(parse_login_list("   "), None);
    }
}
