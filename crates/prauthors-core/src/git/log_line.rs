//! Parsing of `Name <email>` history lines

use crate::types::CommitRecord;

/// Parse one `Name <email>` line into a commit record.
///
/// The email is the text between the last `<` and the trailing `>`; the
/// name is everything before it, trimmed. Blank lines and lines without an
/// email yield `None`.
pub fn parse_author_line(line: &str) -> Option<CommitRecord> {
    let line = line.trim();
    let inner = line.strip_suffix('>')?;
    let open = inner.rfind('<')?;
    let name = inner[..open].trim();
    let email = inner[open + 1..].trim();
    if email.is_empty() {
        return None;
    }
    Some(CommitRecord::new(name, email))
}

/// Parse every non-blank line, dropping malformed ones
pub fn parse_author_lines<I, S>(lines: I) -> Vec<CommitRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|l| {
            let parsed = parse_author_line(l.as_ref());
            if parsed.is_none() && !l.as_ref().trim().is_empty() {
                tracing::debug!("Skipping malformed history line: {:?}", l.as_ref());
            }
            parsed
        })
        .collect()
}
