//! Author deduplication and per-author commit counting

use std::collections::HashMap;

use crate::types::{CommitAuthor, CommitRecord, ResolvedAuthors};

/// Domain used when an identity has to be synthesized from a login
pub const PLACEHOLDER_DOMAIN: &str = "users.noreply.github.com";

/// Check whether an email is a platform-generated placeholder address.
///
/// Matches `login@users.noreply.github.com`, `id+login@users.noreply.github.com`
/// and the general `users.<platform>.noreply.<domain>` shape.
pub fn is_placeholder_email(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let domain = domain.to_ascii_lowercase();
    if domain.ends_with("noreply.github.com") {
        return true;
    }
    domain.starts_with("users.") && domain.split('.').any(|label| label == "noreply")
}

/// Login encoded in a placeholder email's local part.
///
/// `12345+octocat@users.noreply.github.com` yields `octocat`. Returns `None`
/// for non-placeholder addresses.
pub fn placeholder_login(email: &str) -> Option<&str> {
    if !is_placeholder_email(email) {
        return None;
    }
    let (local, _) = email.rsplit_once('@')?;
    let login = match local.split_once('+') {
        Some((_, login)) => login,
        None => local,
    };
    (!login.is_empty()).then_some(login)
}

/// Placeholder identity for a login that matched no commit
pub fn synthesize_placeholder(login: &str) -> CommitAuthor {
    CommitAuthor {
        name: login.to_string(),
        email: format!("{}@{}", login, PLACEHOLDER_DOMAIN),
    }
}

#[derive(Debug)]
struct Slot {
    display: String,
    placeholder: bool,
    merged_into: Option<usize>,
}

/// Single-pass author aggregator.
///
/// Identities are keyed by exact email. A placeholder address and a real
/// address that share a login collapse into one display string; two real
/// addresses never do. Display strings are emitted in order of first sight.
/// Commit counts stay per email regardless of linking.
#[derive(Debug, Default)]
pub struct AuthorAggregator {
    slots: Vec<Slot>,
    by_email: HashMap<String, usize>,
    by_login: HashMap<String, usize>,
    counts: HashMap<String, u32>,
}

impl AuthorAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a whole commit list
    pub fn from_records<'r, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r CommitRecord>,
    {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.observe(record);
        }
        aggregator
    }

    /// Follow merge links to the live slot
    fn find(&self, mut idx: usize) -> usize {
        while let Some(next) = self.slots[idx].merged_into {
            idx = next;
        }
        idx
    }

    /// Fold two live slots into the earlier one
    fn merge(&mut self, a: usize, b: usize) -> usize {
        let (host, other) = (a.min(b), a.max(b));
        let upgrade = self.slots[host].placeholder && !self.slots[other].placeholder;
        if upgrade {
            let display = std::mem::take(&mut self.slots[other].display);
            let slot = &mut self.slots[host];
            slot.display = display;
            slot.placeholder = false;
        }
        self.slots[other].merged_into = Some(host);
        host
    }

    /// Record one sighting. Authorless records are ignored.
    pub fn observe(&mut self, record: &CommitRecord) {
        let Some(author) = &record.author else {
            return;
        };

        let placeholder = is_placeholder_email(&author.email);
        let login = record
            .login
            .as_deref()
            .or_else(|| placeholder_login(&author.email))
            .map(str::to_ascii_lowercase);

        let by_email = self.by_email.get(&author.email).map(|&i| self.find(i));
        let by_login = login
            .as_deref()
            .and_then(|l| self.by_login.get(l))
            .map(|&i| self.find(i));

        let idx = match (by_email, by_login) {
            (Some(e), Some(l))
                if e != l && (self.slots[e].placeholder || self.slots[l].placeholder) =>
            {
                self.merge(e, l)
            }
            (Some(e), _) => e,
            (None, Some(l)) if placeholder || self.slots[l].placeholder => l,
            _ => {
                self.slots.push(Slot {
                    display: author.to_string(),
                    placeholder,
                    merged_into: None,
                });
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[idx];
        if slot.placeholder && !placeholder {
            slot.display = author.to_string();
            slot.placeholder = false;
        }
        *self.counts.entry(author.email.clone()).or_insert(0) += 1;

        self.by_email.entry(author.email.clone()).or_insert(idx);
        if let Some(login) = login {
            self.by_login.entry(login).or_insert(idx);
        }
    }

    fn live(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.merged_into.is_none())
    }

    /// Number of distinct identities seen so far
    pub fn len(&self) -> usize {
        self.live().count()
    }

    /// Whether no author-bearing record was observed
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Highest per-email count, 0 when empty
    pub fn max_commit_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Finish aggregation
    pub fn finish(self) -> ResolvedAuthors {
        let max_commit_count = self.max_commit_count();
        ResolvedAuthors {
            authors: self
                .slots
                .into_iter()
                .filter(|s| s.merged_into.is_none())
                .map(|s| s.display)
                .collect(),
            max_commit_count,
        }
    }
}

/// Pick the identity to report for an assignee login.
///
/// Takes the first commit whose login matches; a placeholder match is only
/// kept until a later match with a real address shows up. Falls back to a
/// synthesized placeholder when nothing matches.
pub fn resolve_assignee(login: &str, commits: &[CommitRecord]) -> CommitAuthor {
    let mut best: Option<&CommitAuthor> = None;

    for commit in commits {
        let matches = commit
            .login
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case(login));
        if !matches {
            continue;
        }
        let Some(author) = &commit.author else {
            continue;
        };
        if !is_placeholder_email(&author.email) {
            return author.clone();
        }
        best.get_or_insert(author);
    }

    best.cloned().unwrap_or_else(|| synthesize_placeholder(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder_email("c@users.noreply.github.com"));
        assert!(is_placeholder_email("123+c@users.noreply.github.com"));
        assert!(is_placeholder_email("c@users.gitlab.noreply.example.com"));
        assert!(!is_placeholder_email("c@real.com"));
        assert!(!is_placeholder_email("noreply@github.com"));
        assert!(!is_placeholder_email("not-an-email"));
    }

    #[test]
    fn test_placeholder_login() {
        assert_eq!(
            placeholder_login("123+octocat@users.noreply.github.com"),
            Some("octocat")
        );
        assert_eq!(placeholder_login("dave@users.noreply.github.com"), Some("dave"));
        assert_eq!(placeholder_login("dave@example.com"), None);
    }

    #[test]
    fn test_dedup_and_count() {
        let records = vec![
            CommitRecord::new("Alice", "a@x.com"),
            CommitRecord::new("Bob", "b@y.com"),
            CommitRecord::new("Alice", "a@x.com"),
        ];
        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors, vec!["Alice <a@x.com>", "Bob <b@y.com>"]);
        assert_eq!(result.max_commit_count, 2);
    }

    #[test]
    fn test_empty_and_authorless() {
        assert_eq!(AuthorAggregator::new().finish(), ResolvedAuthors::default());

        let records = vec![CommitRecord::authorless(Some("ghost".into()))];
        let result = AuthorAggregator::from_records(&records).finish();
        assert!(result.authors.is_empty());
        assert_eq!(result.max_commit_count, 0);
    }

    #[test]
    fn test_first_real_name_wins_for_same_email() {
        let records = vec![
            CommitRecord::new("Alice", "a@x.com"),
            CommitRecord::new("Alice Smith", "a@x.com"),
        ];
        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors, vec!["Alice <a@x.com>"]);
    }

    #[test]
    fn test_real_email_replaces_placeholder_via_login() {
        let records = vec![
            CommitRecord::new("C", "c@users.noreply.github.com").with_login("c"),
            CommitRecord::new("Dee", "d@d.org"),
            CommitRecord::new("C", "c@users.noreply.github.com").with_login("c"),
            CommitRecord::new("C", "c@real.com").with_login("c"),
            CommitRecord::new("C", "c@users.noreply.github.com").with_login("c"),
        ];
        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors, vec!["C <c@real.com>", "Dee <d@d.org>"]);
        // three sightings of the placeholder address, one of the real one
        assert_eq!(result.max_commit_count, 3);
    }

    #[test]
    fn test_placeholder_login_links_without_record_login() {
        let records = vec![
            CommitRecord::new("Oct", "octo@corp.io").with_login("Octocat"),
            CommitRecord::new("Oct", "42+octocat@users.noreply.github.com"),
        ];
        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors, vec!["Oct <octo@corp.io>"]);
        assert_eq!(result.max_commit_count, 1);
    }

    #[test]
    fn test_late_link_merges_separate_identities() {
        let records = vec![
            CommitRecord::new("U", "u@real.com"),
            CommitRecord::new("U", "u@users.noreply.github.com"),
            CommitRecord::new("U", "u@real.com").with_login("u"),
        ];
        let mut aggregator = AuthorAggregator::from_records(&records);
        assert_eq!(aggregator.len(), 1);
        aggregator.observe(&CommitRecord::new("U", "u@users.noreply.github.com"));
        let result = aggregator.finish();
        assert_eq!(result.authors, vec!["U <u@real.com>"]);
        assert_eq!(result.max_commit_count, 2);
    }

    #[test]
    fn test_linking_keeps_counts_per_email() {
        let mut records = vec![
            CommitRecord::new("C", "c@users.noreply.github.com").with_login("c");
            3
        ];
        records.push(CommitRecord::new("C", "c@real.com").with_login("c"));
        records.push(CommitRecord::new("D", "d@d.org"));

        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors, vec!["C <c@real.com>", "D <d@d.org>"]);
        assert_eq!(result.max_commit_count, 3);
    }

    #[test]
    fn test_two_real_emails_stay_distinct() {
        let records = vec![
            CommitRecord::new("Eve", "eve@home.net").with_login("eve"),
            CommitRecord::new("Eve", "eve@work.com").with_login("eve"),
        ];
        let result = AuthorAggregator::from_records(&records).finish();
        assert_eq!(result.authors.len(), 2);
        assert_eq!(result.max_commit_count, 1);
    }

    #[test]
    fn test_assignee_placeholder_retained() {
        let commits = vec![
            CommitRecord::new("Zed", "zed@z.io").with_login("zed"),
            CommitRecord::new("Dave", "dave@users.noreply.github.com").with_login("dave"),
        ];
        let author = resolve_assignee("dave", &commits);
        assert_eq!(author.to_string(), "Dave <dave@users.noreply.github.com>");
    }

    #[test]
    fn test_assignee_prefers_later_real_match() {
        let commits = vec![
            CommitRecord::new("Dave", "dave@users.noreply.github.com").with_login("dave"),
            CommitRecord::new("Dave R", "dave@real.org").with_login("dave"),
            CommitRecord::new("Dave Other", "dave@other.org").with_login("dave"),
        ];
        assert_eq!(resolve_assignee("dave", &commits).to_string(), "Dave R <dave@real.org>");
    }

    #[test]
    fn test_assignee_synthesized_when_unmatched() {
        let author = resolve_assignee("nobody", &[]);
        assert_eq!(author.to_string(), "nobody <nobody@users.noreply.github.com>");
    }
}
