#![no_main]
use libfuzzer_sys::fuzz_target;
use prauthors_core::git::log_line::parse_author_line;
use prauthors_core::output::json_format::format_json_array;
use prauthors_core::{AuthorAggregator, CommitRecord};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Each line is an author line, optionally prefixed with "login:"
    let records: Vec<CommitRecord> = s
        .lines()
        .filter_map(|line| match line.split_once(':') {
            Some((login, rest)) => parse_author_line(rest).map(|r| r.with_login(login)),
            None => parse_author_line(line),
        })
        .collect();

    let aggregator = AuthorAggregator::from_records(&records);
    let distinct = aggregator.len();
    let result = aggregator.finish();
    assert_eq!(result.authors.len(), distinct);
    assert!(result.max_commit_count as usize <= records.len());

    let json = format_json_array(&result.authors);
    assert!(json.starts_with('[') && json.ends_with(']'));
});
