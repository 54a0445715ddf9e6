#![no_main]
use libfuzzer_sys::fuzz_target;
use prauthors_core::git::log_line::{parse_author_line, parse_author_lines};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(record) = parse_author_line(s) {
            assert!(record.author.is_some_and(|a| !a.email.is_empty()));
        }
        let _ = parse_author_lines(s.lines());
    }
});
