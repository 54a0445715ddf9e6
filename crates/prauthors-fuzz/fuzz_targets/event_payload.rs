#![no_main]
use libfuzzer_sys::fuzz_target;
use prauthors_core::context::{
    parse_repository, pull_request_number_from_event, pull_request_number_from_ref,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = pull_request_number_from_event(s);
        let _ = pull_request_number_from_ref(s);
        if let Ok((owner, repo)) = parse_repository(s) {
            assert!(!owner.is_empty() && !repo.is_empty());
        }
    }
});
