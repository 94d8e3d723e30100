#![no_main]

use libfuzzer_sys::fuzz_target;
use memoq_wsapi::memoq::{parse_document_info, parse_project_info};
use memoq_wsapi::soap::parse_document;

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(node) = parse_document(xml) else {
        return;
    };

    // Record parsing either succeeds with a real GUID or reports an error
    if let Ok(info) = parse_project_info(&node) {
        assert!(!info.guid.is_nil());
    }
    if let Ok(doc) = parse_document_info(&node) {
        assert!(!doc.document_guid.is_nil());
    }
});
