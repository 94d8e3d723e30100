#![no_main]

use libfuzzer_sys::fuzz_target;
use memoq_wsapi::soap::{parse_response, SoapError};

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    // Whatever comes back from the server must never panic the reader
    match parse_response(xml) {
        Ok(payload) => assert!(!payload.name.is_empty()),
        Err(SoapError::Fault(fault)) => {
            let _ = fault.to_string();
        }
        Err(_) => {}
    }
});
