#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memoq_wsapi::soap::{parse_document, Element};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    items: Vec<String>,
}

/// Characters XML 1.0 cannot carry at all.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..)
}

fuzz_target!(|input: Input| {
    if !input.text.chars().all(is_xml_char) || input.text.contains('\r') {
        return;
    }

    // Escaped text reads back unchanged
    let xml = Element::text("Name", &input.text).to_xml();
    let node = parse_document(&xml).unwrap();
    assert_eq!(node.text, input.text);

    // Arrays keep every non-blank item, in order
    if input.items.iter().all(|i| i.chars().all(is_xml_char) && !i.contains('\r')) {
        let xml = Element::string_array("targetLangCodes", &input.items).to_xml();
        let expected: Vec<String> = input
            .items
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        assert_eq!(parse_document(&xml).unwrap().values(), expected);
    }
});
