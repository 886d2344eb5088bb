#![no_main]

use libfuzzer_sys::fuzz_target;
use vatid::core::VatId;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(id) = VatId::parse(s) {
            let reparsed = VatId::parse(&id.to_string()).expect("canonical form must reparse");
            assert_eq!(reparsed, id);
        }
    }
});
