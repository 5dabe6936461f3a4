#![no_main]

use chronotree::input::parse_association_record;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        // Accepted records always yield a canonical, non-empty key
        if let Ok(Some((key, _count))) = parse_association_record(line) {
            assert!(!key.is_empty());
            assert!(key.items().windows(2).all(|w| w[0] < w[1]));
        }
    }
});
