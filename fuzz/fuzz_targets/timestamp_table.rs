#![no_main]

use chronotree::input::TimestampTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = TimestampTable::from_reader(data, "fuzz");
});
