#![no_main]

use libfuzzer_sys::fuzz_target;
use rpc_cert::SanSet;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let entries: Vec<&str> = text.split(',').collect();
    let reversed: Vec<&str> = entries.iter().rev().copied().collect();
    let forward = SanSet::parse(&entries, &entries);
    let backward = SanSet::parse(&reversed, &reversed);
    assert_eq!(forward.is_ok(), backward.is_ok());
    if let (Ok(forward), Ok(backward)) = (forward, backward) {
        assert_eq!(forward, backward);
    }
});
