//! Fuzz target for policy file parsing.
//!
//! Arbitrary documents must parse or fail cleanly, and any registry built from
//! them must resolve every declared operation without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oplog::policy::{PolicyFile, PolicySource};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(file) = PolicyFile::parse(text) else {
        return;
    };
    let keys: Vec<_> = file.operations.iter().map(|e| e.key()).collect();
    let registry = file.into_registry();
    for key in &keys {
        let _ = registry.resolve(key);
    }
});
