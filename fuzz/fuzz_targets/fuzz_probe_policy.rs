//! Fuzz target for probe policy JSON parsing.
//!
//! Parsing and validation should only ever return errors, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mp_probe::ProbePolicy;

fuzz_target!(|data: &[u8]| {
    if let Ok(policy) = serde_json::from_slice::<ProbePolicy>(data) {
        let _ = policy.validate();
    }
});
