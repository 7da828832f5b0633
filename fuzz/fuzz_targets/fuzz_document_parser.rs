#![no_main]

use imagr_validator::loader::lint::prescan;
use imagr_validator::loader::parse_document;
use imagr_validator_core::Validator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if prescan(data, 64).is_err() {
        return;
    }
    let Ok((_, root)) = parse_document(data) else {
        return;
    };

    let validator = Validator::default();
    let first = validator.validate(&root).err();
    let all = validator.validate_all(&root);

    // Fail-fast must agree with the head of the full report.
    assert_eq!(first.as_ref(), all.first());
});
