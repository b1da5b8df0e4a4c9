#![no_main]

use lexforge_core::charclass::CharClass;
use lexforge_core::pattern::{match_pattern, ClassSpec, Pattern};
use libfuzzer_sys::fuzz_target;

const WORD: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Alpha));
const NUMBER: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit)));
const WS: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Whitespace)));
const IDENT_THEN_DIGITS: Pattern = Pattern::Seq(&[
    Pattern::Class(ClassSpec::Alpha),
    Pattern::zero_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit))),
]);
const ALTERNATION: Pattern = Pattern::Alt(&[WORD, NUMBER, WS]);

const PATTERNS: &[Pattern] = &[WORD, NUMBER, WS, IDENT_THEN_DIGITS, ALTERNATION];

fuzz_target!(|data: &[u8]| {
    for pattern in PATTERNS {
        if pattern.validate().is_err() {
            continue;
        }
        for offset in 0..=data.len() {
            let result = match_pattern(pattern, data, offset);
            if result.matched {
                assert!(offset + result.len <= data.len());
            }
        }
    }
});
