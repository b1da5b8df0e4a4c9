#![no_main]

use lexforge_core::charclass::CharClass;
use lexforge_core::memstream::NamedPattern;
use lexforge_core::pattern::{ClassSpec, Pattern};
use lexforge_core::streaming::{ByteSource, SourceError, StreamingTokenizer};
use libfuzzer_sys::fuzz_target;

const WORD: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Alpha));
const NUMBER: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit)));
const WS: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Whitespace)));

static PATTERNS: &[NamedPattern] = &[
    NamedPattern { id: 1, name: "word", pattern: &WORD },
    NamedPattern { id: 2, name: "number", pattern: &NUMBER },
    NamedPattern { id: 3, name: "ws", pattern: &WS },
];
static SKIP: &[u32] = &[3];

/// Hands out the fuzz input in small, fixed-size chunks, forcing many
/// `fill`/`compact`/`grow` cycles through the buffer for a given input size.
struct ChunkSource<'a> {
    remaining: &'a [u8],
    chunk: usize,
}

impl<'a> ByteSource for ChunkSource<'a> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize, SourceError> {
        let n = self.chunk.min(dst.len()).min(self.remaining.len());
        dst[..n].copy_from_slice(&self.remaining[..n]);
        self.remaining = &self.remaining[n..];
        Ok(n)
    }
}

fuzz_target!(|data: &[u8]| {
    let source = ChunkSource { remaining: data, chunk: 3 };
    let Ok(mut tokenizer) = StreamingTokenizer::new(source, 4, 4096, 0.25, PATTERNS, SKIP) else {
        return;
    };

    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > data.len() + 16 {
            // Forward-progress guarantee means this should never trip; a
            // stall here indicates a bug, not slow-but-valid input.
            panic!("tokenizer failed to make forward progress");
        }
        match tokenizer.next_token() {
            Ok(Some(_token)) => continue,
            Ok(None) => break,
            Err(_) => break,
        }
    }
});
