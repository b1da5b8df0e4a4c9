use divan::{black_box, Bencher};

use lexforge_core::charclass::CharClass;
use lexforge_core::memstream::{MemTokenStream, NamedPattern};
use lexforge_core::pattern::{ClassSpec, Pattern};
use lexforge_core::streaming::{ByteSource, SourceError, StreamingTokenizer};

fn main() {
    divan::main();
}

const WORD: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Alpha));
const NUMBER: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit)));
const WS: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Whitespace)));

static PATTERNS: &[NamedPattern] = &[
    NamedPattern { id: 1, name: "word", pattern: &WORD },
    NamedPattern { id: 2, name: "number", pattern: &NUMBER },
];

static SKIP_PATTERNS: &[NamedPattern] = &[
    NamedPattern { id: 1, name: "word", pattern: &WORD },
    NamedPattern { id: 2, name: "number", pattern: &NUMBER },
    NamedPattern { id: 3, name: "ws", pattern: &WS },
];
static SKIP: &[u32] = &[3];

fn generate_words(n: usize) -> String {
    let mut out = String::with_capacity(n * 8);
    for i in 0..n {
        out.push_str("word");
        out.push_str(&i.to_string());
        out.push(' ');
    }
    out
}

#[divan::bench(args = [100, 1_000, 10_000, 100_000])]
fn bench_mem_token_stream(bencher: Bencher, n: usize) {
    let input = generate_words(n);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .with_inputs(|| input.clone())
        .bench_values(|input| {
            let mut stream = MemTokenStream::skip_aware(input.as_bytes(), SKIP_PATTERNS).unwrap();
            let mut count = 0;
            while stream.next().is_some() {
                count += 1;
            }
            black_box(count)
        });
}

struct SliceSource<'a> {
    remaining: &'a [u8],
    chunk: usize,
}

impl<'a> ByteSource for SliceSource<'a> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize, SourceError> {
        let n = self.chunk.min(dst.len()).min(self.remaining.len());
        dst[..n].copy_from_slice(&self.remaining[..n]);
        self.remaining = &self.remaining[n..];
        Ok(n)
    }
}

#[divan::bench(args = [1024, 4096, 16384, 65536])]
fn bench_streaming_tokenizer_chunk_size(bencher: Bencher, chunk: usize) {
    let input = generate_words(10_000);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .with_inputs(|| input.clone())
        .bench_values(|input| {
            let source = SliceSource { remaining: input.as_bytes(), chunk };
            let mut tokenizer =
                StreamingTokenizer::new(source, 4096, 1 << 20, 0.25, SKIP_PATTERNS, SKIP).unwrap();
            let mut count = 0;
            while tokenizer.next_token().unwrap().is_some() {
                count += 1;
            }
            black_box(count)
        });
}

#[divan::bench(args = [100, 1_000, 10_000, 100_000])]
fn bench_pattern_match_throughput(bencher: Bencher, n: usize) {
    let input = generate_words(n);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .with_inputs(|| input.clone())
        .bench_values(|input| {
            use lexforge_core::pattern::match_pattern;
            let bytes = input.as_bytes();
            let mut offset = 0;
            let mut matches = 0;
            while offset < bytes.len() {
                let mut advanced = false;
                for np in PATTERNS {
                    let r = match_pattern(np.pattern, bytes, offset);
                    if r.matched && r.len > 0 {
                        offset += r.len;
                        matches += 1;
                        advanced = true;
                        break;
                    }
                }
                if !advanced {
                    offset += 1;
                }
            }
            black_box(matches)
        });
}
