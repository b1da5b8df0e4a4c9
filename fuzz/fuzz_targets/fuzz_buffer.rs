#![no_main]

use arbitrary::Arbitrary;
use lexforge_core::buffer::IncrementalBuffer;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Append(Vec<u8>),
    Consume,
    ConsumeN(u8),
    Compact,
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut buffer = IncrementalBuffer::streaming(8, 1 << 20, 0.25);
    let mut shadow: Vec<u8> = Vec::new();

    for op in input.ops {
        match op {
            Op::Append(bytes) => {
                if buffer.append(&bytes).is_ok() {
                    shadow.extend_from_slice(&bytes);
                }
            }
            Op::Consume => {
                if buffer.consume().is_some() {
                    shadow.remove(0);
                }
            }
            Op::ConsumeN(n) => {
                let n = (n as usize).min(buffer.live_len());
                buffer.consume_n(n);
                shadow.drain(..n);
            }
            Op::Compact => {
                buffer.compact();
            }
        }
        assert_eq!(buffer.live(), shadow.as_slice());
        assert!(buffer.live_len() <= buffer.capacity());
    }
});
