#![no_main]
use libfuzzer_sys::fuzz_target;
use tracer_trace::{TraceReader, TraceShape};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must end in an error, never a panic
    let shape = TraceShape::counts(3, 3, 2);
    for step in TraceReader::new(data, shape).take(1_000) {
        if step.is_err() {
            break;
        }
    }
});
