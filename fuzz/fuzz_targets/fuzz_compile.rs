#![no_main]

use libfuzzer_sys::fuzz_target;
use qv_core::{CompileOptions, SelfLoopPolicy};
use qv_parser::{compile_traced, compile_with_options};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let retain = compile_with_options(text, &CompileOptions::default());
    let report = compile_traced(text, &CompileOptions::default());
    assert_eq!(retain, report.edges);
    assert_eq!(report.lines.len(), text.lines().count());

    let removed = compile_with_options(
        text,
        &CompileOptions::default().with_self_loops(SelfLoopPolicy::Remove),
    );
    assert_eq!(removed.self_loop_count(), 0);
    assert_eq!(removed.len() + retain.self_loop_count(), retain.len());
});
