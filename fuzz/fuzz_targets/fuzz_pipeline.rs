#![no_main]

use libfuzzer_sys::fuzz_target;
use qv_core::RenderConfig;
use qv_export::{ExportFormat, export};
use qv_parser::compile;
use qv_render::{RenderTarget, render};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let edges = compile(text);
    for format in ExportFormat::ALL {
        let _ = export(&edges, format);
    }
    for target in [RenderTarget::VisNetwork, RenderTarget::Dot] {
        assert!(render(&edges, &RenderConfig::default(), target).is_ok());
    }
});
