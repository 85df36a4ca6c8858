#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // A deserialized program model must either compile or report
    // semantic errors without panicking.
    if let Ok(module) = serde_json::from_slice::<fpc_ir::Module>(data) {
        let _ = fpc_backend_cpp::compile(
            &module,
            "Fuzz",
            &fpc_backend_cpp::Settings::default(),
        );
    }
});
