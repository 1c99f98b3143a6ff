#![no_main]

use std::path::Path;

use breedline::config::PlanLoader;
use breedline::phase::requirements_for;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        let loader = PlanLoader::with_defaults();
        if let Ok(loaded) = loader.parse(yaml, Path::new("fuzz.yaml")) {
            // Whatever loads must resolve to a phase and a checklist.
            let plan = loaded.plan;
            assert!(plan.phase_index() < 8);
            let _ = requirements_for(plan.next_phase(), &plan);
        }
    }
});
