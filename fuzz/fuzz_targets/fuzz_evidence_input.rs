#![no_main]

use breedline::plan::{EvidenceField, Plan, PlanId, set_evidence};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let owned = String::from_utf8_lossy(data);
    let text: &str = &owned;
    let (field, value) = text.split_once('=').unwrap_or((text, ""));
    let Ok(field) = field.parse::<EvidenceField>() else {
        return;
    };
    if let Ok(value) = field.parse_value(value) {
        let plan = Plan::new(PlanId::new("fuzz"));
        let edited = set_evidence(&plan, field, value).unwrap();
        assert_eq!(edited.status, plan.status);
    }
});
