//! Report built from a run record: the integrity footer is echoed verbatim.

use sg_core::{FieldMap, GroupCount, Record, Strategy, StudentId};
use sg_pipeline::{build_run_record, engine_identifiers, run_all, Roster};
use sg_report::{build_model, render_text};

#[test]
fn footer_echoes_run_record() {
    let recs = ["2101EE01", "2101EE02", "2101ME01"]
        .iter()
        .map(|id| Record::new(StudentId::from(*id), *id, "").unwrap())
        .collect();
    let roster = Roster::from_records(recs, FieldMap::default());
    let gc = GroupCount::new(2).unwrap();
    let runs = run_all(&roster, &[Strategy::RoundRobin], gc);
    let record = build_run_record(&engine_identifiers(), &roster, gc, &runs, &[vec![]]).unwrap();

    let model = build_model(&roster, &runs, Some(&record)).unwrap();
    let integrity = model.integrity.as_ref().unwrap();
    assert_eq!(integrity.run_id, record.id);
    assert_eq!(integrity.engine_name, "sg_engine");

    let text = render_text(&model);
    assert!(text.contains(&format!("Run ID: {}\n", record.id)));
    assert!(!text.contains("Input sha256"));
    assert!(text.contains("  G1: 2 students - EE: 1, ME: 1\n"));
}
