use super::*;
use crate::cfg::DEFAULT_TOLERANCE;
use crate::error::RailError;
use crate::model::{compute_c1, Division, Rail};
use crate::table::TableCfg;
use nalgebra::vector;
use proptest::prelude::*;
use serde_json::{json, Value};

fn table() -> TableCfg {
    TableCfg::default()
}

fn raw(rail: &str, co: (f64, f64), ob: (f64, f64)) -> Value {
    json!({
        "rail": rail,
        "CO": {"x": co.0, "y": co.1},
        "OB": {"x": ob.0, "y": ob.1},
    })
}

fn invalid_field(v: &Value) -> String {
    match validate_case(v, &table()) {
        Err(RailError::InvalidInput { field, .. }) => field,
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn validate_fills_defaults() {
    let case = validate_case(&raw("short_top", (1.0, 2.0), (3.0, 4.0)), &table()).unwrap();
    assert_eq!(case.rail, Rail::ShortTop);
    assert_eq!(case.co, vector![1.0, 2.0]);
    assert_eq!(case.ob, vector![3.0, 4.0]);
    assert_eq!(case.division, Division::Internal);
    assert_eq!(case.tolerance, DEFAULT_TOLERANCE);
}

#[test]
fn validate_names_first_offending_field() {
    assert_eq!(invalid_field(&json!([1, 2])), "case");
    assert_eq!(invalid_field(&json!({"CO": {}, "OB": {}})), "rail");
    assert_eq!(
        invalid_field(&json!({"rail": "long_left", "OB": {"x": 1, "y": 1}})),
        "CO"
    );
    assert_eq!(invalid_field(&raw("long_middle", (1.0, 1.0), (2.0, 2.0))), "rail");
    assert_eq!(invalid_field(&raw("long_left", (81.0, 1.0), (2.0, 2.0))), "CO.x");
    assert_eq!(invalid_field(&raw("long_left", (1.0, 1.0), (2.0, -0.5))), "OB.y");
    assert_eq!(
        invalid_field(&json!({"rail": "long_left", "CO": {"x": 1}, "OB": {"x": 1, "y": 1}})),
        "CO.y"
    );
    assert_eq!(
        invalid_field(&json!({"rail": "long_left", "CO": {"x": "1", "y": 1}, "OB": {"x": 1, "y": 1}})),
        "CO.x"
    );
    assert_eq!(
        invalid_field(&json!({"rail": "long_left", "CO": [1, 2], "OB": {"x": 1, "y": 1}})),
        "CO"
    );

    let mut v = raw("long_left", (1.0, 1.0), (2.0, 2.0));
    v["division"] = json!("sideways");
    assert_eq!(invalid_field(&v), "division");

    let mut v = raw("long_left", (1.0, 1.0), (2.0, 2.0));
    v["tolerance"] = json!(-1e-3);
    assert_eq!(invalid_field(&v), "tolerance");
    assert_eq!(
        validate_case(&v, &table()).unwrap_err().to_string(),
        "invalid input `tolerance`: must be finite and >= 0"
    );
}

#[test]
fn validate_accepts_table_edges() {
    let case = validate_case(&raw("long_right", (80.0, 40.0), (0.0, 0.0)), &table()).unwrap();
    assert_eq!(case.co, vector![80.0, 40.0]);
}

#[test]
fn reference_case_passes() {
    let report = run_case(&raw("long_left", (10.0, 10.0), (20.0, 40.0)), &table()).unwrap();
    assert!(report.pass);
    assert_eq!(report.c1.x, 0.0);
    assert!(report.c1.y >= 0.0 && report.c1.y <= 40.0);
    let d1 = (10.0 * 35.55 - 30.75) / 35.55;
    assert_eq!(report.d1, round_to(d1, 6));
    assert_eq!(report.frozen, Frozen { co: false, ob: false });
}

#[test]
fn identical_balls_take_coincident_branch() {
    let v = raw("short_bottom", (25.0, 12.0), (25.0, 12.0));
    let report = run_case(&v, &table()).unwrap();
    assert!(report.checks.ratio_match);
    assert!(report.pass);
    assert_eq!(report.c1.x, 25.0);
    assert_eq!(report.t, 0.5);
}

#[test]
fn external_extrapolation_fails_without_partial_credit() {
    let mut v = raw("long_left", (10.0, 10.0), (20.0, 30.0));
    v["division"] = json!("external");
    let report = run_case(&v, &table()).unwrap();
    assert!(report.checks.ratio_match);
    assert!(!report.checks.in_bounds);
    assert!(!report.checks.anchor_on_rail);
    assert!(!report.pass);
}

#[test]
fn each_check_alone_gates_pass() {
    let t = table();
    let case = Case::new(Rail::LongLeft, vector![10.0, 10.0], vector![20.0, 40.0]);
    let res = compute_c1(case.co, case.ob, case.rail, case.division, &t).unwrap();
    let good = check_invariants(&case, &res, &t);
    assert!(good.all());
    let flips = [
        Checks { anchor_on_rail: false, ..good },
        Checks { ratio_match: false, ..good },
        Checks { in_bounds: false, ..good },
    ];
    for c in flips {
        assert!(!c.all());
    }

    // A C1 pushed off the rail breaks the anchor check only.
    let mut moved = res;
    moved.c1.x = 0.01;
    let checks = check_invariants(&case, &moved, &t);
    assert!(!checks.anchor_on_rail);
    assert!(checks.ratio_match && checks.in_bounds);

    // A C1 slid along the rail breaks the ratio check only.
    let mut slid = res;
    slid.c1.y += 1.0;
    let checks = check_invariants(&case, &slid, &t);
    assert!(!checks.ratio_match);
    assert!(checks.anchor_on_rail && checks.in_bounds);
}

#[test]
fn degenerate_case_is_reported_not_raised() {
    let cases = vec![
        raw("long_left", (0.0, 5.0), (0.0, 35.0)),
        raw("long_left", (10.0, 10.0), (20.0, 40.0)),
        json!({"rail": "long_left"}),
    ];
    let run = run_batch(&cases, &table());
    assert_eq!(run.total(), 3);
    assert_eq!(run.passed, 1);
    assert_eq!(run.failed(), 2);
    assert!(matches!(
        run.outcomes[0].error(),
        Some(RailError::DegenerateConfiguration { .. })
    ));
    assert!(run.outcomes[1].passed());
    assert_eq!(run.outcomes[2].error().and_then(|e| e.field()), Some("CO"));
    assert_eq!(run.summary_line(), "cases=3 pass=1 fail=2");
}

#[test]
fn detail_lines_carry_report_or_error() {
    let cases = vec![
        raw("long_left", (10.0, 10.0), (20.0, 40.0)),
        raw("long_left", (0.0, 5.0), (0.0, 35.0)),
    ];
    let run = run_batch(&cases, &table());
    let lines = run.detail_lines().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#1: "));

    let ok: Value = serde_json::from_str(&lines[0][4..]).unwrap();
    assert_eq!(ok["pass"], json!(true));
    assert_eq!(ok["input"]["rail"], json!("long_left"));
    assert_eq!(ok["input"]["division"], json!("internal"));
    assert_eq!(ok["input"]["CO"]["x"], json!(10.0));
    assert_eq!(ok["C1"]["x"], json!(0.0));
    assert_eq!(ok["checks"]["anchor_on_rail"], json!(true));
    assert_eq!(ok["frozen"]["OB"], json!(false));

    let bad: Value = serde_json::from_str(&lines[1][4..]).unwrap();
    assert_eq!(bad["pass"], json!(false));
    assert_eq!(bad["input"], cases[1]);
    assert!(bad["error"].as_str().unwrap().contains("degenerate"));
}

#[test]
fn outcome_accessors_split_reports_and_errors() {
    let cases = vec![
        raw("long_left", (10.0, 10.0), (20.0, 40.0)),
        raw("long_left", (0.0, 5.0), (0.0, 35.0)),
    ];
    let run = run_batch(&cases, &table());
    let report = run.outcomes[0].report().unwrap();
    assert!(report.pass);
    assert!(run.outcomes[0].error().is_none());
    assert!(run.outcomes[1].report().is_none());
    assert!(run.outcomes[1].error().is_some());
}

#[test]
fn nearly_coincident_feet_fail_ratio_check() {
    // Feet 1e-11 apart: above the coincidence threshold, so the ratio is
    // recomputed from a tiny denominator and float error exceeds the tolerance.
    let v = raw("long_left", (10.0, 20.0), (20.0, 20.0 + 1e-11));
    let report = run_case(&v, &table()).unwrap();
    assert!(report.checks.anchor_on_rail);
    assert!(report.checks.in_bounds);
    assert!(!report.checks.ratio_match);
    assert!(!report.pass);

    // Exactly equal feet take the coincident branch and pass.
    let v = raw("long_left", (10.0, 20.0), (20.0, 20.0));
    assert!(run_case(&v, &table()).unwrap().pass);
}

#[test]
fn frozen_object_ball_reports_no_ratio() {
    let report = run_case(&raw("long_left", (10.0, 10.0), (0.3, 30.0)), &table()).unwrap();
    assert!(report.pass);
    assert_eq!(report.frozen, Frozen { co: false, ob: true });
    assert_eq!(report.ratio, None);
    assert_eq!(report.d2, 0.0);
}

#[test]
fn seeded_random_batch_is_reproducible() {
    let t = table();
    let a = random_cases(Rail::LongLeft, 100, Some(7), &t);
    let b = random_cases(Rail::LongLeft, 100, Some(7), &t);
    assert_eq!(a, b);
    let ra = run_batch(&a, &t);
    let rb = run_batch(&b, &t);
    assert_eq!(ra.outcomes, rb.outcomes);
    assert_eq!(ra.passed, rb.passed);
    // Internal division only fails when both balls are frozen on the rail.
    for o in &ra.outcomes {
        assert!(
            o.passed() || matches!(o.error(), Some(RailError::DegenerateConfiguration { .. })),
            "{o:?}"
        );
    }

    let c = random_cases(Rail::LongLeft, 100, Some(8), &t);
    assert_ne!(a, c);
}

#[test]
fn random_cases_stay_on_table() {
    let t = table();
    for raw in random_cases(Rail::ShortTop, 50, Some(1), &t) {
        let case = validate_case(&raw, &t).unwrap();
        assert_eq!(case.rail, Rail::ShortTop);
        assert!(t.contains_eps(case.co, 0.0) && t.contains_eps(case.ob, 0.0));
    }
}

#[test]
fn case_source_expands() {
    let t = table();
    let single = CaseSource::Single(raw("long_left", (1.0, 1.0), (2.0, 2.0))).into_cases(&t);
    assert_eq!(single.len(), 1);
    let random = CaseSource::Random {
        rail: Rail::LongRight,
        count: 4,
        seed: Some(3),
    }
    .into_cases(&t);
    assert_eq!(random, random_cases(Rail::LongRight, 4, Some(3), &t));
}

#[test]
fn load_cases_accepts_object_array_and_dataset() {
    let one = r#"{"rail": "long_left", "CO": {"x": 1, "y": 1}, "OB": {"x": 2, "y": 2}}"#;
    assert_eq!(load_cases(one).unwrap().len(), 1);

    let many = format!("[{one}, {one}]");
    assert_eq!(load_cases(&many).unwrap().len(), 2);

    let dataset = format!(r#"{{"version": "1", "examples": [{one}, {one}, {one}]}}"#);
    let cases = load_cases(&dataset).unwrap();
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0]["rail"], json!("long_left"));

    assert!(load_cases("{not json").is_err());
}

#[test]
fn case_json_roundtrips_through_validation() {
    let case = Case::new(Rail::ShortBottom, vector![12.5, 3.25], vector![70.0, 39.0])
        .with_division(Division::External)
        .with_tolerance(1e-4);
    let back = validate_case(&case.to_json(), &table()).unwrap();
    assert_eq!(back, case);
}

#[test]
fn round_to_places() {
    assert_eq!(round_to(1.23456789, 6), 1.234568);
    assert_eq!(round_to(-2.5e-7, 6), -0.0);
    assert_eq!(round_to(0.1234567894, 9), 0.123456789);
}

fn rail_strategy() -> impl Strategy<Value = Rail> {
    prop_oneof![
        Just(Rail::LongLeft),
        Just(Rail::LongRight),
        Just(Rail::ShortBottom),
        Just(Rail::ShortTop),
    ]
}

proptest! {
    #[test]
    fn internal_cases_pass_and_rounding_keeps_verdict(
        x1 in 0.0f64..=80.0, y1 in 0.0f64..=40.0,
        x2 in 0.0f64..=80.0, y2 in 0.0f64..=40.0,
        rail in rail_strategy(),
    ) {
        let t = TableCfg::default();
        let v = raw(rail.tag(), (x1, y1), (x2, y2));
        match run_case(&v, &t) {
            Ok(report) => {
                prop_assert!(report.pass);
                prop_assert!(report.d1 >= 0.0 && report.d2 >= 0.0);
                let c1 = vector![report.c1.x, report.c1.y];
                let fixed = rail.fixed_axis().index();
                prop_assert!((c1[fixed] - rail.anchor_value(&t)).abs() <= DEFAULT_TOLERANCE);
                prop_assert!(t.contains_eps(c1, DEFAULT_TOLERANCE));
            }
            Err(e) => prop_assert!(
                matches!(e, RailError::DegenerateConfiguration { .. }),
                "unexpected error: {e:?}"
            ),
        }
    }
}
