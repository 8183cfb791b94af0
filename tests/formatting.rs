use min_to_max::extremes::{Extremes, MinMax, scan};

fn f8(min: f64, max: f64) -> String {
    MinMax::Float8(Extremes { min, max }).to_string()
}

fn f4(min: f32, max: f32) -> String {
    MinMax::Float4(Extremes { min, max }).to_string()
}

#[test]
fn integers_render_exactly() {
    assert_eq!(MinMax::Int2(Extremes { min: -7, max: 7 }).to_string(), "-7->7");
    assert_eq!(MinMax::Int4(Extremes { min: 0, max: 0 }).to_string(), "0->0");
    assert_eq!(
        MinMax::Int8(Extremes { min: -1, max: 1_234_567_890_123 }).to_string(),
        "-1->1234567890123"
    );
}

#[test]
fn floats_render_shortest_round_trip() {
    assert_eq!(f8(-0.75, 2.25), "-0.75->2.25");
    assert_eq!(f8(5.0, 6.5), "5->6.5");
    assert_eq!(f8(0.1, 0.7), "0.1->0.7");
    assert_eq!(f4(0.1, 3.3), "0.1->3.3");
    assert_eq!(f8(-0.0, 0.0), "-0->0");
}

#[test]
fn floats_switch_to_scientific_notation() {
    assert_eq!(f8(1e20, 1e-5), "1e+20->1e-05");
    assert_eq!(f8(1e14, 0.0001), "100000000000000->0.0001");
    assert_eq!(f8(1e15, 1.5e300), "1e+15->1.5e+300");
    assert_eq!(f4(123_456.0, 1_234_567.0), "123456->1.234567e+06");
}

#[test]
fn non_finite_floats() {
    assert_eq!(f8(f64::NEG_INFINITY, f64::INFINITY), "-Infinity->Infinity");
    assert_eq!(f4(f32::NAN, f32::NAN), "NaN->NaN");
}

#[test]
fn scan_skips_nulls_and_tracks_both_ends() {
    assert_eq!(scan::<i32>(&[]), None);
    assert_eq!(scan::<i32>(&[None, None]), None);
    assert_eq!(
        scan(&[None, Some(4), Some(-1), None, Some(9), Some(4)]),
        Some(Extremes { min: -1, max: 9 })
    );
}

#[test]
fn scan_keeps_first_of_equal_values() {
    // -0.0 and 0.0 compare equal, so the first one seen stays.
    let e = scan(&[Some(0.0f64), Some(-0.0)]).expect("extremes");
    assert!(e.min.is_sign_positive() && e.max.is_sign_positive());
}
