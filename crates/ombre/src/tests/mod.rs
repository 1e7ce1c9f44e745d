mod cache;
mod stops;

use crate::Stop;

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_offsets(stops: &[Stop], expected: &[f64]) {
    let actual: Vec<f64> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(actual.len(), expected.len(), "offsets: {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}
