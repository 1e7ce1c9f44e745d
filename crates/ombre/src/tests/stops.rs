use super::{assert_close, assert_offsets};
use crate::stops::*;
use crate::*;

fn stops_at(offsets: &[f64]) -> Vec<Stop> {
    offsets.iter().map(|&o| Stop::new(o, Rgba::BLACK)).collect()
}

fn normalized(offsets: &[f64]) -> Vec<Stop> {
    let mut stops = stops_at(offsets);
    normalize_stops(&mut stops);
    stops
}

const RED: Rgba = Rgba::rgb(255, 0, 0);
const BLUE: Rgba = Rgba::rgb(0, 0, 255);

#[test]
fn read_fraction_plain_and_percent() {
    assert_eq!(read_fraction("0.25").unwrap(), 0.25);
    assert_eq!(read_fraction("50%").unwrap(), 0.5);
    assert_eq!(read_fraction(" 75 % ").unwrap(), 0.75);
    assert_eq!(read_fraction("1").unwrap(), 1.0);
}

#[test]
fn read_fraction_clamps_negative_but_not_above_one() {
    assert_eq!(read_fraction("-20%").unwrap(), 0.0);
    assert_eq!(read_fraction("-3").unwrap(), 0.0);
    assert_eq!(read_fraction("150%").unwrap(), 1.5);
    assert_eq!(read_fraction("2.5").unwrap(), 2.5);
}

#[test]
fn read_fraction_rejects_non_numeric_text() {
    for text in ["", "%", "abc", "red", "nan", "inf", "1.2.3"] {
        let err = read_fraction(text).unwrap_err();
        assert!(
            matches!(err, Error::InvalidFraction { .. }),
            "{text:?} gave {err:?}"
        );
    }
}

#[test]
fn normalize_spreads_unspecified_interior_stops_evenly() {
    for k in 1..=6usize {
        let mut offsets = vec![0.0; k + 2];
        offsets[k + 1] = 1.0;
        let stops = normalized(&offsets);
        assert_close(stops[0].offset, 0.0);
        for j in 1..=k {
            assert_close(stops[j].offset, j as f64 / (k + 1) as f64);
        }
        assert_close(stops[k + 1].offset, 1.0);
    }
}

#[test]
fn normalize_all_unspecified_spans_zero_to_one() {
    // red, orange, yellow, green
    let stops = normalized(&[0.0, 0.0, 0.0, 0.0]);
    assert_offsets(&stops, &[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
}

#[test]
fn normalize_single_and_pair() {
    assert_offsets(&normalized(&[0.0]), &[1.0]);
    assert_offsets(&normalized(&[0.0, 0.0]), &[0.0, 1.0]);
    assert_offsets(&normalized(&[]), &[]);
}

#[test]
fn normalize_run_starts_at_previous_explicit_stop() {
    let stops = normalized(&[0.0, 0.2, 0.0, 0.0, 1.0]);
    assert_offsets(&stops, &[0.0, 0.2, 0.2 + 0.8 / 3.0, 0.2 + 1.6 / 3.0, 1.0]);

    let stops = normalized(&[0.3, 0.0, 0.0]);
    assert_offsets(&stops, &[0.3, 0.65, 1.0]);
}

#[test]
fn normalize_final_stop_never_regresses_past_one() {
    let stops = normalized(&[0.0, 1.5, 0.0]);
    assert_offsets(&stops, &[0.0, 1.5, 1.5]);

    let stops = normalized(&[0.0, 0.5, 0.0]);
    assert_offsets(&stops, &[0.0, 0.5, 1.0]);
}

#[test]
fn normalize_raises_explicit_offsets_that_move_backwards() {
    let stops = normalized(&[0.5, 0.2, 0.9]);
    assert_offsets(&stops, &[0.5, 0.5, 0.9]);
}

fn awkward_inputs() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![-0.5, 0.3, 0.0, 0.2, 0.0],
        vec![1.2, 0.0, 0.4],
        vec![0.0, 0.0, -0.3],
        vec![0.9, 0.1, 0.0, 0.5, 2.0, 0.0],
        vec![0.0, 0.25, 0.25, 0.0, 0.75, 0.0],
        vec![0.4],
        vec![0.0, 0.7, 0.0, 0.0, 0.0, 0.2],
    ]
}

#[test]
fn normalize_output_is_non_decreasing() {
    for input in awkward_inputs() {
        let stops = normalized(&input);
        for pair in stops.windows(2) {
            assert!(
                pair[0].offset <= pair[1].offset,
                "{input:?} normalized to {:?}",
                stops.iter().map(|s| s.offset).collect::<Vec<_>>()
            );
        }
        assert!(stops.iter().all(|s| s.offset >= 0.0));
    }
}

#[test]
fn normalize_keeps_first_stop_at_zero_unless_given() {
    assert_eq!(normalized(&[0.0, 0.0, 0.0])[0].offset, 0.0);
    assert_eq!(normalized(&[0.0, 0.6])[0].offset, 0.0);
    assert_eq!(normalized(&[0.2, 0.6])[0].offset, 0.2);
}

#[test]
fn normalize_is_idempotent() {
    for input in awkward_inputs() {
        let once = normalized(&input);
        let mut twice = once.clone();
        normalize_stops(&mut twice);
        assert_eq!(once, twice, "input {input:?}");
    }
}

#[test]
fn color_stop_with_and_without_offset() {
    let resolver = CssColorResolver;
    let stop = parse_color_stop("red", None, &resolver).unwrap();
    assert_eq!(stop, Stop::new(0.0, RED));

    let stop = parse_color_stop("blue 25%", Some(RED), &resolver).unwrap();
    assert_eq!(stop, Stop::new(0.25, BLUE));

    let stop = parse_color_stop("blue 120%", Some(RED), &resolver).unwrap();
    assert_eq!(stop.offset, 1.2);
}

#[test]
fn color_stop_failures() {
    let resolver = CssColorResolver;
    assert!(matches!(
        parse_color_stop("notacolor", None, &resolver),
        Err(Error::InvalidColor { .. })
    ));
    assert!(matches!(
        parse_color_stop("red abc", None, &resolver),
        Err(Error::InvalidFraction { .. })
    ));
    assert!(matches!(
        parse_color_stop("clearer-x", Some(RED), &resolver),
        Err(Error::InvalidColor { .. })
    ));
}

#[test]
fn relative_keywords_without_previous_color() {
    let resolver = CssColorResolver;
    let stop = parse_color_stop("transparent", None, &resolver).unwrap();
    assert_eq!(stop.color, Rgba::default());
    assert_eq!(stop.opacity, 0.0);

    let stop = parse_color_stop("clearer-25 40%", None, &resolver).unwrap();
    assert_eq!(stop.color, Rgba::default());
    assert_eq!(stop.opacity, 0.75);
    assert_eq!(stop.offset, 0.4);
}

#[test]
fn relative_keywords_with_explicit_base_color() {
    let resolver = CssColorResolver;
    let stop = parse_color_stop("clearer-50 red", Some(RED), &resolver).unwrap();
    assert_eq!(stop.color, RED);
    assert_eq!(stop.opacity, 0.5);
    assert_eq!(stop.offset, 0.0);

    let stop = parse_color_stop("clearer-50 blue 40%", Some(RED), &resolver).unwrap();
    assert_eq!(stop.color, BLUE);
    assert_eq!(stop.opacity, 0.5);
    assert_eq!(stop.offset, 0.4);

    let stop = parse_color_stop("transparent blue", None, &resolver).unwrap();
    assert_eq!(stop.color, BLUE);
    assert_eq!(stop.opacity, 0.0);
}

#[test]
fn relative_keywords_with_previous_color_go_to_the_resolver() {
    let resolver = CssColorResolver;
    let stop = parse_color_stop("transparent", Some(RED), &resolver).unwrap();
    assert_eq!(stop.color, Rgba::TRANSPARENT);
    assert_eq!(stop.opacity, 1.0);

    let stop = parse_color_stop("clearer-50", Some(RED), &resolver).unwrap();
    assert_eq!(stop.color, Rgba::new(255, 0, 0, 128));
    assert_eq!(stop.opacity, 1.0);
}

#[test]
fn relative_keyword_parsing() {
    assert_eq!(
        RelativeKeyword::parse("clearer-30"),
        Some(RelativeKeyword::Clearer(30.0))
    );
    assert_eq!(
        RelativeKeyword::parse("transparent"),
        Some(RelativeKeyword::Transparent)
    );
    assert_eq!(RelativeKeyword::parse("clearer-"), None);
    assert_eq!(RelativeKeyword::parse("red"), None);
    assert_eq!(RelativeKeyword::Clearer(30.0).opacity(), 0.7);
}

#[test]
fn relative_keyword_opacity_stays_in_unit_range() {
    assert_eq!(RelativeKeyword::Clearer(150.0).opacity(), 0.0);
    assert_eq!(RelativeKeyword::Clearer(-50.0).opacity(), 1.0);

    let resolver = CssColorResolver;
    let stop = parse_color_stop("clearer-150", None, &resolver).unwrap();
    assert_eq!(stop.opacity, 0.0);
    let stop = parse_color_stop("clearer--50 red", None, &resolver).unwrap();
    assert_eq!(stop.color, RED);
    assert_eq!(stop.opacity, 1.0);
}
