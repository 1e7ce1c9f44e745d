use crate::*;
use std::sync::Arc;

const RED: Rgba = Rgba::rgb(255, 0, 0);
const BLUE: Rgba = Rgba::rgb(0, 0, 255);

fn cached_engine() -> (Engine, Arc<GradientCache>) {
    let cache = Arc::new(GradientCache::new());
    (Engine::new().with_cache(cache.clone()), cache)
}

#[test]
fn key_combines_base_color_and_descriptor() {
    assert_eq!(
        GradientCache::key(RED, "linear-gradient(red, blue)"),
        "#ff0000fflinear-gradient(red, blue)"
    );
    assert_ne!(
        GradientCache::key(RED, "linear-gradient(red, blue)"),
        GradientCache::key(BLUE, "linear-gradient(red, blue)")
    );
}

#[test]
fn second_parse_is_served_from_the_cache() {
    let (engine, cache) = cached_engine();
    let descriptor = "linear-gradient(to bottom, red, blue)";

    let first = engine.parse_css(descriptor, RED, None);
    assert!(first.success);
    assert_eq!(cache.len(), 1);

    let second = engine.parse_css(descriptor, RED, None);
    assert_eq!(second.paint, first.paint);
    assert!(second.warnings.is_empty());
    assert_eq!(cache.len(), 1);
}

#[test]
fn cached_entry_wins_over_a_fresh_parse() {
    let (engine, cache) = cached_engine();
    let descriptor = "linear-gradient(red, blue)";
    let planted = Paint::from_gradient(
        Gradient::radial().with_stops(vec![Stop::new(0.0, BLUE)]),
        RED,
    );
    cache.insert(GradientCache::key(RED, descriptor), planted.clone());

    assert_eq!(engine.parse_css(descriptor, RED, None).paint, planted);
    assert_ne!(engine.parse_css(descriptor, BLUE, None).paint, planted);
    assert_eq!(cache.len(), 2);
}

#[test]
fn warnings_are_only_reported_on_the_first_parse() {
    let (engine, _cache) = cached_engine();
    let descriptor = "linear-gradient(37deg, red, blue)";
    assert_eq!(engine.parse_css(descriptor, RED, None).warnings.len(), 1);
    assert!(engine.parse_css(descriptor, RED, None).warnings.is_empty());
}

#[test]
fn solid_and_failed_results_are_not_cached() {
    let (engine, cache) = cached_engine();
    engine.parse_css("red", RED, None);
    engine.parse_css("nonsense", RED, None);
    engine.parse_css("conic-gradient(red, blue)", RED, None);
    engine.parse_css("linear-gradient", RED, None);
    assert!(cache.is_empty());
}

#[test]
fn url_references_are_not_cached() {
    let (engine, cache) = cached_engine();
    let target = Gradient::linear().with_stops(vec![Stop::new(0.0, RED), Stop::new(1.0, BLUE)]);
    let lookup = |_: &str| Some(target.clone());
    let lookup: UrlResolver<'_> = &lookup;

    let parsed = engine.parse_css("url(#fade)", RED, Some(lookup));
    assert!(parsed.success);
    assert!(cache.is_empty());

    // the same text must resolve again next time
    let parsed = engine.parse_css("url(#fade)", RED, None);
    assert!(!parsed.success);
}

#[test]
fn engines_without_a_cache_do_not_share_results() {
    let engine = Engine::new();
    assert!(engine.cache().is_none());
    let a = engine.parse_css("linear-gradient(red, blue)", RED, None);
    let b = engine.parse_css("linear-gradient(red, blue)", RED, None);
    assert_eq!(a, b);
}

#[test]
fn shared_cache_is_one_instance() {
    assert!(Arc::ptr_eq(&GradientCache::shared(), &GradientCache::shared()));
    let engine = Engine::new().with_shared_cache();
    assert!(std::ptr::eq(
        engine.cache().unwrap(),
        GradientCache::shared().as_ref()
    ));
}

#[test]
fn clear_empties_the_cache() {
    let (engine, cache) = cached_engine();
    engine.parse_css("radial-gradient(red, blue)", RED, None);
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn concurrent_parses_agree() {
    let (engine, cache) = cached_engine();
    let descriptors: Vec<String> = (0..8)
        .map(|i| format!("linear-gradient(to right, red {}%, blue)", i * 10))
        .collect();

    let results: Vec<Vec<Paint>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = &engine;
                let descriptors = &descriptors;
                scope.spawn(move || {
                    descriptors
                        .iter()
                        .map(|d| engine.parse_css(d, RED, None).paint)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), descriptors.len());
    for run in &results[1..] {
        assert_eq!(run, &results[0]);
    }
    let fresh = Engine::new();
    for (paint, descriptor) in results[0].iter().zip(&descriptors) {
        assert_eq!(paint, &fresh.parse_css(descriptor, RED, None).paint);
    }
}
