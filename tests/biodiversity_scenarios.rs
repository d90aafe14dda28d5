//! Biodiversity scenarios end to end through the public API, plus domain dispatch.

use mycelium_signal::{
    BiodiversityReading, BiodiversityTranslator, EcologicalDomain, Emotion,
    Frequency, PatternType, SensorReading, TranslateError, TranslatorSet, TranslatorState,
    TrendDirection, WaterReading,
};

use mycelium_signal::DiversityIndicator::{BirdSpecies, InsectOrders, ShannonIndex, SpeciesCount};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn reference_sample() -> BiodiversityReading {
    BiodiversityReading::new("temperate_forest")
        .with_indicator(SpeciesCount, 28.0)
        .with_indicator(BirdSpecies, 18.0)
        .with_indicator(InsectOrders, 8.0)
        .with_indicator(ShannonIndex, 2.8)
        .with_acoustic_diversity(0.65)
}

fn degraded_sample() -> BiodiversityReading {
    BiodiversityReading::new("temperate_forest")
        .with_indicator(SpeciesCount, 2.0)
        .with_indicator(BirdSpecies, 1.0)
        .with_indicator(ShannonIndex, 0.4)
        .with_acoustic_diversity(0.1)
}

// ─── reference scenarios ─────────────────────────────────────────────────────

#[test]
fn test_reference_sample_is_harmony() {
    let mut t = BiodiversityTranslator::new();
    let d = t.analyze(&reference_sample(), "temperate_forest").unwrap();
    assert!(d < 0.2, "depletion={}", d);
    assert!(close(d, 0.07), "depletion={}", d);

    let p = t.translate(&reference_sample(), Some(1.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Harmony);
    assert_eq!(p.emotion, Emotion::Wonder);
    assert_eq!(p.frequency, Some(Frequency::FullSpectrum));
}

#[test]
fn test_degraded_then_recovering() {
    let mut t = BiodiversityTranslator::new();

    let p = t.translate(&degraded_sample(), Some(1.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Monotony);
    assert_eq!(p.emotion, Emotion::Alarm);
    let degraded = t.state().previous_level().unwrap();
    assert!(degraded > 0.7, "depletion={}", degraded);

    let p = t.translate(&reference_sample(), Some(2.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::ExpandingHarmony);
    assert_eq!(p.emotion, Emotion::Hope);
    assert_eq!(p.frequency, None);
    let trend = p.trend.unwrap();
    assert_eq!(trend.direction, TrendDirection::Improving);

    // once recovered, steady readings settle back into harmony
    let p = t.translate(&reference_sample(), Some(3.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Harmony);
    assert!(p.trend.is_none());
}

#[test]
fn test_unrecognised_metrics_only() {
    let mut t = BiodiversityTranslator::new();
    let r = BiodiversityReading::new("grassland").with_metric("pollinator_visits", 42.0);
    let p = t.translate(&r, Some(1.0)).unwrap();
    // 0.5 default lands in the monotony band
    assert_eq!(p.pattern_type, PatternType::Monotony);
    assert_eq!(p.emotion, Emotion::Concern);
    assert_eq!(t.state().previous_level(), Some(0.5));
}

// ─── contract ────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_ecosystem() {
    let mut t = BiodiversityTranslator::new();
    // rainforest has moisture thresholds but no biodiversity profile
    let mut r = reference_sample();
    r.ecosystem_type = Some("rainforest".into());
    assert_eq!(
        t.translate(&r, Some(1.0)).unwrap_err(),
        TranslateError::UnknownEcosystemType("rainforest".into())
    );
    assert!(t.state().is_empty());
}

#[test]
fn test_translate_pure_given_previous_state() {
    let mut t = BiodiversityTranslator::new();
    for prev in [0.0, 0.2, 0.35, 0.9] {
        t.restore_state(TranslatorState::with_previous(prev, 5.0));
        let a = t.translate(&degraded_sample(), Some(6.0)).unwrap();
        t.restore_state(TranslatorState::with_previous(prev, 5.0));
        let b = t.translate(&degraded_sample(), Some(6.0)).unwrap();
        assert_eq!(a, b, "prev={}", prev);
    }
}

#[test]
fn test_clamp_invariant_sweep() {
    let t = BiodiversityTranslator::new();
    let ecosystems: Vec<String> = t.profiles().ecosystem_types().map(str::to_owned).collect();
    for eco in &ecosystems {
        for v in [0.0_f32, 0.5, 1.0, 3.0, 7.0, 12.0, 25.0, 60.0, 200.0] {
            for acoustic in [-1.0_f32, 0.0, 0.5, 1.0, 2.0] {
                let r = BiodiversityReading::new(eco.as_str())
                    .with_indicator(SpeciesCount, v)
                    .with_indicator(BirdSpecies, v)
                    .with_indicator(InsectOrders, v / 4.0)
                    .with_indicator(ShannonIndex, v / 10.0)
                    .with_acoustic_diversity(acoustic);
                let d = t.analyze(&r, eco).unwrap();
                assert!(
                    (0.0..=1.0).contains(&d),
                    "{} v={} acoustic={} depletion={}",
                    eco,
                    v,
                    acoustic,
                    d
                );
            }
        }
    }
}

// ─── dispatch ────────────────────────────────────────────────────────────────

#[test]
fn test_translator_set_keeps_domains_apart() {
    let mut set = TranslatorSet::new();
    let bio = SensorReading::from(degraded_sample());
    let water = SensorReading::from(WaterReading::new(12.0, "temperate_forest"));

    assert_eq!(bio.domain(), EcologicalDomain::Biodiversity);
    let p = set.dispatch(&bio, Some(1.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Monotony);
    let p = set.dispatch(&water, Some(1.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Tension);

    // a water reading does not satisfy the biodiversity translator
    assert!(matches!(
        set.translate(EcologicalDomain::Biodiversity, &water, Some(2.0)),
        Err(TranslateError::MissingSensorData(_))
    ));

    let h = set.get_historical_trends("biodiversity".parse().unwrap(), None);
    assert_eq!(h.last_reading_time, Some(1.0));
    assert_eq!(h.confidence, 0.0);
}
