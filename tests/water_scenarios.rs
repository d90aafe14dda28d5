//! Water stress scenarios end to end through the public API.
//!
//! Covers the reference drought, saturation and recovery readings, the trend rule,
//! and the clamp invariant over a sweep of every built-in ecosystem.

use mycelium_signal::{
    AdjustmentChain, BodyLocation, Emotion, PatternType, PulseCount, Rhythm, TranslateError,
    TranslatorState, TrendDirection, WaterIndicators, WaterReading, WaterStressTranslator,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() < tol
}

fn drought_indicators() -> WaterIndicators {
    WaterIndicators {
        leaf_water_potential: Some(-1.8),
        stream_flow: Some(0.3),
        precipitation_deficit: Some(25.0),
        ..Default::default()
    }
}

// ─── reference scenarios ─────────────────────────────────────────────────────

#[test]
fn test_drought_reading_with_indicators() {
    let mut t = WaterStressTranslator::new();

    let base = t.analyze(18.0, "temperate_forest", None).unwrap();
    assert!(close(base.stress_level, 0.28, 1e-4), "base={}", base.stress_level);

    let indicators = drought_indicators();
    let adjusted = t
        .analyze(18.0, "temperate_forest", Some(&indicators))
        .unwrap();
    assert!(
        close(adjusted.stress_level, 0.494, 1e-3),
        "adjusted={}",
        adjusted.stress_level
    );
    assert!(!adjusted.is_saturated);

    let reading = WaterReading::new(18.0, "temperate_forest").with_indicators(indicators);
    let p = t.translate(&reading, Some(1_700_000_000.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Tension);
    assert_eq!(p.rhythm, Rhythm::Intermittent);
    assert_eq!(p.count, PulseCount::Pulses(2));
    assert_eq!(p.emotion, Emotion::Concern);
    assert_eq!(p.location, BodyLocation::ThroatAndChest);
    assert!(p.trend.is_none());
}

#[test]
fn test_indicators_ignored_without_chain() {
    let t = WaterStressTranslator::new().with_adjustments(AdjustmentChain::none());
    let a = t
        .analyze(18.0, "temperate_forest", Some(&drought_indicators()))
        .unwrap();
    assert!(close(a.stress_level, 0.28, 1e-4));
}

#[test]
fn test_wetland_saturation() {
    let mut t = WaterStressTranslator::new();

    let p = t.translate(&WaterReading::new(90.0, "wetland"), Some(1.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Affirmation);

    let a = t.analyze(98.0, "wetland", None).unwrap();
    assert!(a.is_saturated);
    assert!(close(a.saturation_level, 0.6, 1e-4));

    let p = t.translate(&WaterReading::new(98.0, "wetland"), Some(2.0)).unwrap();
    assert_eq!(p.pattern_type, PatternType::Pressure);
    assert_eq!(p.emotion, Emotion::Heaviness);
    // stress stays 0 across both calls: no trend
    assert!(p.trend.is_none());
}

#[test]
fn test_recovery_gate_is_exact() {
    let mut t = WaterStressTranslator::new();

    // 27.5 → 0.5, then 28.75 → 0.25
    t.translate(&WaterReading::new(27.5, "temperate_forest"), Some(1.0))
        .unwrap();
    let p = t
        .translate(&WaterReading::new(28.75, "temperate_forest"), Some(2.0))
        .unwrap();
    assert_eq!(p.pattern_type, PatternType::Recovery);
    assert_eq!(p.emotion, Emotion::Relief);
    let trend = p.trend.unwrap();
    assert_eq!(trend.direction, TrendDirection::Improving);
    assert!(close(trend.magnitude, 0.25, 1e-4));

    // 28.45 → ≈0.31: above the recovery gate
    t.restore_state(TranslatorState::with_previous(0.5, 1.0));
    let p = t
        .translate(&WaterReading::new(28.45, "temperate_forest"), Some(2.0))
        .unwrap();
    assert_eq!(p.pattern_type, PatternType::Tension);
    assert_eq!(p.emotion, Emotion::Concern);
}

// ─── contract ────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_ecosystem_for_every_reading() {
    let mut t = WaterStressTranslator::new();
    for m in [0.0, 20.0, 50.0, 99.0] {
        let err = t
            .translate(&WaterReading::new(m, "mangrove"), Some(1.0))
            .unwrap_err();
        assert_eq!(err, TranslateError::UnknownEcosystemType("mangrove".into()));
    }
    assert!(t.state().is_empty());
}

#[test]
fn test_translate_pure_given_previous_state() {
    let mut t = WaterStressTranslator::new();
    let reading = WaterReading::new(21.0, "grassland").with_indicators(drought_indicators());
    for prev in [None, Some(0.05), Some(0.4), Some(0.9)] {
        let state = match prev {
            Some(level) => TranslatorState::with_previous(level, 10.0),
            None => TranslatorState::new(),
        };
        t.restore_state(state.clone());
        let a = t.translate(&reading, Some(11.0)).unwrap();
        t.restore_state(state);
        let b = t.translate(&reading, Some(11.0)).unwrap();
        assert_eq!(a, b, "prev={:?}", prev);
    }
}

#[test]
fn test_trend_present_only_above_threshold() {
    let mut t = WaterStressTranslator::new();
    let series = [40.0, 29.0, 28.0, 26.0, 20.0, 12.0, 30.0, 31.0, 24.9, 25.1, 28.5, 29.0];
    for (i, &m) in series.iter().enumerate() {
        let prev = t.state().previous_level();
        let p = t
            .translate(&WaterReading::new(m, "temperate_forest"), Some(i as f64))
            .unwrap();
        let new = t.state().previous_level().unwrap();
        let expected = prev.map_or(false, |q| (new - q).abs() > 0.1 + 1e-6);
        assert_eq!(p.trend.is_some(), expected, "step {} m={}", i, m);
    }
}

#[test]
fn test_exact_threshold_change_has_no_trend() {
    let mut t = WaterStressTranslator::new();
    t.translate(&WaterReading::new(28.5, "temperate_forest"), Some(1.0))
        .unwrap();
    let p = t
        .translate(&WaterReading::new(29.0, "temperate_forest"), Some(2.0))
        .unwrap();
    assert!(p.trend.is_none(), "trend={:?}", p.trend);
}

#[test]
fn test_clamp_invariant_sweep() {
    let t = WaterStressTranslator::new();
    let harsh = WaterIndicators {
        leaf_water_potential: Some(-4.0),
        stream_flow: Some(0.0),
        water_table_depth: Some(10.0),
        normal_water_table_depth: Some(1.0),
        precipitation_deficit: Some(100.0),
        ..Default::default()
    };
    let ecosystems: Vec<String> = t.profiles().ecosystem_types().map(str::to_owned).collect();
    for eco in &ecosystems {
        let mut m = -10.0_f32;
        while m <= 150.0 {
            for ind in [None, Some(&harsh)] {
                let a = t.analyze(m, eco, ind).unwrap();
                assert!(
                    (0.0..=1.0).contains(&a.stress_level),
                    "{} m={} stress={}",
                    eco,
                    m,
                    a.stress_level
                );
                assert!(
                    (0.0..=1.0).contains(&a.saturation_level),
                    "{} m={} saturation={}",
                    eco,
                    m,
                    a.saturation_level
                );
                if a.is_saturated {
                    assert_eq!(a.stress_level, 0.0);
                }
            }
            m += 0.5;
        }
    }
}
