//! # Basic usage
//!
//! Translates one water reading and one biodiversity survey and prints the
//! resulting feedback patterns.
//!
//! Run with: `cargo run --example basic_usage`

use mycelium_signal::{
    BiodiversityReading, BiodiversityTranslator, DiversityIndicator, FeedbackPattern,
    TranslateError, WaterIndicators, WaterReading, WaterStressTranslator,
};

fn show(label: &str, p: &FeedbackPattern) {
    println!("── {} ──", label);
    println!("  type        {}", p.pattern_type.as_str());
    println!("  magnitude   {:.2}", p.magnitude.value());
    println!("  rhythm      {} × {}", p.rhythm.as_str(), p.count.value());
    println!("  duration    {:.2}s", p.duration);
    if let Some(f) = p.frequency {
        println!("  {:<15} {}", p.frequency_key(), f.as_str());
    }
    println!("  location    {}", p.location.as_str());
    println!("  emotion     {}", p.emotion.as_str());
    println!("  \"{}\"", p.description);
    if let Some(t) = p.trend {
        println!("  trend       {} by {:.2}", t.direction.as_str(), t.magnitude);
    }
}

fn main() -> Result<(), TranslateError> {
    let mut water = WaterStressTranslator::new();
    let reading = WaterReading::new(18.0, "temperate_forest").with_indicators(WaterIndicators {
        leaf_water_potential: Some(-1.8),
        stream_flow: Some(0.3),
        precipitation_deficit: Some(25.0),
        ..Default::default()
    });
    let p = water.translate(&reading, None)?;
    show("temperate forest, dry spell", &p);

    let mut bio = BiodiversityTranslator::new();
    let survey = BiodiversityReading::new("temperate_forest")
        .with_indicator(DiversityIndicator::SpeciesCount, 28.0)
        .with_indicator(DiversityIndicator::BirdSpecies, 18.0)
        .with_indicator(DiversityIndicator::InsectOrders, 8.0)
        .with_indicator(DiversityIndicator::ShannonIndex, 2.8)
        .with_acoustic_diversity(0.65);
    let p = bio.translate(&survey, None)?;
    show("temperate forest, spring survey", &p);

    match water.translate(&WaterReading::new(40.0, "tundra"), None) {
        Err(e) => println!("\nrejected: {}", e),
        Ok(p) => show("tundra", &p),
    }
    Ok(())
}
