use std::time::Duration;

use cardgrade_core::config::{GraderConfig, InteractionConfig, MagnifierConfig, RectifyConfig};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_rectify_defaults() {
    let c = RectifyConfig::default();
    assert_eq!(c.min_width, 1000);
    assert_eq!(c.max_width, 4096);
}

#[test]
fn test_interaction_defaults() {
    let c = InteractionConfig::default();
    assert_eq!(c.hide_delay(), Duration::from_millis(2000));
    assert_eq!(c.long_press(), Duration::from_millis(500));
    assert_eq!(c.long_press_slop_px, 10.0);
    assert_eq!(c.line_hit_tolerance_px, 10.0);
}

#[test]
fn test_magnifier_default_size() {
    assert_eq!(MagnifierConfig::default().base_size, 225.0);
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let c: GraderConfig = serde_json::from_str(r#"{"rectify":{"min_width":800,"max_width":2000}}"#).unwrap();
    assert_eq!(c.rectify.min_width, 800);
    assert_eq!(c.interaction, InteractionConfig::default());
    assert_eq!(c.magnifier, MagnifierConfig::default());

    let empty: GraderConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, GraderConfig::default());
}

#[test]
fn test_config_round_trip() {
    let mut c = GraderConfig::default();
    c.interaction.hide_delay_ms = 1200;
    c.magnifier.base_size = 300.0;
    let json = serde_json::to_string(&c).unwrap();
    let back: GraderConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
