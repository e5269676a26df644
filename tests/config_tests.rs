// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use qrscan::overlay::ContentFit;
use qrscan::Config;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(
        config.resume_delay_ms, 500,
        "Auto-resume should default to half a second"
    );
    assert_eq!(
        config.animation_duration_ms, 300,
        "Corner glide should default to 300ms"
    );
    assert_eq!(config.content_fit, ContentFit::Cover);
    assert!(!config.mirror_preview);
}

#[test]
fn test_config_default_roi_is_centered_band() {
    let config = Config::default();
    let corners = config.region_of_interest().resting_corners();

    assert!(corners.top_left().x > 0.0);
    assert!(corners.top_right().x < config.view_width);
    assert!(corners.top_left().y > 0.0);
    assert!(corners.bottom_left().y < config.view_height);
}

#[test]
fn test_config_json_round_trip() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).expect("config serializes");
    let back: Config = serde_json::from_str(&json).expect("config deserializes");

    assert_eq!(back, config);
}

#[test]
fn test_config_rejects_malformed_json() {
    let result = serde_json::from_str::<Config>("{\"view_width\": \"wide\"}");
    assert!(result.is_err());
}
