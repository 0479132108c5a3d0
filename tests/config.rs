use roster_draw::DrawConfig;

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    let config = DrawConfig::from_toml(
        r#"
[weights]
past_draw_penalty = 0.5

[reel]
visible_items = 5
"#,
    )
    .unwrap();

    assert!((config.weights.past_draw_penalty - 0.5).abs() < 1e-12);
    assert!((config.weights.boost_factor - 1.5).abs() < 1e-12);
    assert!((config.weights.max_grade - 20.0).abs() < 1e-12);
    assert!((config.weights.min_weight_floor - 0.0001).abs() < 1e-12);
    assert_eq!(config.reel.visible_items, 5);
    assert_eq!(config.reel.min_total_items, 40);
}

#[test]
fn empty_toml_is_all_defaults() {
    let config = DrawConfig::from_toml("").unwrap();
    assert!((config.weights.past_draw_penalty - 0.6).abs() < 1e-12);
    assert_eq!(config.reel.visible_items, 3);
}

#[test]
fn malformed_toml_reports_a_parse_error() {
    let err = DrawConfig::from_toml("[weights]\npast_draw_penalty = \"high\"").unwrap_err();
    assert!(err.starts_with("failed to parse config"));
}

#[test]
fn load_reads_file_then_applies_env_overrides() {
    let dir = std::env::temp_dir().join(format!("roster-draw-config-{}", std::process::id()));
    let path = dir.join("draw.toml");
    let mut written = DrawConfig::default();
    written.weights.max_grade = 10.0;
    written.write(&path).unwrap();

    std::env::set_var("BOOST_FACTOR", "2.5");
    let (config, used) = DrawConfig::load(Some(path.clone())).unwrap();
    std::env::remove_var("BOOST_FACTOR");

    assert_eq!(used, Some(path));
    assert!((config.weights.max_grade - 10.0).abs() < 1e-12);
    assert!((config.weights.boost_factor - 2.5).abs() < 1e-12);

    let (fallback, _) = DrawConfig::load(Some(dir.join("absent.toml"))).unwrap();
    assert!((fallback.weights.max_grade - 20.0).abs() < 1e-12);
}
