use projectile_calculator::config::{ConfigError, builtin_preset, find_preset, load_presets};
use projectile_calculator::{ModelKind, TrajectoryEngine};

#[test]
fn shipped_presets_cover_both_models() {
    let presets = load_presets("configs/presets.yaml").expect("presets yaml");
    assert_eq!(presets.len(), 6);
    for model in [ModelKind::LinearClosedForm, ModelKind::QuadraticNumeric] {
        assert_eq!(presets.iter().filter(|p| p.model_kind() == model).count(), 3);
    }

    let moon = find_preset(&presets, "Moon-Linear").expect("moon preset");
    assert!((moon.gravity_m_s2 - 1.62).abs() < 1e-12);
    assert_eq!(moon.speed_factor, 4.0);
}

#[test]
fn earth_presets_match_builtin_defaults() {
    let presets = load_presets("configs/presets.yaml").expect("presets yaml");
    for (name, model) in [
        ("earth-linear", ModelKind::LinearClosedForm),
        ("earth-quadratic", ModelKind::QuadraticNumeric),
    ] {
        let preset = find_preset(&presets, name).expect(name);
        assert_eq!(preset.model_kind(), model);
        assert_eq!(preset.to_parameters(), builtin_preset(model).to_parameters());
    }
}

#[test]
fn every_shipped_preset_lands() {
    let engine = TrajectoryEngine::default();
    for preset in load_presets("configs/presets.yaml").expect("presets yaml") {
        let run = engine
            .compute(&preset.to_parameters(), preset.model_kind())
            .unwrap_or_else(|err| panic!("{} failed: {err}", preset.name));
        assert!(!run.is_degenerate(), "{} never landed", preset.name);
        assert!(run.metrics.range_m > 0.0);
    }
}

#[test]
fn unknown_preset_is_reported() {
    let presets = load_presets("configs/presets.yaml").expect("presets yaml");
    match find_preset(&presets, "venus") {
        Err(ConfigError::PresetNotFound { name, available }) => {
            assert_eq!(name, "venus");
            assert!(available.contains("mars-quadratic"));
        }
        other => panic!("expected PresetNotFound, got {other:?}"),
    }
}

#[test]
fn single_toml_preset_drives_the_engine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lob.toml");
    std::fs::write(
        &path,
        "name = \"lob\"\nmodel = \"quadratic\"\nv0_m_s = 20.0\nangle_deg = 70.0\n\
         drag_coefficient = 0.001\nmass_kg = 0.5\ngravity_m_s2 = 9.81\n",
    )
    .expect("write toml");

    let presets = load_presets(&path).expect("toml preset");
    assert_eq!(presets.len(), 1);
    let preset = &presets[0];
    assert_eq!(preset.model_kind(), ModelKind::QuadraticNumeric);

    let run = TrajectoryEngine::default()
        .compute(&preset.to_parameters(), preset.model_kind())
        .expect("lob run");
    assert!(!run.is_degenerate());
    assert!(run.metrics.final_speed_m_s < 20.0);
}
