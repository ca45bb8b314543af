//! Launch presets for the Projectile Calculator.
//!
//! Presets live in a YAML list (`configs/presets.yaml`), a single TOML file,
//! or a directory of TOML files, one preset per file.

use std::fs::File;
use std::path::{Path, PathBuf};

use projectile_core::constants::{DEFAULT_DT_S, EARTH_GRAVITY_M_S2};
use projectile_core::{ModelKind, SimulationParameters};
use serde::Deserialize;
use thiserror::Error;

/// Named launch configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LaunchPreset {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub model: ModelKind,
    pub v0_m_s: f64,
    pub angle_deg: f64,
    pub drag_coefficient: f64,
    pub mass_kg: f64,
    pub gravity_m_s2: f64,
    #[serde(default = "default_dt")]
    pub dt_s: f64,
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
}

fn default_dt() -> f64 {
    DEFAULT_DT_S
}

fn default_speed_factor() -> f64 {
    1.0
}

impl LaunchPreset {
    pub fn model_kind(&self) -> ModelKind {
        self.model
    }

    pub fn to_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            v0_m_s: self.v0_m_s,
            angle_deg: self.angle_deg,
            drag_coefficient: self.drag_coefficient,
            mass_kg: self.mass_kg,
            gravity_m_s2: self.gravity_m_s2,
            dt_s: self.dt_s,
            speed_factor: self.speed_factor,
        }
    }
}

/// Defaults used when no preset is named: a 500 m/s closed-form throw or a
/// 100 m/s numerical throw, both at 45° under Earth gravity.
pub fn builtin_preset(model: ModelKind) -> LaunchPreset {
    match model {
        ModelKind::LinearClosedForm => LaunchPreset {
            name: "default-linear".to_string(),
            description: None,
            model,
            v0_m_s: 500.0,
            angle_deg: 45.0,
            drag_coefficient: 1.0,
            mass_kg: 10.0,
            gravity_m_s2: EARTH_GRAVITY_M_S2,
            dt_s: DEFAULT_DT_S,
            speed_factor: 1.0,
        },
        ModelKind::QuadraticNumeric => LaunchPreset {
            name: "default-quadratic".to_string(),
            description: None,
            model,
            v0_m_s: 100.0,
            angle_deg: 45.0,
            drag_coefficient: 0.005,
            mass_kg: 10.0,
            gravity_m_s2: EARTH_GRAVITY_M_S2,
            dt_s: DEFAULT_DT_S,
            speed_factor: 1.0,
        },
    }
}

/// Errors that can occur while loading presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("preset '{name}' not found (available: {available})")]
    PresetNotFound { name: String, available: String },
}

/// Load presets from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_presets<P: AsRef<Path>>(path: P) -> Result<Vec<LaunchPreset>, ConfigError> {
    load_records(path)
}

/// Case-insensitive lookup by preset name.
pub fn find_preset<'a>(
    presets: &'a [LaunchPreset],
    name: &str,
) -> Result<&'a LaunchPreset, ConfigError> {
    presets
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::PresetNotFound {
            name: name.to_string(),
            available: presets
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();

    entries
        .iter()
        .map(|path| -> Result<T, ConfigError> {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        })
        .collect()
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}
