use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use projectile_calculator::config::{LaunchPreset, builtin_preset, find_preset, load_presets};
use projectile_calculator::export::{writer_for_path, write_run_json, write_trajectory_csv};
use projectile_calculator::model::constants::{DEFAULT_SAMPLE_COUNT, DEFAULT_T_MAX_S};
use projectile_calculator::trajectory::{HistoryEntry, Outcome, RunHistory};
use projectile_calculator::{EngineOptions, ModelKind, SimulationParameters, TrajectoryEngine};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModelArg {
    /// Drag proportional to velocity, closed form stepped at --dt
    Linear,
    /// Drag proportional to speed times velocity, adaptive integration
    Quadratic,
}

impl From<ModelArg> for ModelKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::Linear => ModelKind::LinearClosedForm,
            ModelArg::Quadratic => ModelKind::QuadraticNumeric,
        }
    }
}

/// Compute projectile trajectories and compare throws side by side.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Projectile trajectory calculator (linear or quadratic drag)"
)]
struct Cli {
    /// Physical model (defaults to the preset's model, else linear)
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// Preset name from the presets file (case-insensitive)
    #[arg(long)]
    preset: Option<String>,

    /// Presets file or directory
    #[arg(long, default_value = "configs/presets.yaml")]
    presets: PathBuf,

    /// Launch speed in m/s
    #[arg(long)]
    v0: Option<f64>,

    /// Launch angle in degrees; repeat to compare several throws
    #[arg(long = "angle")]
    angles: Vec<f64>,

    /// Drag coefficient (k1 in kg/s for linear, b in N·s²/m² for quadratic)
    #[arg(long)]
    drag: Option<f64>,

    /// Projectile mass in kg
    #[arg(long)]
    mass: Option<f64>,

    /// Gravitational acceleration in m/s²
    #[arg(long)]
    gravity: Option<f64>,

    /// Closed-form time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Multiplier applied to the closed-form time step
    #[arg(long)]
    speed_factor: Option<f64>,

    /// Output samples for the quadratic model
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Simulated time bound in seconds
    #[arg(long, default_value_t = DEFAULT_T_MAX_S)]
    t_max: f64,

    /// Write the latest trajectory as CSV (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the latest run as JSON (use '-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print speed and acceleration samples of the latest run
    #[arg(long, default_value_t = false)]
    series: bool,

    /// Fail when a run stops on the safety bound instead of the ground
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Suppress the summary table
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let preset = resolve_preset(&cli)?;
    let model = cli.model.map(ModelKind::from).unwrap_or(preset.model_kind());
    let base = apply_overrides(preset.to_parameters(), &cli);

    let engine = TrajectoryEngine::new(EngineOptions {
        t_max: cli.t_max,
        samples: cli.samples,
        ..EngineOptions::default()
    });

    let angles = if cli.angles.is_empty() {
        vec![base.angle_deg]
    } else {
        cli.angles.clone()
    };

    let mut history = RunHistory::new();
    for angle_deg in angles {
        let params = SimulationParameters { angle_deg, ..base };
        let run = engine
            .compute(&params, model)
            .with_context(|| format!("{model} trajectory at {angle_deg}° failed"))?;
        let entry = history.record(run);
        if let Outcome::SafetyBound { t_bound } = entry.run.outcome {
            eprintln!(
                "warning: throw #{} stopped by the safety bound at t = {:.2} s without reaching the ground",
                entry.index, t_bound
            );
        }
    }

    if !cli.quiet {
        print_summary(&preset, model, &history);
    }

    let latest = history
        .latest()
        .ok_or_else(|| anyhow!("no trajectory was computed"))?;

    if cli.series {
        print_series(latest);
    }

    if let Some(path) = &cli.csv {
        let writer = writer_for_path(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        write_trajectory_csv(writer, &latest.run)?;
        if !cli.quiet && path.as_os_str() != "-" {
            println!("Trajectory CSV : {}", path.display());
        }
    }

    if let Some(path) = &cli.json {
        let writer = writer_for_path(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        write_run_json(writer, &latest.run, &latest.label())?;
        if !cli.quiet && path.as_os_str() != "-" {
            println!("Run JSON       : {}", path.display());
        }
    }

    let degenerate = history.iter().filter(|e| e.run.is_degenerate()).count();
    if cli.strict && degenerate > 0 {
        return Err(anyhow!(
            "{degenerate} of {} throws never reached the ground",
            history.len()
        ));
    }

    Ok(())
}

fn resolve_preset(cli: &Cli) -> anyhow::Result<LaunchPreset> {
    match &cli.preset {
        Some(name) => {
            let presets = load_presets(&cli.presets)
                .with_context(|| format!("loading presets from {}", cli.presets.display()))?;
            Ok(find_preset(&presets, name)?.clone())
        }
        None => Ok(builtin_preset(
            cli.model
                .map(ModelKind::from)
                .unwrap_or(ModelKind::LinearClosedForm),
        )),
    }
}

fn apply_overrides(mut params: SimulationParameters, cli: &Cli) -> SimulationParameters {
    if let Some(v0) = cli.v0 {
        params.v0_m_s = v0;
    }
    if let Some(drag) = cli.drag {
        params.drag_coefficient = drag;
    }
    if let Some(mass) = cli.mass {
        params.mass_kg = mass;
    }
    if let Some(gravity) = cli.gravity {
        params.gravity_m_s2 = gravity;
    }
    if let Some(dt) = cli.dt {
        params.dt_s = dt;
    }
    if let Some(speed_factor) = cli.speed_factor {
        params.speed_factor = speed_factor;
    }
    params
}

fn print_summary(preset: &LaunchPreset, model: ModelKind, history: &RunHistory) {
    println!("=== Projectile Throws ({}, base preset {}) ===", model, preset.name);
    println!(
        "{:>3}  {:>8}  {:>8}  {:>6}  {:>10}  {:>10}  {:>9}  {:>11}  status",
        "#", "time", "v0[m/s]", "θ[°]", "range[m]", "h_max[m]", "t[s]", "v_end[m/s]"
    );
    for entry in history {
        let m = &entry.run.metrics;
        let status = if entry.run.is_degenerate() {
            "degenerate"
        } else {
            "impact"
        };
        println!(
            "{:>3}  {:>8}  {:>8.2}  {:>6.2}  {:>10.2}  {:>10.2}  {:>9.2}  {:>11.2}  {}",
            entry.index,
            entry.timestamp(),
            entry.run.parameters.v0_m_s,
            entry.run.parameters.angle_deg,
            m.range_m,
            m.max_height_m,
            m.flight_time_s,
            m.final_speed_m_s,
            status
        );
    }
}

fn print_series(entry: &HistoryEntry) {
    println!("--- Series for {} ---", entry.label());
    println!("t_s,speed_m_s,acceleration_m_s2");
    for point in entry.run.series().points() {
        println!(
            "{:.4},{:.6},{:.6}",
            point.t, point.speed_m_s, point.acceleration_m_s2
        );
    }
}
