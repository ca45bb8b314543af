//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write artifact: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod samples {
    use std::io::{Read, Write};

    use projectile_core::TrajectorySample;
    use projectile_trajectory::TrajectoryRun;
    use serde::{Deserialize, Serialize};

    use crate::ExportError;

    /// Column order of trajectory CSV files.
    pub const HEADER: [&str; 6] = ["t_s", "x_m", "y_m", "vx_m_s", "vy_m_s", "speed_m_s"];

    /// One CSV row; velocity columns are empty when the model does not track velocity.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct SampleRow {
        pub t_s: f64,
        pub x_m: f64,
        pub y_m: f64,
        pub vx_m_s: Option<f64>,
        pub vy_m_s: Option<f64>,
        pub speed_m_s: Option<f64>,
    }

    impl From<&TrajectorySample> for SampleRow {
        fn from(sample: &TrajectorySample) -> Self {
            Self {
                t_s: sample.t,
                x_m: sample.x,
                y_m: sample.y,
                vx_m_s: sample.velocity.map(|v| v[0]),
                vy_m_s: sample.velocity.map(|v| v[1]),
                speed_m_s: sample.speed(),
            }
        }
    }

    /// Write every sample of `run` with a header row.
    pub fn write_trajectory_csv<W: Write>(writer: W, run: &TrajectoryRun) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for sample in &run.trajectory {
            csv_writer.serialize(SampleRow::from(sample))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Parse a trajectory CSV produced by [`write_trajectory_csv`].
    pub fn read_trajectory_csv<R: Read>(reader: R) -> Result<Vec<SampleRow>, ExportError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let rows = csv_reader
            .deserialize()
            .collect::<Result<Vec<SampleRow>, csv::Error>>()?;
        Ok(rows)
    }
}

pub mod run {
    use std::io::Write;

    use projectile_core::{ModelKind, SimulationParameters, Trajectory};
    use projectile_trajectory::{Outcome, TrajectoryMetrics, TrajectoryRun};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    #[derive(Serialize)]
    struct RunEnvelope<'a> {
        label: &'a str,
        model: ModelKind,
        degenerate: bool,
        outcome: &'a Outcome,
        parameters: &'a SimulationParameters,
        metrics: &'a TrajectoryMetrics,
        sample_count: usize,
        samples: &'a Trajectory,
    }

    /// Pretty JSON document describing one run.
    pub fn write_run_json<W: Write>(
        mut writer: W,
        run: &TrajectoryRun,
        label: &str,
    ) -> Result<(), ExportError> {
        let envelope = RunEnvelope {
            label,
            model: run.model,
            degenerate: run.is_degenerate(),
            outcome: &run.outcome,
            parameters: &run.parameters,
            metrics: &run.metrics,
            sample_count: run.trajectory.len(),
            samples: &run.trajectory,
        };
        to_writer_pretty(&mut writer, &envelope)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub use run::write_run_json;
pub use samples::{HEADER, SampleRow, read_trajectory_csv, write_trajectory_csv};
