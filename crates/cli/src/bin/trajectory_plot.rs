use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use plotters::coord::Shift;
use plotters::prelude::*;
use projectile_calculator::export::{SampleRow, read_trajectory_csv};
use projectile_calculator::trajectory::TrajectorySeries;
use projectile_calculator::{Trajectory, TrajectorySample};
use std::fs::{self, File};
use std::ops::Range;
use std::path::{Path, PathBuf};

const PALETTE: [RGBColor; 6] = [
    RED,
    BLUE,
    GREEN,
    RGBColor(255, 165, 0),
    RGBColor(128, 0, 128),
    RGBColor(165, 42, 42),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    /// Height against horizontal distance
    Path,
    /// Speed against time
    Speed,
    /// Acceleration magnitude against time
    Acceleration,
}

impl ChartKind {
    fn caption(self) -> &'static str {
        match self {
            ChartKind::Path => "Projectile trajectories",
            ChartKind::Speed => "Speed over time",
            ChartKind::Acceleration => "Acceleration over time",
        }
    }

    fn axes(self) -> (&'static str, &'static str) {
        match self {
            ChartKind::Path => ("Distance [m]", "Height [m]"),
            ChartKind::Speed => ("Time [s]", "Speed [m/s]"),
            ChartKind::Acceleration => ("Time [s]", "Acceleration [m/s²]"),
        }
    }
}

/// Render trajectory CSV files (from `trajectory --csv`) as PNG or SVG charts.
#[derive(Parser, Debug)]
#[command(author, version, about = "Plot projectile trajectories from CSV")]
struct Cli {
    /// Trajectory CSV file; repeat to overlay several throws
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,
    /// Output image; `.svg` selects the SVG backend, anything else PNG
    #[arg(long, default_value = "artifacts/trajectory.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = ChartKind::Path)]
    chart: ChartKind,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 700)]
    height: u32,
}

#[derive(Debug)]
struct PlotSeries {
    name: String,
    points: Vec<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut series = Vec::with_capacity(cli.inputs.len());
    for (index, input) in cli.inputs.iter().enumerate() {
        let trajectory = read_trajectory(input)?;
        let name = input
            .file_stem()
            .map(|stem| format!("#{}: {}", index + 1, stem.to_string_lossy()))
            .unwrap_or_else(|| format!("#{}", index + 1));
        series.push(PlotSeries {
            name,
            points: chart_points(&trajectory, cli.chart),
        });
    }

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let size = (cli.width, cli.height);
    let is_svg = cli
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        render(
            SVGBackend::new(&cli.output, size).into_drawing_area(),
            cli.chart,
            &series,
        )?;
    } else {
        render(
            BitMapBackend::new(&cli.output, size).into_drawing_area(),
            cli.chart,
            &series,
        )?;
    }

    println!("Chart written to {}", cli.output.display());
    Ok(())
}

fn read_trajectory(path: &Path) -> anyhow::Result<Trajectory> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let rows = read_trajectory_csv(file)
        .with_context(|| format!("cannot parse trajectory CSV {}", path.display()))?;
    Trajectory::from_samples(rows.iter().map(to_sample).collect())
        .ok_or_else(|| anyhow!("{} contains no samples", path.display()))
}

fn to_sample(row: &SampleRow) -> TrajectorySample {
    let velocity = match (row.vx_m_s, row.vy_m_s) {
        (Some(vx), Some(vy)) => Some([vx, vy]),
        _ => None,
    };
    TrajectorySample {
        t: row.t_s,
        x: row.x_m,
        y: row.y_m,
        velocity,
    }
}

fn chart_points(trajectory: &Trajectory, chart: ChartKind) -> Vec<(f64, f64)> {
    let series = TrajectorySeries::new(trajectory);
    match chart {
        ChartKind::Path => trajectory.iter().map(|s| (s.x, s.y)).collect(),
        ChartKind::Speed => series.times().into_iter().zip(series.speed()).collect(),
        ChartKind::Acceleration => series
            .times()
            .into_iter()
            .zip(series.acceleration_magnitude())
            .collect(),
    }
}

fn bounds(series: &[PlotSeries]) -> anyhow::Result<(Range<f64>, Range<f64>)> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for &(px, py) in series.iter().flat_map(|s| s.points.iter()) {
        if px.is_finite() && py.is_finite() {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
    }
    if !(x.0.is_finite() && y.0.is_finite()) {
        return Err(anyhow!("no finite points to plot"));
    }
    Ok((padded(x), padded(y)))
}

fn padded((lo, hi): (f64, f64)) -> Range<f64> {
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        (lo - 1.0)..(hi + 1.0)
    } else {
        (lo - 0.05 * span)..(hi + 0.05 * span)
    }
}

fn render<DB>(
    root: DrawingArea<DB, Shift>,
    kind: ChartKind,
    series: &[PlotSeries],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (x_range, y_range) = bounds(series)?;
    let (x_desc, y_desc) = kind.axes();

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(kind.caption(), caption_font)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .draw()?;

    for (index, s) in series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
            .label(s.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(label_font)
        .draw()?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
