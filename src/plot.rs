use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::core::window::series_range;
use crate::core::{LaunchAngle, SimulationError, Trajectory, TrajectorySet};

pub const SINGLETON_SIZE: (u32, u32) = (1280, 960);
pub const COMPARISON_SIZE: (u32, u32) = (1280, 720);

/// One colour per launch angle index, shared with playback.
pub const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(0, 0, 255),
    RGBColor(255, 128, 0),
    RGBColor(0, 200, 0),
    RGBColor(255, 0, 0),
    RGBColor(128, 0, 128),
    RGBColor(0, 160, 160),
];

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("could not prepare output: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not render chart: {0}")]
    Render(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

fn render_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

pub fn series_color(angle: LaunchAngle) -> RGBColor {
    SERIES_COLORS[angle.index % SERIES_COLORS.len()]
}

pub fn file_stamp(stamp: NaiveDateTime) -> String {
    stamp.format("%Y%m%d-%H%M%S").to_string()
}

pub fn singleton_file_name(stamp: NaiveDateTime, angle: LaunchAngle) -> String {
    format!("{}-singleton-{:.0}deg.png", file_stamp(stamp), angle.degrees())
}

pub fn comparison_file_name(stamp: NaiveDateTime) -> String {
    format!("{}-comparison.png", file_stamp(stamp))
}

/// x(t), y(t) and the energy budget of one launch, above its path.
pub fn render_singleton(set: &TrajectorySet, index: usize, path: &Path) -> Result<(), PlotError> {
    let trajectory = set.trajectory(index)?;
    let root = BitMapBackend::new(path, SINGLETON_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (upper, lower) = root.split_vertically((SINGLETON_SIZE.1 / 2) as i32);
    let panels = upper.split_evenly((1, 2));
    draw_position_over_time(&panels[0], set.time_axis(), trajectory)?;
    draw_energy_over_distance(&panels[1], trajectory)?;
    draw_paths(&lower, std::slice::from_ref(trajectory))?;

    root.present().map_err(render_err)?;
    log::info!(
        "singleton chart for {} written to {}",
        trajectory.angle().label(),
        path.display()
    );
    Ok(())
}

/// Every launch angle's path on one chart.
pub fn render_comparison(set: &TrajectorySet, path: &Path) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path, COMPARISON_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    draw_paths(&root, set.ensure_computed())?;
    root.present().map_err(render_err)?;
    log::info!("comparison chart written to {}", path.display());
    Ok(())
}

pub fn render_all(
    set: &TrajectorySet,
    index: usize,
    dir: &Path,
    stamp: NaiveDateTime,
) -> Result<Vec<PathBuf>, PlotError> {
    let angle = set.trajectory(index)?.angle();
    fs::create_dir_all(dir)?;

    let singleton = dir.join(singleton_file_name(stamp, angle));
    render_singleton(set, index, &singleton)?;
    let comparison = dir.join(comparison_file_name(stamp));
    render_comparison(set, &comparison)?;

    Ok(vec![singleton, comparison])
}

fn draw_position_over_time<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    time: &[f64],
    trajectory: &Trajectory,
) -> Result<(), PlotError> {
    let positions = trajectory.positions();
    let (t_lo, t_hi) = series_range(time.iter().copied());
    let (v_lo, v_hi) = series_range(positions.iter().flat_map(|r| [r.x, r.y]));

    let mut chart = ChartBuilder::on(area)
        .caption("r / t", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(t_lo..t_hi, v_lo..v_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("t [s]")
        .y_desc("x, y [m]")
        .draw()
        .map_err(render_err)?;

    for (label, color, component) in [("x", RED, 0usize), ("y", GREEN, 1usize)] {
        chart
            .draw_series(LineSeries::new(
                time.iter().zip(positions).map(move |(&t, r)| (t, r[component])),
                color.stroke_width(1),
            ))
            .map_err(render_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_energy_over_distance<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    trajectory: &Trajectory,
) -> Result<(), PlotError> {
    let xs: Vec<f64> = trajectory.positions().iter().map(|r| r.x).collect();
    let total = trajectory.total_energy();
    let series: [(&str, &[f64], RGBColor, u32); 4] = [
        ("Ek", trajectory.kinetic(), RED, 1),
        ("Ep", trajectory.potential(), GREEN, 1),
        ("Es", trajectory.contact(), BLUE, 1),
        ("E_sum", &total, BLACK, 2),
    ];

    let (x_lo, x_hi) = series_range(xs.iter().copied());
    let (e_lo, e_hi) = series_range(
        series
            .iter()
            .flat_map(|(_, values, _, _)| values.iter().copied()),
    );

    let mut chart = ChartBuilder::on(area)
        .caption("E / x", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(x_lo..x_hi, e_lo..e_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("x [m]")
        .y_desc("E [J]")
        .draw()
        .map_err(render_err)?;

    for (label, values, color, width) in series {
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(values.iter().copied()),
                color.stroke_width(width),
            ))
            .map_err(render_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_paths<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    trajectories: &[Trajectory],
) -> Result<(), PlotError> {
    let points = || trajectories.iter().flat_map(|t| t.positions().iter());
    let (x_lo, x_hi) = series_range(points().map(|r| r.x));
    let (y_lo, y_hi) = series_range(points().map(|r| r.y));

    let mut chart = ChartBuilder::on(area)
        .caption("r (x, y)", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("x [m]")
        .y_desc("y [m]")
        .draw()
        .map_err(render_err)?;

    for trajectory in trajectories {
        let color = series_color(trajectory.angle());
        chart
            .draw_series(LineSeries::new(
                trajectory.positions().iter().map(|r| (r.x, r.y)),
                color.stroke_width(1),
            ))
            .map_err(render_err)?
            .label(trajectory.angle().label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::{BallConfig, launch_angles};

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .expect("valid date")
            .and_hms_opt(9, 3, 7)
            .expect("valid time")
    }

    #[test]
    fn file_names_carry_timestamp_and_angle() {
        let angles = launch_angles();

        assert_eq!(file_stamp(stamp()), "20240501-090307");
        assert_eq!(
            singleton_file_name(stamp(), angles[3]),
            "20240501-090307-singleton-60deg.png"
        );
        assert_eq!(comparison_file_name(stamp()), "20240501-090307-comparison.png");
    }

    #[test]
    fn every_angle_gets_a_distinct_color() {
        let colors: Vec<(u8, u8, u8)> = launch_angles()
            .into_iter()
            .map(|angle| series_color(angle).rgb())
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_index_fails_before_touching_disk() {
        let params = BallConfig {
            total_time_s: 0.5,
            ..BallConfig::default()
        }
        .validate()
        .expect("valid");
        let set = TrajectorySet::new(params);
        let dir = std::env::temp_dir().join("bouncing_ball_plot_should_not_exist");

        let err = render_all(&set, 9, &dir, stamp()).expect_err("index 9 is unknown");
        assert!(matches!(err, PlotError::Simulation(_)));
        assert!(!dir.exists());
    }
}
