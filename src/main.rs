use std::path::PathBuf;
use std::process::ExitCode;

use bouncing_ball::cli::PhysicsArgs;
use bouncing_ball::core::TrajectorySet;
use bouncing_ball::plot::{self, PlotError};
use clap::Parser;

/// Bouncing ball with quadratic air drag and a spring-like floor.
#[derive(Parser, Debug)]
#[command(name = "bouncing_ball", version)]
struct Cli {
    #[command(flatten)]
    physics: PhysicsArgs,

    /// Launch angle index (0 = 15 deg ... 5 = 90 deg) for the detailed chart
    #[arg(long, default_value_t = 3)]
    index: usize,

    /// Directory the PNG charts are written to
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,
}

fn summarize(set: &TrajectorySet) {
    let params = set.params();
    log::info!(
        "m={} kg, R={} m, h={} m, v0={} m/s, dt={} s, steps={}, D={:.5} kg/m, k={} N/m",
        params.mass(),
        params.radius(),
        params.height(),
        params.speed(),
        params.time_step(),
        params.step_count(),
        params.drag_coefficient(),
        params.stiffness()
    );

    for trajectory in set.ensure_computed() {
        let totals = trajectory.total_energy();
        let first = totals.first().copied().unwrap_or_default();
        let last = totals.last().copied().unwrap_or_default();
        let range = trajectory.final_position().map_or(0.0, |r| r.x);
        println!(
            "{:>6}: range {:8.3} m | apex {:7.3} m | energy {:8.3} J -> {:8.3} J",
            trajectory.angle().label(),
            range,
            trajectory.max_height(),
            first,
            last
        );
    }
}

fn run(cli: &Cli) -> Result<(), PlotError> {
    let params = cli.physics.to_parameters()?;
    let set = TrajectorySet::new(params);
    summarize(&set);

    let stamp = chrono::Local::now().naive_local();
    let written = plot::render_all(&set, cli.index, &cli.out_dir, stamp)?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
