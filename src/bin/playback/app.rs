use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bouncing_ball::cli::PhysicsArgs;
use bouncing_ball::core::{SimulationError, TrajectorySet};
use bouncing_ball::playback::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CancellationToken, MAX_FRAMES_PER_SECOND, Playback,
};
use bouncing_ball::plot::{self, PlotError};
use clap::Parser;
use macroquad::prelude::*;

use crate::constants::{BACKGROUND, MSAA_SAMPLES, WINDOW_TITLE};
use crate::render::{angle_color, draw_legend, draw_trail};

/// Real-time playback of the recorded bouncing-ball trajectories.
#[derive(Parser, Debug)]
#[command(name = "playback", version)]
struct Cli {
    #[command(flatten)]
    physics: PhysicsArgs,

    /// Comma-separated launch angle indices to animate (0 = 15 deg ... 5 = 90 deg)
    #[arg(long, value_delimiter = ',', default_values_t = [0usize, 1, 2, 3, 4])]
    indices: Vec<usize>,

    /// Also write the static charts on a background thread
    #[arg(long)]
    plots: bool,

    /// Angle index for the detailed chart
    #[arg(long, default_value_t = 3)]
    index: usize,

    /// Directory the PNG charts are written to
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,
}

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_string(),
        window_width: CANVAS_WIDTH as i32,
        window_height: CANVAS_HEIGHT as i32,
        window_resizable: false,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

type PlotWorker = JoinHandle<Result<Vec<PathBuf>, PlotError>>;

fn spawn_plot_worker(set: Arc<TrajectorySet>, index: usize, out_dir: PathBuf) -> PlotWorker {
    thread::spawn(move || {
        let stamp = chrono::Local::now().naive_local();
        plot::render_all(&set, index, &out_dir, stamp)
    })
}

fn finish_plot_worker(worker: PlotWorker) {
    match worker.join() {
        Ok(Ok(paths)) => {
            for path in paths {
                log::info!("wrote {}", path.display());
            }
        }
        Ok(Err(err)) => log::error!("static charts failed: {err}"),
        Err(_) => log::error!("static chart worker panicked"),
    }
}

fn cap_frame_rate(frame_start: f64) {
    let budget = 1.0 / MAX_FRAMES_PER_SECOND;
    let elapsed = get_time() - frame_start;
    if elapsed < budget {
        thread::sleep(Duration::from_secs_f64(budget - elapsed));
    }
}

/// Validates the inputs, computes every trajectory and sets up playback.
fn prepare(cli: &Cli, token: CancellationToken) -> Result<Playback, SimulationError> {
    let params = cli.physics.to_parameters()?;
    let set = Arc::new(TrajectorySet::new(params));
    // Readers only ever see a fully computed set.
    set.ensure_computed();
    Playback::new(set, &cli.indices, token)
}

pub(crate) async fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::try_parse().unwrap_or_else(|err| err.exit());

    let token = CancellationToken::new();
    let mut playback = match prepare(&cli, token.clone()) {
        Ok(playback) => playback,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let set = Arc::clone(playback.shared_set());

    let plot_worker = cli
        .plots
        .then(|| spawn_plot_worker(Arc::clone(&set), cli.index, cli.out_dir.clone()));

    prevent_quit();
    log::info!("playback started for angles {:?}", playback.indices());

    loop {
        let frame_start = get_time();
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            log::info!("user has stopped playback");
            token.cancel();
        }

        let Some(shown) = playback.next_frame() else {
            break;
        };

        clear_background(BACKGROUND);
        draw_legend(&playback, screen_width());
        let scale = playback.scale();
        for &index in playback.indices() {
            if let Ok(trajectory) = playback.set().trajectory(index) {
                draw_trail(trajectory.positions(), shown, scale, angle_color(index));
            }
        }

        cap_frame_rate(frame_start);
        next_frame().await;
    }

    if let Some(worker) = plot_worker {
        finish_plot_worker(worker);
    }
    log::info!("playback ended after {} complete pass(es)", playback.passes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("playback").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn invalid_physics_fails_before_playback() {
        let cli = parse(&["--dt=-0.01"]);
        let err = prepare(&cli, CancellationToken::new())
            .err()
            .expect("negative dt is rejected");

        assert!(matches!(
            err,
            SimulationError::InvalidParameter { name: "dt", .. }
        ));
    }

    #[test]
    fn unknown_angle_index_fails_before_playback() {
        let cli = parse(&["--time", "0.5", "--indices", "1,7"]);
        let err = prepare(&cli, CancellationToken::new())
            .err()
            .expect("index 7 is out of range");

        assert_eq!(err, SimulationError::UnknownAngle { index: 7, count: 6 });
    }

    #[test]
    fn default_selection_prepares_first_five_angles() {
        let cli = parse(&["--time", "0.5"]);
        let playback = prepare(&cli, CancellationToken::new()).expect("valid inputs");

        assert_eq!(playback.indices(), &[0, 1, 2, 3, 4]);
        assert!(playback.set().is_computed());
    }
}
