use clap::Args;

use crate::core::{BallConfig, Result, SimulationParameters};

/// Physical inputs shared by every binary.
#[derive(Args, Clone, Copy, Debug)]
pub struct PhysicsArgs {
    /// Mass of the ball (kg)
    #[arg(short = 'm', long = "mass", default_value_t = 0.2)]
    pub mass: f64,

    /// Radius of the ball (m)
    #[arg(short = 'R', long = "radius", default_value_t = 0.1)]
    pub radius: f64,

    /// Initial height (m)
    #[arg(long = "height", default_value_t = 2.0)]
    pub height: f64,

    /// Initial speed (m/s)
    #[arg(long = "v0", default_value_t = 10.0)]
    pub v0: f64,

    /// Simulated time (s)
    #[arg(short = 't', long = "time", default_value_t = 20.0)]
    pub total_time: f64,

    /// Euler-Cromer time step (s)
    #[arg(long = "dt", default_value_t = 0.001)]
    pub dt: f64,

    /// Terminal velocity of the ball (m/s); `inf` disables drag
    #[arg(long = "v-term", default_value_t = 10.0)]
    pub v_term: f64,

    /// Ground spring stiffness (N/m)
    #[arg(short = 'k', long = "stiffness", default_value_t = 1000.0)]
    pub stiffness: f64,
}

impl PhysicsArgs {
    pub fn to_config(&self) -> BallConfig {
        BallConfig {
            mass_kg: self.mass,
            radius_m: self.radius,
            height_m: self.height,
            speed_mps: self.v0,
            total_time_s: self.total_time,
            time_step_s: self.dt,
            terminal_velocity_mps: self.v_term,
            stiffness_npm: self.stiffness,
        }
    }

    pub fn to_parameters(&self) -> Result<SimulationParameters> {
        self.to_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        physics: PhysicsArgs,
    }

    #[test]
    fn defaults_match_ball_config_defaults() {
        let cli = TestCli::try_parse_from(["bouncing_ball"]).expect("defaults parse");
        assert_eq!(cli.physics.to_config(), BallConfig::default());
    }

    #[test]
    fn parses_named_options() {
        let cli = TestCli::try_parse_from([
            "bouncing_ball",
            "-m",
            "0.5",
            "-R",
            "0.2",
            "--height",
            "3",
            "--v0",
            "7.5",
            "-t",
            "5",
            "--dt",
            "0.002",
            "--v-term",
            "inf",
            "-k",
            "2000",
        ])
        .expect("options parse");
        let params = cli.physics.to_parameters().expect("valid");

        assert_eq!(params.mass(), 0.5);
        assert_eq!(params.radius(), 0.2);
        assert_eq!(params.height(), 3.0);
        assert_eq!(params.speed(), 7.5);
        assert_eq!(params.step_count(), 2500);
        assert_eq!(params.drag_coefficient(), 0.0);
        assert_eq!(params.stiffness(), 2000.0);
    }

    #[test]
    fn invalid_values_surface_at_validation() {
        let cli = TestCli::try_parse_from(["bouncing_ball", "--mass=-1"])
            .expect("negative numbers still parse");
        assert!(cli.physics.to_parameters().is_err());
    }
}
