pub mod error;
pub mod forces;
pub mod integrator;
pub mod params;
pub mod trajectory;
pub mod window;

pub use error::{Result, SimulationError};
pub use params::{ANGLE_COUNT, BallConfig, LaunchAngle, SimulationParameters, launch_angles};
pub use trajectory::{EnergySample, Trajectory, TrajectorySet};
