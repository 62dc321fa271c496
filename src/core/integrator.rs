use nalgebra::Vector2;

use crate::core::forces::ForceModel;
use crate::core::params::{LaunchAngle, SimulationParameters};
use crate::core::trajectory::{EnergySeries, Trajectory};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallState {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepResult {
    pub state: BallState,
    /// Ground-spring energy of the state the step started from.
    pub contact_energy: f64,
}

/// Fixed-step Euler-Cromer integrator for a single ball.
#[derive(Clone, Copy, Debug)]
pub struct Integrator {
    params: SimulationParameters,
    forces: ForceModel,
}

impl Integrator {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            params: *params,
            forces: ForceModel::new(params),
        }
    }

    pub fn initial_state(&self, angle: LaunchAngle) -> BallState {
        let speed = self.params.speed();
        BallState {
            position: Vector2::new(0.0, self.params.height()),
            velocity: Vector2::new(speed * angle.radians.cos(), speed * angle.radians.sin()),
        }
    }

    /// Velocity first, then position from the updated velocity.
    pub fn step(&self, state: &BallState) -> StepResult {
        let dt = self.params.time_step();
        let sample = self.forces.evaluate(&state.position, &state.velocity);
        let velocity = state.velocity + sample.acceleration * dt;
        let position = state.position + velocity * dt;
        StepResult {
            state: BallState { position, velocity },
            contact_energy: sample.contact_energy,
        }
    }

    pub fn kinetic_energy(&self, velocity: &Vector2<f64>) -> f64 {
        0.5 * self.params.mass() * velocity.norm().powi(2)
    }

    pub fn potential_energy(&self, position: &Vector2<f64>) -> f64 {
        self.params.mass() * self.params.gravity() * position.y
    }

    /// Integrates `step_count()` samples for one launch angle.
    ///
    /// The contact energy of step `i` is written at index `i`, while kinetic
    /// and potential energy land at `i + 1`. The last contact sample is
    /// therefore always zero.
    pub fn run(&self, angle: LaunchAngle) -> Trajectory {
        let n_steps = self.params.step_count();
        let mass = self.params.mass();

        let mut positions = Vec::with_capacity(n_steps);
        let mut velocities = Vec::with_capacity(n_steps);
        let mut kinetic = Vec::with_capacity(n_steps);
        let mut potential = Vec::with_capacity(n_steps);
        let mut contact = vec![0.0; n_steps];

        let mut state = self.initial_state(angle);
        positions.push(state.position);
        velocities.push(state.velocity);
        kinetic.push(0.5 * mass * self.params.speed().powi(2));
        potential.push(mass * self.params.gravity() * self.params.height());

        for slot in contact.iter_mut().take(n_steps.saturating_sub(1)) {
            let result = self.step(&state);
            *slot = result.contact_energy;
            state = result.state;

            positions.push(state.position);
            velocities.push(state.velocity);
            kinetic.push(self.kinetic_energy(&state.velocity));
            potential.push(self.potential_energy(&state.position));
        }

        Trajectory::new(
            angle,
            positions,
            velocities,
            EnergySeries {
                kinetic,
                potential,
                contact,
            },
        )
    }
}
