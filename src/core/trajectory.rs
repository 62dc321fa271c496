use std::sync::OnceLock;

use nalgebra::Vector2;
use rayon::prelude::*;

use crate::core::error::{Result, SimulationError};
use crate::core::integrator::Integrator;
use crate::core::params::{ANGLE_COUNT, LaunchAngle, SimulationParameters, launch_angles};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergySample {
    pub kinetic: f64,
    pub potential: f64,
    pub contact: f64,
}

impl EnergySample {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential + self.contact
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct EnergySeries {
    pub(crate) kinetic: Vec<f64>,
    pub(crate) potential: Vec<f64>,
    pub(crate) contact: Vec<f64>,
}

/// Recorded states and energies of one launch, indexed by step.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    angle: LaunchAngle,
    positions: Vec<Vector2<f64>>,
    velocities: Vec<Vector2<f64>>,
    energy: EnergySeries,
}

impl Trajectory {
    pub(crate) fn new(
        angle: LaunchAngle,
        positions: Vec<Vector2<f64>>,
        velocities: Vec<Vector2<f64>>,
        energy: EnergySeries,
    ) -> Self {
        Self {
            angle,
            positions,
            velocities,
            energy,
        }
    }

    pub fn angle(&self) -> LaunchAngle {
        self.angle
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector2<f64>] {
        &self.velocities
    }

    pub fn kinetic(&self) -> &[f64] {
        &self.energy.kinetic
    }

    pub fn potential(&self) -> &[f64] {
        &self.energy.potential
    }

    pub fn contact(&self) -> &[f64] {
        &self.energy.contact
    }

    pub fn energy(&self, step: usize) -> Option<EnergySample> {
        Some(EnergySample {
            kinetic: *self.energy.kinetic.get(step)?,
            potential: *self.energy.potential.get(step)?,
            contact: *self.energy.contact.get(step)?,
        })
    }

    /// Ek + Ep + Es per step.
    pub fn total_energy(&self) -> Vec<f64> {
        self.energy
            .kinetic
            .iter()
            .zip(&self.energy.potential)
            .zip(&self.energy.contact)
            .map(|((ek, ep), es)| ek + ep + es)
            .collect()
    }

    pub fn max_height(&self) -> f64 {
        self.positions
            .iter()
            .fold(f64::NEG_INFINITY, |acc, r| acc.max(r.y))
    }

    pub fn final_position(&self) -> Option<Vector2<f64>> {
        self.positions.last().copied()
    }

    /// False once the explicit integration has blown up to NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(&self.velocities)
            .all(|v| v.x.is_finite() && v.y.is_finite())
    }
}

struct Computed {
    time: Vec<f64>,
    trajectories: Vec<Trajectory>,
}

/// One trajectory per launch angle, computed at most once.
///
/// Construction is cheap; the integration runs on the first call to
/// [`TrajectorySet::ensure_computed`] or any accessor. Once computed the set
/// is immutable and can be shared across threads behind an `Arc`.
pub struct TrajectorySet {
    params: SimulationParameters,
    angles: [LaunchAngle; ANGLE_COUNT],
    computed: OnceLock<Computed>,
}

impl TrajectorySet {
    pub fn new(params: SimulationParameters) -> Self {
        Self {
            params,
            angles: launch_angles(),
            computed: OnceLock::new(),
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn angles(&self) -> &[LaunchAngle; ANGLE_COUNT] {
        &self.angles
    }

    pub fn is_computed(&self) -> bool {
        self.computed.get().is_some()
    }

    pub fn ensure_computed(&self) -> &[Trajectory] {
        &self.computed().trajectories
    }

    fn computed(&self) -> &Computed {
        self.computed.get_or_init(|| self.compute())
    }

    fn compute(&self) -> Computed {
        let integrator = Integrator::new(&self.params);
        let trajectories: Vec<Trajectory> = self
            .angles
            .as_slice()
            .par_iter()
            .map(|angle| {
                let trajectory = integrator.run(*angle);
                log::info!(
                    "trajectory #{} ({}) computed: {} steps",
                    angle.index,
                    angle.label(),
                    trajectory.len()
                );
                if !trajectory.is_finite() {
                    log::warn!(
                        "trajectory #{} diverged to non-finite values; reduce dt relative to k and m",
                        angle.index
                    );
                }
                trajectory
            })
            .collect();

        let dt = self.params.time_step();
        let time = (0..self.params.step_count())
            .map(|i| i as f64 * dt)
            .collect();
        log::info!("all {} trajectories computed", trajectories.len());

        Computed { time, trajectories }
    }

    pub fn step_count(&self) -> usize {
        self.params.step_count()
    }

    /// Shared by every angle: t_i = i * dt.
    pub fn time_axis(&self) -> &[f64] {
        &self.computed().time
    }

    pub fn trajectory(&self, index: usize) -> Result<&Trajectory> {
        self.ensure_computed()
            .get(index)
            .ok_or(SimulationError::UnknownAngle {
                index,
                count: ANGLE_COUNT,
            })
    }

    pub fn positions(&self, index: usize) -> Result<&[Vector2<f64>]> {
        Ok(self.trajectory(index)?.positions())
    }

    pub fn velocities(&self, index: usize) -> Result<&[Vector2<f64>]> {
        Ok(self.trajectory(index)?.velocities())
    }

    pub fn kinetic(&self, index: usize) -> Result<&[f64]> {
        Ok(self.trajectory(index)?.kinetic())
    }

    pub fn potential(&self, index: usize) -> Result<&[f64]> {
        Ok(self.trajectory(index)?.potential())
    }

    pub fn contact(&self, index: usize) -> Result<&[f64]> {
        Ok(self.trajectory(index)?.contact())
    }

    pub fn total_energy(&self, index: usize) -> Result<Vec<f64>> {
        Ok(self.trajectory(index)?.total_energy())
    }

    pub fn all_total_energy(&self) -> Vec<Vec<f64>> {
        self.ensure_computed()
            .iter()
            .map(Trajectory::total_energy)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::BallConfig;

    fn small_set() -> TrajectorySet {
        let params = BallConfig {
            total_time_s: 3.0,
            ..BallConfig::default()
        }
        .validate()
        .expect("valid");
        TrajectorySet::new(params)
    }

    #[test]
    fn construction_defers_integration() {
        let set = small_set();
        assert!(!set.is_computed());

        set.ensure_computed();
        assert!(set.is_computed());
    }

    #[test]
    fn repeated_computation_is_a_no_op() {
        let set = small_set();
        let first = set.ensure_computed().as_ptr();
        let snapshot = set.ensure_computed().to_vec();
        let second = set.ensure_computed().as_ptr();

        assert_eq!(first, second);
        assert_eq!(set.ensure_computed(), snapshot.as_slice());
    }

    #[test]
    fn computes_one_trajectory_per_angle_in_order() {
        let set = small_set();
        let trajectories = set.ensure_computed();

        assert_eq!(trajectories.len(), ANGLE_COUNT);
        for (index, trajectory) in trajectories.iter().enumerate() {
            assert_eq!(trajectory.angle().index, index);
            assert_eq!(trajectory.len(), 3000);
        }
    }

    #[test]
    fn parallel_result_matches_direct_integration() {
        let set = small_set();
        let integrator = Integrator::new(set.params());

        for angle in launch_angles() {
            let direct = integrator.run(angle);
            assert_eq!(set.trajectory(angle.index).expect("valid index"), &direct);
        }
    }

    #[test]
    fn time_axis_is_shared_and_uses_the_step() {
        let set = small_set();
        let time = set.time_axis();

        assert_eq!(time.len(), set.step_count());
        assert_eq!(time[0], 0.0);
        assert!((time[1500] - 1.5).abs() < 1e-12);
        for index in 0..ANGLE_COUNT {
            assert_eq!(set.positions(index).expect("valid").len(), time.len());
        }
    }

    #[test]
    fn total_energy_sums_all_components() {
        let set = small_set();
        let totals = set.total_energy(4).expect("valid");
        let trajectory = set.trajectory(4).expect("valid");

        for (step, total) in totals.iter().enumerate() {
            let sample = trajectory.energy(step).expect("in range");
            assert_eq!(*total, sample.total());
        }
        assert_eq!(set.all_total_energy().len(), ANGLE_COUNT);
    }

    #[test]
    fn rejects_unknown_angle_index() {
        let set = small_set();
        let err = set.kinetic(ANGLE_COUNT).expect_err("out of range");

        assert_eq!(
            err,
            SimulationError::UnknownAngle {
                index: ANGLE_COUNT,
                count: ANGLE_COUNT
            }
        );
    }

    #[test]
    fn stiff_spring_with_coarse_step_is_reported_as_diverged() {
        let params = BallConfig {
            stiffness_npm: 1.0e9,
            time_step_s: 0.01,
            total_time_s: 20.0,
            ..BallConfig::default()
        }
        .validate()
        .expect("unstable settings are still accepted");
        let set = TrajectorySet::new(params);

        assert!(set.ensure_computed().iter().any(|t| !t.is_finite()));
    }
}
