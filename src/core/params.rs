use crate::core::error::{Result, SimulationError};

pub const EARTH_GRAVITY_MPS2: f64 = 9.81;

pub const ANGLE_COUNT: usize = 6;
const FIRST_ANGLE_DEG: f64 = 15.0;
const LAST_ANGLE_DEG: f64 = 90.0;

/// Euler-Cromer keeps the contact spring bounded only while dt * sqrt(k / m) < 2.
const STABLE_CONTACT_RATIO: f64 = 2.0;

/// Upper bound on samples per trajectory; every angle allocates this many.
pub const MAX_STEP_COUNT: usize = 5_000_000;

/// Raw launch inputs, before validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallConfig {
    pub mass_kg: f64,
    pub radius_m: f64,
    pub height_m: f64,
    pub speed_mps: f64,
    pub total_time_s: f64,
    pub time_step_s: f64,
    pub terminal_velocity_mps: f64,
    pub stiffness_npm: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            mass_kg: 0.2,
            radius_m: 0.1,
            height_m: 2.0,
            speed_mps: 10.0,
            total_time_s: 20.0,
            time_step_s: 0.001,
            terminal_velocity_mps: 10.0,
            stiffness_npm: 1000.0,
        }
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> SimulationError {
    SimulationError::InvalidParameter {
        name,
        value,
        reason,
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(name, value, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(invalid(name, value, "must be greater than zero"));
    }
    Ok(())
}

fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(name, value, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(invalid(name, value, "cannot be negative"));
    }
    Ok(())
}

impl BallConfig {
    pub fn validate(self) -> Result<SimulationParameters> {
        require_positive("mass", self.mass_kg)?;
        require_non_negative("radius", self.radius_m)?;
        if !self.height_m.is_finite() {
            return Err(invalid("height", self.height_m, "must be a finite number"));
        }
        require_non_negative("v0", self.speed_mps)?;
        require_positive("dt", self.time_step_s)?;
        require_positive("total_time", self.total_time_s)?;
        // +inf is allowed here: it switches drag off.
        if self.terminal_velocity_mps.is_nan() || self.terminal_velocity_mps <= 0.0 {
            return Err(invalid(
                "v_term",
                self.terminal_velocity_mps,
                "must be greater than zero",
            ));
        }
        require_non_negative("k", self.stiffness_npm)?;

        let params = SimulationParameters { config: self };
        if params.step_count() < 2 {
            return Err(invalid(
                "total_time",
                self.total_time_s,
                "must span at least two time steps",
            ));
        }
        if params.step_count() > MAX_STEP_COUNT {
            return Err(invalid(
                "total_time",
                self.total_time_s,
                "spans too many time steps for dt",
            ));
        }

        let ratio = params.contact_stiffness_ratio();
        if ratio >= STABLE_CONTACT_RATIO {
            log::warn!(
                "dt * sqrt(k / m) = {ratio:.3}; ground contact will likely diverge, reduce dt"
            );
        }

        Ok(params)
    }
}

/// Validated, immutable simulation inputs.
///
/// Only obtainable through [`BallConfig::validate`]. The drag coefficient is
/// derived on demand so it can never drift from mass, gravity and terminal
/// velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    config: BallConfig,
}

impl SimulationParameters {
    pub fn mass(&self) -> f64 {
        self.config.mass_kg
    }

    pub fn radius(&self) -> f64 {
        self.config.radius_m
    }

    pub fn height(&self) -> f64 {
        self.config.height_m
    }

    pub fn speed(&self) -> f64 {
        self.config.speed_mps
    }

    pub fn total_time(&self) -> f64 {
        self.config.total_time_s
    }

    pub fn time_step(&self) -> f64 {
        self.config.time_step_s
    }

    pub fn terminal_velocity(&self) -> f64 {
        self.config.terminal_velocity_mps
    }

    pub fn stiffness(&self) -> f64 {
        self.config.stiffness_npm
    }

    pub fn gravity(&self) -> f64 {
        EARTH_GRAVITY_MPS2
    }

    /// D = m * g / v_term^2; zero when the terminal velocity is infinite.
    pub fn drag_coefficient(&self) -> f64 {
        let v_term = self.terminal_velocity();
        self.mass() * self.gravity() / (v_term * v_term)
    }

    /// round(T / dt), halves to even.
    pub fn step_count(&self) -> usize {
        (self.total_time() / self.time_step()).round_ties_even() as usize
    }

    pub fn contact_stiffness_ratio(&self) -> f64 {
        self.time_step() * (self.stiffness() / self.mass()).sqrt()
    }

    pub fn config(&self) -> BallConfig {
        self.config
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchAngle {
    pub index: usize,
    pub radians: f64,
}

impl LaunchAngle {
    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn label(&self) -> String {
        format!("{:.0} deg", self.degrees())
    }
}

/// Six angles evenly spaced from 15 to 90 degrees inclusive.
pub fn launch_angles() -> [LaunchAngle; ANGLE_COUNT] {
    let spacing = (LAST_ANGLE_DEG - FIRST_ANGLE_DEG) / (ANGLE_COUNT - 1) as f64;
    std::array::from_fn(|index| LaunchAngle {
        index,
        radians: (FIRST_ANGLE_DEG + spacing * index as f64).to_radians(),
    })
}
