use nalgebra::Vector2;

use crate::core::params::SimulationParameters;

/// Ground reaction while the ball overlaps the floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub normal: Vector2<f64>,
    pub stored_energy: f64,
}

impl Contact {
    fn none() -> Self {
        Self {
            normal: Vector2::zeros(),
            stored_energy: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSample {
    pub net: Vector2<f64>,
    pub acceleration: Vector2<f64>,
    pub contact_energy: f64,
}

/// Gravity, quadratic drag and a linear ground spring acting on a point mass.
#[derive(Clone, Copy, Debug)]
pub struct ForceModel {
    mass: f64,
    radius: f64,
    stiffness: f64,
    gravity: f64,
    drag_coefficient: f64,
}

impl ForceModel {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            mass: params.mass(),
            radius: params.radius(),
            stiffness: params.stiffness(),
            gravity: params.gravity(),
            drag_coefficient: params.drag_coefficient(),
        }
    }

    pub fn in_contact(&self, height: f64) -> bool {
        height < self.radius
    }

    /// Only the height is consulted: contact is a 1D overlap test against the floor.
    pub fn contact(&self, height: f64) -> Contact {
        if !self.in_contact(height) {
            return Contact::none();
        }
        let depth = self.radius - height;
        Contact {
            normal: Vector2::new(0.0, self.stiffness * depth),
            stored_energy: 0.5 * self.stiffness * depth.powi(2),
        }
    }

    pub fn drag(&self, velocity: &Vector2<f64>) -> Vector2<f64> {
        velocity * (-self.drag_coefficient * velocity.norm())
    }

    pub fn weight(&self) -> Vector2<f64> {
        Vector2::new(0.0, -self.mass * self.gravity)
    }

    pub fn evaluate(&self, position: &Vector2<f64>, velocity: &Vector2<f64>) -> ForceSample {
        let contact = self.contact(position.y);
        let net = contact.normal + self.drag(velocity) + self.weight();
        ForceSample {
            net,
            acceleration: net / self.mass,
            contact_energy: contact.stored_energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::BallConfig;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    fn default_model() -> ForceModel {
        ForceModel::new(&BallConfig::default().validate().expect("valid defaults"))
    }

    #[test]
    fn free_fall_at_rest_is_pure_gravity() {
        let sample = default_model().evaluate(&Vector2::new(0.0, 2.0), &Vector2::zeros());

        assert_close(sample.acceleration.x, 0.0, 0.0);
        assert_close(sample.acceleration.y, -9.81, 1e-12);
        assert_eq!(sample.contact_energy, 0.0);
    }

    #[test]
    fn drag_opposes_velocity_with_quadratic_magnitude() {
        let model = default_model();
        let velocity = Vector2::new(3.0, -4.0);
        let drag = model.drag(&velocity);

        // D = 0.01962, |v| = 5 -> |Fd| = D * 25
        assert_close(drag.norm(), 0.01962 * 25.0, 1e-12);
        assert!(drag.dot(&velocity) < 0.0);
        assert_close(drag.x / drag.y, velocity.x / velocity.y, 1e-12);
    }

    #[test]
    fn ground_spring_only_pushes_upward() {
        let model = default_model();
        for height in [0.099, 0.05, 0.0, -0.2, -5.0] {
            let contact = model.contact(height);
            assert!(contact.normal.y >= 0.0, "height={height}");
            assert_eq!(contact.normal.x, 0.0);
        }
    }

    #[test]
    fn contact_starts_strictly_below_radius() {
        let model = default_model();

        assert!(!model.in_contact(0.1));
        assert_eq!(model.contact(0.1).stored_energy, 0.0);
        assert!(model.in_contact(0.1 - 1e-9));
    }

    #[test]
    fn contact_energy_matches_spring_compression() {
        let contact = default_model().contact(0.06);

        assert_close(contact.normal.y, 1000.0 * 0.04, 1e-9);
        assert_close(contact.stored_energy, 0.5 * 1000.0 * 0.04 * 0.04, 1e-12);
    }
}
