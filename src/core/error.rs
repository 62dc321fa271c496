use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("launch angle index {index} is out of range (expected 0..{count})")]
    UnknownAngle { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
