use thiserror::Error;

use crate::entity::EntityId;

/// Validation failures raised while constructing entities, pilots,
/// behaviors or a whole simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("max speed must be non-negative and finite, got {0}")]
    InvalidMaxSpeed(f32),

    #[error("max steering force must be non-negative and finite, got {0}")]
    InvalidSteeringForce(f32),

    #[error("slowing distance must be non-negative and finite, got {0}")]
    InvalidSlowingDistance(f32),

    #[error("a pilot needs at least one steering behavior")]
    EmptyBehaviors,

    #[error("invalid {name} range: min {min} is greater than max {max}")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("invalid {name} range: {min}..{max} is too wide to sample")]
    RangeTooWide {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("world bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("invalid wander parameters: distance {distance}, radius {radius}, jitter {jitter}")]
    InvalidWander {
        distance: f32,
        radius: f32,
        jitter: f32,
    },

    #[error("invalid avoidance parameters: look-ahead {look_ahead}, strength {strength}")]
    InvalidAvoidance { look_ahead: f32, strength: f32 },

    #[error("arrival epsilon must be non-negative and finite, got {0}")]
    InvalidEpsilon(f32),

    #[error("leader {0} does not name an entity in this simulation")]
    UnknownLeader(EntityId),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Accepts finite values `>= 0`.
pub(crate) fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Accepts finite values `> 0`.
pub(crate) fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
