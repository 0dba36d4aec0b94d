use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::behavior::{SteeringBehavior, SteeringContext};
use crate::entity::{Entity, EntityId};
use crate::error::{self, ConfigError, Result};
use crate::vector::Vector2;

/// How a pilot picks the entity its target-driven behaviors act on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    /// No target; only wander and avoidance contribute.
    #[default]
    None,
    /// The closest other entity.
    Nearest,
    /// A specific entity; behaves like `None` once it is gone.
    Leader(EntityId),
    /// A stationary point in world space.
    Point(Vector2),
}

/// Steering controller for one entity.
///
/// Sums its behaviors in registration order, caps the total at
/// `max_steering_force` and hands it back as next tick's acceleration.
#[derive(Debug, Clone, PartialEq)]
pub struct Pilot {
    behaviors: Vec<SteeringBehavior>,
    max_steering_force: f32,
    slowing_distance: f32,
    target: TargetPolicy,
}

impl Pilot {
    pub fn new(
        behaviors: Vec<SteeringBehavior>,
        max_steering_force: f32,
        slowing_distance: f32,
    ) -> Result<Self> {
        if behaviors.is_empty() {
            return Err(ConfigError::EmptyBehaviors);
        }
        if !error::non_negative(max_steering_force) {
            return Err(ConfigError::InvalidSteeringForce(max_steering_force));
        }
        if !error::non_negative(slowing_distance) {
            return Err(ConfigError::InvalidSlowingDistance(slowing_distance));
        }

        Ok(Self {
            behaviors,
            max_steering_force,
            slowing_distance,
            target: TargetPolicy::None,
        })
    }

    pub fn with_target(mut self, target: TargetPolicy) -> Self {
        self.target = target;
        self
    }

    pub fn behaviors(&self) -> &[SteeringBehavior] {
        &self.behaviors
    }

    pub fn max_steering_force(&self) -> f32 {
        self.max_steering_force
    }

    pub fn slowing_distance(&self) -> f32 {
        self.slowing_distance
    }

    pub fn target_policy(&self) -> TargetPolicy {
        self.target
    }

    /// Net steering force for `actor`, already capped.
    ///
    /// `neighbors` is the pre-tick snapshot of the population; it is only
    /// read.
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        actor: &Entity,
        target: Option<&Entity>,
        neighbors: &[Entity],
        rng: &mut R,
    ) -> Vector2 {
        let ctx = SteeringContext::new(self.slowing_distance, neighbors);

        let mut net = Vector2::ZERO;
        for behavior in self.behaviors.iter_mut() {
            net += behavior.behave(actor, target, &ctx, rng);
        }

        net.clamped_length(self.max_steering_force)
    }

    /// Steers `entity` in isolation and stores the result as its acceleration.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        entity: &mut Entity,
        target: Option<&Entity>,
        rng: &mut R,
    ) -> Vector2 {
        let force = self.steer(entity, target, &[], rng);
        entity.set_acceleration(force);
        force
    }
}
