//! Steering behaviors.
//!
//! Each behavior turns the acting entity, an optional target and the
//! surrounding population into a force in acceleration units. Weighting and
//! capping are the [`Pilot`](crate::Pilot)'s job.

use std::f32::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision;
use crate::entity::Entity;
use crate::error::{self, ConfigError, Result};
use crate::vector::Vector2;

/// Distance under which arrival and flee stop pushing.
pub const DEFAULT_ARRIVAL_EPSILON: f32 = 0.01;

/// Floor on the obstacle distance used to scale avoidance, keeping the force
/// finite when centers nearly coincide.
const MIN_AVOIDANCE_DISTANCE: f32 = 0.0001;

/// Read-only surroundings a behavior may consult.
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    /// Distance under which arrival ramps its desired speed down.
    pub slowing_distance: f32,
    /// Pre-tick snapshot of every entity, possibly including the actor.
    pub neighbors: &'a [Entity],
}

impl<'a> SteeringContext<'a> {
    pub fn new(slowing_distance: f32, neighbors: &'a [Entity]) -> Self {
        Self {
            slowing_distance,
            neighbors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleeMode {
    /// Run directly away from the target at full speed.
    Flee,
    /// Head for the target, slowing down inside the slowing distance.
    Arrive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleeArrival {
    mode: FleeMode,
    epsilon: f32,
}

impl FleeArrival {
    pub fn new(mode: FleeMode) -> Self {
        Self {
            mode,
            epsilon: DEFAULT_ARRIVAL_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Result<Self> {
        if !error::non_negative(epsilon) {
            return Err(ConfigError::InvalidEpsilon(epsilon));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    pub fn mode(&self) -> FleeMode {
        self.mode
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    fn behave(&self, actor: &Entity, target: &Entity, slowing_distance: f32) -> Vector2 {
        let offset = match self.mode {
            FleeMode::Flee => actor.position() - target.position(),
            FleeMode::Arrive => target.position() - actor.position(),
        };
        let distance = offset.length();
        if distance <= self.epsilon {
            return Vector2::ZERO;
        }

        let speed = match self.mode {
            FleeMode::Flee => actor.max_speed(),
            FleeMode::Arrive if slowing_distance > 0.0 => {
                actor.max_speed() * (distance / slowing_distance).min(1.0)
            }
            FleeMode::Arrive => actor.max_speed(),
        };

        let desired = offset / distance * speed;
        desired - actor.velocity()
    }
}

/// Smooth random wandering.
///
/// A circle of `radius` is projected `distance` ahead along the current
/// heading; the force points at the spot on that circle given by a wander
/// angle that random-walks by at most `jitter` radians per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Wander {
    distance: f32,
    radius: f32,
    jitter: f32,
    angle: f32,
}

impl Wander {
    pub fn new(distance: f32, radius: f32, jitter: f32) -> Result<Self> {
        if !(error::non_negative(distance)
            && error::non_negative(radius)
            && error::non_negative(jitter)
            && (2.0 * jitter).is_finite())
        {
            return Err(ConfigError::InvalidWander {
                distance,
                radius,
                jitter,
            });
        }
        Ok(Self {
            distance,
            radius,
            jitter,
            angle: 0.0,
        })
    }

    /// Starting wander angle, relative to the heading.
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = wrap_angle(angle);
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn jitter(&self) -> f32 {
        self.jitter
    }

    fn behave<R: Rng + ?Sized>(&mut self, actor: &Entity, rng: &mut R) -> Vector2 {
        if self.jitter > 0.0 {
            self.angle = wrap_angle(self.angle + rng.gen_range(-self.jitter..=self.jitter));
        }

        let velocity = actor.velocity();
        let circle_center = velocity.normalized() * self.distance;
        let displacement = Vector2::from_angle(velocity.angle() + self.angle) * self.radius;
        circle_center + displacement
    }
}

/// Sidestep the closest entity ahead.
///
/// Only entities in front of the actor (positive projection on its velocity)
/// and within `look_ahead` of its center count. The force is perpendicular to
/// the line towards the obstacle, pointing away from the side it sits on,
/// with magnitude `strength * look_ahead / distance`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionAvoidance {
    look_ahead: f32,
    strength: f32,
}

impl CollisionAvoidance {
    pub fn new(look_ahead: f32, strength: f32) -> Result<Self> {
        if !(error::positive(look_ahead) && error::non_negative(strength)) {
            return Err(ConfigError::InvalidAvoidance {
                look_ahead,
                strength,
            });
        }
        Ok(Self {
            look_ahead,
            strength,
        })
    }

    pub fn look_ahead(&self) -> f32 {
        self.look_ahead
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    fn behave(&self, actor: &Entity, neighbors: &[Entity]) -> Vector2 {
        let heading = actor.velocity().normalized();
        if heading.is_zero() {
            return Vector2::ZERO;
        }

        let origin = actor.position();
        let ahead = neighbors
            .iter()
            .filter(|other| (other.position() - origin).dot(&heading) > 0.0);
        let Some(obstacle) = collision::nearest_within(actor, ahead, self.look_ahead) else {
            return Vector2::ZERO;
        };

        let offset = obstacle.position() - origin;
        let distance = offset.length().max(MIN_AVOIDANCE_DISTANCE);
        let lateral = offset.perpendicular().normalized();
        // Obstacle counter-clockwise of the heading: steer clockwise.
        let direction = if heading.cross(&offset) > 0.0 {
            -lateral
        } else {
            lateral
        };

        direction * (self.strength * self.look_ahead / distance)
    }
}

/// The closed set of steering behaviors a [`Pilot`](crate::Pilot) can run.
#[derive(Debug, Clone, PartialEq)]
pub enum SteeringBehavior {
    Seek,
    FleeArrival(FleeArrival),
    Wander(Wander),
    CollisionAvoidance(CollisionAvoidance),
}

impl SteeringBehavior {
    pub fn seek() -> Self {
        Self::Seek
    }

    pub fn flee() -> Self {
        Self::FleeArrival(FleeArrival::new(FleeMode::Flee))
    }

    pub fn arrive() -> Self {
        Self::FleeArrival(FleeArrival::new(FleeMode::Arrive))
    }

    pub fn wander(distance: f32, radius: f32, jitter: f32) -> Result<Self> {
        Wander::new(distance, radius, jitter).map(Self::Wander)
    }

    pub fn avoid(look_ahead: f32, strength: f32) -> Result<Self> {
        CollisionAvoidance::new(look_ahead, strength).map(Self::CollisionAvoidance)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Seek => "seek",
            Self::FleeArrival(inner) => match inner.mode() {
                FleeMode::Flee => "flee",
                FleeMode::Arrive => "arrive",
            },
            Self::Wander(_) => "wander",
            Self::CollisionAvoidance(_) => "avoid",
        }
    }

    /// Force this behavior contributes for `actor` this tick.
    ///
    /// Target-driven behaviors return zero when there is no target.
    pub fn behave<R: Rng + ?Sized>(
        &mut self,
        actor: &Entity,
        target: Option<&Entity>,
        ctx: &SteeringContext<'_>,
        rng: &mut R,
    ) -> Vector2 {
        match self {
            Self::Seek => target.map_or(Vector2::ZERO, |target| seek(actor, target.position())),
            Self::FleeArrival(inner) => target.map_or(Vector2::ZERO, |target| {
                inner.behave(actor, target, ctx.slowing_distance)
            }),
            Self::Wander(inner) => inner.behave(actor, rng),
            Self::CollisionAvoidance(inner) => inner.behave(actor, ctx.neighbors),
        }
    }
}

/// Classic seek: desired velocity at full speed towards `target`, minus the
/// current velocity.
pub fn seek(actor: &Entity, target: Vector2) -> Vector2 {
    let desired = (target - actor.position()).normalized() * actor.max_speed();
    desired - actor.velocity()
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
