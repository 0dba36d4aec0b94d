use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{self, ConfigError, Result};
use crate::vector::Vector2;

/// Stable identity of an entity inside a [`Simulation`](crate::Simulation).
///
/// Ids are handed out in spawn order starting at zero and are never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something a renderer can turn into pixels.
pub trait Drawable {
    fn draw_payload(&self) -> DrawPayload;
}

/// Something advanced by a fixed timestep.
pub trait Updatable {
    fn update(&mut self, dt: f32);
}

/// Something with a circular collision footprint.
pub trait Collidable {
    fn center(&self) -> Vector2;
    fn collision_radius(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
}

/// Axis-aligned box in world coordinates, y growing downwards as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Vector2,
    pub bottom_right: Vector2,
}

impl BoundingBox {
    pub fn around(center: Vector2, radius: f32) -> Self {
        Self {
            top_left: Vector2::new(center.x - radius, center.y - radius),
            bottom_right: Vector2::new(center.x + radius, center.y + radius),
        }
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }
}

/// Side-effect-free snapshot of everything a renderer needs for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawPayload {
    pub id: EntityId,
    pub shape: ShapeKind,
    pub bounding_box: BoundingBox,
    pub fill: Color,
    pub border: Color,
}

/// A circular kinematic body.
///
/// Invariant: once integrated, `|velocity| <= max_speed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    position: Vector2,
    velocity: Vector2,
    acceleration: Vector2,
    radius: f32,
    max_speed: f32,
    fill: Color,
    border: Color,
}

impl Entity {
    /// Creates an entity at rest. Fails on a non-positive radius or a
    /// negative max speed.
    pub fn new(position: Vector2, radius: f32, max_speed: f32) -> Result<Self> {
        if !position.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "position",
                value: if position.x.is_finite() {
                    position.y
                } else {
                    position.x
                },
            });
        }
        if !error::positive(radius) {
            return Err(ConfigError::InvalidRadius(radius));
        }
        if !error::non_negative(max_speed) {
            return Err(ConfigError::InvalidMaxSpeed(max_speed));
        }

        Ok(Self {
            id: EntityId::default(),
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            radius,
            max_speed,
            fill: Color::WHITE,
            border: Color::BLACK,
        })
    }

    /// Stationary stand-in used when a pilot targets a bare point.
    pub(crate) fn marker(position: Vector2) -> Self {
        Self {
            id: EntityId(u32::MAX),
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            radius: f32::MIN_POSITIVE,
            max_speed: 0.0,
            fill: Color::WHITE,
            border: Color::BLACK,
        }
    }

    /// Sets the initial velocity, capped at `max_speed`.
    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity.clamped_length(self.max_speed);
        self
    }

    pub fn with_colors(mut self, fill: Color, border: Color) -> Self {
        self.fill = fill;
        self.border = border;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector2 {
        self.acceleration
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn border(&self) -> Color {
        self.border
    }

    /// Adds `force` to this tick's acceleration.
    pub fn apply_force(&mut self, force: Vector2) {
        self.acceleration += force;
    }

    pub fn set_acceleration(&mut self, acceleration: Vector2) {
        self.acceleration = acceleration;
    }

    /// Clears the per-tick accumulator.
    pub fn reset_acceleration(&mut self) {
        self.acceleration = Vector2::ZERO;
    }

    /// Semi-implicit Euler step. A non-positive (or NaN) `dt` is a no-op.
    pub fn integrate(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamped_length(self.max_speed);
        self.position += self.velocity * dt;
    }

    /// Toroidal wrap: leaving one edge re-enters from the opposite one.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x < 0.0 {
            self.position.x += width;
        } else if self.position.x > width {
            self.position.x -= width;
        }

        if self.position.y < 0.0 {
            self.position.y += height;
        } else if self.position.y > height {
            self.position.y -= height;
        }
    }

    /// Keeps the whole circle inside the box, reflecting the velocity
    /// component that pointed out of it.
    pub fn contain_within_bounds(&mut self, width: f32, height: f32) {
        let margin = self.radius;

        if self.position.x < margin {
            self.position.x = margin;
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > width - margin {
            self.position.x = width - margin;
            self.velocity.x = -self.velocity.x.abs();
        }

        if self.position.y < margin {
            self.position.y = margin;
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > height - margin {
            self.position.y = height - margin;
            self.velocity.y = -self.velocity.y.abs();
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.position, self.radius)
    }
}

impl Drawable for Entity {
    fn draw_payload(&self) -> DrawPayload {
        DrawPayload {
            id: self.id,
            shape: ShapeKind::Circle,
            bounding_box: self.bounding_box(),
            fill: self.fill,
            border: self.border,
        }
    }
}

impl Updatable for Entity {
    fn update(&mut self, dt: f32) {
        self.integrate(dt);
    }
}

impl Collidable for Entity {
    fn center(&self) -> Vector2 {
        self.position
    }

    fn collision_radius(&self) -> f32 {
        self.radius
    }
}
