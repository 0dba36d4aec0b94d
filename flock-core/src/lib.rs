//! Steering-behavior simulation for circular agents.
//!
//! A [`Simulation`] owns a population of [`Entity`] bodies. Entities with a
//! [`Pilot`] combine [`SteeringBehavior`]s (seek, flee/arrival, wander,
//! collision avoidance) into one capped force each tick. Rendering, windowing
//! and persistence belong to the host: it calls [`Simulation::tick`] and
//! reads [`DrawPayload`]s back.

pub mod behavior;
pub mod collision;
pub mod color;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod pilot;
pub mod simulation;
pub mod vector;

pub use behavior::{
    CollisionAvoidance, FleeArrival, FleeMode, SteeringBehavior, SteeringContext, Wander,
};
pub use collision::{find_contacts, nearest_within, overlaps, Contact};
pub use color::Color;
pub use config::{
    BehaviorConfig, ColorChoice, GroupConfig, PilotConfig, SimulationConfig, SpawnArea,
    SpawnConfig, ValueRange,
};
pub use entity::{
    BoundingBox, Collidable, DrawPayload, Drawable, Entity, EntityId, ShapeKind, Updatable,
};
pub use error::{ConfigError, Result};
pub use pilot::{Pilot, TargetPolicy};
pub use simulation::{Bounds, CollisionPolicy, RunState, Simulation, TickReport};
pub use vector::Vector2;
