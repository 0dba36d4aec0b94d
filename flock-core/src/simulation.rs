//! The simulation loop.
//!
//! A tick runs three phases over the whole population: every pilot steers
//! against the same pre-tick snapshot, then every entity integrates, then
//! the collision policy runs on the post-tick positions.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::collision::{self, Contact};
use crate::entity::{Drawable, DrawPayload, Entity, EntityId, Updatable};
use crate::error::{self, ConfigError, Result};
use crate::pilot::{Pilot, TargetPolicy};
use crate::vector::Vector2;

/// Host-driven run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    /// Advance on the next tick only, then fall back to `Stopped`.
    SteppingOnce,
}

/// What happens at the edges of the world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Bounds {
    #[default]
    Unbounded,
    Wrap { width: f32, height: f32 },
    Bounce { width: f32, height: f32 },
}

impl Bounds {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Bounds::Unbounded => Ok(()),
            Bounds::Wrap { width, height } | Bounds::Bounce { width, height } => {
                if error::positive(width) && error::positive(height) {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidBounds { width, height })
                }
            }
        }
    }

    /// Size of the world, if it has one.
    pub fn size(&self) -> Option<(f32, f32)> {
        match *self {
            Bounds::Unbounded => None,
            Bounds::Wrap { width, height } | Bounds::Bounce { width, height } => {
                Some((width, height))
            }
        }
    }

    fn apply(&self, entity: &mut Entity) {
        match *self {
            Bounds::Unbounded => {}
            Bounds::Wrap { width, height } => entity.wrap_edges(width, height),
            Bounds::Bounce { width, height } => entity.contain_within_bounds(width, height),
        }
    }
}

/// What the post-tick collision pass does with overlapping pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Skip the pass entirely.
    #[default]
    Ignore,
    /// Report contacts, leave entities in place.
    Report,
    /// Report contacts and remove every entity involved in one.
    Remove,
}

/// Outcome of one call to [`Simulation::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// False when the call was a no-op (stopped, or non-positive `dt`).
    pub advanced: bool,
    pub contacts: Vec<Contact>,
    pub removed: Vec<EntityId>,
}

/// Owns every entity and its optional pilot.
///
/// Insertion order is tick order and is preserved by removals.
#[derive(Debug, Clone)]
pub struct Simulation {
    entities: Vec<Entity>,
    pilots: Vec<Option<Pilot>>,
    bounds: Bounds,
    collision: CollisionPolicy,
    state: RunState,
    rng: ChaCha8Rng,
    next_id: u32,
    tick_count: u64,
    elapsed: f64,
}

impl Simulation {
    /// Empty, stopped, unbounded simulation; `seed` drives every random draw.
    pub fn new(seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            pilots: Vec::new(),
            bounds: Bounds::default(),
            collision: CollisionPolicy::default(),
            state: RunState::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
            tick_count: 0,
            elapsed: 0.0,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    pub fn set_collision_policy(&mut self, policy: CollisionPolicy) {
        self.collision = policy;
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Adds an entity at the end of the tick order and returns its new id.
    pub fn spawn(&mut self, mut entity: Entity, pilot: Option<Pilot>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        entity.set_id(id);
        log::debug!(
            "spawned {} at ({:.1}, {:.1}), radius {:.1}, {}",
            id,
            entity.position().x,
            entity.position().y,
            entity.radius(),
            match &pilot {
                Some(pilot) => format!("{} behavior(s)", pilot.behaviors().len()),
                None => "unpiloted".to_string(),
            }
        );

        self.entities.push(entity);
        self.pilots.push(pilot);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        self.pilots.remove(index);
        let entity = self.entities.remove(index);
        log::debug!("removed {}", id);
        Some(entity)
    }

    /// Read-only view in tick order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|index| &self.entities[index])
    }

    pub fn pilot(&self, id: EntityId) -> Option<&Pilot> {
        self.index_of(id)
            .and_then(|index| self.pilots[index].as_ref())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn draw_payloads(&self) -> Vec<DrawPayload> {
        self.entities.iter().map(Drawable::draw_payload).collect()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
    }

    /// Arms exactly one advancing tick.
    pub fn step(&mut self) {
        self.state = RunState::SteppingOnce;
    }

    /// Ticks that actually advanced.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds across all advancing ticks.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the world by `dt` if running or stepping.
    ///
    /// A non-positive `dt` is a no-op and leaves a pending step armed.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if self.state == RunState::Stopped {
            return TickReport::default();
        }
        if dt.is_nan() || dt <= 0.0 {
            log::trace!("ignoring tick with dt {}", dt);
            return TickReport::default();
        }
        if self.state == RunState::SteppingOnce {
            self.state = RunState::Stopped;
        }

        let forces = self.steer_all();
        for (entity, force) in self.entities.iter_mut().zip(forces) {
            entity.set_acceleration(force);
        }

        for entity in self.entities.iter_mut() {
            entity.integrate(dt);
            self.bounds.apply(entity);
        }

        let mut report = TickReport {
            advanced: true,
            ..TickReport::default()
        };
        self.resolve_collisions(&mut report);

        self.tick_count += 1;
        self.elapsed += f64::from(dt);
        log::trace!(
            "tick {} done: {} entities, {} contacts",
            self.tick_count,
            self.entities.len(),
            report.contacts.len()
        );

        report
    }

    /// Steering forces for every entity, all computed from the same
    /// pre-tick state. Unpiloted entities get zero.
    fn steer_all(&mut self) -> Vec<Vector2> {
        let mut forces = Vec::with_capacity(self.entities.len());

        for (index, slot) in self.pilots.iter_mut().enumerate() {
            let Some(pilot) = slot else {
                forces.push(Vector2::ZERO);
                continue;
            };

            let actor = &self.entities[index];
            let policy = pilot.target_policy();
            let marker = match policy {
                TargetPolicy::Point(point) => Some(Entity::marker(point)),
                _ => None,
            };
            let target = resolve_target(policy, actor, &self.entities, marker.as_ref());

            forces.push(pilot.steer(actor, target, &self.entities, &mut self.rng));
        }

        forces
    }

    fn resolve_collisions(&mut self, report: &mut TickReport) {
        if self.collision == CollisionPolicy::Ignore {
            return;
        }

        report.contacts = collision::find_contacts(&self.entities);
        for contact in &report.contacts {
            log::debug!(
                "contact between {} and {} (depth {:.2})",
                contact.a,
                contact.b,
                contact.depth
            );
        }

        if self.collision == CollisionPolicy::Remove && !report.contacts.is_empty() {
            report.removed = self
                .entities
                .iter()
                .map(Entity::id)
                .filter(|id| report.contacts.iter().any(|c| c.involves(*id)))
                .collect();
            for id in &report.removed {
                self.remove(*id);
            }
        }
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id() == id)
    }
}

impl Updatable for Simulation {
    fn update(&mut self, dt: f32) {
        self.tick(dt);
    }
}

fn resolve_target<'a>(
    policy: TargetPolicy,
    actor: &Entity,
    entities: &'a [Entity],
    marker: Option<&'a Entity>,
) -> Option<&'a Entity> {
    match policy {
        TargetPolicy::None => None,
        TargetPolicy::Nearest => collision::nearest_within(actor, entities, f32::INFINITY),
        TargetPolicy::Leader(id) => entities
            .iter()
            .find(|entity| entity.id() == id && !std::ptr::eq(*entity, actor)),
        TargetPolicy::Point(_) => marker,
    }
}
