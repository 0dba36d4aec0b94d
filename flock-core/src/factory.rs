//! Building entities, pilots and whole simulations from configuration.
//!
//! Every random draw goes through the `rng` passed in, so a seeded
//! generator reproduces the same population.

use rand::Rng;

use crate::config::{GroupConfig, PilotConfig, SimulationConfig, SpawnConfig};
use crate::entity::Entity;
use crate::error::{ConfigError, Result};
use crate::pilot::{Pilot, TargetPolicy};
use crate::simulation::Simulation;
use crate::vector::Vector2;

/// Rolls one entity. Draw order: position, radius, max speed, velocity,
/// fill, border.
pub fn random_entity<R: Rng + ?Sized>(spawn: &SpawnConfig, rng: &mut R) -> Result<Entity> {
    let position = spawn.area.sample(rng);
    let radius = spawn.radius.sample(rng);
    let max_speed = spawn.max_speed.sample(rng);
    let velocity = Vector2::new(
        spawn.initial_velocity.sample(rng),
        spawn.initial_velocity.sample(rng),
    );
    let fill = spawn.fill.pick(rng);
    let border = spawn.border.pick(rng);

    Ok(Entity::new(position, radius, max_speed)?
        .with_velocity(velocity)
        .with_colors(fill, border))
}

/// Builds a fresh pilot; wander behaviors get their own starting angle.
pub fn build_pilot<R: Rng + ?Sized>(config: &PilotConfig, rng: &mut R) -> Result<Pilot> {
    let mut behaviors = Vec::with_capacity(config.behaviors.len());
    for behavior in &config.behaviors {
        behaviors.push(behavior.build(rng)?);
    }

    Ok(Pilot::new(behaviors, config.max_steering_force, config.slowing_distance)?
        .with_target(config.target))
}

fn spawn_group(sim: &mut Simulation, group: &GroupConfig) -> Result<()> {
    group.spawn.validate()?;

    for _ in 0..group.count {
        let entity = random_entity(&group.spawn, sim.rng_mut())?;
        let pilot = match &group.pilot {
            Some(config) => Some(build_pilot(config, sim.rng_mut())?),
            None => None,
        };
        sim.spawn(entity, pilot);
    }
    Ok(())
}

impl Simulation {
    /// Builds a stopped simulation from `config`, spawning groups in order.
    ///
    /// Ids are assigned from zero in spawn order, so a
    /// [`TargetPolicy::Leader`] can name any entity of any group.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let mut sim = Simulation::new(config.seed)
            .with_bounds(config.bounds)?
            .with_collision_policy(config.collision);

        for group in &config.groups {
            spawn_group(&mut sim, group)?;
        }

        for group in &config.groups {
            if let Some(TargetPolicy::Leader(id)) = group.pilot.as_ref().map(|p| p.target) {
                if sim.entity(id).is_none() {
                    return Err(ConfigError::UnknownLeader(id));
                }
            }
        }

        log::info!(
            "simulation ready: {} entities in {} group(s), seed {}, {:?}, collisions {:?}",
            sim.len(),
            config.groups.len(),
            config.seed,
            config.bounds,
            config.collision
        );
        Ok(sim)
    }
}
