//! Host-supplied configuration.
//!
//! The core never reads these from disk; hosts deserialize them however they
//! like (the runner uses JSON) and hand them to
//! [`Simulation::from_config`](crate::Simulation::from_config).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::behavior::{FleeArrival, FleeMode, SteeringBehavior, Wander};
use crate::color::Color;
use crate::error::{ConfigError, Result};
use crate::pilot::TargetPolicy;
use crate::simulation::{Bounds, CollisionPolicy};
use crate::vector::Vector2;

/// Either a fixed value or a uniform `[min, max)` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRange {
    Fixed(f32),
    Range { min: f32, max: f32 },
}

impl ValueRange {
    pub fn validate(&self, name: &'static str) -> Result<()> {
        match *self {
            ValueRange::Fixed(value) if !value.is_finite() => {
                Err(ConfigError::NonFinite { name, value })
            }
            ValueRange::Fixed(_) => Ok(()),
            ValueRange::Range { min, max } => {
                if !min.is_finite() {
                    Err(ConfigError::NonFinite { name, value: min })
                } else if !max.is_finite() {
                    Err(ConfigError::NonFinite { name, value: max })
                } else if min > max {
                    Err(ConfigError::InvertedRange { name, min, max })
                } else if !(max - min).is_finite() {
                    Err(ConfigError::RangeTooWide { name, min, max })
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            ValueRange::Fixed(value) => value,
            ValueRange::Range { min, max } if min < max => rng.gen_range(min..max),
            ValueRange::Range { min, .. } => min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    Random,
    Fixed(Color),
}

impl ColorChoice {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        match *self {
            ColorChoice::Random => Color::random(rng),
            ColorChoice::Fixed(color) => color,
        }
    }
}

/// Axis-aligned rectangle entities are spawned in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub min: Vector2,
    pub max: Vector2,
}

impl SpawnArea {
    pub fn validate(&self) -> Result<()> {
        ValueRange::Range {
            min: self.min.x,
            max: self.max.x,
        }
        .validate("spawn area x")?;
        ValueRange::Range {
            min: self.min.y,
            max: self.max.y,
        }
        .validate("spawn area y")
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2 {
        let x = ValueRange::Range {
            min: self.min.x,
            max: self.max.x,
        }
        .sample(rng);
        let y = ValueRange::Range {
            min: self.min.y,
            max: self.max.y,
        }
        .sample(rng);
        Vector2::new(x, y)
    }
}

/// How each member of a group is rolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub area: SpawnArea,
    pub radius: ValueRange,
    pub max_speed: ValueRange,
    /// Sampled independently for each axis; the result is capped at the
    /// entity's max speed.
    pub initial_velocity: ValueRange,
    pub fill: ColorChoice,
    pub border: ColorChoice,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            area: SpawnArea {
                min: Vector2::ZERO,
                max: Vector2::new(500.0, 500.0),
            },
            radius: ValueRange::Range {
                min: 5.0,
                max: 10.0,
            },
            max_speed: ValueRange::Fixed(10.0),
            initial_velocity: ValueRange::Range {
                min: -10.0,
                max: 10.0,
            },
            fill: ColorChoice::Random,
            border: ColorChoice::Random,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        self.area.validate()?;
        self.radius.validate("radius")?;
        self.max_speed.validate("max speed")?;
        self.initial_velocity.validate("initial velocity")?;

        let min_radius = match self.radius {
            ValueRange::Fixed(value) | ValueRange::Range { min: value, .. } => value,
        };
        if min_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(min_radius));
        }
        let min_speed = match self.max_speed {
            ValueRange::Fixed(value) | ValueRange::Range { min: value, .. } => value,
        };
        if min_speed < 0.0 {
            return Err(ConfigError::InvalidMaxSpeed(min_speed));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BehaviorConfig {
    Seek,
    Flee {
        #[serde(default)]
        epsilon: Option<f32>,
    },
    Arrive {
        #[serde(default)]
        epsilon: Option<f32>,
    },
    /// The starting wander angle is drawn per entity.
    Wander {
        distance: f32,
        radius: f32,
        jitter: f32,
    },
    Avoid {
        look_ahead: f32,
        strength: f32,
    },
}

impl BehaviorConfig {
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SteeringBehavior> {
        let behavior = match *self {
            BehaviorConfig::Seek => SteeringBehavior::Seek,
            BehaviorConfig::Flee { epsilon } => flee_arrival(FleeMode::Flee, epsilon)?,
            BehaviorConfig::Arrive { epsilon } => flee_arrival(FleeMode::Arrive, epsilon)?,
            BehaviorConfig::Wander {
                distance,
                radius,
                jitter,
            } => {
                let angle = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
                SteeringBehavior::Wander(Wander::new(distance, radius, jitter)?.with_angle(angle))
            }
            BehaviorConfig::Avoid {
                look_ahead,
                strength,
            } => SteeringBehavior::avoid(look_ahead, strength)?,
        };
        Ok(behavior)
    }
}

fn flee_arrival(mode: FleeMode, epsilon: Option<f32>) -> Result<SteeringBehavior> {
    let inner = match epsilon {
        Some(epsilon) => FleeArrival::new(mode).with_epsilon(epsilon)?,
        None => FleeArrival::new(mode),
    };
    Ok(SteeringBehavior::FleeArrival(inner))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub behaviors: Vec<BehaviorConfig>,
    pub max_steering_force: f32,
    pub slowing_distance: f32,
    pub target: TargetPolicy,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            behaviors: vec![
                BehaviorConfig::Wander {
                    distance: 20.0,
                    radius: 10.0,
                    jitter: 0.3,
                },
                BehaviorConfig::Avoid {
                    look_ahead: 40.0,
                    strength: 5.0,
                },
            ],
            max_steering_force: 20.0,
            slowing_distance: 10.0,
            target: TargetPolicy::None,
        }
    }
}

/// A batch of entities rolled from the same spawn settings, optionally all
/// piloted the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub count: usize,
    pub spawn: SpawnConfig,
    pub pilot: Option<PilotConfig>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            count: 20,
            spawn: SpawnConfig::default(),
            pilot: Some(PilotConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub bounds: Bounds,
    pub collision: CollisionPolicy,
    pub groups: Vec<GroupConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bounds: Bounds::Wrap {
                width: 500.0,
                height: 500.0,
            },
            collision: CollisionPolicy::Report,
            groups: vec![GroupConfig::default()],
        }
    }
}

impl SimulationConfig {
    pub fn total_entities(&self) -> usize {
        self.groups.iter().map(|group| group.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_value_range_sampling() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(ValueRange::Fixed(4.0).sample(&mut rng), 4.0);
        assert_eq!(ValueRange::Range { min: 2.0, max: 2.0 }.sample(&mut rng), 2.0);
        for _ in 0..100 {
            let v = ValueRange::Range { min: 1.0, max: 3.0 }.sample(&mut rng);
            assert!((1.0..3.0).contains(&v));
        }
    }

    #[test]
    fn test_value_range_validation() {
        assert!(ValueRange::Range { min: 1.0, max: 3.0 }.validate("x").is_ok());
        assert_eq!(
            ValueRange::Range { min: 3.0, max: 1.0 }.validate("radius"),
            Err(ConfigError::InvertedRange {
                name: "radius",
                min: 3.0,
                max: 1.0
            })
        );
        assert!(ValueRange::Fixed(f32::INFINITY).validate("x").is_err());
    }

    #[test]
    fn test_value_range_rejects_overflowing_width() {
        let range = ValueRange::Range {
            min: -3e38,
            max: 3e38,
        };
        assert_eq!(
            range.validate("initial velocity"),
            Err(ConfigError::RangeTooWide {
                name: "initial velocity",
                min: -3e38,
                max: 3e38
            })
        );

        let config = SimulationConfig {
            groups: vec![GroupConfig {
                spawn: SpawnConfig {
                    initial_velocity: range,
                    ..SpawnConfig::default()
                },
                ..GroupConfig::default()
            }],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            crate::Simulation::from_config(&config),
            Err(ConfigError::RangeTooWide { .. })
        ));
    }

    #[test]
    fn test_spawn_config_rejects_non_positive_radius() {
        let spawn = SpawnConfig {
            radius: ValueRange::Range { min: 0.0, max: 2.0 },
            ..SpawnConfig::default()
        };
        assert_eq!(spawn.validate(), Err(ConfigError::InvalidRadius(0.0)));
    }

    #[test]
    fn test_spawn_config_rejects_negative_speed() {
        let spawn = SpawnConfig {
            max_speed: ValueRange::Fixed(-1.0),
            ..SpawnConfig::default()
        };
        assert_eq!(spawn.validate(), Err(ConfigError::InvalidMaxSpeed(-1.0)));
    }

    #[test]
    fn test_behavior_config_build() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            BehaviorConfig::Seek.build(&mut rng).unwrap(),
            SteeringBehavior::Seek
        );
        let arrive = BehaviorConfig::Arrive { epsilon: Some(0.5) }
            .build(&mut rng)
            .unwrap();
        match arrive {
            SteeringBehavior::FleeArrival(inner) => {
                assert_eq!(inner.mode(), FleeMode::Arrive);
                assert_eq!(inner.epsilon(), 0.5);
            }
            other => panic!("unexpected behavior {:?}", other),
        }
        assert!(BehaviorConfig::Avoid {
            look_ahead: -1.0,
            strength: 1.0
        }
        .build(&mut rng)
        .is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.total_entities(), 20);
    }

    #[test]
    fn test_sparse_json_uses_defaults() {
        let json = r#"{
            "seed": 9,
            "collision": "remove",
            "groups": [
                {
                    "count": 3,
                    "spawn": { "radius": 4.0, "fill": { "fixed": { "r": 1, "g": 2, "b": 3, "a": 255 } } },
                    "pilot": {
                        "behaviors": [ { "kind": "seek" }, { "kind": "flee" } ],
                        "target": "nearest"
                    }
                },
                { "count": 1, "pilot": null }
            ]
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.collision, CollisionPolicy::Remove);
        assert_eq!(config.bounds, SimulationConfig::default().bounds);
        assert_eq!(config.groups[0].spawn.radius, ValueRange::Fixed(4.0));
        assert_eq!(
            config.groups[0].spawn.fill,
            ColorChoice::Fixed(Color::rgb(1, 2, 3))
        );
        let pilot = config.groups[0].pilot.as_ref().unwrap();
        assert_eq!(pilot.target, TargetPolicy::Nearest);
        assert_eq!(pilot.behaviors[1], BehaviorConfig::Flee { epsilon: None });
        assert_eq!(pilot.slowing_distance, 10.0);
        assert!(config.groups[1].pilot.is_none());
    }
}
