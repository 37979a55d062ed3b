//! Tunable gameplay parameters.
//!
//! Every section falls back to the shipped defaults for keys that are missing,
//! so a configuration file only has to mention what it changes. Durations are
//! written as whole milliseconds.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("could not parse game configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but cannot drive a session.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Human readable explanation.
        reason: &'static str,
    },
}

/// Complete set of tuning knobs for a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for spawn and scenery randomness.
    pub seed: u64,
    /// World dimensions.
    pub world: WorldConfig,
    /// Player movement and melee.
    pub player: PlayerConfig,
    /// Slime stats.
    pub slime: SlimeConfig,
    /// Spawn cadence and difficulty ramp.
    pub spawner: SpawnerConfig,
    /// Basecamp layout and doors.
    pub basecamp: BasecampConfig,
    /// Tower stats.
    pub tower: TowerConfig,
    /// Projectile flight.
    pub projectile: ProjectileConfig,
    /// Chicken economy.
    pub economy: EconomyConfig,
    /// Trees and rocks.
    pub scenery: SceneryConfig,
}

impl GameConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spawner = &self.spawner;
        for (field, value) in [
            ("spawner.corner_inset", spawner.corner_inset),
            ("spawner.area_size", spawner.area_size),
            ("spawner.jitter", spawner.jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite, non-negative distance",
                });
            }
        }

        let spawn_extent = 2.0 * (self.spawner.corner_inset + self.spawner.area_size);
        if self.world.width < spawn_extent || self.world.height < spawn_extent {
            return Err(ConfigError::Invalid {
                field: "world",
                reason: "world must fit all four spawn regions",
            });
        }

        if self.basecamp.door_width >= self.basecamp.width - 2.0 * self.basecamp.wall_thickness {
            return Err(ConfigError::Invalid {
                field: "basecamp.door_width",
                reason: "door gap must leave room for the wall",
            });
        }

        if self.spawner.spawn_interval.is_zero() || self.spawner.difficulty_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "spawner",
                reason: "spawner intervals must be positive",
            });
        }

        if self.projectile.speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "projectile.speed",
                reason: "projectiles must move",
            });
        }

        Ok(())
    }
}

/// World dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in units.
    pub width: f32,
    /// World height in units.
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Player movement and melee parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting and maximum hit points.
    pub health: u32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Melee reach.
    pub attack_range: f32,
    /// Damage per melee hit.
    pub attack_damage: u32,
    /// Minimum time between swings.
    #[serde(with = "millis")]
    pub attack_cooldown: Duration,
    /// Upper bound on a swing when the attack animation never completes.
    #[serde(with = "millis")]
    pub attack_timeout: Duration,
    /// Spawn position relative to the world centre.
    pub spawn_offset: Vec2,
    /// Collision box.
    pub body_size: Vec2,
    /// Collision box offset.
    pub body_offset: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 1000,
            speed: 100.0,
            attack_range: 24.0,
            attack_damage: 5,
            attack_cooldown: Duration::from_millis(400),
            attack_timeout: Duration::from_millis(500),
            spawn_offset: Vec2::new(0.0, 100.0),
            body_size: Vec2::new(16.0, 24.0),
            body_offset: Vec2::new(16.0, 21.0),
        }
    }
}

/// Slime stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlimeConfig {
    /// Starting hit points.
    pub health: u32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Strike reach.
    pub attack_range: f32,
    /// Damage per strike.
    pub attack_damage: u32,
    /// Minimum time between attacks.
    #[serde(with = "millis")]
    pub attack_cooldown: Duration,
    /// Wind-up between starting an attack and landing it.
    #[serde(with = "millis")]
    pub strike_delay: Duration,
    /// Extra reach within which a door takes priority over the player.
    pub door_priority_margin: f32,
    /// Duration of the damage flash.
    #[serde(with = "millis")]
    pub flash_duration: Duration,
    /// Collision box.
    pub body_size: Vec2,
    /// Collision box offset.
    pub body_offset: Vec2,
}

impl Default for SlimeConfig {
    fn default() -> Self {
        Self {
            health: 10,
            speed: 40.0,
            attack_range: 20.0,
            attack_damage: 10,
            attack_cooldown: Duration::from_millis(1000),
            strike_delay: Duration::from_millis(300),
            door_priority_margin: 5.0,
            flash_duration: Duration::from_millis(100),
            body_size: Vec2::new(16.0, 16.0),
            body_offset: Vec2::new(8.0, 10.0),
        }
    }
}

/// Spawn cadence and difficulty ramp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Time between slime groups.
    #[serde(with = "millis")]
    pub spawn_interval: Duration,
    /// Time between difficulty increases.
    #[serde(with = "millis")]
    pub difficulty_interval: Duration,
    /// Slimes per group before any difficulty increase.
    pub initial_slimes_per_spawn: u32,
    /// Cap on simultaneously active slimes.
    pub max_enemies: usize,
    /// Distance of each spawn region from its world corner.
    pub corner_inset: f32,
    /// Side length of each square spawn region.
    pub area_size: f32,
    /// Random offset added on each axis to spawn positions.
    pub jitter: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(5000),
            difficulty_interval: Duration::from_millis(30_000),
            initial_slimes_per_spawn: 2,
            max_enemies: 40,
            corner_inset: 50.0,
            area_size: 100.0,
            jitter: 10.0,
        }
    }
}

/// Basecamp layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasecampConfig {
    /// Outer width of the walls.
    pub width: f32,
    /// Outer height of the walls.
    pub height: f32,
    /// Wall thickness.
    pub wall_thickness: f32,
    /// Width of the door gaps in the top and bottom walls.
    pub door_width: f32,
    /// Door hit points.
    pub door_health: u32,
    /// Distance of build spots beyond each outer corner.
    pub build_spot_offset: f32,
    /// Side length of a build spot marker.
    pub build_spot_size: f32,
}

impl Default for BasecampConfig {
    fn default() -> Self {
        Self {
            width: 128.0,
            height: 128.0,
            wall_thickness: 16.0,
            door_width: 32.0,
            door_health: 100,
            build_spot_offset: 16.0,
            build_spot_size: 32.0,
        }
    }
}

/// Tower stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Targeting radius.
    pub range: f32,
    /// Minimum time between shots.
    #[serde(with = "millis")]
    pub fire_rate: Duration,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Collision box.
    pub body_size: Vec2,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            range: 100.0,
            fire_rate: Duration::from_millis(800),
            damage: 5,
            body_size: Vec2::new(25.6, 25.6),
        }
    }
}

/// Projectile flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Flight speed in units per second.
    pub speed: f32,
    /// Time before an unspent projectile disappears.
    #[serde(with = "millis")]
    pub lifespan: Duration,
    /// Collision box side length.
    pub body_size: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 250.0,
            lifespan: Duration::from_millis(1500),
            body_size: 8.0,
        }
    }
}

/// Chicken economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Chickens in the ledger at session start.
    pub starting_chickens: u32,
    /// Price of one tower.
    pub tower_cost: u32,
    /// Collision box of a chicken pickup.
    pub chicken_size: Vec2,
    /// Collision box offset of a chicken pickup.
    pub chicken_offset: Vec2,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_chickens: 0,
            tower_cost: 25,
            chicken_size: Vec2::new(24.0, 24.0),
            chicken_offset: Vec2::new(4.0, 8.0),
        }
    }
}

/// Trees and rocks scattered outside the basecamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Number of trees.
    pub trees: usize,
    /// Number of rocks.
    pub rocks: usize,
    /// Margin around the basecamp kept free of scenery.
    pub clear_padding: f32,
    /// Tree collision box.
    pub tree_size: Vec2,
    /// Tree collision box offset.
    pub tree_offset: Vec2,
    /// Rock collision box.
    pub rock_size: Vec2,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            trees: 25,
            rocks: 15,
            clear_padding: 32.0,
            tree_size: Vec2::new(12.0, 14.0),
            tree_offset: Vec2::new(25.0, 30.0),
            rock_size: Vec2::new(14.0, 14.0),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
