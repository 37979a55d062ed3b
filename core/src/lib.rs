#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Basecamp Defence simulation.
//!
//! This crate defines the vocabulary that connects the spatial collaborator,
//! the gameplay systems, and the session that drives them. The collaborator is
//! consumed exclusively through the [`Spatial`] and [`Scheduler`] traits. Systems
//! never reach into each other; they observe the world through narrow query
//! capabilities ([`PlayerQuery`], [`BasecampQuery`], [`Ledger`],
//! [`EnemyRoster`]) and report what happened by appending [`Event`] values to
//! an output buffer owned by the caller.

mod config;
mod engine;
mod queries;

use std::time::Duration;

pub use glam::Vec2;

pub use config::{
    BasecampConfig, ConfigError, EconomyConfig, GameConfig, PlayerConfig, ProjectileConfig,
    SceneryConfig, SlimeConfig, SpawnerConfig, TowerConfig, WorldConfig,
};
pub use engine::{Engine, Scheduler, Spatial};
pub use queries::{BasecampQuery, DoorSighting, EnemyRoster, Ledger, PlayerQuery};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Basecamp Defence.";

/// Opaque reference to a positioned, collidable object owned by the collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

impl BodyHandle {
    /// Creates a new body handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle to a timer armed on the [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u32);

impl TimerHandle {
    /// Creates a new timer handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Mobility class of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Body integrates its velocity every physics step and can be pushed apart.
    Mobile,
    /// Body never moves once created.
    Static,
}

/// Named collections of bodies used for collider and overlap registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicsGroup {
    /// The single player body.
    Player,
    /// Every live slime.
    Enemies,
    /// Scenery trees.
    Trees,
    /// Scenery rocks.
    Rocks,
    /// Basecamp wall segments.
    Walls,
    /// Basecamp doors.
    Doors,
    /// Chicken pickups.
    Chickens,
    /// Unbuilt tower build spots.
    BuildSpots,
    /// Constructed towers.
    Towers,
    /// Tower projectiles in flight.
    Projectiles,
}

/// Colour multiplier applied to a body's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Tint used to flash an entity that just took damage.
    pub const DAMAGE_FLASH: Tint = Tint::from_rgb(0xff, 0x00, 0x00);

    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Cardinal facing derived from the dominant axis of a vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Toward decreasing y.
    Up,
    /// Toward increasing y.
    Down,
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl Facing {
    /// Resolves the facing of a vector by its dominant axis.
    ///
    /// Horizontal wins only when strictly dominant, so diagonals face
    /// vertically. A zero vector has no facing.
    #[must_use]
    pub fn from_vector(vector: Vec2) -> Option<Self> {
        if vector == Vec2::ZERO {
            return None;
        }

        if vector.x.abs() > vector.y.abs() {
            if vector.x > 0.0 {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if vector.y > 0.0 {
            Some(Self::Down)
        } else {
            Some(Self::Up)
        }
    }

    /// Lower-case name used to build animation keys.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Non-negative hit point pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Creates a full pool holding `max` hit points.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Hit points of a full pool.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether the pool has been emptied.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Removes `amount` hit points, clamping at zero, and returns the remainder.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// Remaining share of the pool in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Footprint of the walled basecamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasecampDimensions {
    /// Centre of the camp.
    pub center: Vec2,
    /// Outer width including walls.
    pub width: f32,
    /// Outer height including walls.
    pub height: f32,
}

impl BasecampDimensions {
    /// Half of the outer width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Reports whether `point` lies inside the footprint grown by `padding` on every side.
    #[must_use]
    pub fn contains_padded(&self, point: Vec2, padding: f32) -> bool {
        let reach = self.half_extents() + Vec2::splat(padding);
        let delta = (point - self.center).abs();
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// What a slime is currently pursuing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// Nothing to pursue.
    #[default]
    None,
    /// The player body.
    Player(BodyHandle),
    /// A basecamp door body.
    Door(BodyHandle),
}

impl Target {
    /// Body referenced by the target, if any.
    #[must_use]
    pub const fn body(&self) -> Option<BodyHandle> {
        match self {
            Self::None => None,
            Self::Player(body) | Self::Door(body) => Some(*body),
        }
    }
}

/// Deferred work armed on the [`Scheduler`].
///
/// Tasks that name an owner are discarded by the scheduler when the owner's
/// body is no longer active at the moment the task falls due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Spawn the next slime group.
    SpawnSlimeGroup,
    /// Raise the number of slimes per group.
    IncreaseDifficulty,
    /// Land the delayed hit of a slime attack.
    SlimeStrike {
        /// Attacking slime.
        slime: BodyHandle,
    },
    /// Remove the damage flash tint from a body.
    ClearFlash {
        /// Flashed body.
        body: BodyHandle,
    },
    /// Destroy a projectile that reached the end of its lifespan.
    ExpireProjectile {
        /// Expiring projectile.
        projectile: BodyHandle,
    },
    /// Safety timeout that completes a player attack if the animation never reports back.
    FinishPlayerAttack {
        /// Attacking player.
        player: BodyHandle,
        /// Attack sequence number the timeout belongs to.
        sequence: u32,
    },
}

impl Task {
    /// Body whose liveness gates the task, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<BodyHandle> {
        match self {
            Self::SpawnSlimeGroup | Self::IncreaseDifficulty => None,
            Self::SlimeStrike { slime } => Some(*slime),
            Self::ClearFlash { body } => Some(*body),
            Self::ExpireProjectile { projectile } => Some(*projectile),
            Self::FinishPlayerAttack { player, .. } => Some(*player),
        }
    }
}

/// Intersection between two bodies of a registered overlap pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Overlap {
    /// Group pair the overlap was registered for, in registration order.
    pub groups: (PhysicsGroup, PhysicsGroup),
    /// Body belonging to the first group.
    pub first: BodyHandle,
    /// Body belonging to the second group.
    pub second: BodyHandle,
}

/// Cursor key state delivered by the shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CursorKeys {
    /// Left arrow held.
    pub left: bool,
    /// Right arrow held.
    pub right: bool,
    /// Up arrow held.
    pub up: bool,
    /// Down arrow held.
    pub down: bool,
}

/// Movement input captured by the shell for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlInput {
    /// Virtual joystick deflection; zero when the joystick is released.
    pub joystick: Vec2,
    /// Keyboard state, consulted only while the joystick is released.
    pub keys: CursorKeys,
}

impl ControlInput {
    /// Input that requests no movement.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Input that steers the joystick toward `direction`.
    #[must_use]
    pub fn toward(direction: Vec2) -> Self {
        Self {
            joystick: direction,
            keys: CursorKeys::default(),
        }
    }
}

/// Events broadcast by systems after mutating gameplay state.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The player's melee swing landed on a body; resolved by the enemy manager.
    PlayerAttack {
        /// Body the player swung at.
        target: BodyHandle,
    },
    /// The player lost hit points.
    PlayerDamaged {
        /// Hit points removed.
        amount: u32,
        /// Hit points left afterwards.
        remaining: u32,
    },
    /// A slime entered the world.
    SlimeSpawned {
        /// Body of the new slime.
        slime: BodyHandle,
        /// Spawn position.
        at: Vec2,
    },
    /// A slime died; a chicken must be dropped where it fell.
    SlimeDied {
        /// Body of the dead slime.
        slime: BodyHandle,
        /// Last known position.
        at: Vec2,
    },
    /// The spawner grew its group size.
    DifficultyIncreased {
        /// New number of slimes per group.
        slimes_per_spawn: u32,
    },
    /// A door lost hit points.
    DoorDamaged {
        /// Damaged door.
        door: BodyHandle,
        /// Hit points left afterwards.
        remaining: u32,
    },
    /// A door broke and no longer blocks movement.
    DoorDestroyed {
        /// Broken door.
        door: BodyHandle,
    },
    /// A chicken pickup appeared.
    ChickenDropped {
        /// Body of the pickup.
        chicken: BodyHandle,
        /// Drop position.
        at: Vec2,
    },
    /// The player collected a chicken.
    ChickenCollected {
        /// Body of the collected pickup.
        chicken: BodyHandle,
        /// Ledger balance after crediting the pickup.
        balance: u32,
    },
    /// A tower was purchased at a build spot.
    TowerBuilt {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Tower position.
        at: Vec2,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Firing tower.
        tower: TowerId,
        /// Body of the projectile.
        projectile: BodyHandle,
    },
}

/// Converts a duration to fractional seconds for velocity integration.
#[must_use]
pub fn seconds(duration: Duration) -> f32 {
    duration.as_secs_f32()
}
