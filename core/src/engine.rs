//! Boundary with the spatial collaborator that owns bodies, physics, and timers.

use std::time::Duration;

use glam::Vec2;

use crate::{BodyHandle, BodyKind, PhysicsGroup, Task, TimerHandle, Tint};

/// Positions, collision shapes, and view state of every body in the world.
///
/// Every operation on a handle that is unknown or no longer active is a
/// no-op; queries on such handles return `None` or `false`.
pub trait Spatial {
    /// Creates a body of the provided kind at `position` shown with `visual`.
    fn create_body(&mut self, kind: BodyKind, position: Vec2, visual: &'static str) -> BodyHandle;

    /// Sets the collision box of a body and the offset of the box relative to its view.
    ///
    /// The in-memory world centres boxes on the body position and keeps the
    /// offset for presentation only.
    fn set_body_size(&mut self, body: BodyHandle, size: Vec2, offset: Vec2);

    /// Removes a body permanently. Destroying twice is harmless.
    fn destroy_body(&mut self, body: BodyHandle);

    /// Turns off collisions and overlaps for a body while keeping it alive,
    /// optionally hiding its view as well.
    fn disable_body(&mut self, body: BodyHandle, hide: bool);

    /// Reports whether the body exists and has not been destroyed.
    fn is_body_active(&self, body: BodyHandle) -> bool;

    /// Current position of the body.
    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Current velocity of the body in units per second.
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// Replaces the velocity of a mobile body.
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Mirrors the body's view horizontally.
    fn set_flip_x(&mut self, body: BodyHandle, flipped: bool);

    /// Rotates the body's view, in radians.
    fn set_rotation(&mut self, body: BodyHandle, radians: f32);

    /// Applies or clears a colour tint on the body's view.
    fn set_tint(&mut self, body: BodyHandle, tint: Option<Tint>);

    /// Keeps a mobile body inside the world bounds.
    fn set_collide_world_bounds(&mut self, body: BodyHandle, enabled: bool);

    /// Starts (or keeps playing) the named animation on the body's view.
    fn play_animation(&mut self, body: BodyHandle, key: &'static str);

    /// Moves the body into `group`. A body belongs to at most one group.
    fn add_to_group(&mut self, body: BodyHandle, group: PhysicsGroup);

    /// Resolves interpenetration between members of the two groups.
    fn register_collider(&mut self, first: PhysicsGroup, second: PhysicsGroup);

    /// Reports intersections between members of the two groups without resolving them.
    fn register_overlap(&mut self, first: PhysicsGroup, second: PhysicsGroup);

    /// Width and height of the world.
    fn bounds(&self) -> Vec2;

    /// Euclidean distance between two points.
    fn distance(&self, from: Vec2, to: Vec2) -> f32 {
        from.distance(to)
    }
}

/// Single-threaded clock that runs deferred [`Task`] values.
pub trait Scheduler {
    /// Simulated time elapsed since the session started.
    fn now(&self) -> Duration;

    /// Arms `task` to run once after `delay`.
    fn schedule_once(&mut self, delay: Duration, task: Task) -> TimerHandle;

    /// Arms `task` to run every `interval`, first after one interval.
    fn schedule_repeating(&mut self, interval: Duration, task: Task) -> TimerHandle;

    /// Disarms a timer. Returns `false` when the timer already fired or was cancelled.
    fn cancel(&mut self, timer: TimerHandle) -> bool;
}

/// Full collaborator surface consumed by gameplay systems.
pub trait Engine: Spatial + Scheduler {}

impl<T> Engine for T where T: Spatial + Scheduler + ?Sized {}
