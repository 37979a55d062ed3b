#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative spatial state for Basecamp Defence.
//!
//! [`World`] is a small in-memory implementation of the spatial collaborator:
//! it owns every body, integrates velocities, pushes solid bodies apart,
//! reports overlaps, and runs the single-threaded timer queue. It makes no
//! attempt at frame-perfect physics; boxes are axis aligned and centred on the
//! body position.

mod collision;
mod scheduler;

use std::{collections::BTreeMap, time::Duration};

use basecamp_defence_core::{
    seconds, BodyHandle, BodyKind, Overlap, PhysicsGroup, Scheduler, Spatial, Task, TimerHandle,
    Tint, Vec2, WorldConfig,
};

use collision::Aabb;
use scheduler::TimerRegistry;

const DEFAULT_BODY_SIZE: Vec2 = Vec2::new(16.0, 16.0);

#[derive(Clone, Debug)]
struct Body {
    kind: BodyKind,
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    offset: Vec2,
    visual: &'static str,
    animation: Option<&'static str>,
    group: Option<PhysicsGroup>,
    enabled: bool,
    visible: bool,
    flip_x: bool,
    rotation: f32,
    tint: Option<Tint>,
    collide_world_bounds: bool,
}

impl Body {
    fn new(kind: BodyKind, position: Vec2, visual: &'static str) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            size: DEFAULT_BODY_SIZE,
            offset: Vec2::ZERO,
            visual,
            animation: None,
            group: None,
            enabled: true,
            visible: true,
            flip_x: false,
            rotation: 0.0,
            tint: None,
            collide_world_bounds: false,
        }
    }

    /// Collision box centred on the body position. The stored offset only
    /// places the view and plays no part in collisions.
    fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

/// Represents the authoritative Basecamp Defence spatial state.
#[derive(Debug)]
pub struct World {
    bounds: Vec2,
    clock: Duration,
    bodies: BTreeMap<BodyHandle, Body>,
    next_body: u32,
    colliders: Vec<(PhysicsGroup, PhysicsGroup)>,
    overlaps: Vec<(PhysicsGroup, PhysicsGroup)>,
    timers: TimerRegistry,
}

impl World {
    /// Creates an empty world spanning `bounds` with the clock at zero.
    #[must_use]
    pub fn new(bounds: Vec2) -> Self {
        Self {
            bounds,
            clock: Duration::ZERO,
            bodies: BTreeMap::new(),
            next_body: 0,
            colliders: Vec::new(),
            overlaps: Vec::new(),
            timers: TimerRegistry::new(),
        }
    }

    /// Creates an empty world sized by the provided configuration.
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(Vec2::new(config.width, config.height))
    }

    /// Advances the clock by `dt` and returns every task that fell due.
    ///
    /// Tasks are returned in due order. A task whose owner body is no longer
    /// active is discarded instead of being returned.
    pub fn advance_clock(&mut self, dt: Duration) -> Vec<Task> {
        self.clock = self.clock.saturating_add(dt);

        let mut due = Vec::new();
        while let Some(task) = self.timers.pop_due(self.clock) {
            let live = task
                .owner()
                .map_or(true, |owner| self.bodies.contains_key(&owner));
            if live {
                due.push(task);
            }
        }
        due
    }

    /// Integrates mobile bodies over `dt`, resolves registered colliders, and
    /// reports the overlaps of every registered overlap pair.
    pub fn step(&mut self, dt: Duration) -> Vec<Overlap> {
        self.integrate(dt);
        self.resolve_colliders();
        self.detect_overlaps()
    }

    fn integrate(&mut self, dt: Duration) {
        let elapsed = seconds(dt);
        let bounds = self.bounds;
        for body in self.bodies.values_mut() {
            if body.kind != BodyKind::Mobile || !body.enabled {
                continue;
            }

            body.position += body.velocity * elapsed;
            if body.collide_world_bounds {
                let half = body.size * 0.5;
                body.position = body.position.max(half).min(bounds - half);
            }
        }
    }

    fn solid_members(&self, group: PhysicsGroup) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.enabled && body.group == Some(group))
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn resolve_colliders(&mut self) {
        for index in 0..self.colliders.len() {
            let (first, second) = self.colliders[index];
            let first_members = self.solid_members(first);
            let second_members = if first == second {
                first_members.clone()
            } else {
                self.solid_members(second)
            };

            for &a in &first_members {
                for &b in &second_members {
                    if a == b || (first == second && a > b) {
                        continue;
                    }
                    self.separate(a, b);
                }
            }
        }
    }

    fn separate(&mut self, a: BodyHandle, b: BodyHandle) {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return;
        };
        let Some(push) = body_a.aabb().separation(&body_b.aabb()) else {
            return;
        };

        let a_mobile = body_a.kind == BodyKind::Mobile;
        let b_mobile = body_b.kind == BodyKind::Mobile;
        match (a_mobile, b_mobile) {
            (true, true) => {
                self.translate(a, push * 0.5);
                self.translate(b, -push * 0.5);
            }
            (true, false) => self.translate(a, push),
            (false, true) => self.translate(b, -push),
            (false, false) => {}
        }
    }

    fn translate(&mut self, handle: BodyHandle, delta: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position += delta;
        }
    }

    fn detect_overlaps(&self) -> Vec<Overlap> {
        let mut found = Vec::new();
        for &(first, second) in &self.overlaps {
            let first_members = self.solid_members(first);
            let second_members = self.solid_members(second);
            for &a in &first_members {
                for &b in &second_members {
                    if a == b {
                        continue;
                    }
                    let (Some(body_a), Some(body_b)) = (self.bodies.get(&a), self.bodies.get(&b))
                    else {
                        continue;
                    };
                    if body_a.aabb().intersects(&body_b.aabb()) {
                        found.push(Overlap {
                            groups: (first, second),
                            first: a,
                            second: b,
                        });
                    }
                }
            }
        }
        found
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(&handle)
    }
}

impl Spatial for World {
    fn create_body(&mut self, kind: BodyKind, position: Vec2, visual: &'static str) -> BodyHandle {
        let handle = BodyHandle::new(self.next_body);
        self.next_body = self.next_body.wrapping_add(1);
        let _ = self.bodies.insert(handle, Body::new(kind, position, visual));
        handle
    }

    fn set_body_size(&mut self, body: BodyHandle, size: Vec2, offset: Vec2) {
        if let Some(body) = self.body_mut(body) {
            body.size = size;
            body.offset = offset;
        }
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let _ = self.bodies.remove(&body);
    }

    fn disable_body(&mut self, body: BodyHandle, hide: bool) {
        if let Some(body) = self.body_mut(body) {
            body.enabled = false;
            body.velocity = Vec2::ZERO;
            if hide {
                body.visible = false;
            }
        }
    }

    fn is_body_active(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|body| body.position)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.body_mut(body) {
            if body.kind == BodyKind::Mobile {
                body.velocity = velocity;
            }
        }
    }

    fn set_flip_x(&mut self, body: BodyHandle, flipped: bool) {
        if let Some(body) = self.body_mut(body) {
            body.flip_x = flipped;
        }
    }

    fn set_rotation(&mut self, body: BodyHandle, radians: f32) {
        if let Some(body) = self.body_mut(body) {
            body.rotation = radians;
        }
    }

    fn set_tint(&mut self, body: BodyHandle, tint: Option<Tint>) {
        if let Some(body) = self.body_mut(body) {
            body.tint = tint;
        }
    }

    fn set_collide_world_bounds(&mut self, body: BodyHandle, enabled: bool) {
        if let Some(body) = self.body_mut(body) {
            body.collide_world_bounds = enabled;
        }
    }

    fn play_animation(&mut self, body: BodyHandle, key: &'static str) {
        if let Some(body) = self.body_mut(body) {
            body.animation = Some(key);
        }
    }

    fn add_to_group(&mut self, body: BodyHandle, group: PhysicsGroup) {
        if let Some(body) = self.body_mut(body) {
            body.group = Some(group);
        }
    }

    fn register_collider(&mut self, first: PhysicsGroup, second: PhysicsGroup) {
        if !self.colliders.contains(&(first, second)) {
            self.colliders.push((first, second));
        }
    }

    fn register_overlap(&mut self, first: PhysicsGroup, second: PhysicsGroup) {
        if !self.overlaps.contains(&(first, second)) {
            self.overlaps.push((first, second));
        }
    }

    fn bounds(&self) -> Vec2 {
        self.bounds
    }
}

impl Scheduler for World {
    fn now(&self) -> Duration {
        self.clock
    }

    fn schedule_once(&mut self, delay: Duration, task: Task) -> TimerHandle {
        self.timers.arm(self.clock.saturating_add(delay), None, task)
    }

    fn schedule_repeating(&mut self, interval: Duration, task: Task) -> TimerHandle {
        self.timers
            .arm(self.clock.saturating_add(interval), Some(interval), task)
    }

    fn cancel(&mut self, timer: TimerHandle) -> bool {
        self.timers.cancel(timer)
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use basecamp_defence_core::{BodyHandle, BodyKind, PhysicsGroup, Tint, Vec2};

    /// Immutable representation of a single body used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct BodySnapshot {
        /// Handle of the body.
        pub handle: BodyHandle,
        /// Mobility class.
        pub kind: BodyKind,
        /// Current position.
        pub position: Vec2,
        /// Current velocity.
        pub velocity: Vec2,
        /// Collision box size.
        pub size: Vec2,
        /// Collision box offset relative to the view.
        pub offset: Vec2,
        /// Visual key the body is drawn with.
        pub visual: &'static str,
        /// Animation currently playing, if any.
        pub animation: Option<&'static str>,
        /// Group the body was registered with.
        pub group: Option<PhysicsGroup>,
        /// Indicates whether the body takes part in collisions and overlaps.
        pub enabled: bool,
        /// Indicates whether the body's view is shown.
        pub visible: bool,
        /// Indicates whether the view is mirrored horizontally.
        pub flip_x: bool,
        /// View rotation in radians.
        pub rotation: f32,
        /// Colour tint applied to the view.
        pub tint: Option<Tint>,
    }

    /// Captures a snapshot of a single live body.
    #[must_use]
    pub fn body(world: &World, handle: BodyHandle) -> Option<BodySnapshot> {
        world.bodies.get(&handle).map(|body| BodySnapshot {
            handle,
            kind: body.kind,
            position: body.position,
            velocity: body.velocity,
            size: body.size,
            offset: body.offset,
            visual: body.visual,
            animation: body.animation,
            group: body.group,
            enabled: body.enabled,
            visible: body.visible,
            flip_x: body.flip_x,
            rotation: body.rotation,
            tint: body.tint,
        })
    }

    /// Enumerates the live bodies registered with `group`, in handle order.
    #[must_use]
    pub fn group_members(world: &World, group: PhysicsGroup) -> Vec<BodyHandle> {
        world
            .bodies
            .iter()
            .filter(|(_, body)| body.group == Some(group))
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Number of live bodies.
    #[must_use]
    pub fn body_count(world: &World) -> usize {
        world.bodies.len()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.timers.len()
    }

    /// Simulated time elapsed since the world was created.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }
}
