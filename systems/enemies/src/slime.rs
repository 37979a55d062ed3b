//! Single slime: target selection, pursuit, and the delayed melee strike.

use std::time::Duration;

use basecamp_defence_core::{
    BasecampQuery, BodyHandle, BodyKind, Engine, Event, Health, PlayerQuery, SlimeConfig, Target,
    Task, Tint, Vec2,
};

const MOVE_ANIMATION: &str = "slime-move";

/// Damage a slime lands once its wind-up completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Attacking slime.
    pub slime: BodyHandle,
    /// What the strike hits.
    pub target: Target,
    /// Hit points to remove.
    pub damage: u32,
}

/// Enemy that besieges doors within reach and otherwise hunts the player.
#[derive(Debug)]
pub struct Slime {
    body: BodyHandle,
    health: Health,
    speed: f32,
    attack_range: f32,
    attack_damage: u32,
    attack_cooldown: Duration,
    strike_delay: Duration,
    door_priority_margin: f32,
    flash_duration: Duration,
    target: Target,
    is_attacking: bool,
    last_attack_at: Option<Duration>,
    last_position: Vec2,
    destroyed: bool,
}

impl Slime {
    /// Creates a slime body at `at`. The caller registers it with a group.
    pub fn spawn(engine: &mut dyn Engine, at: Vec2, config: &SlimeConfig) -> Self {
        let body = engine.create_body(BodyKind::Mobile, at, "slime");
        engine.set_body_size(body, config.body_size, config.body_offset);
        engine.set_collide_world_bounds(body, true);
        engine.play_animation(body, MOVE_ANIMATION);

        Self {
            body,
            health: Health::new(config.health),
            speed: config.speed,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            attack_cooldown: config.attack_cooldown,
            strike_delay: config.strike_delay,
            door_priority_margin: config.door_priority_margin,
            flash_duration: config.flash_duration,
            target: Target::None,
            is_attacking: false,
            last_attack_at: None,
            last_position: at,
            destroyed: false,
        }
    }

    /// Body owned by the slime.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Target chosen by the last update.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Reports whether a strike is winding up.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Reports whether the slime has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Reports whether the slime is alive and its body still exists.
    #[must_use]
    pub fn is_active(&self, engine: &dyn Engine) -> bool {
        !self.destroyed && engine.is_body_active(self.body)
    }

    /// Re-evaluates the target, then either pursues it or starts a strike.
    pub fn update(
        &mut self,
        engine: &mut dyn Engine,
        player: &dyn PlayerQuery,
        basecamp: &dyn BasecampQuery,
    ) {
        if !self.is_active(engine) {
            return;
        }
        let Some(position) = engine.position(self.body) else {
            return;
        };
        self.last_position = position;
        self.target = self.select_target(position, player, basecamp);

        let Some(goal) = self.target.body().and_then(|body| engine.position(body)) else {
            engine.set_velocity(self.body, Vec2::ZERO);
            return;
        };

        if engine.distance(position, goal) <= self.attack_range {
            engine.set_velocity(self.body, Vec2::ZERO);
            self.begin_attack(engine);
        } else if !self.is_attacking {
            self.move_toward(engine, goal - position);
        }
    }

    /// Nearest intact door within reach plus margin, otherwise the player.
    fn select_target(
        &self,
        position: Vec2,
        player: &dyn PlayerQuery,
        basecamp: &dyn BasecampQuery,
    ) -> Target {
        let door_reach = self.attack_range + self.door_priority_margin;
        match basecamp.nearest_intact_door(position) {
            Some(sighting) if sighting.distance <= door_reach => Target::Door(sighting.door),
            _ => player.player_body().map_or(Target::None, Target::Player),
        }
    }

    fn move_toward(&self, engine: &mut dyn Engine, direction: Vec2) {
        let Some(heading) = direction.try_normalize() else {
            return;
        };
        engine.set_velocity(self.body, heading * self.speed);
        engine.set_flip_x(self.body, direction.x < 0.0);
    }

    /// Starts a strike unless one is winding up or the cooldown is running.
    pub fn begin_attack(&mut self, engine: &mut dyn Engine) {
        if self.is_attacking {
            return;
        }

        let now = engine.now();
        if let Some(last) = self.last_attack_at {
            if now <= last.saturating_add(self.attack_cooldown) {
                return;
            }
        }

        self.is_attacking = true;
        self.last_attack_at = Some(now);
        engine.set_velocity(self.body, Vec2::ZERO);
        let _ = engine.schedule_once(self.strike_delay, Task::SlimeStrike { slime: self.body });
    }

    /// Ends the wind-up and reports the strike if the target is still valid and in reach.
    pub fn resolve_strike(
        &mut self,
        engine: &dyn Engine,
        basecamp: &dyn BasecampQuery,
    ) -> Option<Strike> {
        let was_attacking = std::mem::replace(&mut self.is_attacking, false);
        if !was_attacking || !self.is_active(engine) {
            return None;
        }

        let target_body = match self.target {
            Target::None => return None,
            Target::Player(body) => body,
            Target::Door(door) if basecamp.is_door_intact(door) => door,
            Target::Door(_) => return None,
        };

        let position = engine.position(self.body)?;
        let goal = engine.position(target_body)?;
        (engine.distance(position, goal) <= self.attack_range).then_some(Strike {
            slime: self.body,
            target: self.target,
            damage: self.attack_damage,
        })
    }

    /// Removes hit points, flashes the sprite, and destroys the slime at zero.
    ///
    /// Returns `false` when the slime was already gone.
    pub fn take_damage(
        &mut self,
        engine: &mut dyn Engine,
        amount: u32,
        out: &mut Vec<Event>,
    ) -> bool {
        if !self.is_active(engine) {
            return false;
        }

        let remaining = self.health.apply_damage(amount);
        engine.set_tint(self.body, Some(Tint::DAMAGE_FLASH));
        let _ = engine.schedule_once(self.flash_duration, Task::ClearFlash { body: self.body });

        if remaining == 0 {
            self.destroy(engine, out);
        }
        true
    }

    /// Removes the damage flash.
    pub fn clear_flash(&self, engine: &mut dyn Engine) {
        if self.is_active(engine) {
            engine.set_tint(self.body, None);
        }
    }

    /// Destroys the body and reports where the slime fell. Later calls do nothing.
    pub fn destroy(&mut self, engine: &mut dyn Engine, out: &mut Vec<Event>) {
        if self.destroyed {
            return;
        }

        let at = engine.position(self.body).unwrap_or(self.last_position);
        self.discard(engine);
        out.push(Event::SlimeDied {
            slime: self.body,
            at,
        });
    }

    /// Destroys the body without reporting a death.
    pub(crate) fn discard(&mut self, engine: &mut dyn Engine) {
        self.destroyed = true;
        self.is_attacking = false;
        self.target = Target::None;
        engine.destroy_body(self.body);
    }
}
