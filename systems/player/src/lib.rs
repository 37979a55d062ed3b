#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player entity: input-driven movement and proximity-triggered melee.
//!
//! The player never aims. Whenever the swing cooldown has elapsed, the nearest
//! enemy within reach is attacked automatically. A swing locks movement, plays
//! a directional attack animation, and completes either when the shell reports
//! the animation finished or when a safety timeout fires, whichever happens
//! first. Completion emits [`Event::PlayerAttack`] for the enemy manager to
//! resolve.

use std::time::Duration;

use basecamp_defence_core::{
    BodyHandle, BodyKind, ControlInput, Engine, Event, Facing, Health, PlayerConfig, PlayerQuery,
    Task, Vec2,
};

const IDLE_ANIMATION: &str = "idle-down";

fn move_animation(facing: Facing) -> &'static str {
    match facing {
        Facing::Up => "move-up",
        Facing::Down => "move-down",
        Facing::Left => "move-left",
        Facing::Right => "move-right",
    }
}

fn attack_animation(facing: Facing) -> &'static str {
    match facing {
        Facing::Up => "attack-up",
        Facing::Down => "attack-down",
        Facing::Left => "attack-left",
        Facing::Right => "attack-right",
    }
}

/// The single player-controlled entity of a session.
#[derive(Debug)]
pub struct Player {
    body: BodyHandle,
    health: Health,
    facing: Facing,
    speed: f32,
    attack_range: f32,
    attack_damage: u32,
    attack_cooldown: Duration,
    attack_timeout: Duration,
    is_attacking: bool,
    is_moving: bool,
    last_attack_at: Option<Duration>,
    attack_sequence: u32,
    pending_target: Option<BodyHandle>,
}

impl Player {
    /// Creates the player body at `center` shifted by the configured spawn offset.
    ///
    /// The caller owns group registration for the returned body.
    pub fn spawn(engine: &mut dyn Engine, center: Vec2, config: &PlayerConfig) -> Self {
        let body = engine.create_body(BodyKind::Mobile, center + config.spawn_offset, "player");
        engine.set_body_size(body, config.body_size, config.body_offset);
        engine.set_collide_world_bounds(body, true);
        engine.play_animation(body, IDLE_ANIMATION);

        Self {
            body,
            health: Health::new(config.health),
            facing: Facing::Down,
            speed: config.speed,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            attack_cooldown: config.attack_cooldown,
            attack_timeout: config.attack_timeout,
            is_attacking: false,
            is_moving: false,
            last_attack_at: None,
            attack_sequence: 0,
            pending_target: None,
        }
    }

    /// Body owned by the player.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Current hit points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Text shown by the health display.
    #[must_use]
    pub fn health_label(&self) -> String {
        format!("Health: {}", self.health.current())
    }

    /// Direction the player last moved or swung toward.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Reports whether a swing is in progress.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Reports whether the last update produced movement.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Melee reach.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Applies this tick's movement input.
    ///
    /// The joystick takes precedence; cursor keys are read only while it is
    /// released. All movement is suppressed during a swing.
    pub fn update(&mut self, engine: &mut dyn Engine, input: &ControlInput) {
        if self.is_attacking {
            engine.set_velocity(self.body, Vec2::ZERO);
            self.is_moving = false;
            return;
        }

        let velocity = self.desired_velocity(input);
        engine.set_velocity(self.body, velocity);

        match Facing::from_vector(velocity) {
            Some(facing) => {
                self.facing = facing;
                self.is_moving = true;
                engine.set_flip_x(self.body, facing == Facing::Left);
                engine.play_animation(self.body, move_animation(facing));
            }
            None => {
                self.is_moving = false;
                engine.play_animation(self.body, IDLE_ANIMATION);
            }
        }
    }

    fn desired_velocity(&self, input: &ControlInput) -> Vec2 {
        if input.joystick.length_squared() > 0.0 {
            return input.joystick.normalize() * self.speed;
        }

        let keys = input.keys;
        let x = if keys.left {
            -self.speed
        } else if keys.right {
            self.speed
        } else {
            0.0
        };
        let y = if keys.up {
            -self.speed
        } else if keys.down {
            self.speed
        } else {
            0.0
        };
        Vec2::new(x, y)
    }

    /// Swings at the nearest of `enemies` within reach once the cooldown has elapsed.
    ///
    /// Returns the body attacked, if any.
    pub fn check_for_attack(
        &mut self,
        engine: &mut dyn Engine,
        enemies: &[BodyHandle],
    ) -> Option<BodyHandle> {
        if self.is_attacking {
            return None;
        }

        let now = engine.now();
        if let Some(last) = self.last_attack_at {
            if now < last.saturating_add(self.attack_cooldown) {
                return None;
            }
        }

        let origin = engine.position(self.body)?;
        let reach_sq = self.attack_range * self.attack_range;
        let (target, _) = enemies
            .iter()
            .filter(|enemy| engine.is_body_active(**enemy))
            .filter_map(|enemy| {
                engine
                    .position(*enemy)
                    .map(|position| (*enemy, origin.distance_squared(position)))
            })
            .filter(|(_, distance_sq)| *distance_sq <= reach_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        self.attack(engine, target);
        Some(target)
    }

    /// Starts a swing at `target`.
    ///
    /// Movement stops, the attack animation facing the target's dominant axis
    /// starts, and a safety timeout is armed. Unknown targets are ignored.
    pub fn attack(&mut self, engine: &mut dyn Engine, target: BodyHandle) {
        let (Some(origin), Some(aim)) = (engine.position(self.body), engine.position(target)) else {
            return;
        };

        self.is_attacking = true;
        self.is_moving = false;
        self.last_attack_at = Some(engine.now());
        self.attack_sequence = self.attack_sequence.wrapping_add(1);
        self.pending_target = Some(target);

        let facing = Facing::from_vector(aim - origin).unwrap_or(self.facing);
        self.facing = facing;
        engine.set_velocity(self.body, Vec2::ZERO);
        engine.set_flip_x(self.body, facing == Facing::Left);
        engine.play_animation(self.body, attack_animation(facing));

        let _ = engine.schedule_once(
            self.attack_timeout,
            Task::FinishPlayerAttack {
                player: self.body,
                sequence: self.attack_sequence,
            },
        );
        log::trace!("player swings at {target:?} facing {}", facing.label());
    }

    /// Completes the current swing because its animation finished.
    pub fn on_animation_complete(&mut self, out: &mut Vec<Event>) {
        self.finish_attack(self.attack_sequence, out);
    }

    /// Completes swing `sequence` if it is still the one in progress.
    ///
    /// Whichever of animation completion and safety timeout arrives second
    /// finds nothing left to finish.
    pub fn finish_attack(&mut self, sequence: u32, out: &mut Vec<Event>) {
        if !self.is_attacking || sequence != self.attack_sequence {
            return;
        }

        self.is_attacking = false;
        if let Some(target) = self.pending_target.take() {
            out.push(Event::PlayerAttack { target });
        }
    }

    /// Removes hit points, clamping at zero.
    pub fn take_damage(&mut self, amount: u32, out: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }

        let remaining = self.health.apply_damage(amount);
        out.push(Event::PlayerDamaged { amount, remaining });
    }
}

impl PlayerQuery for Player {
    fn player_body(&self) -> Option<BodyHandle> {
        Some(self.body)
    }

    fn attack_damage(&self) -> u32 {
        self.attack_damage
    }
}
