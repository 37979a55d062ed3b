//! Towers and the projectiles they fire.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use basecamp_defence_core::{
    BodyHandle, BodyKind, Engine, ProjectileConfig, Task, TowerConfig, TowerId, Vec2,
};

/// Immovable turret that shoots at the nearest enemy in range.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    body: BodyHandle,
    position: Vec2,
    range: f32,
    fire_rate: Duration,
    damage: u32,
    last_fired: Duration,
}

impl Tower {
    pub(crate) fn spawn(
        engine: &mut dyn Engine,
        id: TowerId,
        at: Vec2,
        config: &TowerConfig,
    ) -> Self {
        let body = engine.create_body(BodyKind::Static, at, "barrel");
        engine.set_body_size(body, config.body_size, Vec2::ZERO);

        Self {
            id,
            body,
            position: at,
            range: config.range,
            fire_rate: config.fire_rate,
            damage: config.damage,
            last_fired: Duration::ZERO,
        }
    }

    /// Identifier allocated at construction.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Body of the tower.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Tower position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Targeting radius.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Simulated time of the last shot; zero before the first one.
    #[must_use]
    pub const fn last_fired(&self) -> Duration {
        self.last_fired
    }

    /// Reports whether the reload has finished at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        now > self.last_fired.saturating_add(self.fire_rate)
    }

    /// Nearest active enemy strictly inside the targeting radius.
    pub(crate) fn select_target(
        &self,
        engine: &dyn Engine,
        enemies: &[BodyHandle],
    ) -> Option<(BodyHandle, Vec2)> {
        let mut best = None;
        let mut best_distance_sq = self.range * self.range;
        for &enemy in enemies {
            if !engine.is_body_active(enemy) {
                continue;
            }
            let Some(at) = engine.position(enemy) else {
                continue;
            };
            let distance_sq = self.position.distance_squared(at);
            if distance_sq < best_distance_sq {
                best_distance_sq = distance_sq;
                best = Some((enemy, at));
            }
        }
        best
    }

    /// Launches a projectile at `aim` and restarts the reload.
    pub(crate) fn fire(
        &mut self,
        engine: &mut dyn Engine,
        aim: Vec2,
        config: &ProjectileConfig,
    ) -> Projectile {
        self.last_fired = engine.now();
        Projectile::launch(engine, self, aim, config)
    }
}

/// Shot in flight. It damages the first enemy it touches and then vanishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projectile {
    body: BodyHandle,
    tower: TowerId,
    damage: u32,
}

impl Projectile {
    fn launch(
        engine: &mut dyn Engine,
        tower: &Tower,
        aim: Vec2,
        config: &ProjectileConfig,
    ) -> Self {
        let offset = aim - tower.position;
        let angle = offset.y.atan2(offset.x);

        let body = engine.create_body(BodyKind::Mobile, tower.position, "kunai");
        engine.set_body_size(body, Vec2::splat(config.body_size), Vec2::ZERO);
        engine.set_rotation(body, angle + FRAC_PI_2);
        engine.set_velocity(body, Vec2::new(angle.cos(), angle.sin()) * config.speed);
        let _ = engine.schedule_once(config.lifespan, Task::ExpireProjectile { projectile: body });

        Self {
            body,
            tower: tower.id,
            damage: tower.damage,
        }
    }

    /// Body of the projectile.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Tower that fired the projectile.
    #[must_use]
    pub const fn tower(&self) -> TowerId {
        self.tower
    }

    /// Damage delivered on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }
}
