//! Breakable doors that plug the gaps in the top and bottom walls.

use basecamp_defence_core::{BodyHandle, BodyKind, Engine, Event, Health, Vec2};

/// Door with a health bar. Once broken it stays visible but no longer blocks.
#[derive(Clone, Debug)]
pub struct Door {
    body: BodyHandle,
    position: Vec2,
    health: Health,
    destroyed: bool,
}

impl Door {
    pub(crate) fn spawn(engine: &mut dyn Engine, at: Vec2, size: Vec2, health: u32) -> Self {
        let body = engine.create_body(BodyKind::Static, at, "door");
        engine.set_body_size(body, size, Vec2::ZERO);
        Self {
            body,
            position: at,
            health: Health::new(health),
            destroyed: false,
        }
    }

    /// Body of the door.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Door position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Fill ratio of the health bar drawn above the door.
    #[must_use]
    pub fn health_bar_fill(&self) -> f32 {
        self.health.fraction()
    }

    /// Reports whether the door has been broken.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Removes hit points and breaks the door at zero.
    ///
    /// Hits on a broken door do nothing and return `false`.
    pub fn take_damage(
        &mut self,
        engine: &mut dyn Engine,
        amount: u32,
        out: &mut Vec<Event>,
    ) -> bool {
        if self.destroyed {
            return false;
        }

        let remaining = self.health.apply_damage(amount);
        out.push(Event::DoorDamaged {
            door: self.body,
            remaining,
        });

        if remaining == 0 {
            self.destroyed = true;
            engine.disable_body(self.body, false);
            out.push(Event::DoorDestroyed { door: self.body });
            log::debug!("door {:?} destroyed", self.body);
        }
        true
    }
}
