#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chicken economy: the ledger that gates tower construction and the pickups
//! slain slimes leave behind.

use basecamp_defence_core::{
    BodyHandle, BodyKind, EconomyConfig, Engine, Event, GameConfig, Ledger, PhysicsGroup, Vec2,
};

const IDLE_ANIMATION: &str = "chicken-idle";

/// Pickup waiting for the player to walk over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chicken {
    body: BodyHandle,
}

impl Chicken {
    /// Creates a pickup body at `at`. The caller registers it with a group.
    pub fn spawn(engine: &mut dyn Engine, at: Vec2, config: &EconomyConfig) -> Self {
        let body = engine.create_body(BodyKind::Static, at, "chicken");
        engine.set_body_size(body, config.chicken_size, config.chicken_offset);
        engine.play_animation(body, IDLE_ANIMATION);
        Self { body }
    }

    /// Body of the pickup.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    fn collect(self, engine: &mut dyn Engine) {
        engine.destroy_body(self.body);
    }
}

/// Owns the chicken counter and every uncollected pickup.
#[derive(Debug)]
pub struct ResourceManager {
    chickens: Vec<Chicken>,
    chicken_count: u32,
    tower_cost: u32,
    config: EconomyConfig,
}

impl ResourceManager {
    /// Creates a ledger holding the configured starting balance.
    #[must_use]
    pub fn new(config: EconomyConfig) -> Self {
        Self {
            chickens: Vec::new(),
            chicken_count: config.starting_chickens,
            tower_cost: config.tower_cost,
            config,
        }
    }

    /// Creates a ledger from the economy section of a game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.economy.clone())
    }

    /// Credits `amount` chickens.
    pub fn add_chicken(&mut self, amount: u32) {
        self.chicken_count = self.chicken_count.saturating_add(amount);
    }

    /// Debits up to `amount` chickens; the balance stops at zero.
    pub fn remove_chicken(&mut self, amount: u32) {
        self.chicken_count = self.chicken_count.saturating_sub(amount);
    }

    /// Current balance.
    #[must_use]
    pub const fn chicken_count(&self) -> u32 {
        self.chicken_count
    }

    /// Price of one tower.
    #[must_use]
    pub const fn tower_cost(&self) -> u32 {
        self.tower_cost
    }

    /// Text shown next to the chicken icon.
    #[must_use]
    pub fn label(&self) -> String {
        format!("x {}", self.chicken_count)
    }

    /// Bodies of the pickups still lying in the world.
    #[must_use]
    pub fn chickens(&self) -> Vec<BodyHandle> {
        self.chickens.iter().map(Chicken::body).collect()
    }

    /// Places a pickup at `at` and tracks it for collection.
    pub fn drop_chicken(
        &mut self,
        engine: &mut dyn Engine,
        at: Vec2,
        out: &mut Vec<Event>,
    ) -> BodyHandle {
        let chicken = Chicken::spawn(engine, at, &self.config);
        engine.add_to_group(chicken.body(), PhysicsGroup::Chickens);
        self.chickens.push(chicken);
        out.push(Event::ChickenDropped {
            chicken: chicken.body(),
            at,
        });
        chicken.body()
    }

    /// Credits one chicken and removes the pickup owning `body`.
    ///
    /// Returns `false` when the body is not a tracked pickup, which is the
    /// case for every call after the first on the same chicken.
    pub fn handle_chicken_collection(
        &mut self,
        engine: &mut dyn Engine,
        body: BodyHandle,
        out: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self.chickens.iter().position(|chicken| chicken.body() == body) else {
            log::trace!("no chicken owns {body:?}");
            return false;
        };

        let chicken = self.chickens.swap_remove(index);
        self.add_chicken(1);
        chicken.collect(engine);
        out.push(Event::ChickenCollected {
            chicken: body,
            balance: self.chicken_count,
        });
        true
    }

    /// Registers the player-versus-pickup overlap.
    pub fn setup_collections(&self, engine: &mut dyn Engine) {
        engine.register_overlap(PhysicsGroup::Player, PhysicsGroup::Chickens);
    }

    /// Destroys every uncollected pickup.
    pub fn shutdown(&mut self, engine: &mut dyn Engine) {
        for chicken in self.chickens.drain(..) {
            chicken.collect(engine);
        }
    }
}

impl Ledger for ResourceManager {
    fn balance(&self) -> u32 {
        self.chicken_count
    }

    fn tower_cost(&self) -> u32 {
        self.tower_cost
    }

    fn try_spend(&mut self, amount: u32) -> bool {
        match self.chicken_count.checked_sub(amount) {
            Some(remaining) => {
                self.chicken_count = remaining;
                true
            }
            None => false,
        }
    }
}
