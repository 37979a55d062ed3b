//! Narrow capabilities that systems receive instead of reaching into each other.

use glam::Vec2;

use crate::{BodyHandle, Engine, Event};

/// Read access to the player as seen by enemies.
pub trait PlayerQuery {
    /// Body of the player, if one exists.
    fn player_body(&self) -> Option<BodyHandle>;

    /// Damage dealt by one player melee hit.
    fn attack_damage(&self) -> u32;
}

/// Door located by a [`BasecampQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorSighting {
    /// Body of the door.
    pub door: BodyHandle,
    /// Door position.
    pub position: Vec2,
    /// Distance from the querying point.
    pub distance: f32,
}

/// Read access to the basecamp's doors.
pub trait BasecampQuery {
    /// Nearest door that has not been destroyed.
    fn nearest_intact_door(&self, from: Vec2) -> Option<DoorSighting>;

    /// Reports whether `door` names a door that is still standing.
    fn is_door_intact(&self, door: BodyHandle) -> bool;
}

/// The chicken economy as seen by tower construction.
pub trait Ledger {
    /// Current number of chickens.
    fn balance(&self) -> u32;

    /// Price of one tower.
    fn tower_cost(&self) -> u32;

    /// Debits `amount` when the balance covers it; otherwise leaves the ledger untouched.
    ///
    /// The check and the debit happen in one call so the balance can never be
    /// spent twice.
    fn try_spend(&mut self, amount: u32) -> bool;
}

/// Damage routing into the enemy population.
pub trait EnemyRoster {
    /// Reports whether `body` belongs to a live enemy.
    fn contains(&self, body: BodyHandle) -> bool;

    /// Applies `amount` damage to the enemy owning `body`.
    ///
    /// Returns `false` when no live enemy owns the body.
    fn apply_damage(
        &mut self,
        engine: &mut dyn Engine,
        body: BodyHandle,
        amount: u32,
        out: &mut Vec<Event>,
    ) -> bool;
}
