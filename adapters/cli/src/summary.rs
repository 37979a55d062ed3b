//! End-of-run report.

use std::fmt::Write as _;

use basecamp_defence_core::Event;
use basecamp_defence_system_session::Session;

/// Running counts of the events a session produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    slimes_spawned: usize,
    slimes_slain: usize,
    chickens_collected: usize,
    towers_built: usize,
    projectiles_fired: usize,
    doors_broken: usize,
    damage_taken: u64,
    difficulty: Option<u32>,
}

impl Tally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::SlimeSpawned { .. } => self.slimes_spawned += 1,
                Event::SlimeDied { .. } => self.slimes_slain += 1,
                Event::ChickenCollected { .. } => self.chickens_collected += 1,
                Event::TowerBuilt { .. } => self.towers_built += 1,
                Event::ProjectileFired { .. } => self.projectiles_fired += 1,
                Event::DoorDestroyed { .. } => self.doors_broken += 1,
                Event::PlayerDamaged { amount, .. } => self.damage_taken += u64::from(*amount),
                Event::DifficultyIncreased { slimes_per_spawn } => {
                    self.difficulty = Some(*slimes_per_spawn);
                }
                Event::PlayerAttack { .. }
                | Event::DoorDamaged { .. }
                | Event::ChickenDropped { .. } => {}
            }
        }
    }

    pub(crate) fn report(&self, session: &Session) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "Slimes: {} spawned, {} slain, {} still active",
            self.slimes_spawned,
            self.slimes_slain,
            session.active_slimes().len()
        );
        let _ = writeln!(
            text,
            "Chickens: {} collected, {} in the ledger ({})",
            self.chickens_collected,
            session.chicken_count(),
            session.chicken_label()
        );
        let _ = writeln!(
            text,
            "Towers: {} built, {} projectiles fired",
            self.towers_built, self.projectiles_fired
        );
        let _ = writeln!(
            text,
            "Doors: {} of {} broken",
            self.doors_broken,
            session.doors().len()
        );
        let _ = writeln!(
            text,
            "{} after {} damage taken",
            session.player().health_label(),
            self.damage_taken
        );
        if let Some(per_spawn) = self.difficulty {
            let _ = writeln!(text, "Difficulty reached {per_spawn} slimes per spawn");
        }
        text
    }
}
