#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A running game: the scene, its managers, and the per-tick control flow.
//!
//! [`Session`] owns the [`World`] and every system. Each call to
//! [`Session::tick`] runs the timers that fell due, advances enemies, towers,
//! and the player, steps physics, resolves the reported overlaps, and finally
//! routes the events the systems emitted to whichever system reacts to them.
//! The returned events are the only thing a shell needs to present the game.

use std::time::Duration;

use basecamp_defence_core::{
    BodyHandle, ControlInput, Event, GameConfig, Overlap, PhysicsGroup, Spatial, Target, Task,
};
use basecamp_defence_system_basecamp::{Basecamp, Door, Scenery};
use basecamp_defence_system_builder::{BuildManager, BuildSpot, Tower};
use basecamp_defence_system_enemies::{EnemyManager, Slime};
use basecamp_defence_system_player::Player;
use basecamp_defence_system_resources::ResourceManager;
use basecamp_defence_world::{query, World};

/// Solid groups the player cannot walk through.
const PLAYER_OBSTACLES: [PhysicsGroup; 3] = [
    PhysicsGroup::Trees,
    PhysicsGroup::Rocks,
    PhysicsGroup::Walls,
];

/// Scene and systems of one game.
#[derive(Debug)]
pub struct Session {
    world: World,
    player: Player,
    basecamp: Basecamp,
    scenery: Scenery,
    enemies: EnemyManager,
    builder: BuildManager,
    resources: ResourceManager,
    backlog: Vec<Event>,
    running: bool,
}

impl Session {
    /// Assembles the scene described by `config` and starts the spawner.
    ///
    /// The basecamp sits at the world centre with the player just below it.
    /// Events raised during assembly are delivered by the first tick. A
    /// configuration that fails [`GameConfig::validate`] is logged and played
    /// anyway; degenerate spawn regions collapse to their corners.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        if let Err(error) = config.validate() {
            log::warn!("assembling a session from an invalid configuration: {error}");
        }

        let mut world = World::from_config(&config.world);
        let center = world.bounds() * 0.5;

        let basecamp = Basecamp::build(&mut world, center, &config.basecamp);

        let player = Player::spawn(&mut world, center, &config.player);
        world.add_to_group(player.body(), PhysicsGroup::Player);

        let mut enemies = EnemyManager::from_config(config);
        let mut builder = BuildManager::from_config(config);
        let resources = ResourceManager::from_config(config);

        builder.create_build_spots(&mut world, basecamp.dimensions());
        let scenery = Scenery::plant(
            &mut world,
            &config.scenery,
            basecamp.dimensions(),
            config.seed,
        );

        for obstacle in PLAYER_OBSTACLES {
            world.register_collider(PhysicsGroup::Player, obstacle);
        }
        resources.setup_collections(&mut world);
        builder.setup_overlaps(&mut world);
        enemies.setup_collisions(&mut world);

        let mut backlog = Vec::new();
        enemies.setup_spawner(&mut world, &player, &mut backlog);

        log::info!(
            "session ready: {} build spots, {} trees, {} rocks, seed {}",
            builder.build_spots().len(),
            scenery.trees().len(),
            scenery.rocks().len(),
            config.seed
        );

        Self {
            world,
            player,
            basecamp,
            scenery,
            enemies,
            builder,
            resources,
            backlog,
            running: true,
        }
    }

    /// Advances the game by `dt` using this tick's movement input.
    ///
    /// Returns every event raised during the tick, including the reactions to
    /// other events (a dead slime is followed by its chicken drop). A session
    /// that has been shut down returns nothing.
    pub fn tick(&mut self, dt: Duration, input: &ControlInput) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }

        let mut out = std::mem::take(&mut self.backlog);

        for task in self.world.advance_clock(dt) {
            self.run_task(task, &mut out);
        }

        self.enemies.update(&mut self.world, &self.player, &self.basecamp);
        let targets = self.enemies.active_bodies(&self.world);
        self.builder.update(&mut self.world, &targets, &mut out);

        self.player.update(&mut self.world, input);
        let _ = self.player.check_for_attack(&mut self.world, &targets);

        for overlap in self.world.step(dt) {
            self.resolve_overlap(overlap, &mut out);
        }

        let mut cursor = 0;
        while cursor < out.len() {
            let event = out[cursor].clone();
            self.route(&event, &mut out);
            cursor += 1;
        }
        out
    }

    /// Reports that the player's attack animation finished playing.
    ///
    /// The resulting attack is resolved during the next tick.
    pub fn player_animation_complete(&mut self) {
        self.player.on_animation_complete(&mut self.backlog);
    }

    fn run_task(&mut self, task: Task, out: &mut Vec<Event>) {
        match task {
            Task::SpawnSlimeGroup => {
                self.enemies.spawn_slime_group(&mut self.world, &self.player, out);
            }
            Task::IncreaseDifficulty => self.enemies.increase_difficulty(out),
            Task::SlimeStrike { slime } => {
                let Some(strike) = self
                    .enemies
                    .resolve_strike(&self.world, slime, &self.basecamp)
                else {
                    return;
                };
                match strike.target {
                    Target::Player(_) => self.player.take_damage(strike.damage, out),
                    Target::Door(door) => {
                        let _ = self
                            .basecamp
                            .damage_door(&mut self.world, door, strike.damage, out);
                    }
                    Target::None => {}
                }
            }
            Task::ClearFlash { body } => {
                let _ = self.enemies.clear_flash(&mut self.world, body);
            }
            Task::ExpireProjectile { projectile } => {
                let _ = self.builder.expire_projectile(&mut self.world, projectile);
            }
            Task::FinishPlayerAttack { sequence, .. } => {
                self.player.finish_attack(sequence, out);
            }
        }
    }

    fn resolve_overlap(&mut self, overlap: Overlap, out: &mut Vec<Event>) {
        match overlap.groups {
            (PhysicsGroup::Player, PhysicsGroup::Chickens) => {
                let _ = self.resources.handle_chicken_collection(
                    &mut self.world,
                    overlap.second,
                    out,
                );
            }
            (PhysicsGroup::Player, PhysicsGroup::BuildSpots) => {
                if let Err(rejection) = self.builder.handle_build_attempt(
                    &mut self.world,
                    overlap.second,
                    &mut self.resources,
                    out,
                ) {
                    log::trace!(
                        "build attempt on {:?} rejected: {rejection}",
                        overlap.second
                    );
                }
            }
            (PhysicsGroup::Projectiles, PhysicsGroup::Enemies) => {
                let _ = self.builder.handle_projectile_hit(
                    &mut self.world,
                    overlap.first,
                    overlap.second,
                    &mut self.enemies,
                    out,
                );
            }
            groups => log::trace!("unrouted overlap between {groups:?}"),
        }
    }

    fn route(&mut self, event: &Event, out: &mut Vec<Event>) {
        match *event {
            Event::PlayerAttack { target } => {
                self.enemies.handle_player_attack(&mut self.world, target, &self.player, out);
            }
            Event::SlimeDied { at, .. } => {
                let _ = self.resources.drop_chicken(&mut self.world, at, out);
            }
            Event::DoorDestroyed { .. } if self.basecamp.are_all_doors_destroyed() => {
                log::info!("every basecamp door has been broken");
            }
            _ => {}
        }
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Slimes that are alive right now.
    #[must_use]
    pub fn active_slimes(&self) -> Vec<&Slime> {
        self.enemies.active_slimes(&self.world)
    }

    /// Chickens in the ledger.
    #[must_use]
    pub const fn chicken_count(&self) -> u32 {
        self.resources.chicken_count()
    }

    /// Text shown next to the chicken icon.
    #[must_use]
    pub fn chicken_label(&self) -> String {
        self.resources.label()
    }

    /// Price of one tower.
    #[must_use]
    pub const fn tower_cost(&self) -> u32 {
        self.resources.tower_cost()
    }

    /// Bodies of the pickups waiting to be collected.
    #[must_use]
    pub fn chickens(&self) -> Vec<BodyHandle> {
        self.resources.chickens()
    }

    /// Towers built so far.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        self.builder.towers()
    }

    /// Build spots around the basecamp.
    #[must_use]
    pub fn build_spots(&self) -> &[BuildSpot] {
        self.builder.build_spots()
    }

    /// Basecamp doors, top first.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        self.basecamp.doors()
    }

    /// The basecamp.
    #[must_use]
    pub const fn basecamp(&self) -> &Basecamp {
        &self.basecamp
    }

    /// Trees and rocks.
    #[must_use]
    pub const fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    /// Number of slimes each spawn currently produces.
    #[must_use]
    pub const fn slimes_per_spawn(&self) -> u32 {
        self.enemies.slimes_per_spawn()
    }

    /// Read access to the spatial state, for presentation.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Simulated time since the session started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        query::elapsed(&self.world)
    }

    /// Reports whether the session still accepts ticks.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Cancels the spawner and removes every body. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        self.enemies.shutdown(&mut self.world);
        self.builder.shutdown(&mut self.world);
        self.resources.shutdown(&mut self.world);
        self.scenery.clear(&mut self.world);
        self.basecamp.shutdown(&mut self.world);
        self.world.destroy_body(self.player.body());
        self.backlog.clear();
        log::info!("session shut down after {:?}", self.elapsed());
    }
}
