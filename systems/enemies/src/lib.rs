#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy population: timed group spawns near the map corners, a difficulty
//! ramp, and the per-tick slime AI.

mod slime;

use basecamp_defence_core::{
    BasecampQuery, BodyHandle, Engine, EnemyRoster, Event, GameConfig, PhysicsGroup, PlayerQuery,
    SlimeConfig, SpawnerConfig, Task, TimerHandle, Vec2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use slime::{Slime, Strike};

/// Groups every live slime collides with.
const SOLID_NEIGHBOURS: [PhysicsGroup; 6] = [
    PhysicsGroup::Trees,
    PhysicsGroup::Rocks,
    PhysicsGroup::Walls,
    PhysicsGroup::Doors,
    PhysicsGroup::Enemies,
    PhysicsGroup::Towers,
];

/// Owns every slime and the timers that grow the population.
#[derive(Debug)]
pub struct EnemyManager {
    slimes: Vec<Slime>,
    slime_config: SlimeConfig,
    spawner: SpawnerConfig,
    slimes_per_spawn: u32,
    spawn_timer: Option<TimerHandle>,
    difficulty_timer: Option<TimerHandle>,
    rng: ChaCha8Rng,
}

impl EnemyManager {
    /// Creates an empty manager whose spawn positions are drawn from `seed`.
    #[must_use]
    pub fn new(slime_config: SlimeConfig, spawner: SpawnerConfig, seed: u64) -> Self {
        Self {
            slimes: Vec::new(),
            slime_config,
            slimes_per_spawn: spawner.initial_slimes_per_spawn,
            spawner,
            spawn_timer: None,
            difficulty_timer: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a manager from the relevant sections of a game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.slime.clone(), config.spawner.clone(), config.seed)
    }

    /// Arms the repeating spawn and difficulty timers and spawns the first group at once.
    pub fn setup_spawner(
        &mut self,
        engine: &mut dyn Engine,
        player: &dyn PlayerQuery,
        out: &mut Vec<Event>,
    ) {
        self.cancel_timers(engine);
        self.spawn_timer =
            Some(engine.schedule_repeating(self.spawner.spawn_interval, Task::SpawnSlimeGroup));
        self.spawn_slime_group(engine, player, out);
        self.difficulty_timer = Some(
            engine.schedule_repeating(self.spawner.difficulty_interval, Task::IncreaseDifficulty),
        );
    }

    /// Spawns up to `slimes_per_spawn` slimes in one randomly chosen corner region.
    ///
    /// Nothing spawns without a player, and the group is cut short once the
    /// active population reaches the cap.
    pub fn spawn_slime_group(
        &mut self,
        engine: &mut dyn Engine,
        player: &dyn PlayerQuery,
        out: &mut Vec<Event>,
    ) {
        if player.player_body().is_none() {
            log::trace!("skipping slime spawn: no player");
            return;
        }

        let mut active = self.active_count(engine);
        if active >= self.spawner.max_enemies {
            return;
        }

        let regions = self.spawn_regions(engine.bounds());
        let origin = regions[self.rng.gen_range(0..regions.len())];

        let mut spawned = 0_u32;
        for _ in 0..self.slimes_per_spawn {
            if active >= self.spawner.max_enemies {
                break;
            }

            let at = self.spawn_point(origin);
            let slime = Slime::spawn(engine, at, &self.slime_config);
            engine.add_to_group(slime.body(), PhysicsGroup::Enemies);
            out.push(Event::SlimeSpawned {
                slime: slime.body(),
                at,
            });
            self.slimes.push(slime);
            active += 1;
            spawned += 1;
        }

        log::debug!("spawned {spawned} slimes near {origin:?}, {active} active");
    }

    /// Top-left corners of the four spawn regions, clockwise from the top left.
    fn spawn_regions(&self, bounds: Vec2) -> [Vec2; 4] {
        let near = self.spawner.corner_inset;
        let far = bounds - Vec2::splat(self.spawner.corner_inset + self.spawner.area_size);
        [
            Vec2::new(near, near),
            Vec2::new(far.x, near),
            Vec2::new(near, far.y),
            Vec2::new(far.x, far.y),
        ]
    }

    /// Random point in the region at `origin`, jittered on both axes.
    ///
    /// Degenerate regions and jitter collapse to their origin instead of
    /// sampling an empty range.
    fn spawn_point(&mut self, origin: Vec2) -> Vec2 {
        let area = self.spawner.area_size;
        let jitter = self.spawner.jitter;
        let x = sample_span(&mut self.rng, origin.x, area);
        let y = sample_span(&mut self.rng, origin.y, area);
        let offset = Vec2::new(
            sample_jitter(&mut self.rng, jitter),
            sample_jitter(&mut self.rng, jitter),
        );
        Vec2::new(x, y) + offset
    }

    /// Adds one slime to every future group. The ramp has no ceiling.
    pub fn increase_difficulty(&mut self, out: &mut Vec<Event>) {
        self.slimes_per_spawn = self.slimes_per_spawn.saturating_add(1);
        log::info!(
            "Difficulty increased: Spawning {} slimes every {}s",
            self.slimes_per_spawn,
            self.spawner.spawn_interval.as_secs_f32()
        );
        out.push(Event::DifficultyIncreased {
            slimes_per_spawn: self.slimes_per_spawn,
        });
    }

    /// Number of slimes each spawn currently produces.
    #[must_use]
    pub const fn slimes_per_spawn(&self) -> u32 {
        self.slimes_per_spawn
    }

    /// Drops destroyed slimes, then advances every remaining slime's AI.
    pub fn update(
        &mut self,
        engine: &mut dyn Engine,
        player: &dyn PlayerQuery,
        basecamp: &dyn BasecampQuery,
    ) {
        let live = &*engine;
        self.slimes.retain(|slime| slime.is_active(live));
        for slime in &mut self.slimes {
            slime.update(engine, player, basecamp);
        }
    }

    /// Registers slime collisions with scenery, walls, doors, towers, and each other.
    pub fn setup_collisions(&self, engine: &mut dyn Engine) {
        for group in SOLID_NEIGHBOURS {
            engine.register_collider(PhysicsGroup::Enemies, group);
        }
    }

    /// Applies the player's melee damage to the slime owning `target`.
    pub fn handle_player_attack(
        &mut self,
        engine: &mut dyn Engine,
        target: BodyHandle,
        player: &dyn PlayerQuery,
        out: &mut Vec<Event>,
    ) {
        if !self.apply_damage(engine, target, player.attack_damage(), out) {
            log::trace!("player attack on {target:?} found no slime");
        }
    }

    /// Finds the live slime owning `body`.
    #[must_use]
    pub fn find_slime_by_body(&self, body: BodyHandle) -> Option<&Slime> {
        self.slimes
            .iter()
            .find(|slime| slime.body() == body && !slime.is_destroyed())
    }

    fn find_slime_mut(&mut self, body: BodyHandle) -> Option<&mut Slime> {
        self.slimes
            .iter_mut()
            .find(|slime| slime.body() == body && !slime.is_destroyed())
    }

    /// Slimes that are alive right now.
    #[must_use]
    pub fn active_slimes(&self, engine: &dyn Engine) -> Vec<&Slime> {
        self.slimes
            .iter()
            .filter(|slime| slime.is_active(engine))
            .collect()
    }

    /// Bodies of the slimes that are alive right now.
    #[must_use]
    pub fn active_bodies(&self, engine: &dyn Engine) -> Vec<BodyHandle> {
        self.slimes
            .iter()
            .filter(|slime| slime.is_active(engine))
            .map(Slime::body)
            .collect()
    }

    /// Number of slimes that are alive right now.
    #[must_use]
    pub fn active_count(&self, engine: &dyn Engine) -> usize {
        self.slimes
            .iter()
            .filter(|slime| slime.is_active(engine))
            .count()
    }

    /// Lands the delayed strike of `slime`, if it is still valid.
    pub fn resolve_strike(
        &mut self,
        engine: &dyn Engine,
        slime: BodyHandle,
        basecamp: &dyn BasecampQuery,
    ) -> Option<Strike> {
        self.find_slime_mut(slime)?.resolve_strike(engine, basecamp)
    }

    /// Clears the damage flash of the slime owning `body`.
    ///
    /// Returns `false` when no live slime owns the body.
    pub fn clear_flash(&self, engine: &mut dyn Engine, body: BodyHandle) -> bool {
        match self.find_slime_by_body(body) {
            Some(slime) => {
                slime.clear_flash(engine);
                true
            }
            None => false,
        }
    }

    /// Cancels both timers and removes every slime without dropping pickups.
    pub fn shutdown(&mut self, engine: &mut dyn Engine) {
        self.cancel_timers(engine);
        for slime in &mut self.slimes {
            if !slime.is_destroyed() {
                slime.discard(engine);
            }
        }
        self.slimes.clear();
    }

    fn cancel_timers(&mut self, engine: &mut dyn Engine) {
        for timer in [self.spawn_timer.take(), self.difficulty_timer.take()]
            .into_iter()
            .flatten()
        {
            let _ = engine.cancel(timer);
        }
    }
}

impl EnemyRoster for EnemyManager {
    fn contains(&self, body: BodyHandle) -> bool {
        self.find_slime_by_body(body).is_some()
    }

    fn apply_damage(
        &mut self,
        engine: &mut dyn Engine,
        body: BodyHandle,
        amount: u32,
        out: &mut Vec<Event>,
    ) -> bool {
        match self.find_slime_mut(body) {
            Some(slime) => slime.take_damage(engine, amount, out),
            None => false,
        }
    }
}

fn sample_span(rng: &mut ChaCha8Rng, start: f32, span: f32) -> f32 {
    let end = start + span;
    if span > 0.0 && start.is_finite() && end.is_finite() {
        rng.gen_range(start..=end)
    } else {
        start
    }
}

fn sample_jitter(rng: &mut ChaCha8Rng, jitter: f32) -> f32 {
    if jitter > 0.0 && jitter.is_finite() {
        rng.gen_range(-jitter..=jitter)
    } else {
        0.0
    }
}
