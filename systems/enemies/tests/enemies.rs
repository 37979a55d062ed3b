use std::time::Duration;

use basecamp_defence_core::{
    BasecampQuery, BodyHandle, BodyKind, DoorSighting, EnemyRoster, Event, PhysicsGroup,
    PlayerQuery, SlimeConfig, Spatial, SpawnerConfig, Target, Task, Tint, Vec2,
};
use basecamp_defence_system_enemies::{EnemyManager, Slime, Strike};
use basecamp_defence_world::{query, World};

struct StubPlayer {
    body: Option<BodyHandle>,
}

impl PlayerQuery for StubPlayer {
    fn player_body(&self) -> Option<BodyHandle> {
        self.body
    }

    fn attack_damage(&self) -> u32 {
        5
    }
}

#[derive(Default)]
struct StubCamp {
    doors: Vec<(BodyHandle, Vec2, bool)>,
}

impl BasecampQuery for StubCamp {
    fn nearest_intact_door(&self, from: Vec2) -> Option<DoorSighting> {
        self.doors
            .iter()
            .filter(|(_, _, intact)| *intact)
            .map(|(door, position, _)| DoorSighting {
                door: *door,
                position: *position,
                distance: from.distance(*position),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn is_door_intact(&self, door: BodyHandle) -> bool {
        self.doors
            .iter()
            .any(|(candidate, _, intact)| *candidate == door && *intact)
    }
}

fn world() -> World {
    World::new(Vec2::new(1024.0, 768.0))
}

fn player_at(world: &mut World, at: Vec2) -> StubPlayer {
    let body = world.create_body(BodyKind::Mobile, at, "player");
    StubPlayer { body: Some(body) }
}

fn spawner(initial: u32, max_enemies: usize) -> SpawnerConfig {
    SpawnerConfig {
        initial_slimes_per_spawn: initial,
        max_enemies,
        ..SpawnerConfig::default()
    }
}

fn slime_deaths(events: &[Event]) -> Vec<(BodyHandle, Vec2)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::SlimeDied { slime, at } => Some((*slime, *at)),
            _ => None,
        })
        .collect()
}

#[test]
fn setup_spawns_first_group_and_arms_both_timers() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 484.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), SpawnerConfig::default(), 1);
    let mut events = Vec::new();

    manager.setup_spawner(&mut world, &player, &mut events);

    assert_eq!(manager.active_count(&world), 2);
    assert_eq!(query::pending_timers(&world), 2);
    assert_eq!(
        query::group_members(&world, PhysicsGroup::Enemies),
        manager.active_bodies(&world),
    );
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::SlimeSpawned { .. }))
        .count();
    assert_eq!(spawned, 2);

    let due = world.advance_clock(Duration::from_secs(30));
    assert_eq!(
        due.iter()
            .filter(|task| **task == Task::SpawnSlimeGroup)
            .count(),
        6
    );
    assert!(due.contains(&Task::IncreaseDifficulty));
}

#[test]
fn spawned_group_shares_one_corner_region() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), spawner(6, 40), 99);
    let mut events = Vec::new();

    manager.spawn_slime_group(&mut world, &player, &mut events);

    let positions: Vec<Vec2> = manager
        .active_slimes(&world)
        .iter()
        .filter_map(|slime| world.position(slime.body()))
        .collect();
    assert_eq!(positions.len(), 6);
    let left = positions.iter().all(|p| p.x <= 160.0);
    let right = positions.iter().all(|p| p.x >= 864.0);
    let top = positions.iter().all(|p| p.y <= 160.0);
    let bottom = positions.iter().all(|p| p.y >= 608.0);
    assert!((left || right) && (top || bottom), "{positions:?}");
}

#[test]
fn spawning_without_a_player_is_a_no_op() {
    let mut world = world();
    let mut manager = EnemyManager::new(SlimeConfig::default(), SpawnerConfig::default(), 1);
    let mut events = Vec::new();

    manager.spawn_slime_group(&mut world, &StubPlayer { body: None }, &mut events);

    assert!(events.is_empty());
    assert_eq!(manager.active_count(&world), 0);
    assert_eq!(query::body_count(&world), 0);
}

#[test]
fn partial_group_respects_the_enemy_cap() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), spawner(1, 40), 3);
    let mut events = Vec::new();
    for _ in 0..39 {
        manager.spawn_slime_group(&mut world, &player, &mut events);
    }
    assert_eq!(manager.active_count(&world), 39);

    manager.increase_difficulty(&mut events);
    assert_eq!(manager.slimes_per_spawn(), 2);
    events.clear();
    manager.spawn_slime_group(&mut world, &player, &mut events);

    assert_eq!(manager.active_count(&world), 40);
    assert_eq!(events.len(), 1);

    manager.spawn_slime_group(&mut world, &player, &mut events);
    assert_eq!(manager.active_count(&world), 40);
}

#[test]
fn difficulty_ramp_is_unbounded_and_reported() {
    let mut manager = EnemyManager::new(SlimeConfig::default(), SpawnerConfig::default(), 1);
    let mut events = Vec::new();

    for _ in 0..5 {
        manager.increase_difficulty(&mut events);
    }

    assert_eq!(manager.slimes_per_spawn(), 7);
    assert_eq!(
        events.last(),
        Some(&Event::DifficultyIncreased {
            slimes_per_spawn: 7
        })
    );
}

#[test]
fn two_player_hits_kill_a_slime_and_drop_one_chicken() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), spawner(1, 40), 5);
    let mut events = Vec::new();
    manager.spawn_slime_group(&mut world, &player, &mut events);
    let slime = manager.active_bodies(&world)[0];
    let last_position = world.position(slime).expect("slime exists");
    events.clear();

    manager.handle_player_attack(&mut world, slime, &player, &mut events);
    let survivor = manager.find_slime_by_body(slime).expect("still alive");
    assert_eq!(survivor.health().current(), 5);
    assert!(slime_deaths(&events).is_empty());

    manager.handle_player_attack(&mut world, slime, &player, &mut events);
    assert_eq!(slime_deaths(&events), vec![(slime, last_position)]);
    assert!(manager.find_slime_by_body(slime).is_none());
    assert!(!world.is_body_active(slime));

    manager.handle_player_attack(&mut world, slime, &player, &mut events);
    assert_eq!(slime_deaths(&events).len(), 1);
    assert!(!manager.apply_damage(&mut world, slime, 5, &mut events));
}

#[test]
fn destroy_is_idempotent() {
    let mut world = world();
    let mut slime = Slime::spawn(&mut world, Vec2::new(300.0, 300.0), &SlimeConfig::default());
    let mut events = Vec::new();

    slime.destroy(&mut world, &mut events);
    slime.destroy(&mut world, &mut events);

    assert_eq!(slime_deaths(&events), vec![(slime.body(), Vec2::new(300.0, 300.0))]);
    assert!(slime.is_destroyed());
    assert_eq!(slime.target(), Target::None);
    assert_eq!(query::body_count(&world), 0);
}

#[test]
fn damage_flashes_until_cleared() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), spawner(1, 40), 5);
    let mut events = Vec::new();
    manager.spawn_slime_group(&mut world, &player, &mut events);
    let slime = manager.active_bodies(&world)[0];

    assert!(manager.apply_damage(&mut world, slime, 1, &mut events));
    let flashed = query::body(&world, slime).expect("slime exists");
    assert_eq!(flashed.tint, Some(Tint::DAMAGE_FLASH));

    let due = world.advance_clock(Duration::from_millis(100));
    assert_eq!(due, vec![Task::ClearFlash { body: slime }]);
    assert!(manager.clear_flash(&mut world, slime));
    assert_eq!(query::body(&world, slime).expect("slime exists").tint, None);
}

#[test]
fn door_within_reach_wins_over_an_equidistant_player() {
    let mut world = world();
    let slime_at = Vec2::new(200.0, 200.0);
    let player = player_at(&mut world, slime_at + Vec2::new(-22.0, 0.0));
    let door = world.create_body(BodyKind::Static, slime_at + Vec2::new(22.0, 0.0), "door");
    let camp = StubCamp {
        doors: vec![(door, slime_at + Vec2::new(22.0, 0.0), true)],
    };
    let mut slime = Slime::spawn(&mut world, slime_at, &SlimeConfig::default());

    slime.update(&mut world, &player, &camp);

    assert_eq!(slime.target(), Target::Door(door));
}

#[test]
fn distant_or_broken_doors_leave_the_player_as_target() {
    let mut world = world();
    let slime_at = Vec2::new(200.0, 200.0);
    let player = player_at(&mut world, Vec2::new(600.0, 200.0));
    let far_door = world.create_body(BodyKind::Static, slime_at + Vec2::new(0.0, 30.0), "door");
    let broken = world.create_body(BodyKind::Static, slime_at + Vec2::new(0.0, -10.0), "door");
    let camp = StubCamp {
        doors: vec![
            (far_door, slime_at + Vec2::new(0.0, 30.0), true),
            (broken, slime_at + Vec2::new(0.0, -10.0), false),
        ],
    };
    let mut slime = Slime::spawn(&mut world, slime_at, &SlimeConfig::default());

    slime.update(&mut world, &player, &camp);

    assert_eq!(slime.target(), Target::Player(player.body.expect("player")));
    let velocity = world.velocity(slime.body()).expect("slime exists");
    assert!((velocity - Vec2::new(40.0, 0.0)).length() < 1e-4);
    assert!(!query::body(&world, slime.body()).expect("slime").flip_x);
}

#[test]
fn pursuit_mirrors_the_sprite_when_heading_left() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(100.0, 300.0));
    let mut slime = Slime::spawn(&mut world, Vec2::new(400.0, 300.0), &SlimeConfig::default());

    slime.update(&mut world, &player, &StubCamp::default());

    assert_eq!(world.velocity(slime.body()), Some(Vec2::new(-40.0, 0.0)));
    assert!(query::body(&world, slime.body()).expect("slime").flip_x);
}

#[test]
fn strike_lands_after_the_wind_up_when_target_stays_in_reach() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(300.0, 300.0));
    let mut slime = Slime::spawn(&mut world, Vec2::new(315.0, 300.0), &SlimeConfig::default());
    let camp = StubCamp::default();

    slime.update(&mut world, &player, &camp);
    assert!(slime.is_attacking());
    assert_eq!(world.velocity(slime.body()), Some(Vec2::ZERO));

    assert!(world.advance_clock(Duration::from_millis(299)).is_empty());
    let due = world.advance_clock(Duration::from_millis(1));
    assert_eq!(due, vec![Task::SlimeStrike { slime: slime.body() }]);

    let strike = slime.resolve_strike(&world, &camp);
    assert_eq!(
        strike,
        Some(Strike {
            slime: slime.body(),
            target: Target::Player(player.body.expect("player")),
            damage: 10,
        })
    );
    assert!(!slime.is_attacking());
}

#[test]
fn strike_misses_when_the_target_fled_during_the_wind_up() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(300.0, 300.0));
    let player_body = player.body.expect("player");
    let mut slime = Slime::spawn(&mut world, Vec2::new(315.0, 300.0), &SlimeConfig::default());
    let camp = StubCamp::default();
    slime.update(&mut world, &player, &camp);

    world.set_velocity(player_body, Vec2::new(-100.0, 0.0));
    let _ = world.step(Duration::from_millis(300));
    let _ = world.advance_clock(Duration::from_millis(300));

    assert_eq!(slime.resolve_strike(&world, &camp), None);
    assert!(!slime.is_attacking());
}

#[test]
fn cooldown_spaces_consecutive_strikes() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(300.0, 300.0));
    let mut slime = Slime::spawn(&mut world, Vec2::new(315.0, 300.0), &SlimeConfig::default());
    let camp = StubCamp::default();

    slime.update(&mut world, &player, &camp);
    let _ = world.advance_clock(Duration::from_millis(300));
    assert!(slime.resolve_strike(&world, &camp).is_some());

    let _ = world.advance_clock(Duration::from_millis(700));
    slime.update(&mut world, &player, &camp);
    assert!(!slime.is_attacking(), "cooldown still running at exactly one second");

    let _ = world.advance_clock(Duration::from_millis(1));
    slime.update(&mut world, &player, &camp);
    assert!(slime.is_attacking());
}

#[test]
fn strikes_at_broken_doors_are_dropped() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(700.0, 300.0));
    let door_at = Vec2::new(300.0, 300.0);
    let door = world.create_body(BodyKind::Static, door_at, "door");
    let mut camp = StubCamp {
        doors: vec![(door, door_at, true)],
    };
    let mut slime = Slime::spawn(&mut world, Vec2::new(310.0, 300.0), &SlimeConfig::default());
    slime.update(&mut world, &player, &camp);
    assert_eq!(slime.target(), Target::Door(door));

    camp.doors[0].2 = false;
    let _ = world.advance_clock(Duration::from_millis(300));

    assert_eq!(slime.resolve_strike(&world, &camp), None);
}

#[test]
fn strike_tasks_of_dead_slimes_never_surface() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(300.0, 300.0));
    let mut slime = Slime::spawn(&mut world, Vec2::new(315.0, 300.0), &SlimeConfig::default());
    slime.update(&mut world, &player, &StubCamp::default());

    let mut events = Vec::new();
    assert!(slime.take_damage(&mut world, 10, &mut events));

    assert!(world.advance_clock(Duration::from_secs(1)).is_empty());
    assert!(!slime.take_damage(&mut world, 10, &mut events));
    assert_eq!(slime_deaths(&events).len(), 1);
}

#[test]
fn update_compacts_dead_slimes() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), spawner(3, 40), 11);
    let mut events = Vec::new();
    manager.spawn_slime_group(&mut world, &player, &mut events);
    let doomed = manager.active_bodies(&world)[1];
    assert!(manager.apply_damage(&mut world, doomed, 10, &mut events));

    manager.update(&mut world, &player, &StubCamp::default());

    assert_eq!(manager.active_slimes(&world).len(), 2);
    assert!(!manager.contains(doomed));
    for slime in manager.active_slimes(&world) {
        assert_eq!(slime.target(), Target::Player(player.body.expect("player")));
    }
}

#[test]
fn collisions_cover_every_solid_neighbour() {
    let mut world = world();
    let manager = EnemyManager::new(SlimeConfig::default(), SpawnerConfig::default(), 1);
    manager.setup_collisions(&mut world);

    let wall = world.create_body(BodyKind::Static, Vec2::new(400.0, 400.0), "wall");
    world.add_to_group(wall, PhysicsGroup::Walls);
    let tower = world.create_body(BodyKind::Static, Vec2::new(600.0, 400.0), "tower");
    world.add_to_group(tower, PhysicsGroup::Towers);
    let first = world.create_body(BodyKind::Mobile, Vec2::new(404.0, 400.0), "slime");
    let second = world.create_body(BodyKind::Mobile, Vec2::new(604.0, 400.0), "slime");
    world.add_to_group(first, PhysicsGroup::Enemies);
    world.add_to_group(second, PhysicsGroup::Enemies);

    let _ = world.step(Duration::ZERO);

    assert_eq!(world.position(first), Some(Vec2::new(416.0, 400.0)));
    assert_eq!(world.position(second), Some(Vec2::new(616.0, 400.0)));
}

#[test]
fn shutdown_cancels_timers_and_removes_every_slime() {
    let mut world = world();
    let player = player_at(&mut world, Vec2::new(512.0, 384.0));
    let mut manager = EnemyManager::new(SlimeConfig::default(), SpawnerConfig::default(), 1);
    let mut events = Vec::new();
    manager.setup_spawner(&mut world, &player, &mut events);
    events.clear();

    manager.shutdown(&mut world);

    assert_eq!(query::pending_timers(&world), 0);
    assert!(query::group_members(&world, PhysicsGroup::Enemies).is_empty());
    assert_eq!(manager.active_count(&world), 0);
    assert!(events.is_empty());
    assert!(world.advance_clock(Duration::from_secs(60)).is_empty());
}
