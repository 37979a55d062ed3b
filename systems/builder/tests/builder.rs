use std::{f32::consts::FRAC_PI_2, time::Duration};

use basecamp_defence_core::{
    BasecampConfig, BasecampDimensions, BodyHandle, BodyKind, EnemyRoster, Engine, Event, Ledger,
    PhysicsGroup, ProjectileConfig, Spatial, Task, TowerConfig, TowerId, Vec2,
};
use basecamp_defence_system_builder::{BuildManager, BuildRejection};
use basecamp_defence_world::{query, World};

const CAMP: BasecampDimensions = BasecampDimensions {
    center: Vec2::new(512.0, 384.0),
    width: 128.0,
    height: 128.0,
};

struct StubLedger {
    balance: u32,
    cost: u32,
}

impl Ledger for StubLedger {
    fn balance(&self) -> u32 {
        self.balance
    }

    fn tower_cost(&self) -> u32 {
        self.cost
    }

    fn try_spend(&mut self, amount: u32) -> bool {
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct StubRoster {
    members: Vec<BodyHandle>,
    hits: Vec<(BodyHandle, u32)>,
}

impl EnemyRoster for StubRoster {
    fn contains(&self, body: BodyHandle) -> bool {
        self.members.contains(&body)
    }

    fn apply_damage(
        &mut self,
        _engine: &mut dyn Engine,
        body: BodyHandle,
        amount: u32,
        _out: &mut Vec<Event>,
    ) -> bool {
        self.hits.push((body, amount));
        true
    }
}

fn setup() -> (World, BuildManager) {
    let mut world = World::new(Vec2::new(1024.0, 768.0));
    let mut builder = BuildManager::new(
        TowerConfig::default(),
        ProjectileConfig::default(),
        &BasecampConfig::default(),
    );
    builder.create_build_spots(&mut world, CAMP);
    (world, builder)
}

fn build_first_tower(world: &mut World, builder: &mut BuildManager) -> TowerId {
    let spot = builder.build_spots()[0].body();
    let mut ledger = StubLedger {
        balance: 25,
        cost: 25,
    };
    builder
        .handle_build_attempt(world, spot, &mut ledger, &mut Vec::new())
        .expect("affordable tower")
}

fn enemy(world: &mut World, at: Vec2) -> BodyHandle {
    let body = world.create_body(BodyKind::Mobile, at, "slime");
    world.add_to_group(body, PhysicsGroup::Enemies);
    body
}

#[test]
fn spots_sit_outside_each_camp_corner() {
    let (world, builder) = setup();

    let positions: Vec<Vec2> = builder
        .build_spots()
        .iter()
        .map(|spot| spot.position())
        .collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(432.0, 304.0),
            Vec2::new(592.0, 304.0),
            Vec2::new(432.0, 464.0),
            Vec2::new(592.0, 464.0),
        ]
    );
    for spot in builder.build_spots() {
        assert!(!spot.is_built());
        let snapshot = query::body(&world, spot.body()).expect("spot exists");
        assert_eq!(snapshot.group, Some(PhysicsGroup::BuildSpots));
        assert_eq!(snapshot.visual, "blue_tile");
        assert_eq!(snapshot.size, Vec2::splat(32.0));
    }
}

#[test]
fn affordable_attempt_builds_once() {
    let (mut world, mut builder) = setup();
    let spot = builder.build_spots()[0];
    let mut ledger = StubLedger {
        balance: 25,
        cost: 25,
    };
    let mut events = Vec::new();

    let tower = builder
        .handle_build_attempt(&mut world, spot.body(), &mut ledger, &mut events)
        .expect("first attempt builds");

    assert_eq!(ledger.balance, 0);
    assert!(builder.build_spots()[0].is_built());
    assert_eq!(builder.towers().len(), 1);
    let built = builder.tower(tower).expect("tower tracked");
    assert_eq!(built.position(), spot.position());
    assert_eq!(
        events,
        vec![Event::TowerBuilt {
            tower,
            at: spot.position(),
        }]
    );

    let marker = query::body(&world, spot.body()).expect("spot kept");
    assert!(!marker.enabled);
    assert!(!marker.visible);
    let body = query::body(&world, built.body()).expect("tower exists");
    assert_eq!(body.kind, BodyKind::Static);
    assert_eq!(body.group, Some(PhysicsGroup::Towers));
    assert_eq!(body.visual, "barrel");

    ledger.balance = 25;
    events.clear();
    let second = builder.handle_build_attempt(&mut world, spot.body(), &mut ledger, &mut events);

    assert_eq!(second, Err(BuildRejection::AlreadyBuilt));
    assert_eq!(ledger.balance, 25);
    assert_eq!(builder.towers().len(), 1);
    assert!(events.is_empty());
}

#[test]
fn short_ledger_leaves_the_spot_free() {
    let (mut world, mut builder) = setup();
    let spot = builder.build_spots()[1].body();
    let mut ledger = StubLedger {
        balance: 24,
        cost: 25,
    };
    let mut events = Vec::new();

    let result = builder.handle_build_attempt(&mut world, spot, &mut ledger, &mut events);

    assert_eq!(
        result,
        Err(BuildRejection::InsufficientChickens {
            balance: 24,
            cost: 25,
        })
    );
    assert_eq!(ledger.balance, 24);
    assert!(!builder.build_spots()[1].is_built());
    assert!(builder.towers().is_empty());
    assert!(query::body(&world, spot).expect("spot exists").enabled);
    assert!(events.is_empty());
}

#[test]
fn unknown_bodies_are_not_spots() {
    let (mut world, mut builder) = setup();
    let stranger = world.create_body(BodyKind::Static, Vec2::ZERO, "rock");
    let mut ledger = StubLedger {
        balance: 100,
        cost: 25,
    };

    let result = builder.handle_build_attempt(&mut world, stranger, &mut ledger, &mut Vec::new());

    assert_eq!(result, Err(BuildRejection::UnknownSpot));
    assert_eq!(ledger.balance, 100);
}

#[test]
fn tower_without_enemies_in_range_holds_fire() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let far = enemy(&mut world, Vec2::new(432.0, 504.0));
    let _ = world.advance_clock(Duration::from_secs(2));
    let mut events = Vec::new();

    builder.update(&mut world, &[far], &mut events);

    assert!(events.is_empty());
    assert!(builder.projectiles().is_empty());
    assert_eq!(builder.towers()[0].last_fired(), Duration::ZERO);
}

#[test]
fn enemy_exactly_at_range_is_out_of_reach() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let edge = enemy(&mut world, Vec2::new(532.0, 304.0));
    let _ = world.advance_clock(Duration::from_secs(1));
    let mut events = Vec::new();

    builder.update(&mut world, &[edge], &mut events);

    assert!(events.is_empty());
}

#[test]
fn tower_shoots_the_nearest_enemy_once_reloaded() {
    let (mut world, mut builder) = setup();
    let tower = build_first_tower(&mut world, &mut builder);
    let farther = enemy(&mut world, Vec2::new(432.0, 254.0));
    let nearer = enemy(&mut world, Vec2::new(462.0, 304.0));
    let enemies = [farther, nearer];
    let mut events = Vec::new();

    let _ = world.advance_clock(Duration::from_millis(800));
    builder.update(&mut world, &enemies, &mut events);
    assert!(events.is_empty(), "reload must strictly elapse");

    let _ = world.advance_clock(Duration::from_millis(1));
    builder.update(&mut world, &enemies, &mut events);

    assert_eq!(builder.projectiles().len(), 1);
    let projectile = builder.projectiles()[0];
    assert_eq!(projectile.tower(), tower);
    assert_eq!(projectile.damage(), 5);
    assert_eq!(
        events,
        vec![Event::ProjectileFired {
            tower,
            projectile: projectile.body(),
        }]
    );
    let shot = query::body(&world, projectile.body()).expect("projectile exists");
    assert_eq!(shot.group, Some(PhysicsGroup::Projectiles));
    assert_eq!(shot.visual, "kunai");
    assert_eq!(shot.position, Vec2::new(432.0, 304.0));
    assert!((shot.velocity - Vec2::new(250.0, 0.0)).length() < 1e-3);
    assert!((shot.rotation - FRAC_PI_2).abs() < 1e-6);
    assert_eq!(builder.towers()[0].last_fired(), Duration::from_millis(801));

    events.clear();
    let _ = world.advance_clock(Duration::from_millis(100));
    builder.update(&mut world, &enemies, &mut events);
    assert!(events.is_empty());
}

#[test]
fn destroyed_enemies_are_ignored() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let gone = enemy(&mut world, Vec2::new(462.0, 304.0));
    world.destroy_body(gone);
    let _ = world.advance_clock(Duration::from_secs(1));
    let mut events = Vec::new();

    builder.update(&mut world, &[gone], &mut events);

    assert!(events.is_empty());
}

#[test]
fn projectile_hits_only_once() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let first = enemy(&mut world, Vec2::new(462.0, 304.0));
    let second = enemy(&mut world, Vec2::new(470.0, 304.0));
    let _ = world.advance_clock(Duration::from_secs(1));
    builder.update(&mut world, &[first, second], &mut Vec::new());
    let projectile = builder.projectiles()[0].body();
    let mut roster = StubRoster {
        members: vec![first, second],
        ..StubRoster::default()
    };
    let mut events = Vec::new();

    assert!(builder.handle_projectile_hit(&mut world, projectile, first, &mut roster, &mut events));
    assert!(!builder.handle_projectile_hit(
        &mut world,
        projectile,
        second,
        &mut roster,
        &mut events
    ));

    assert_eq!(roster.hits, vec![(first, 5)]);
    assert!(!world.is_body_active(projectile));
    assert!(builder.projectiles().is_empty());
}

#[test]
fn projectile_passes_through_non_enemies() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let target = enemy(&mut world, Vec2::new(462.0, 304.0));
    let _ = world.advance_clock(Duration::from_secs(1));
    builder.update(&mut world, &[target], &mut Vec::new());
    let projectile = builder.projectiles()[0].body();
    let mut roster = StubRoster::default();

    assert!(!builder.handle_projectile_hit(
        &mut world,
        projectile,
        target,
        &mut roster,
        &mut Vec::new()
    ));

    assert!(roster.hits.is_empty());
    assert!(world.is_body_active(projectile));
}

#[test]
fn projectiles_expire_after_their_lifespan() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let target = enemy(&mut world, Vec2::new(462.0, 304.0));
    let _ = world.advance_clock(Duration::from_secs(1));
    builder.update(&mut world, &[target], &mut Vec::new());
    let projectile = builder.projectiles()[0].body();

    assert!(world.advance_clock(Duration::from_millis(1499)).is_empty());
    let due = world.advance_clock(Duration::from_millis(1));
    assert_eq!(due, vec![Task::ExpireProjectile { projectile }]);

    assert!(builder.expire_projectile(&mut world, projectile));
    assert!(!builder.expire_projectile(&mut world, projectile));
    assert!(!world.is_body_active(projectile));
}

#[test]
fn player_on_a_spot_is_reported() {
    let (mut world, builder) = setup();
    builder.setup_overlaps(&mut world);
    let spot = builder.build_spots()[3];
    let player = world.create_body(BodyKind::Mobile, spot.position(), "player");
    world.add_to_group(player, PhysicsGroup::Player);

    let overlaps = world.step(Duration::ZERO);

    assert_eq!(overlaps.len(), 1);
    assert_eq!(
        overlaps[0].groups,
        (PhysicsGroup::Player, PhysicsGroup::BuildSpots)
    );
    assert_eq!(overlaps[0].second, spot.body());
}

#[test]
fn shutdown_clears_every_body() {
    let (mut world, mut builder) = setup();
    let _ = build_first_tower(&mut world, &mut builder);
    let target = enemy(&mut world, Vec2::new(462.0, 304.0));
    let _ = world.advance_clock(Duration::from_secs(1));
    builder.update(&mut world, &[target], &mut Vec::new());

    builder.shutdown(&mut world);

    assert!(builder.towers().is_empty());
    assert!(builder.build_spots().is_empty());
    assert!(builder.projectiles().is_empty());
    assert_eq!(query::body_count(&world), 1);
}
