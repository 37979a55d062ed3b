use std::time::Duration;

use basecamp_defence_core::{BodyKind, EconomyConfig, Event, Overlap, PhysicsGroup, Spatial, Vec2};
use basecamp_defence_system_resources::ResourceManager;
use basecamp_defence_world::{query, World};

fn world() -> World {
    World::new(Vec2::new(1024.0, 768.0))
}

#[test]
fn dropped_chickens_are_tracked_pickups() {
    let mut world = world();
    let mut resources = ResourceManager::new(EconomyConfig::default());
    let mut events = Vec::new();

    let chicken = resources.drop_chicken(&mut world, Vec2::new(120.0, 80.0), &mut events);

    assert_eq!(resources.chickens(), vec![chicken]);
    assert_eq!(
        events,
        vec![Event::ChickenDropped {
            chicken,
            at: Vec2::new(120.0, 80.0),
        }]
    );
    let snapshot = query::body(&world, chicken).expect("chicken exists");
    assert_eq!(snapshot.kind, BodyKind::Static);
    assert_eq!(snapshot.group, Some(PhysicsGroup::Chickens));
    assert_eq!(snapshot.size, Vec2::new(24.0, 24.0));
    assert_eq!(snapshot.animation, Some("chicken-idle"));
}

#[test]
fn collection_credits_exactly_once() {
    let mut world = world();
    let mut resources = ResourceManager::new(EconomyConfig::default());
    let mut events = Vec::new();
    let chicken = resources.drop_chicken(&mut world, Vec2::new(120.0, 80.0), &mut events);
    events.clear();

    assert!(resources.handle_chicken_collection(&mut world, chicken, &mut events));
    assert!(!resources.handle_chicken_collection(&mut world, chicken, &mut events));

    assert_eq!(resources.chicken_count(), 1);
    assert_eq!(resources.label(), "x 1");
    assert!(resources.chickens().is_empty());
    assert!(!world.is_body_active(chicken));
    assert_eq!(
        events,
        vec![Event::ChickenCollected {
            chicken,
            balance: 1,
        }]
    );
}

#[test]
fn player_overlap_reports_pickups() {
    let mut world = world();
    let mut resources = ResourceManager::new(EconomyConfig::default());
    resources.setup_collections(&mut world);
    let player = world.create_body(BodyKind::Mobile, Vec2::new(200.0, 200.0), "player");
    world.add_to_group(player, PhysicsGroup::Player);
    let mut events = Vec::new();
    let near = resources.drop_chicken(&mut world, Vec2::new(210.0, 200.0), &mut events);
    let _far = resources.drop_chicken(&mut world, Vec2::new(500.0, 500.0), &mut events);

    let overlaps = world.step(Duration::from_millis(16));

    assert_eq!(
        overlaps,
        vec![Overlap {
            groups: (PhysicsGroup::Player, PhysicsGroup::Chickens),
            first: player,
            second: near,
        }]
    );
}

#[test]
fn unknown_bodies_are_ignored() {
    let mut world = world();
    let mut resources = ResourceManager::new(EconomyConfig::default());
    let stray = world.create_body(BodyKind::Static, Vec2::ZERO, "rock");
    let mut events = Vec::new();

    assert!(!resources.handle_chicken_collection(&mut world, stray, &mut events));

    assert_eq!(resources.chicken_count(), 0);
    assert!(world.is_body_active(stray));
    assert!(events.is_empty());
}

#[test]
fn shutdown_destroys_remaining_pickups() {
    let mut world = world();
    let mut resources = ResourceManager::new(EconomyConfig::default());
    let mut events = Vec::new();
    for at in [100.0, 150.0, 200.0] {
        let _ = resources.drop_chicken(&mut world, Vec2::splat(at), &mut events);
    }

    resources.shutdown(&mut world);

    assert!(resources.chickens().is_empty());
    assert_eq!(query::body_count(&world), 0);
}
