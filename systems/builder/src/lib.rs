#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower construction and tower combat.
//!
//! The [`BuildManager`] owns the build spots around the basecamp, turns a
//! player standing on a spot into a tower when the chicken ledger can pay for
//! it, lets every tower shoot at the nearest enemy, and resolves projectile
//! impacts against the enemy roster.

mod tower;

use basecamp_defence_core::{
    BasecampConfig, BasecampDimensions, BodyHandle, BodyKind, EnemyRoster, Engine, Event,
    GameConfig, Ledger, PhysicsGroup, ProjectileConfig, TowerConfig, TowerId, Vec2,
};
use thiserror::Error;

pub use tower::{Projectile, Tower};

/// Reasons a build attempt leaves the spot untouched.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BuildRejection {
    /// The body does not belong to a build spot.
    #[error("body is not a build spot")]
    UnknownSpot,
    /// The spot already carries a tower.
    #[error("build spot already has a tower")]
    AlreadyBuilt,
    /// The ledger cannot cover the tower.
    #[error("tower costs {cost} chickens but only {balance} are available")]
    InsufficientChickens {
        /// Chickens available at the time of the attempt.
        balance: u32,
        /// Price of one tower.
        cost: u32,
    },
}

/// Marker on which a single tower can be built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildSpot {
    body: BodyHandle,
    position: Vec2,
    built: bool,
}

impl BuildSpot {
    /// Body of the marker.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Centre of the marker.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Reports whether a tower stands on the spot. Never reverts.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.built
    }
}

/// Owns build spots, towers, and projectiles in flight.
#[derive(Debug)]
pub struct BuildManager {
    spots: Vec<BuildSpot>,
    towers: Vec<Tower>,
    projectiles: Vec<Projectile>,
    tower_config: TowerConfig,
    projectile_config: ProjectileConfig,
    spot_offset: f32,
    spot_size: f32,
    next_tower: u32,
}

impl BuildManager {
    /// Creates a manager without spots or towers.
    #[must_use]
    pub fn new(
        tower_config: TowerConfig,
        projectile_config: ProjectileConfig,
        basecamp: &BasecampConfig,
    ) -> Self {
        Self {
            spots: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            tower_config,
            projectile_config,
            spot_offset: basecamp.build_spot_offset,
            spot_size: basecamp.build_spot_size,
            next_tower: 0,
        }
    }

    /// Creates a manager from the relevant sections of a game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.tower.clone(),
            config.projectile.clone(),
            &config.basecamp,
        )
    }

    /// Places one spot just outside each corner of the camp.
    ///
    /// Spots are ordered top left, top right, bottom left, bottom right.
    pub fn create_build_spots(&mut self, engine: &mut dyn Engine, camp: BasecampDimensions) {
        let reach = camp.half_extents() + Vec2::splat(self.spot_offset);
        for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let at = camp.center + Vec2::new(dx * reach.x, dy * reach.y);
            let body = engine.create_body(BodyKind::Static, at, "blue_tile");
            engine.set_body_size(body, Vec2::splat(self.spot_size), Vec2::ZERO);
            engine.add_to_group(body, PhysicsGroup::BuildSpots);
            self.spots.push(BuildSpot {
                body,
                position: at,
                built: false,
            });
        }
        log::debug!(
            "placed {} build spots around {:?}",
            self.spots.len(),
            camp.center
        );
    }

    /// Reports player overlaps with spots and projectile overlaps with enemies.
    pub fn setup_overlaps(&self, engine: &mut dyn Engine) {
        engine.register_overlap(PhysicsGroup::Player, PhysicsGroup::BuildSpots);
        engine.register_overlap(PhysicsGroup::Projectiles, PhysicsGroup::Enemies);
    }

    /// Buys a tower on the spot owning `spot` if it is free and affordable.
    ///
    /// On success the ledger is debited, the spot is hidden and disabled, and
    /// the tower takes its place. A rejection leaves everything untouched.
    pub fn handle_build_attempt(
        &mut self,
        engine: &mut dyn Engine,
        spot: BodyHandle,
        ledger: &mut dyn Ledger,
        out: &mut Vec<Event>,
    ) -> Result<TowerId, BuildRejection> {
        let index = self
            .spots
            .iter()
            .position(|candidate| candidate.body == spot)
            .ok_or(BuildRejection::UnknownSpot)?;
        if self.spots[index].built {
            return Err(BuildRejection::AlreadyBuilt);
        }

        let cost = ledger.tower_cost();
        if !ledger.try_spend(cost) {
            return Err(BuildRejection::InsufficientChickens {
                balance: ledger.balance(),
                cost,
            });
        }

        let site = &mut self.spots[index];
        site.built = true;
        engine.disable_body(site.body, true);
        let at = site.position;

        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        let tower = Tower::spawn(engine, id, at, &self.tower_config);
        engine.add_to_group(tower.body(), PhysicsGroup::Towers);
        self.towers.push(tower);

        log::debug!("built tower {} at {at:?} for {cost} chickens", id.get());
        out.push(Event::TowerBuilt { tower: id, at });
        Ok(id)
    }

    /// Lets every reloaded tower shoot at the nearest of `enemies` within range.
    pub fn update(
        &mut self,
        engine: &mut dyn Engine,
        enemies: &[BodyHandle],
        out: &mut Vec<Event>,
    ) {
        let now = engine.now();
        for tower in &mut self.towers {
            if !tower.is_ready(now) {
                continue;
            }
            let Some((enemy, aim)) = tower.select_target(&*engine, enemies) else {
                continue;
            };

            let projectile = tower.fire(engine, aim, &self.projectile_config);
            engine.add_to_group(projectile.body(), PhysicsGroup::Projectiles);
            log::trace!("tower {} fired at {enemy:?}", tower.id().get());
            out.push(Event::ProjectileFired {
                tower: tower.id(),
                projectile: projectile.body(),
            });
            self.projectiles.push(projectile);
        }
    }

    /// Resolves a projectile touching an enemy.
    ///
    /// Only the first impact of a projectile counts: it damages the enemy and
    /// the projectile is destroyed. Returns `false` when the projectile is
    /// already spent or the body is not a live enemy.
    pub fn handle_projectile_hit(
        &mut self,
        engine: &mut dyn Engine,
        projectile: BodyHandle,
        enemy: BodyHandle,
        roster: &mut dyn EnemyRoster,
        out: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self
            .projectiles
            .iter()
            .position(|candidate| candidate.body() == projectile)
        else {
            return false;
        };
        if !engine.is_body_active(projectile) || !roster.contains(enemy) {
            return false;
        }

        let spent = self.projectiles.swap_remove(index);
        let _ = roster.apply_damage(engine, enemy, spent.damage(), out);
        engine.destroy_body(spent.body());
        true
    }

    /// Removes a projectile whose lifespan ran out. Later calls do nothing.
    pub fn expire_projectile(&mut self, engine: &mut dyn Engine, projectile: BodyHandle) -> bool {
        let before = self.projectiles.len();
        self.projectiles.retain(|candidate| candidate.body() != projectile);
        if self.projectiles.len() == before {
            return false;
        }
        engine.destroy_body(projectile);
        true
    }

    /// Every tower built so far, in construction order.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Tower with the given identifier.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|tower| tower.id() == id)
    }

    /// Every build spot, built or not.
    #[must_use]
    pub fn build_spots(&self) -> &[BuildSpot] {
        &self.spots
    }

    /// Projectiles still in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Removes spots, towers, and projectiles from the world.
    pub fn shutdown(&mut self, engine: &mut dyn Engine) {
        for projectile in self.projectiles.drain(..) {
            engine.destroy_body(projectile.body());
        }
        for tower in self.towers.drain(..) {
            engine.destroy_body(tower.body());
        }
        for spot in self.spots.drain(..) {
            engine.destroy_body(spot.body);
        }
    }
}
