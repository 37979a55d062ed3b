//! Trees and rocks scattered over the map, outside the area kept clear around the camp.

use std::ops::RangeInclusive;

use basecamp_defence_core::{
    BasecampDimensions, BodyHandle, BodyKind, Engine, PhysicsGroup, SceneryConfig, Vec2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ROCK_FRAMES: RangeInclusive<u8> = 0..=3;
const ROCK_SCALE: RangeInclusive<f32> = 0.8..=1.2;
const MAX_ATTEMPTS: usize = 1_000;
const SCENERY_STREAM: u64 = 1;

/// Static rock with a randomly picked sprite frame and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rock {
    body: BodyHandle,
    frame: u8,
    scale: f32,
}

impl Rock {
    /// Body of the rock.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Sprite sheet frame.
    #[must_use]
    pub const fn frame(&self) -> u8 {
        self.frame
    }

    /// Uniform view scale; the collision box scales with it.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }
}

/// Every tree and rock of a session.
#[derive(Debug, Default)]
pub struct Scenery {
    trees: Vec<BodyHandle>,
    rocks: Vec<Rock>,
}

impl Scenery {
    /// Scatters the configured trees and rocks uniformly over the world,
    /// rejecting positions inside the padded camp footprint.
    pub fn plant(
        engine: &mut dyn Engine,
        config: &SceneryConfig,
        camp: BasecampDimensions,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(SCENERY_STREAM);
        let bounds = engine.bounds();
        let mut scenery = Self::default();

        for _ in 0..config.trees {
            let Some(at) = open_ground(&mut rng, bounds, camp, config.clear_padding) else {
                log::warn!("no open ground left for trees");
                break;
            };
            let body = engine.create_body(BodyKind::Static, at, "tree");
            engine.set_body_size(body, config.tree_size, config.tree_offset);
            engine.add_to_group(body, PhysicsGroup::Trees);
            scenery.trees.push(body);
        }

        for _ in 0..config.rocks {
            let Some(at) = open_ground(&mut rng, bounds, camp, config.clear_padding) else {
                log::warn!("no open ground left for rocks");
                break;
            };
            let frame = rng.gen_range(ROCK_FRAMES);
            let scale = rng.gen_range(ROCK_SCALE);
            let body = engine.create_body(BodyKind::Static, at, "rocks");
            engine.set_body_size(body, config.rock_size * scale, Vec2::ZERO);
            engine.add_to_group(body, PhysicsGroup::Rocks);
            scenery.rocks.push(Rock { body, frame, scale });
        }

        log::debug!(
            "planted {} trees and {} rocks",
            scenery.trees.len(),
            scenery.rocks.len()
        );
        scenery
    }

    /// Tree bodies.
    #[must_use]
    pub fn trees(&self) -> &[BodyHandle] {
        &self.trees
    }

    /// Rocks.
    #[must_use]
    pub fn rocks(&self) -> &[Rock] {
        &self.rocks
    }

    /// Destroys every tree and rock.
    pub fn clear(&mut self, engine: &mut dyn Engine) {
        for body in self.trees.drain(..) {
            engine.destroy_body(body);
        }
        for rock in self.rocks.drain(..) {
            engine.destroy_body(rock.body);
        }
    }
}

fn open_ground(
    rng: &mut ChaCha8Rng,
    bounds: Vec2,
    camp: BasecampDimensions,
    padding: f32,
) -> Option<Vec2> {
    (0..MAX_ATTEMPTS)
        .map(|_| Vec2::new(rng.gen_range(0.0..=bounds.x), rng.gen_range(0.0..=bounds.y)))
        .find(|candidate| !camp.contains_padded(*candidate, padding))
}
