#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The walled basecamp at the centre of the map and the scenery around it.
//!
//! The camp is a square ring of wall segments. The top and bottom walls are
//! split around a central gap that a breakable [`Door`] fills; slimes besiege
//! these doors before turning on the player.

mod door;
mod scenery;

use basecamp_defence_core::{
    BasecampConfig, BasecampDimensions, BasecampQuery, BodyHandle, BodyKind, DoorSighting, Engine,
    Event, PhysicsGroup, Vec2,
};

pub use door::Door;
pub use scenery::{Rock, Scenery};

/// Wall segment of the camp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    body: BodyHandle,
    center: Vec2,
    size: Vec2,
}

impl Wall {
    /// Body of the segment.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Centre of the segment.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Width and height of the segment.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }
}

/// Walls and doors of the camp.
#[derive(Debug)]
pub struct Basecamp {
    dimensions: BasecampDimensions,
    walls: Vec<Wall>,
    doors: Vec<Door>,
}

impl Basecamp {
    /// Raises the walls and hangs both doors around `center`.
    pub fn build(engine: &mut dyn Engine, center: Vec2, config: &BasecampConfig) -> Self {
        let dimensions = BasecampDimensions {
            center,
            width: config.width,
            height: config.height,
        };

        let walls = wall_layout(&dimensions, config)
            .into_iter()
            .map(|(visual, center, size)| {
                let body = engine.create_body(BodyKind::Static, center, visual);
                engine.set_body_size(body, size, Vec2::ZERO);
                engine.add_to_group(body, PhysicsGroup::Walls);
                Wall { body, center, size }
            })
            .collect();

        let half = dimensions.half_extents();
        let inset = config.wall_thickness * 0.5;
        let door_size = Vec2::new(config.door_width, config.wall_thickness);
        let doors = [center.y - half.y + inset, center.y + half.y - inset]
            .into_iter()
            .map(|y| {
                let door = Door::spawn(
                    engine,
                    Vec2::new(center.x, y),
                    door_size,
                    config.door_health,
                );
                engine.add_to_group(door.body(), PhysicsGroup::Doors);
                door
            })
            .collect();

        Self {
            dimensions,
            walls,
            doors,
        }
    }

    /// Footprint of the camp.
    #[must_use]
    pub const fn dimensions(&self) -> BasecampDimensions {
        self.dimensions
    }

    /// Wall segments.
    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Both doors, top first.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Door owning `body`.
    #[must_use]
    pub fn door(&self, body: BodyHandle) -> Option<&Door> {
        self.doors.iter().find(|door| door.body() == body)
    }

    /// Applies a slime strike to the door owning `body`.
    ///
    /// Returns `false` for unknown bodies and broken doors.
    pub fn damage_door(
        &mut self,
        engine: &mut dyn Engine,
        body: BodyHandle,
        amount: u32,
        out: &mut Vec<Event>,
    ) -> bool {
        match self.doors.iter_mut().find(|door| door.body() == body) {
            Some(door) => door.take_damage(engine, amount, out),
            None => false,
        }
    }

    /// Reports whether every door is broken. A camp without doors never is.
    #[must_use]
    pub fn are_all_doors_destroyed(&self) -> bool {
        !self.doors.is_empty() && self.doors.iter().all(Door::is_destroyed)
    }

    /// Removes walls and doors from the world.
    pub fn shutdown(&mut self, engine: &mut dyn Engine) {
        for wall in self.walls.drain(..) {
            engine.destroy_body(wall.body);
        }
        for door in self.doors.drain(..) {
            engine.destroy_body(door.body());
        }
    }
}

impl BasecampQuery for Basecamp {
    fn nearest_intact_door(&self, from: Vec2) -> Option<DoorSighting> {
        self.doors
            .iter()
            .filter(|door| !door.is_destroyed())
            .map(|door| DoorSighting {
                door: door.body(),
                position: door.position(),
                distance: from.distance(door.position()),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn is_door_intact(&self, door: BodyHandle) -> bool {
        self.door(door).is_some_and(|door| !door.is_destroyed())
    }
}

/// Visual, centre, and size of every wall segment.
///
/// Top and bottom walls leave a `door_width` gap at the centre; side walls
/// fill the height between them.
fn wall_layout(
    dimensions: &BasecampDimensions,
    config: &BasecampConfig,
) -> Vec<(&'static str, Vec2, Vec2)> {
    let center = dimensions.center;
    let half = dimensions.half_extents();
    let thickness = config.wall_thickness;
    let left = center.x - half.x;
    let right = center.x + half.x;
    let top = center.y - half.y;
    let bottom = center.y + half.y;

    let gap_start = center.x - config.door_width * 0.5;
    let gap_end = center.x + config.door_width * 0.5;
    let left_width = gap_start - left;
    let right_width = right - gap_end;
    let side_height = dimensions.height - 2.0 * thickness;

    let mut layout = Vec::with_capacity(6);
    for y in [top + thickness * 0.5, bottom - thickness * 0.5] {
        layout.push((
            "wall",
            Vec2::new(left + left_width * 0.5, y),
            Vec2::new(left_width, thickness),
        ));
        layout.push((
            "wall",
            Vec2::new(gap_end + right_width * 0.5, y),
            Vec2::new(right_width, thickness),
        ));
    }
    for x in [left + thickness * 0.5, right - thickness * 0.5] {
        layout.push((
            "wall-vertical",
            Vec2::new(x, center.y),
            Vec2::new(thickness, side_height),
        ));
    }
    layout
}
