//! Stand-in for a human player.
//!
//! The autopilot walks to the nearest chicken, otherwise to the nearest free
//! build spot once a tower is affordable, otherwise back to the basecamp. The
//! player fights on its own, so steering is all it has to do.

use basecamp_defence_core::{ControlInput, Spatial, Vec2};
use basecamp_defence_system_session::Session;

/// Distance at which a goal counts as reached.
const ARRIVAL_RADIUS: f32 = 4.0;

/// What the autopilot is walking toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Goal {
    Chicken(Vec2),
    BuildSpot(Vec2),
    Basecamp(Vec2),
}

impl Goal {
    fn position(self) -> Vec2 {
        match self {
            Self::Chicken(at) | Self::BuildSpot(at) | Self::Basecamp(at) => at,
        }
    }

    fn same_kind(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// Steering state carried between frames.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    goal: Option<Goal>,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Input for the next frame.
    pub(crate) fn steer(&mut self, session: &Session) -> ControlInput {
        let world = session.world();
        let Some(player) = world.position(session.player().body()) else {
            return ControlInput::idle();
        };

        let chickens: Vec<Vec2> = session
            .chickens()
            .into_iter()
            .filter_map(|chicken| world.position(chicken))
            .collect();
        let spots: Vec<Vec2> = session
            .build_spots()
            .iter()
            .filter(|spot| !spot.is_built())
            .map(|spot| spot.position())
            .collect();
        let affordable = session.chicken_count() >= session.tower_cost();
        let home = session.basecamp().dimensions().center;

        let goal = choose_goal(player, &chickens, &spots, affordable, home);
        if !self.goal.is_some_and(|previous| previous.same_kind(goal)) {
            log::debug!("autopilot heading for {goal:?}");
        }
        self.goal = Some(goal);

        let offset = goal.position() - player;
        if offset.length() <= ARRIVAL_RADIUS {
            ControlInput::idle()
        } else {
            ControlInput::toward(offset)
        }
    }
}

pub(crate) fn choose_goal(
    player: Vec2,
    chickens: &[Vec2],
    spots: &[Vec2],
    affordable: bool,
    home: Vec2,
) -> Goal {
    if let Some(chicken) = nearest(player, chickens) {
        return Goal::Chicken(chicken);
    }
    if affordable {
        if let Some(spot) = nearest(player, spots) {
            return Goal::BuildSpot(spot);
        }
    }
    Goal::Basecamp(home)
}

fn nearest(from: Vec2, candidates: &[Vec2]) -> Option<Vec2> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
}
