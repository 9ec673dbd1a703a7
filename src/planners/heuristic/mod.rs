//! Rule-based fallback controller
//!
//! Pure functions of the scalar fight context. No learned parameters; the
//! only randomness is tie-breaking between equally good attacks.

mod combat;
mod movement;

use rand::Rng;
use tracing::debug;

use crate::state::BossContext;

pub use combat::{
    CLOSE_ACTION, MID_RANGE_ACTIONS, SKILL_RESPONSE_ACTION, SOUL_ACTIONS, SOUL_SPELL_ACTION,
    SPELL_SOUL_COST, better_action,
};
pub use movement::{MOVE_LEFT, MOVE_RIGHT, REPOSITION_LEFT, REPOSITION_RIGHT, better_move};

/// Heuristic controller bound to the agent's channel sizes.
///
/// The rules speak a fixed vocabulary of four moves and seven actions; when a
/// channel is configured smaller, choices are clamped to its last index.
#[derive(Debug, Clone, Copy)]
pub struct BossHeuristic {
    move_count: usize,
    action_count: usize,
}

impl BossHeuristic {
    pub fn new(move_count: usize, action_count: usize) -> Self {
        Self {
            move_count,
            action_count,
        }
    }

    pub fn choose_move(&self, ctx: &BossContext) -> usize {
        clamp_index(better_move(ctx), self.move_count, "move")
    }

    pub fn choose_action<R: Rng>(&self, ctx: &BossContext, rng: &mut R) -> usize {
        clamp_index(
            better_action(ctx, self.action_count, rng),
            self.action_count,
            "action",
        )
    }
}

fn clamp_index(index: usize, count: usize, channel: &str) -> usize {
    let last = count.saturating_sub(1);
    if index > last {
        debug!(channel, index, count, "heuristic index clamped");
        last
    } else {
        index
    }
}
