//! Distance-keeping move rules

use tracing::debug;

use crate::state::BossContext;

/// Short move to the left (away from a hornet on the right, toward one on the left)
pub const MOVE_LEFT: usize = 0;
/// Short move to the right
pub const MOVE_RIGHT: usize = 1;
/// Reposition used when the player is right of the hornet
pub const REPOSITION_RIGHT: usize = 2;
/// Reposition used when the player is left of the hornet
pub const REPOSITION_LEFT: usize = 3;

/// Keep running while the skill is active and the hornet is closer than this
const SKILL_ESCAPE_RANGE: f32 = 6.0;
const CLOSE_RANGE: f32 = 2.5;
const MID_RANGE: f32 = 5.0;

/// Pick a move from the horizontal layout of the fight.
///
/// The far-range branch maps direction to index the opposite way from the
/// close-range branch, so the player walks back toward the hornet instead of
/// further away.
pub fn better_move(ctx: &BossContext) -> usize {
    let dist = ctx.distance();
    let right_of_hornet = ctx.direction() > 0.0;

    if ctx.hornet_skill1 {
        if dist < SKILL_ESCAPE_RANGE {
            debug!(dist, "skill active, escaping");
            return if right_of_hornet { MOVE_RIGHT } else { MOVE_LEFT };
        }
        debug!(dist, "skill active, holding distance");
        return if right_of_hornet {
            REPOSITION_RIGHT
        } else {
            REPOSITION_LEFT
        };
    }

    if dist < CLOSE_RANGE {
        if right_of_hornet { MOVE_RIGHT } else { MOVE_LEFT }
    } else if dist < MID_RANGE {
        if right_of_hornet {
            REPOSITION_RIGHT
        } else {
            REPOSITION_LEFT
        }
    } else if right_of_hornet {
        MOVE_LEFT
    } else {
        MOVE_RIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(hornet_x: f32, player_x: f32, skill: bool) -> BossContext {
        BossContext::new(0, hornet_x, 0.0, player_x, skill)
    }

    #[test]
    fn test_far_range_approaches() {
        // dist = 10, player right of hornet
        assert_eq!(better_move(&ctx(0.0, 10.0, false)), MOVE_LEFT);
        assert_eq!(better_move(&ctx(10.0, 0.0, false)), MOVE_RIGHT);
    }

    #[test]
    fn test_close_range_retreats() {
        assert_eq!(better_move(&ctx(0.0, 1.0, false)), MOVE_RIGHT);
        assert_eq!(better_move(&ctx(1.0, 0.0, false)), MOVE_LEFT);
    }

    #[test]
    fn test_far_and_close_mappings_are_inverted() {
        // Same direction, opposite index: intentional asymmetry between the
        // close and far branches.
        let close = better_move(&ctx(0.0, 2.0, false));
        let far = better_move(&ctx(0.0, 8.0, false));
        assert_ne!(close, far);
        assert_eq!(close, MOVE_RIGHT);
        assert_eq!(far, MOVE_LEFT);
    }

    #[test]
    fn test_mid_range_repositions() {
        assert_eq!(better_move(&ctx(0.0, 2.5, false)), REPOSITION_RIGHT);
        assert_eq!(better_move(&ctx(0.0, -4.9, false)), REPOSITION_LEFT);
    }

    #[test]
    fn test_skill_active() {
        assert_eq!(better_move(&ctx(0.0, 5.9, true)), MOVE_RIGHT);
        assert_eq!(better_move(&ctx(0.0, -5.9, true)), MOVE_LEFT);
        assert_eq!(better_move(&ctx(0.0, 6.0, true)), REPOSITION_RIGHT);
        assert_eq!(better_move(&ctx(0.0, -6.0, true)), REPOSITION_LEFT);
    }

    #[test]
    fn test_zero_direction_takes_negative_branch() {
        assert_eq!(better_move(&ctx(3.0, 3.0, false)), MOVE_LEFT);
        assert_eq!(better_move(&ctx(3.0, 3.0, true)), MOVE_LEFT);
    }
}
