//! Attack and spell rules

use rand::Rng;
use tracing::debug;

use crate::state::BossContext;

/// Answer to the hornet's skill at range
pub const SKILL_RESPONSE_ACTION: usize = 1;
/// Soul-consuming spell
pub const SOUL_SPELL_ACTION: usize = 4;
/// Actions that spend soul; excluded from random picks when soul is low
pub const SOUL_ACTIONS: [usize; 2] = [4, 5];
/// Actions picked between at mid range
pub const MID_RANGE_ACTIONS: [usize; 2] = [2, 3];
/// Default action at close range and beyond mid range
pub const CLOSE_ACTION: usize = 6;

/// Soul needed to cast a spell
pub const SPELL_SOUL_COST: u32 = 33;

/// Hornet height above which she is treated as airborne
const AIRBORNE_HEIGHT: f32 = 32.0;
/// Hornet height above which a spell is worth casting
const SPELL_HEIGHT: f32 = 34.0;

/// Pick an action from the fight context.
///
/// Randomness is only used to break ties between equally good attacks.
pub fn better_action<R: Rng>(ctx: &BossContext, action_count: usize, rng: &mut R) -> usize {
    let dist = ctx.distance();

    if ctx.hornet_skill1 {
        return if dist < 3.0 {
            CLOSE_ACTION
        } else {
            SKILL_RESPONSE_ACTION
        };
    }

    if ctx.hornet_y > SPELL_HEIGHT && dist < 5.0 && ctx.soul >= SPELL_SOUL_COST {
        debug!(soul = ctx.soul, "casting spell");
        return SOUL_SPELL_ACTION;
    }

    if dist < 1.5 {
        CLOSE_ACTION
    } else if dist < 5.0 {
        if ctx.hornet_y > AIRBORNE_HEIGHT {
            CLOSE_ACTION
        } else {
            random_attack(ctx.soul, action_count, rng)
        }
    } else if dist < 12.0 {
        MID_RANGE_ACTIONS[rng.random_range(0..MID_RANGE_ACTIONS.len())]
    } else {
        CLOSE_ACTION
    }
}

/// Uniform pick over the action range, skipping soul actions the player
/// cannot afford. Index 0 is never excluded so the candidate set is never empty.
fn random_attack<R: Rng>(soul: u32, action_count: usize, rng: &mut R) -> usize {
    let candidates: Vec<usize> = (0..action_count.max(1))
        .filter(|index| soul >= SPELL_SOUL_COST || !SOUL_ACTIONS.contains(index))
        .collect();

    let action = candidates[rng.random_range(0..candidates.len())];
    debug!(action, candidates = candidates.len(), "random attack");
    action
}
