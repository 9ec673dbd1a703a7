//! Epsilon-greedy blending of the learned policy with the heuristic fallback

use rand::Rng;
use tracing::debug;

/// Lowest value epsilon may take
pub const EPSILON_FLOOR: f64 = 0.03;

/// Which controller produced a channel's choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Policy,
    Heuristic,
}

/// Exploration threshold owned by one agent.
///
/// Every resolved channel decays the threshold once, so a full decision
/// (move and action) decays it twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Epsilon {
    value: f64,
    decrement: f64,
}

impl Epsilon {
    pub fn new(initial: f64, decrement: f64) -> Self {
        Self {
            value: initial.max(EPSILON_FLOOR),
            decrement,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn decrement(&self) -> f64 {
        self.decrement
    }

    /// Draws above the threshold keep the policy's proposal
    pub fn keeps_policy(&self, draw: f64) -> bool {
        draw > self.value
    }

    fn decay(&mut self) {
        self.value = (self.value - self.decrement).max(EPSILON_FLOOR);
    }

    /// Resolve one channel: draw, pick policy or heuristic, then decay.
    ///
    /// The heuristic is only consulted when the draw selects it.
    pub fn resolve<R, F>(
        &mut self,
        rng: &mut R,
        channel: &str,
        proposal: usize,
        heuristic: F,
    ) -> (usize, Source)
    where
        R: Rng,
        F: FnOnce(&mut R) -> usize,
    {
        let draw: f64 = rng.random();
        let resolved = if self.keeps_policy(draw) {
            (proposal, Source::Policy)
        } else {
            (heuristic(rng), Source::Heuristic)
        };

        debug!(
            channel,
            draw,
            epsilon = self.value,
            index = resolved.0,
            source = ?resolved.1,
            "channel resolved"
        );

        self.decay();
        resolved
    }
}
