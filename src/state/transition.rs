//! One step of experience handed to the learner

/// A single (s, m, a, r, s', done) step plus its discount.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: Vec<f32>,
    /// Move index taken, in `[0, move_count)`
    pub movement: usize,
    /// Action index taken, in `[0, action_count)`
    pub action: usize,
    pub reward: f32,
    pub next_state: Vec<f32>,
    /// Episode ended on this step
    pub done: bool,
    pub gamma: f32,
}

impl Transition {
    pub fn new(
        state: Vec<f32>,
        movement: usize,
        action: usize,
        reward: f32,
        next_state: Vec<f32>,
        done: bool,
        gamma: f32,
    ) -> Self {
        Self {
            state,
            movement,
            action,
            reward,
            next_state,
            done,
            gamma,
        }
    }
}
