//! Per-tick observation of the boss fight

/// Scalar game context read alongside the state tensor each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BossContext {
    /// Player soul meter
    pub soul: u32,
    /// Hornet horizontal position
    pub hornet_x: f32,
    /// Hornet vertical position
    pub hornet_y: f32,
    /// Player horizontal position
    pub player_x: f32,
    /// Hornet's first skill is active
    pub hornet_skill1: bool,
}

impl BossContext {
    pub fn new(
        soul: u32,
        hornet_x: f32,
        hornet_y: f32,
        player_x: f32,
        hornet_skill1: bool,
    ) -> Self {
        Self {
            soul,
            hornet_x,
            hornet_y,
            player_x,
            hornet_skill1,
        }
    }

    /// Horizontal distance between player and hornet
    pub fn distance(&self) -> f32 {
        (self.player_x - self.hornet_x).abs()
    }

    /// Signed offset of the player relative to the hornet
    pub fn direction(&self) -> f32 {
        self.player_x - self.hornet_x
    }
}

/// Everything the environment hands the agent for one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObservation {
    /// Feature encoding of the frame, `state_dim` long
    pub state: Vec<f32>,
    pub context: BossContext,
}

impl GameObservation {
    pub fn new(state: Vec<f32>, context: BossContext) -> Self {
        Self { state, context }
    }
}
