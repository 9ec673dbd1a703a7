//! Move, action and value networks using Burn framework

use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;
use burn::tensor::activation::{log_softmax, softmax};

/// Shape of the hidden stack shared by all three networks
#[derive(Debug, Config)]
pub struct NetworkConfig {
    /// Hidden layer width
    pub hidden_size: usize,
    /// Number of hidden layers (at least one)
    pub num_layers: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_size: 128,
            num_layers: 2,
        }
    }
}

/// A network producing one logit per discrete choice.
pub trait PolicyNetwork<B: Backend>: Module<B> {
    /// states: [batch, state_dim] -> logits [batch, count]
    fn logits(&self, states: Tensor<B, 2>) -> Tensor<B, 2>;
}

/// A network producing a scalar state value.
pub trait ValueNetwork<B: Backend>: Module<B> {
    /// states: [batch, state_dim] -> values [batch]
    fn value(&self, states: Tensor<B, 2>) -> Tensor<B, 1>;
}

/// Policy head used for both the move and the action channel
#[derive(Module, Debug)]
pub struct PolicyNet<B: Backend> {
    input: Linear<B>,
    hidden: Vec<Linear<B>>,
    /// Logits for each choice
    output: Linear<B>,
    activation: Relu,
}

impl<B: Backend> PolicyNet<B> {
    pub fn new(device: &B::Device, state_dim: usize, count: usize, config: &NetworkConfig) -> Self {
        let (input, hidden) = hidden_stack(device, state_dim, config);
        let output = LinearConfig::new(config.hidden_size, count).init(device);

        Self {
            input,
            hidden,
            output,
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> PolicyNetwork<B> for PolicyNet<B> {
    fn logits(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = self.activation.forward(self.input.forward(states));

        for layer in &self.hidden {
            x = self.activation.forward(layer.forward(x));
        }

        self.output.forward(x)
    }
}

/// Critic estimating the value of a state
#[derive(Module, Debug)]
pub struct ValueNet<B: Backend> {
    input: Linear<B>,
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
    activation: Relu,
}

impl<B: Backend> ValueNet<B> {
    pub fn new(device: &B::Device, state_dim: usize, config: &NetworkConfig) -> Self {
        let (input, hidden) = hidden_stack(device, state_dim, config);
        let output = LinearConfig::new(config.hidden_size, 1).init(device);

        Self {
            input,
            hidden,
            output,
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> ValueNetwork<B> for ValueNet<B> {
    fn value(&self, states: Tensor<B, 2>) -> Tensor<B, 1> {
        let mut x = self.activation.forward(self.input.forward(states));

        for layer in &self.hidden {
            x = self.activation.forward(layer.forward(x));
        }

        self.output.forward(x).squeeze(1)
    }
}

fn hidden_stack<B: Backend>(
    device: &B::Device,
    state_dim: usize,
    config: &NetworkConfig,
) -> (Linear<B>, Vec<Linear<B>>) {
    let input = LinearConfig::new(state_dim, config.hidden_size).init(device);

    let hidden = (0..config.num_layers.saturating_sub(1))
        .map(|_| LinearConfig::new(config.hidden_size, config.hidden_size).init(device))
        .collect();

    (input, hidden)
}

/// Normalised choice probabilities, [batch, count]
pub fn probabilities<B: Backend>(logits: Tensor<B, 2>) -> Tensor<B, 2> {
    softmax(logits, 1)
}

/// Log-probability of `index` under the categorical distribution of the
/// first row of `logits`, shape [1].
pub fn log_prob<B: Backend>(logits: Tensor<B, 2>, index: usize) -> Tensor<B, 1> {
    log_softmax(logits, 1)
        .slice([0..1, index..index + 1])
        .reshape([1])
}

/// Inverse-CDF categorical sample for a uniform draw in [0, 1).
///
/// Falls back to the last index with non-zero mass when rounding leaves the
/// cumulative sum short of `draw`.
pub fn sample_index(probs: &[f32], draw: f32) -> usize {
    let mut cumulative = 0.0;
    let mut fallback = 0;

    for (index, &p) in probs.iter().enumerate() {
        if p > 0.0 {
            fallback = index;
        }
        cumulative += p;
        if draw < cumulative {
            return index;
        }
    }

    fallback
}
