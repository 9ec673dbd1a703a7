//! Local/target network pairs with their optimiser

use std::path::Path;

use burn::module::AutodiffModule;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::record::{BinBytesRecorder, FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::backend::AutodiffBackend;

use crate::error::{AgentError, Result};

/// A trained ("local") network and its stabilised ("target") copy.
///
/// The local network only changes through [`ApproximatorPair::step`]; the
/// target only changes through [`ApproximatorPair::sync_target`] or a
/// checkpoint load. The target lives on the inner backend and never tracks
/// gradients.
pub struct ApproximatorPair<B: AutodiffBackend, M: AutodiffModule<B>> {
    local: M,
    target: M::InnerModule,
    optimizer: OptimizerAdaptor<Adam, M, B>,
    learning_rate: f64,
}

impl<B: AutodiffBackend, M: AutodiffModule<B>> ApproximatorPair<B, M> {
    pub fn new(local: M, target: M::InnerModule, learning_rate: f64) -> Self {
        Self {
            local,
            target,
            optimizer: AdamConfig::new().init::<B, M>(),
            learning_rate,
        }
    }

    pub fn local(&self) -> &M {
        &self.local
    }

    pub fn target(&self) -> &M::InnerModule {
        &self.target
    }

    /// No-grad view of the local network for inference
    pub fn inference(&self) -> M::InnerModule {
        self.local.valid()
    }

    /// One optimiser step on the local network minimising `loss`
    pub fn step(&mut self, loss: Tensor<B, 1>) {
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.local);
        self.local = self
            .optimizer
            .step(self.learning_rate, self.local.clone(), grads);
    }

    /// Hard copy of the local parameters into the target
    pub fn sync_target(&mut self) {
        self.target = self.local.valid();
    }

    /// Serialised parameters of the local network
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        record_bytes::<B, M>(self.local.clone())
    }

    /// Serialised parameters of the target network
    pub fn target_snapshot(&self) -> Result<Vec<u8>> {
        record_bytes::<B::InnerBackend, M::InnerModule>(self.target.clone())
    }

    /// Write both networks to their artifact paths
    pub fn save(&self, local_path: &Path, target_path: &Path) -> Result<()> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.local
            .clone()
            .save_file(local_path, &recorder)
            .map_err(|source| AgentError::Checkpoint {
                path: local_path.to_path_buf(),
                source,
            })?;
        self.target
            .clone()
            .save_file(target_path, &recorder)
            .map_err(|source| AgentError::Checkpoint {
                path: target_path.to_path_buf(),
                source,
            })?;
        Ok(())
    }

    /// Decode both artifacts without touching the live networks
    pub fn read(
        &self,
        local_path: &Path,
        target_path: &Path,
        device: &B::Device,
    ) -> Result<StagedPair<B, M>> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let local = self
            .local
            .clone()
            .load_file(local_path, &recorder, device)
            .map_err(|source| AgentError::Checkpoint {
                path: local_path.to_path_buf(),
                source,
            })?;
        let target = self
            .target
            .clone()
            .load_file(target_path, &recorder, device)
            .map_err(|source| AgentError::Checkpoint {
                path: target_path.to_path_buf(),
                source,
            })?;
        Ok(StagedPair { local, target })
    }

    /// Swap in a pair decoded by [`ApproximatorPair::read`]
    pub fn install(&mut self, staged: StagedPair<B, M>) {
        self.local = staged.local;
        self.target = staged.target;
    }
}

/// Decoded networks waiting to be installed
pub struct StagedPair<B: AutodiffBackend, M: AutodiffModule<B>> {
    local: M,
    target: M::InnerModule,
}

fn record_bytes<B: Backend, M: Module<B>>(module: M) -> Result<Vec<u8>> {
    let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
    <BinBytesRecorder<FullPrecisionSettings> as Recorder<B>>::record(
        &recorder,
        module.into_record(),
        (),
    )
    .map_err(|err| AgentError::Approximator(format!("parameter snapshot failed: {err}")))
}
