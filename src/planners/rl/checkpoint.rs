//! Six-artifact checkpoints keyed by a path prefix
//!
//! A checkpoint is only applied when every artifact is present; a partial set
//! is skipped so local and target networks never come from different runs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use burn::module::AutodiffModule;
use burn::tensor::backend::AutodiffBackend;
use tracing::{debug, info};

use crate::error::Result;

use super::learner::ActorCritic;
use super::policy::{PolicyNetwork, ValueNetwork};

/// File extension written by the named MessagePack recorder
pub const EXTENSION: &str = "mpk";

/// One of the six parameter sets in a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    MoveLocal,
    MoveTarget,
    ActionLocal,
    ActionTarget,
    ValueLocal,
    ValueTarget,
}

impl Artifact {
    pub const ALL: [Artifact; 6] = [
        Artifact::MoveLocal,
        Artifact::MoveTarget,
        Artifact::ActionLocal,
        Artifact::ActionTarget,
        Artifact::ValueLocal,
        Artifact::ValueTarget,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Artifact::MoveLocal => "-policy_move_local",
            Artifact::MoveTarget => "-policy_move_target",
            Artifact::ActionLocal => "-policy_action_local",
            Artifact::ActionTarget => "-policy_action_target",
            Artifact::ValueLocal => "-value_local",
            Artifact::ValueTarget => "-value_target",
        }
    }

    /// `<prefix><suffix>.mpk`
    pub fn path(self, prefix: &Path) -> PathBuf {
        let mut name = OsString::from(prefix.as_os_str());
        name.push(self.suffix());
        name.push(".");
        name.push(EXTENSION);
        PathBuf::from(name)
    }
}

/// Artifacts missing under `prefix`
pub fn missing(prefix: &Path) -> Vec<Artifact> {
    Artifact::ALL
        .into_iter()
        .filter(|artifact| !artifact.path(prefix).exists())
        .collect()
}

/// True when all six artifacts exist under `prefix`
pub fn is_complete(prefix: &Path) -> bool {
    missing(prefix).is_empty()
}

impl<B, P, V> ActorCritic<B, P, V>
where
    B: AutodiffBackend,
    P: AutodiffModule<B> + PolicyNetwork<B>,
    P::InnerModule: PolicyNetwork<B::InnerBackend>,
    V: AutodiffModule<B> + ValueNetwork<B>,
    V::InnerModule: ValueNetwork<B::InnerBackend>,
{
    /// Write all six networks under `prefix`, creating its directory if needed
    pub fn save(&self, prefix: &Path) -> Result<()> {
        if let Some(parent) = prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        self.move_policy.save(
            &Artifact::MoveLocal.path(prefix),
            &Artifact::MoveTarget.path(prefix),
        )?;
        self.action_policy.save(
            &Artifact::ActionLocal.path(prefix),
            &Artifact::ActionTarget.path(prefix),
        )?;
        self.value.save(
            &Artifact::ValueLocal.path(prefix),
            &Artifact::ValueTarget.path(prefix),
        )?;

        info!("Saved checkpoint to {}", prefix.display());
        Ok(())
    }

    /// Load all six networks from `prefix`.
    ///
    /// Returns `Ok(false)` without touching any network when an artifact is
    /// missing. Every artifact is decoded before the first one is installed,
    /// so an unreadable file also leaves the networks unchanged.
    pub fn load(&mut self, prefix: &Path) -> Result<bool> {
        let missing = missing(prefix);
        if !missing.is_empty() {
            debug!(?missing, "incomplete checkpoint at {}, skipped", prefix.display());
            return Ok(false);
        }

        let moves = self.move_policy.read(
            &Artifact::MoveLocal.path(prefix),
            &Artifact::MoveTarget.path(prefix),
            &self.device,
        )?;
        let actions = self.action_policy.read(
            &Artifact::ActionLocal.path(prefix),
            &Artifact::ActionTarget.path(prefix),
            &self.device,
        )?;
        let value = self.value.read(
            &Artifact::ValueLocal.path(prefix),
            &Artifact::ValueTarget.path(prefix),
            &self.device,
        )?;

        self.move_policy.install(moves);
        self.action_policy.install(actions);
        self.value.install(value);

        info!("Loaded checkpoint from {}", prefix.display());
        Ok(true)
    }
}
