//! Stage occupancy of the pipeline.
//!
//! A [`PipelineState`] is a fixed-length row of activation flags. The token
//! representing the in-flight command is always a leading run of `true`
//! values; every flag after it is `false`.

use std::iter;
use std::num::NonZeroUsize;

/// Ordered stage flags, entry stage first, exit stage last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    flags: Vec<bool>,
}

impl PipelineState {
    /// A pipeline of `stage_count` dark stages.
    pub fn reset(stage_count: NonZeroUsize) -> Self {
        Self {
            flags: vec![false; stage_count.get()],
        }
    }

    /// Shift every flag one stage towards the exit and light the entry stage.
    ///
    /// The exit-stage flag falls off the end, so the length is unchanged.
    pub fn advance(&self) -> Self {
        let keep = self.flags.len() - 1;
        let flags = iter::once(true)
            .chain(self.flags[..keep].iter().copied())
            .collect();
        Self { flags }
    }

    /// Whether the token has reached the exit stage.
    pub fn exit_active(&self) -> bool {
        self.flags.last().copied().unwrap_or(false)
    }

    /// Number of lit stages.
    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|lit| **lit).count()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Always false; a pipeline has at least one stage.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}
