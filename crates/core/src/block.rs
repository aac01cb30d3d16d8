//! Block header information visible to transaction execution.

use serde::{Deserialize, Serialize};

/// Height and time of the block currently being executed.
///
/// `time` is the proposer-assigned block time in unix seconds. Execution
/// never reads the wall clock, so every node sees the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height (0 for genesis).
    pub height: i64,
    /// Unix timestamp in seconds.
    pub time: i64,
}

impl BlockHeader {
    pub fn new(height: i64, time: i64) -> Self {
        Self { height, time }
    }

    /// Header of the block following this one. Block time never goes
    /// backwards, so an earlier `time` is clamped to the current one.
    pub fn next(&self, time: i64) -> Self {
        Self {
            height: self.height + 1,
            time: time.max(self.time),
        }
    }
}
