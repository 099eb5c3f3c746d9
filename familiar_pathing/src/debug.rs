// Per-job diagnostic capture of the explored search graph.
//
// When a job is built with `with_debug_capture()`, it records which
// positions were discovered, expanded, and finally used by the path. The
// capture belongs to the job and is handed back inside `SearchOutcome`; no
// global state is involved, so concurrent jobs never share a capture.
//
// Sets are `BTreeSet`s so dumps and comparisons are ordered and stable.

use familiar_voxel::BlockPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugCapture {
    /// Discovered but never expanded.
    pub not_visited: BTreeSet<BlockPos>,
    /// Expanded, not on the final path.
    pub visited: BTreeSet<BlockPos>,
    /// On the final path.
    pub path: BTreeSet<BlockPos>,
}

impl DebugCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn discovered(&mut self, pos: BlockPos) {
        self.not_visited.insert(pos);
    }

    pub(crate) fn expanded(&mut self, pos: BlockPos) {
        self.not_visited.remove(&pos);
        self.visited.insert(pos);
    }

    pub(crate) fn on_path(&mut self, pos: BlockPos) {
        self.visited.remove(&pos);
        self.path.insert(pos);
    }

    /// Total distinct positions the search touched.
    pub fn total(&self) -> usize {
        self.not_visited.len() + self.visited.len() + self.path.len()
    }
}
