// Search graph vertices and the open-set ordering.
//
// Nodes live in a per-job arena (`Vec<Node>`) and refer to their parent by
// `NodeId` index, so the implicit search tree is plain data with no
// reference lifetimes. Nodes are created when a position is first reached,
// re-parented in place while still open if a cheaper route turns up, and
// frozen once closed. The whole arena is dropped with the job.
//
// The open set is a `BinaryHeap<OpenEntry>` with reversed ordering (same
// min-heap pattern as the event queue): lowest score first, then lowest
// heuristic, then earliest insertion. Re-scoring an open node pushes a new
// entry and bumps the node's `version`; entries whose version no longer
// matches are skipped on pop, which is equivalent to remove + reinsert.

use familiar_voxel::BlockPos;
use std::cmp::Ordering;

/// Index of a node in its job's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A candidate position in the search graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: BlockPos,
    pub parent: Option<NodeId>,
    /// Accumulated path cost from the start (`g`).
    pub cost: f64,
    /// Estimated remaining cost (`h`).
    pub heuristic: f64,
    /// `cost + heuristic`.
    pub score: f64,
    /// Number of steps from the start.
    pub steps: u32,
    pub ladder: bool,
    pub swimming: bool,
    pub on_rails: bool,
    /// Synthetic transition node for a non-atomic vertical move; never a resting spot.
    pub corner: bool,
    pub closed: bool,
    /// Insertion order, 1-based.
    pub counter_added: u32,
    /// Expansion order, 1-based; 0 until expanded.
    pub counter_visited: u32,
    /// Bumped whenever the node is re-scored, invalidating older heap entries.
    pub(crate) version: u32,
}

impl Node {
    /// The root node of a search.
    pub fn start(pos: BlockPos, heuristic: f64) -> Self {
        Self {
            pos,
            parent: None,
            cost: 0.0,
            heuristic,
            score: heuristic,
            steps: 0,
            ladder: false,
            swimming: false,
            on_rails: false,
            corner: false,
            closed: false,
            counter_added: 0,
            counter_visited: 0,
            version: 0,
        }
    }

    pub fn child(parent: (NodeId, &Node), pos: BlockPos, cost: f64, heuristic: f64) -> Self {
        Self {
            parent: Some(parent.0),
            cost,
            heuristic,
            score: cost + heuristic,
            steps: parent.1.steps + 1,
            ..Self::start(pos, heuristic)
        }
    }
}

/// Entry in the open set (min-heap via reversed ordering).
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
    pub score: f64,
    pub heuristic: f64,
    pub counter_added: u32,
    pub node: NodeId,
    pub version: u32,
}

impl OpenEntry {
    pub fn for_node(id: NodeId, node: &Node) -> Self {
        Self {
            score: node.score,
            heuristic: node.heuristic,
            counter_added: node.counter_added,
            node: id,
            version: node.version,
        }
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: the smallest key is "greatest".
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.heuristic.total_cmp(&self.heuristic))
            .then_with(|| other.counter_added.cmp(&self.counter_added))
            .then_with(|| other.version.cmp(&self.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn entry(score: f64, heuristic: f64, counter: u32) -> OpenEntry {
        OpenEntry {
            score,
            heuristic,
            counter_added: counter,
            node: NodeId(counter),
            version: 0,
        }
    }

    #[test]
    fn heap_pops_lowest_score_then_heuristic_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(5.0, 1.0, 1));
        heap.push(entry(3.0, 2.0, 2));
        heap.push(entry(3.0, 1.0, 3));
        heap.push(entry(3.0, 1.0, 4));
        heap.push(entry(7.0, 0.0, 5));

        let order: Vec<u32> = std::iter::from_fn(|| heap.pop().map(|e| e.counter_added)).collect();
        assert_eq!(order, vec![3, 4, 2, 1, 5]);
    }

    #[test]
    fn child_inherits_step_count() {
        let root = Node::start(BlockPos::new(0, 1, 0), 4.0);
        let child = Node::child((NodeId(0), &root), BlockPos::new(1, 1, 0), 1.0, 3.0);
        assert_eq!(child.parent, Some(NodeId(0)));
        assert_eq!(child.steps, 1);
        assert_eq!(child.score, 4.0);
        assert!(!child.closed);
    }
}
