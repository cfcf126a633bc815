//! The shortest-path search engine.

use std::collections::BinaryHeap;

use gridtrace_core::MatrixIndex;

use crate::error::TraceError;
use crate::projector::{Cost, CostPair, Projector};

/// Per-cell search state. Meaningful only once `open` or `closed` is set.
#[derive(Clone, Debug)]
struct Node<C> {
    /// Best known total cost from the source ("g score").
    cost_from_source: C,
    /// Discovered and costed, neighbors not yet expanded.
    open: bool,
    /// Finalized: `cost_from_source` is optimal, neighbors expanded.
    closed: bool,
    /// Flat index of the predecessor on the best known path. The source
    /// references itself, which terminates reconstruction.
    came_from: usize,
}

impl<C: Cost> Default for Node<C> {
    fn default() -> Self {
        Self {
            cost_from_source: C::ZERO,
            open: false,
            closed: false,
            came_from: usize::MAX,
        }
    }
}

/// Frontier entry ordered by estimated total cost; the insertion sequence
/// breaks ties first-in-first-out, reproducing ordered-multimap semantics
/// on top of a binary heap.
#[derive(Debug)]
struct Entry<C> {
    f: C,
    seq: u64,
    idx: usize,
}

impl<C: Cost> PartialEq for Entry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl<C: Cost> Eq for Entry<C> {}

impl<C: Cost> Ord for Entry<C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the max-heap pops the smallest key, oldest first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<C: Cost> PartialOrd for Entry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Traces minimum-cost paths on a projected surface, outward from a fixed
/// source cell.
///
/// The engine owns a dense per-cell state table sized to the projection and
/// a frontier ordered by estimated total cost. Cells move forward through
/// three states: unseen, open (discovered, tentative cost recorded) and
/// closed (cost finalized, neighbors expanded); a closed cell is never
/// revisited, which is what makes repeated [`trace`](Self::trace) queries
/// against one source cheap. Binding a different source means constructing
/// a new engine, as does mutating the projected surface.
#[derive(Debug)]
pub struct Pathfinder<P: Projector> {
    projector: P,
    source: MatrixIndex,
    height: usize,
    width: usize,
    nodes: Vec<Node<P::Cost>>,
    frontier: BinaryHeap<Entry<P::Cost>>,
    seq: u64,
    nbuf: Vec<CostPair<P::Cost>>,
}

impl<P: Projector> Pathfinder<P> {
    /// Bind an engine to `projector` and seed the search at `source`.
    ///
    /// The node table (one entry per cell of the projection) is allocated
    /// here, once. A source outside the projection bounds is reported as
    /// [`TraceError::OutOfDomain`], never coerced. A degenerate projection
    /// (zero height or width) constructs successfully with an empty
    /// reachable set.
    pub fn new(projector: P, source: MatrixIndex) -> Result<Self, TraceError> {
        let height = projector.height();
        let width = projector.width();
        let degenerate = height == 0 || width == 0;
        if !degenerate && (source.row >= height || source.column >= width) {
            return Err(TraceError::OutOfDomain {
                index: source,
                height,
                width,
            });
        }
        log::debug!("pathfinder bound to {height}x{width} projection, source {source}");

        let mut finder = Self {
            projector,
            source,
            height,
            width,
            nodes: vec![Node::default(); height * width],
            frontier: BinaryHeap::new(),
            seq: 0,
            nbuf: Vec::with_capacity(4),
        };
        if !degenerate {
            // Seed the source: zero cost, self-referencing predecessor.
            let start = source.row * width + source.column;
            finder.nodes[start].open = true;
            finder.nodes[start].came_from = start;
            let f = P::Cost::ZERO + finder.projector.distance(source, source);
            finder.push(f, start);
        }
        Ok(finder)
    }

    /// The cell every trace starts from.
    #[inline]
    pub fn source(&self) -> MatrixIndex {
        self.source
    }

    /// The projector the engine was bound to.
    #[inline]
    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Trace a minimum-cost path from the source to `target`.
    ///
    /// Convenience wrapper around [`trace_into`](Self::trace_into) that
    /// allocates the path buffer.
    pub fn trace(&mut self, target: MatrixIndex) -> Result<Vec<MatrixIndex>, TraceError> {
        let mut path = Vec::new();
        self.trace_into(target, &mut path)?;
        Ok(path)
    }

    /// Trace a minimum-cost path from the source to `target`, writing it
    /// into `out` in source-to-target order (both endpoints included; a
    /// trace to the source itself yields just the source).
    ///
    /// The frontier is expanded only as far as finalizing `target`
    /// requires; a target finalized by an earlier query reconstructs
    /// without any expansion, so repeated traces are deterministic and
    /// cheap. `out` is cleared on entry and left empty on failure.
    pub fn trace_into(
        &mut self,
        target: MatrixIndex,
        out: &mut Vec<MatrixIndex>,
    ) -> Result<(), TraceError> {
        out.clear();
        let Some(goal) = self.flat(target) else {
            return Err(TraceError::OutOfDomain {
                index: target,
                height: self.height,
                width: self.width,
            });
        };
        while !self.nodes[goal].closed {
            if !self.expand(target) {
                return Err(TraceError::Unreachable { target });
            }
        }
        self.reconstruct(goal, out);
        Ok(())
    }

    /// Drive the search until the frontier is empty, finalizing every cell
    /// reachable from the source.
    ///
    /// Amortizes the search when many targets share one source: subsequent
    /// traces to reachable targets reconstruct without expanding, and
    /// [`cost_to`](Self::cost_to) answers for every reachable cell. A
    /// second call once the frontier is empty is a no-op. Estimates anchor
    /// on the source index, the only cell the engine can always name.
    pub fn exhaust(&mut self) {
        let anchor = self.source;
        while self.expand(anchor) {}
    }

    /// The finalized cost of reaching `index` from the source.
    ///
    /// `None` for out-of-bounds cells and for cells not yet finalized;
    /// after [`exhaust`](Self::exhaust), every reachable cell answers.
    pub fn cost_to(&self, index: MatrixIndex) -> Option<P::Cost> {
        let i = self.flat(index)?;
        let node = &self.nodes[i];
        node.closed.then_some(node.cost_from_source)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    #[inline]
    fn flat(&self, index: MatrixIndex) -> Option<usize> {
        (index.row < self.height && index.column < self.width)
            .then(|| index.row * self.width + index.column)
    }

    #[inline]
    fn unflat(&self, flat: usize) -> MatrixIndex {
        MatrixIndex::new(flat / self.width, flat % self.width)
    }

    #[inline]
    fn push(&mut self, f: P::Cost, idx: usize) {
        self.frontier.push(Entry {
            f,
            seq: self.seq,
            idx,
        });
        self.seq += 1;
    }

    /// Pop the cheapest frontier entry and expand it: finalize the cell and
    /// discover or improve its neighbors. Entries whose cell was already
    /// finalized are stale and skipped. Returns `false` once the frontier
    /// is empty.
    fn expand(&mut self, target: MatrixIndex) -> bool {
        let Some(entry) = self.frontier.pop() else {
            return false;
        };
        let current = entry.idx;
        if self.nodes[current].closed {
            // Queued under an estimate that was improved before the pop.
            return true;
        }
        self.nodes[current].open = false;
        self.nodes[current].closed = true;

        let current_index = self.unflat(current);
        let current_cost = self.nodes[current].cost_from_source;

        let mut nbuf = std::mem::take(&mut self.nbuf);
        self.projector.neighbors(current_index, &mut nbuf);
        for &CostPair { index, cost } in nbuf.iter() {
            let Some(ni) = self.flat(index) else {
                continue;
            };
            if self.nodes[ni].closed {
                continue;
            }
            let candidate = current_cost + cost;
            if !self.nodes[ni].open {
                // Newly discovered.
                let f = candidate + self.projector.distance(index, target);
                let node = &mut self.nodes[ni];
                node.cost_from_source = candidate;
                node.came_from = current;
                node.open = true;
                self.push(f, ni);
            } else if candidate < self.nodes[ni].cost_from_source {
                // A better route to an open cell: improve it in place. Its
                // frontier entry keeps the old estimate and pops late,
                // carrying the improved cost with it.
                let node = &mut self.nodes[ni];
                node.cost_from_source = candidate;
                node.came_from = current;
            }
        }
        self.nbuf = nbuf;
        true
    }

    /// Walk predecessor links backward from a finalized `goal`, then
    /// reverse so the path reads source-to-target.
    fn reconstruct(&self, goal: usize, out: &mut Vec<MatrixIndex>) {
        let mut current = goal;
        loop {
            out.push(self.unflat(current));
            let parent = self.nodes[current].came_from;
            if parent == current {
                break;
            }
            current = parent;
        }
        out.reverse();
    }
}
