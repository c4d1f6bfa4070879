// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Gap bookkeeping for the deterministic list.
//!
//! A gap at level `i` is the run of level-`i` cells strictly between two
//! consecutive level-`i + 1` checkpoints. The checkpoint on the left names the
//! gap: the gap starts after the checkpoint's own level-`i` copy (its `down`)
//! and runs until the key of the checkpoint's right neighbour. The top level
//! has no checkpoints above it and forms a single gap from its header to the
//! end sentinel.

use tracing::{
    debug,
    trace,
};

use super::{
    cell::{
        Cell,
        CellId,
    },
    Anchors,
    DeterministicSkipList,
};
use crate::{
    errs::StrataError,
    key::Key,
};

impl DeterministicSkipList {
    /// Where the level-`level` gap on the descent path starts and the key that
    /// closes it.
    pub(super) fn gap_on_path(&self, anchors: &Anchors, level: usize) -> (CellId, Key) {
        if level + 1 < self.height() {
            let checkpoint = anchors[level + 1];
            (self.down(checkpoint), self.key(self.right(checkpoint)))
        } else {
            (self.heads[level], Key::PosInf)
        }
    }

    /// Number of cells after `start` whose key is below `limit`.
    pub(super) fn gap_len(&self, start: CellId, limit: Key) -> usize {
        let mut count = 0;
        let mut x = self.right(start);
        while self.key(x) < limit {
            count += 1;
            x = self.right(x);
        }
        count
    }

    /// How many levels an insertion along `anchors` will promote into. Every
    /// gap on the path that already sits at the bound overflows in turn; the
    /// first one below the bound absorbs the cascade.
    pub(super) fn promotion_depth(&self, anchors: &Anchors) -> usize {
        (0..self.height())
            .take_while(|&level| {
                let (start, limit) = self.gap_on_path(anchors, level);
                self.gap_len(start, limit) == self.gap_bound
            })
            .count()
    }

    /// Splits the overflowing level-`level` gap on the path by lifting its
    /// middle cell one level up, growing a new top level when the gap is the
    /// top level itself.
    pub(super) fn promote_middle(&mut self, anchors: &Anchors, level: usize) -> Result<(), StrataError> {
        let (start, limit) = self.gap_on_path(anchors, level);
        debug_assert_eq!(self.gap_len(start, limit), self.gap_bound + 1);

        let mut middle = self.right(start);
        for _ in 0..(self.gap_bound + 1) / 2 {
            middle = self.right(middle);
        }
        let key = self.key(middle);

        if level + 1 < self.height() {
            let checkpoint = anchors[level + 1];
            let next = self.right(checkpoint);
            let promoted = self.cells.alloc(Cell::new(key, middle, next))?;
            self.cells[checkpoint].right = promoted;
            trace!(level = level + 1, ?key, "promoted middle of overflowing gap");
        } else {
            let promoted = self.cells.alloc(Cell::new(key, middle, self.end))?;
            let old_top = self.heads[level];
            let head = self.cells.alloc(Cell::new(Key::NegInf, old_top, promoted))?;
            self.heads.push(head);
            debug!(height = self.height(), ?key, "grew a new top level");
        }
        Ok(())
    }

    /// Restores the lower gap bound after a level-0 cell on the path of
    /// `anchors` was unlinked. Underflows are fixed by borrowing from a
    /// sibling gap when it can spare a key, or by merging with it, which
    /// shrinks the parent gap and may underflow it in turn.
    pub(super) fn rebalance_after_removal(&mut self, anchors: &Anchors) {
        let mut level = 0;
        loop {
            if level + 1 == self.height() {
                if level > 0 && self.right(self.heads[level]) == self.end {
                    if let Some(head) = self.heads.pop() {
                        self.cells.release(head);
                    }
                    debug!(height = self.height(), "dropped empty top level");
                }
                return;
            }

            let checkpoint = anchors[level + 1];
            let (start, limit) = (self.down(checkpoint), self.key(self.right(checkpoint)));
            if self.gap_len(start, limit) > 0 {
                return;
            }
            if !self.refill_gap(anchors, level) {
                return;
            }
            level += 1;
        }
    }

    /// Refills the empty level-`level` gap under `anchors[level + 1]`.
    /// Returns `true` when it had to merge, leaving one key fewer in the
    /// parent gap.
    fn refill_gap(&mut self, anchors: &Anchors, level: usize) -> bool {
        let checkpoint = anchors[level + 1];
        let (parent_start, parent_limit) = self.gap_on_path(anchors, level + 1);
        let right = self.right(checkpoint);

        if self.key(right) < parent_limit {
            let sibling_start = self.down(right);
            let sibling_limit = self.key(self.right(right));
            if self.gap_len(sibling_start, sibling_limit) >= 2 {
                // the checkpoint drops into our gap, the sibling's first key
                // takes its place
                let first = self.right(sibling_start);
                self.relabel(right, first);
                trace!(level, "borrowed from right sibling gap");
                return false;
            }
            self.cells[checkpoint].right = self.right(right);
            self.cells.release(right);
            trace!(level, "merged with right sibling gap");
            return true;
        }

        assert_ne!(
            checkpoint, parent_start,
            "empty gap at level {} has no sibling",
            level
        );
        let mut left = parent_start;
        while self.right(left) != checkpoint {
            left = self.right(left);
        }
        let sibling_start = self.down(left);
        let sibling_limit = self.key(checkpoint);
        if self.gap_len(sibling_start, sibling_limit) >= 2 {
            let mut last = self.right(sibling_start);
            while self.key(self.right(last)) < sibling_limit {
                last = self.right(last);
            }
            self.relabel(checkpoint, last);
            trace!(level, "borrowed from left sibling gap");
            return false;
        }
        self.cells[left].right = self.right(checkpoint);
        self.cells.release(checkpoint);
        trace!(level, "merged with left sibling gap");
        true
    }

    /// Moves the checkpoint `cell` so that it stands above `onto`.
    fn relabel(&mut self, cell: CellId, onto: CellId) {
        let key = self.key(onto);
        let target = &mut self.cells[cell];
        target.key = key;
        target.down = onto;
    }
}
