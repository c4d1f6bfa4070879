// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! A deterministic skip list over `i64` keys.
//!
//! Instead of drawing tower heights at random, level membership is kept exact:
//! between any two consecutive keys of level `i + 1` there are between `1` and
//! `gap_bound` keys of level `i`. With the default bound of 3 this is the
//! classic 1-2-3 skip list. Insertion repairs an overflowing gap by promoting
//! its middle key, deletion repairs an empty gap by borrowing from or merging
//! with a neighbouring gap, so the height is logarithmic in the worst case.
//!
//! ```text
//! level 1  head ------------> [3] ------------------> end
//! level 0  head --> [1] --> [2] --> [3] --> [4] --> end
//! ```

mod cell;
mod gap;

use std::iter::FusedIterator;

use tracing::{
    debug,
    instrument,
    trace,
};

use self::cell::{
    Cell,
    CellId,
};
use crate::{
    arena::Arena,
    config::{
        Config,
        MAX_SUPPORTED_HEIGHT,
    },
    errs::StrataError,
    index::{
        OrderedIndex,
        Tower,
    },
    key::Key,
};

/// Per level, the rightmost cell whose key is below the target of a descent.
type Anchors = [CellId; MAX_SUPPORTED_HEIGHT];

#[derive(Debug)]
pub struct DeterministicSkipList {
    cells: Arena<Cell>,
    /// Header cell of every level, bottom to top. The last one is the
    /// top-left corner every descent starts from.
    heads: Vec<CellId>,
    end: CellId,
    bottom: CellId,
    gap_bound: usize,
    max_height: usize,
    len: usize,
}

impl DeterministicSkipList {
    pub fn new(config: Config) -> Result<Self, StrataError> {
        config.validate()?;

        let mut cells = Arena::new();
        let bottom = cells.alloc_with(|id| Cell::sentinel(Key::NegInf, id))?;
        let end = cells.alloc_with(|id| Cell::sentinel(Key::PosInf, id))?;
        let head = cells.alloc(Cell::new(Key::NegInf, bottom, end))?;

        // the level headers never outgrow this, so growing a level cannot fail
        let mut heads = Vec::new();
        heads.try_reserve_exact(config.max_height())?;
        heads.push(head);

        Ok(DeterministicSkipList {
            cells,
            heads,
            end,
            bottom,
            gap_bound: config.gap_bound(),
            max_height: config.max_height(),
            len: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        self.heads.len()
    }

    pub fn gap_bound(&self) -> usize {
        self.gap_bound
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    #[inline]
    fn key(&self, id: CellId) -> Key {
        self.cells[id].key
    }

    #[inline]
    fn right(&self, id: CellId) -> CellId {
        self.cells[id].right
    }

    #[inline]
    fn down(&self, id: CellId) -> CellId {
        self.cells[id].down
    }

    fn descend(&self, target: Key) -> Anchors {
        let mut anchors = [self.bottom; MAX_SUPPORTED_HEIGHT];
        let top = self.height() - 1;
        let mut x = self.heads[top];
        for level in (0..=top).rev() {
            while self.key(self.right(x)) < target {
                x = self.right(x);
            }
            anchors[level] = x;
            if level > 0 {
                x = self.down(x);
            }
        }
        anchors
    }

    /// Number of levels holding `target`, counted from level 0.
    fn tower_height(&self, anchors: &Anchors, target: Key) -> usize {
        (0..self.height())
            .take_while(|&level| self.key(self.right(anchors[level])) == target)
            .count()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn search(&self, key: i64) -> Option<Tower> {
        let anchors = self.descend(Key::from(key));
        let height = self.tower_height(&anchors, Key::from(key));
        (height > 0).then_some(Tower { key, height })
    }

    pub fn contains(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// Adds `key` at level 0 and promotes along the descent path until every
    /// gap is back within the bound.
    ///
    /// The cascade is measured before anything is touched: when it would need
    /// a level beyond `max_height` the insert fails with
    /// [`StrataError::HeightLimitExceeded`] and the list is unchanged. Room
    /// for every cell the cascade creates is reserved up front as well.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, key: i64) -> Result<bool, StrataError> {
        let target = Key::from(key);
        let anchors = self.descend(target);
        if self.key(self.right(anchors[0])) == target {
            trace!(key, "key already present");
            return Ok(false);
        }

        let promotions = self.promotion_depth(&anchors);
        let grows = promotions == self.height();
        if grows && self.height() == self.max_height {
            debug!(key, max_height = self.max_height, "insert would exceed height limit");
            return Err(StrataError::HeightLimitExceeded {
                max_height: self.max_height,
            });
        }
        self.cells.reserve(1 + promotions + usize::from(grows))?;

        let lower = anchors[0];
        let next = self.right(lower);
        let cell = self.cells.alloc(Cell::new(target, self.bottom, next))?;
        self.cells[lower].right = cell;
        self.len += 1;

        for level in 0..promotions {
            self.promote_middle(&anchors, level)?;
        }
        Ok(true)
    }

    /// Removes `key`, keeping every gap non-empty.
    ///
    /// A key standing on more than one level first hands its tower over to
    /// its level-0 predecessor, which always exists and always has height one
    /// because the gap left of a checkpoint is never empty. The cell that is
    /// actually unlinked is therefore always a level-0-only cell. Removal
    /// never allocates.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: i64) -> bool {
        let target = Key::from(key);
        let anchors = self.descend(target);
        let height = self.tower_height(&anchors, target);
        if height == 0 {
            trace!(key, "key not present");
            return false;
        }

        let pred = anchors[0];
        if height > 1 {
            let replacement = self.key(pred);
            assert!(
                !replacement.is_sentinel(),
                "tower of {} has no level-0 predecessor",
                key
            );
            for anchor in anchors.iter().take(height).skip(1) {
                let cell = self.right(*anchor);
                self.cells[cell].key = replacement;
            }
            let first = self.right(anchors[1]);
            self.cells[first].down = pred;
            trace!(key, ?replacement, height, "tower handed to predecessor");
        }

        let victim = self.right(pred);
        self.cells[pred].right = self.right(victim);
        self.cells.release(victim);
        self.len -= 1;

        self.rebalance_after_removal(&anchors);
        true
    }

    /// Releases every non-sentinel cell and every level but level 0.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        for level in (0..self.height()).rev() {
            let head = self.heads[level];
            let mut x = self.right(head);
            while x != self.end {
                let next = self.right(x);
                self.cells.release(x);
                x = next;
            }
            if level > 0 {
                self.cells.release(head);
            }
        }
        self.heads.truncate(1);
        let head = self.heads[0];
        self.cells[head].right = self.end;
        self.len = 0;
    }

    /// Level 0 keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            cells: &self.cells,
            cursor: self.right(self.heads[0]),
            remaining: self.len,
        }
    }

    fn level_keys(&self, level: usize) -> Vec<i64> {
        let mut keys = Vec::new();
        let mut x = self.right(self.heads[level]);
        while let Some(k) = self.key(x).finite() {
            keys.push(k);
            x = self.right(x);
        }
        keys
    }

    /// For each level, from the top down to level 0, the keys present at that
    /// level.
    pub fn levels(&self) -> Vec<Vec<i64>> {
        (0..self.height())
            .rev()
            .map(|level| self.level_keys(level))
            .collect()
    }

    /// Walks the whole grid and reports the first broken structural rule:
    /// ordering, down-links, gap bounds, key count, height cap, or cells that
    /// are allocated but no longer linked.
    pub fn check_invariants(&self) -> Result<(), StrataError> {
        let violation = |msg: String| Err(StrataError::InvariantViolation(msg));
        let height = self.height();
        if height == 0 || height > self.max_height {
            return violation(format!("height {} outside [1, {}]", height, self.max_height));
        }

        // sentinels, then every header and cell as the levels are walked
        let mut reachable = 2;
        for level in 0..height {
            let mut x = self.heads[level];
            let mut count = 0;
            while x != self.end {
                let next = self.right(x);
                if self.key(next) <= self.key(x) {
                    return violation(format!(
                        "level {} is not strictly increasing at {:?}",
                        level,
                        self.key(x)
                    ));
                }
                if level == 0 && x != self.heads[0] && self.down(x) != self.bottom {
                    return violation(format!("level 0 cell {:?} does not rest on bottom", self.key(x)));
                }
                count += 1;
                x = next;
            }
            reachable += count;
            // the header was counted as well
            count -= 1;
            if level == 0 && count != self.len {
                return violation(format!("level 0 holds {} keys, expected {}", count, self.len));
            }
            if level + 1 == height && count > self.gap_bound {
                return violation(format!("top level holds {} keys", count));
            }
            if level + 1 == height && height > 1 && count == 0 {
                return violation(format!("top level {} is empty", level));
            }
        }

        if reachable != self.cells.live() {
            return violation(format!(
                "{} cells are live but only {} are linked",
                self.cells.live(),
                reachable
            ));
        }

        for level in 1..height {
            let mut upper = self.heads[level];
            let mut lower = self.heads[level - 1];
            if self.down(upper) != lower {
                return violation(format!("header of level {} is not above level {}", level, level - 1));
            }
            loop {
                let next_upper = self.right(upper);
                let limit = self.key(next_upper);
                let mut gap = 0;
                let mut x = self.right(lower);
                while self.key(x) < limit {
                    gap += 1;
                    x = self.right(x);
                }
                if gap == 0 || gap > self.gap_bound {
                    return violation(format!(
                        "gap of {} keys at level {} before {:?}",
                        gap,
                        level - 1,
                        limit
                    ));
                }
                if next_upper == self.end {
                    break;
                }
                if self.down(next_upper) != x || self.key(x) != limit {
                    return violation(format!(
                        "level {} key {:?} has no copy directly below",
                        level, limit
                    ));
                }
                upper = next_upper;
                lower = x;
            }
        }
        Ok(())
    }
}

impl OrderedIndex for DeterministicSkipList {
    fn insert(&mut self, key: i64) -> Result<bool, StrataError> {
        DeterministicSkipList::insert(self, key)
    }

    fn search(&self, key: i64) -> Option<Tower> {
        DeterministicSkipList::search(self, key)
    }

    fn remove(&mut self, key: i64) -> bool {
        DeterministicSkipList::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn height(&self) -> usize {
        self.heads.len()
    }

    fn levels(&self) -> Vec<Vec<i64>> {
        DeterministicSkipList::levels(self)
    }

    fn keys(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

/// Iterator over the keys of a [`DeterministicSkipList`] in ascending order.
pub struct Iter<'a> {
    cells: &'a Arena<Cell>,
    cursor: CellId,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let cell = &self.cells[self.cursor];
        let key = cell.key.finite()?;
        self.cursor = cell.right;
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
