// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::iter::FusedIterator;

use tracing::{
    debug,
    instrument,
    trace,
};

use super::{
    level_generator::{
        GeometricalLevelGenerator,
        LevelGenerator,
    },
    skipnode::{
        NodeId,
        SkipNode,
    },
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

/// The probabilistic skip list. Every key gets a tower whose height is drawn
/// from a [`LevelGenerator`]; balance is expected rather than guaranteed.
///
/// The list is anchored by a header tower of `max_height` levels carrying
/// `-inf` and a tail carrying `+inf`, so every descent stops on comparison
/// alone and never walks past the tail.
#[derive(Debug)]
pub struct SkipList<G = GeometricalLevelGenerator> {
    nodes: Arena<SkipNode>,
    header: NodeId,
    tail: NodeId,
    /// Levels currently in use, `1..=max_height`. Never shrinks on removal.
    height: usize,
    max_height: usize,
    len: usize,
    generator: G,
}

impl SkipList<GeometricalLevelGenerator> {
    /// A list whose heights come from an entropy-seeded generator.
    pub fn new(config: Config) -> Result<Self, StrataError> {
        config.validate()?;
        let generator = GeometricalLevelGenerator::from_entropy(
            config.max_height(),
            config.level_probability(),
        )?;
        Self::with_generator(config, generator)
    }

    /// A list whose tower heights are reproducible from `seed`.
    pub fn seeded(config: Config, seed: u64) -> Result<Self, StrataError> {
        config.validate()?;
        let generator = GeometricalLevelGenerator::seeded(
            config.max_height(),
            config.level_probability(),
            seed,
        )?;
        Self::with_generator(config, generator)
    }
}

impl<G: LevelGenerator> SkipList<G> {
    /// A list drawing tower heights from `generator`. The generator may not
    /// produce towers taller than `config.max_height()`.
    pub fn with_generator(config: Config, generator: G) -> Result<Self, StrataError> {
        config.validate()?;
        let max_height = config.max_height();
        if generator.total() > max_height {
            return Err(StrataError::InvalidConfig(format!(
                "level generator produces up to {} levels but max_height is {}",
                generator.total(),
                max_height
            )));
        }

        let mut nodes = Arena::new();
        let tail = nodes.alloc(SkipNode::tail())?;
        let header = nodes.alloc(SkipNode::new(Key::NegInf, max_height, tail)?)?;

        Ok(SkipList {
            nodes,
            header,
            tail,
            height: 1,
            max_height,
            len: 0,
            generator,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// The last node per level whose key is below `target`, for every level in
    /// use. Entries at and above `self.height` are the header.
    fn descend(&self, target: Key) -> [NodeId; MAX_SUPPORTED_HEIGHT] {
        let mut update = [self.header; MAX_SUPPORTED_HEIGHT];
        let mut x = self.header;
        for level in (0..self.height).rev() {
            loop {
                let next = self.nodes[x].forward[level];
                if self.nodes[next].key < target {
                    x = next;
                } else {
                    break;
                }
            }
            update[level] = x;
        }
        update
    }

    /// Adds `key` with a freshly drawn tower height. Returns `Ok(false)`
    /// without drawing a height when the key is already present.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, key: i64) -> Result<bool, StrataError> {
        let target = Key::from(key);
        let update = self.descend(target);
        let successor = self.nodes[update[0]].forward[0];
        if self.nodes[successor].key == target {
            trace!(key, "key already present");
            return Ok(false);
        }

        let h = self.generator.random();
        assert!(
            (1..=self.max_height).contains(&h),
            "level generator returned height {} outside [1, {}]",
            h,
            self.max_height
        );

        let mut node = SkipNode::new(target, h, self.tail)?;
        for (level, link) in node.forward.iter_mut().enumerate() {
            *link = self.nodes[update[level]].forward[level];
        }
        let id = self.nodes.alloc(node)?;
        for (level, prev) in update.iter().enumerate().take(h) {
            self.nodes[*prev].forward[level] = id;
        }

        if h > self.height {
            debug!(from = self.height, to = h, "raising list height");
            self.height = h;
        }
        self.len += 1;
        Ok(true)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn search(&self, key: i64) -> Option<Tower> {
        let target = Key::from(key);
        let update = self.descend(target);
        let candidate = &self.nodes[self.nodes[update[0]].forward[0]];
        if candidate.key == target {
            Some(Tower {
                key,
                height: candidate.height(),
            })
        } else {
            None
        }
    }

    pub fn contains(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// Unlinks `key` from every level it occupies and releases its node.
    /// The list height is left alone, so emptied top levels simply point at
    /// the tail.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: i64) -> bool {
        let target = Key::from(key);
        let update = self.descend(target);
        let x = self.nodes[update[0]].forward[0];
        if self.nodes[x].key != target {
            trace!(key, "key not present");
            return false;
        }

        for level in 0..self.nodes[x].height() {
            if self.nodes[update[level]].forward[level] != x {
                break;
            }
            let next = self.nodes[x].forward[level];
            self.nodes[update[level]].forward[level] = next;
        }
        self.nodes.release(x);
        self.len -= 1;
        true
    }

    /// Releases every node. Sentinels, the height cap and the generator stay.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        let mut x = self.nodes[self.header].forward[0];
        while x != self.tail {
            let next = self.nodes[x].forward[0];
            self.nodes.release(x);
            x = next;
        }
        let tail = self.tail;
        self.nodes[self.header].forward.fill(tail);
        self.height = 1;
        self.len = 0;
    }

    /// Level 0 keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[self.header].forward[0],
            remaining: self.len,
        }
    }

    /// The keys at `level`, in ascending order.
    fn level_keys(&self, level: usize) -> Vec<i64> {
        let mut keys = Vec::new();
        let mut x = self.nodes[self.header].forward[level];
        while x != self.tail {
            let node = &self.nodes[x];
            if let Some(k) = node.key.finite() {
                keys.push(k);
            }
            x = node.forward[level];
        }
        keys
    }

    /// For each level in use, from the top down to level 0, the keys present
    /// at that level.
    pub fn levels(&self) -> Vec<Vec<i64>> {
        (0..self.height)
            .rev()
            .map(|level| self.level_keys(level))
            .collect()
    }
}

impl<G: LevelGenerator> OrderedIndex for SkipList<G> {
    fn insert(&mut self, key: i64) -> Result<bool, StrataError> {
        SkipList::insert(self, key)
    }

    fn search(&self, key: i64) -> Option<Tower> {
        SkipList::search(self, key)
    }

    fn remove(&mut self, key: i64) -> bool {
        SkipList::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn height(&self) -> usize {
        self.height
    }

    fn levels(&self) -> Vec<Vec<i64>> {
        SkipList::levels(self)
    }

    fn keys(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

/// Iterator over the keys of a [`SkipList`] in ascending order.
pub struct Iter<'a> {
    nodes: &'a Arena<SkipNode>,
    cursor: NodeId,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let node = &self.nodes[self.cursor];
        let key = node.key.finite()?;
        self.cursor = node.forward[0];
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
