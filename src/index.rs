// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use crate::errs::StrataError;

/// What a successful search reports: the key and how many levels it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tower {
    pub key: i64,
    pub height: usize,
}

/// The ordered-key-set contract shared by both engines.
///
/// A key is either absent or present. `insert` moves it to present and
/// `remove` moves it to absent; repeating either is the identity. `search` is a
/// pure read.
pub trait OrderedIndex {
    /// Adds `key`, returning `Ok(false)` when it was already present.
    fn insert(&mut self, key: i64) -> Result<bool, StrataError>;

    /// Looks `key` up without touching the structure.
    fn search(&self, key: i64) -> Option<Tower>;

    /// Drops `key`, returning `false` when it was not present.
    fn remove(&mut self, key: i64) -> bool;

    /// Number of keys present.
    fn len(&self) -> usize;

    /// Number of levels currently in use.
    fn height(&self) -> usize;

    /// The keys present at each level, from the top level down to level 0.
    fn levels(&self) -> Vec<Vec<i64>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// Level 0 in ascending order.
    fn keys(&self) -> Vec<i64> {
        self.levels().pop().unwrap_or_default()
    }
}
