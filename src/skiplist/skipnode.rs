// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use crate::{
    arena::SlotId,
    errs::StrataError,
    key::Key,
};

pub(crate) type NodeId = SlotId;

/// A tower in the probabilistic list. `forward[i]` is the successor at level
/// `i`, so the tower height is `forward.len()`. Every link of a linked node
/// lands on a real node or on the tail sentinel.
#[derive(Debug)]
pub(crate) struct SkipNode {
    pub(crate) key: Key,
    pub(crate) forward: Vec<NodeId>,
}

impl SkipNode {
    /// A tower of `height` levels with every link aimed at `target`.
    pub(crate) fn new(key: Key, height: usize, target: NodeId) -> Result<Self, StrataError> {
        let mut forward = Vec::new();
        forward.try_reserve_exact(height)?;
        forward.resize(height, target);
        Ok(SkipNode { key, forward })
    }

    /// The tail sentinel has no levels of its own.
    pub(crate) fn tail() -> Self {
        SkipNode {
            key: Key::PosInf,
            forward: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }
}
