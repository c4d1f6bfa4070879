// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use crate::{
    arena::SlotId,
    key::Key,
};

pub(crate) type CellId = SlotId;

/// One square of the deterministic grid. `down` is the cell with the same key
/// one level lower (level-0 cells point at the bottom sentinel) and `right` is
/// the next cell on the same level, which is the end sentinel at the latest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cell {
    pub(crate) key: Key,
    pub(crate) down: CellId,
    pub(crate) right: CellId,
}

impl Cell {
    pub(crate) fn new(key: Key, down: CellId, right: CellId) -> Self {
        Cell { key, down, right }
    }

    /// A boundary cell whose links fold back onto itself.
    pub(crate) fn sentinel(key: Key, id: CellId) -> Self {
        Cell {
            key,
            down: id,
            right: id,
        }
    }
}
