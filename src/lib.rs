// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Ordered, searchable indexes over `i64` keys built as leveled linked
//! structures.
//!
//! Two engines share the [`OrderedIndex`] contract:
//!
//! - [`SkipList`] draws a random tower height for every key; balance is
//!   expected.
//! - [`DeterministicSkipList`] keeps every gap between consecutive
//!   higher-level keys within a fixed bound; balance is guaranteed.
//!
//! Both keep their nodes in a flat arena addressed by handles and are meant
//! for exclusive, single-threaded use.

/// Construction-time settings and their validation.
pub mod config;
/// The deterministic, gap-bounded [`skip list`] variant.
///
/// [`skip list`]: https://en.wikipedia.org/wiki/Skip_list
pub mod deterministic;
pub mod errs;
pub mod index;
/// The probabilistic [`skip list`], with pluggable level generators.
///
/// [`skip list`]: https://en.wikipedia.org/wiki/Skip_list
pub mod skiplist;

mod arena;
mod key;
mod test;

pub use crate::{
    config::Config,
    deterministic::DeterministicSkipList,
    errs::StrataError,
    index::{
        OrderedIndex,
        Tower,
    },
    skiplist::{
        GeometricalLevelGenerator,
        LevelGenerator,
        SkipList,
    },
};
