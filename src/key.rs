// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

/// A key as seen by the engines. Sentinels carry the infinite variants so every
/// `i64`, including `i64::MIN` and `i64::MAX`, stays usable as user data and
/// descents terminate on comparison alone.
///
/// The derived ordering follows declaration order: `NegInf < Finite(_) <
/// PosInf`, with finite keys compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Key {
    NegInf,
    Finite(i64),
    PosInf,
}

impl Key {
    /// The user key, or `None` for a sentinel.
    #[inline]
    pub(crate) fn finite(self) -> Option<i64> {
        match self {
            | Key::Finite(k) => Some(k),
            | Key::NegInf | Key::PosInf => None,
        }
    }

    #[inline]
    pub(crate) fn is_sentinel(self) -> bool {
        !matches!(self, Key::Finite(_))
    }
}

impl From<i64> for Key {
    #[inline]
    fn from(k: i64) -> Self {
        Key::Finite(k)
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn test_sentinels_bracket_extremes() {
        assert!(Key::NegInf < Key::Finite(i64::MIN));
        assert!(Key::Finite(i64::MAX) < Key::PosInf);
        assert!(Key::NegInf < Key::PosInf);
    }

    #[test]
    fn test_finite_ordering() {
        assert!(Key::Finite(-3) < Key::Finite(2));
        assert!(Key::Finite(7) < Key::from(8));
        assert_ne!(Key::PosInf, Key::Finite(i64::MAX));
    }

    #[test]
    fn test_finite_accessor() {
        assert_eq!(Key::from(11).finite(), Some(11));
        assert_eq!(Key::NegInf.finite(), None);
        assert!(Key::PosInf.is_sentinel());
        assert!(!Key::Finite(0).is_sentinel());
    }
}
