//! Per-patch boolean masks.

use std::ops::{BitAnd, BitOr, Deref, Index};

use serde::{Deserialize, Serialize};

/// One flag per patch for a single configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityMask(Vec<bool>);

impl VisibilityMask {
    /// All-false mask of length `len`.
    pub fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// All-true mask of length `len`.
    pub fn all(len: usize) -> Self {
        Self(vec![true; len])
    }

    /// Number of set entries.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// True if any entry is set.
    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }

    /// Indices of set entries, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// Set entry `index`.
    pub fn set(&mut self, index: usize, value: bool) {
        self.0[index] = value;
    }

    /// In-place logical OR with `other`.
    pub fn union_with(&mut self, other: &VisibilityMask) {
        debug_assert_eq!(self.len(), other.len());
        for (a, &b) in self.0.iter_mut().zip(&other.0) {
            *a |= b;
        }
    }

    /// True if every set entry of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &VisibilityMask) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(&a, &b)| !a || b)
    }

    /// Borrow the flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Take the flags.
    pub fn into_vec(self) -> Vec<bool> {
        self.0
    }
}

impl From<Vec<bool>> for VisibilityMask {
    fn from(v: Vec<bool>) -> Self {
        Self(v)
    }
}

impl FromIterator<bool> for VisibilityMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for VisibilityMask {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.0
    }
}

impl Index<usize> for VisibilityMask {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.0[index]
    }
}

impl BitAnd for &VisibilityMask {
    type Output = VisibilityMask;

    fn bitand(self, rhs: &VisibilityMask) -> VisibilityMask {
        debug_assert_eq!(self.len(), rhs.len());
        self.0.iter().zip(&rhs.0).map(|(&a, &b)| a && b).collect()
    }
}

impl BitOr for &VisibilityMask {
    type Output = VisibilityMask;

    fn bitor(self, rhs: &VisibilityMask) -> VisibilityMask {
        debug_assert_eq!(self.len(), rhs.len());
        self.0.iter().zip(&rhs.0).map(|(&a, &b)| a || b).collect()
    }
}
