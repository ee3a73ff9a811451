/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use crate::error::ArrayError;

/// An ordered selection of `K` distinct axes of an array of some
/// arity `D`.
///
/// Selections are validated once, on construction; every operation
/// that takes an `Axes` (fixing, traversal) relies on the
/// selection being duplicate free and in range and does not check
/// again.
///
/// The order of the selection is significant for traversal: the
/// last selected axis varies fastest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Axes<const K: usize> {
    axes: [usize; K],
}

impl<const K: usize> Axes<K> {
    /// Validate `axes` against an array of `ndim` dimensions.
    pub fn new(axes: [usize; K], ndim: usize) -> Result<Self, ArrayError> {
        for (i, &axis) in axes.iter().enumerate() {
            if axis >= ndim {
                return Err(ArrayError::AxisOutOfRange { axis, ndim });
            }
            if axes[..i].contains(&axis) {
                return Err(ArrayError::DuplicateAxis { axis });
            }
        }
        Ok(Self { axes })
    }

    /// The selection `[0, 1, ..., K - 1]`, which is always valid
    /// for arrays of arity `K`.
    pub fn identity() -> Self {
        Self {
            axes: std::array::from_fn(|axis| axis),
        }
    }

    pub fn as_array(&self) -> &[usize; K] {
        &self.axes
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.axes.iter().copied()
    }

    pub fn len(&self) -> usize {
        K
    }

    pub fn is_empty(&self) -> bool {
        K == 0
    }

    /// Whether `axis` is part of the selection.
    pub fn contains(&self, axis: usize) -> bool {
        self.axes.contains(&axis)
    }

    /// The axes of a `D`-dimensional array that are *not* selected,
    /// in ascending order.
    pub fn complement<const D: usize, const R: usize>(&self) -> [usize; R] {
        const { assert!(K + R == D, "complement arity must be D - K") };
        let mut rest = [0; R];
        let mut next = 0;
        for axis in 0..D {
            if !self.contains(axis) {
                rest[next] = axis;
                next += 1;
            }
        }
        debug_assert_eq!(next, R, "selection {:?} is not valid for arity {}", self, D);
        rest
    }
}

impl<const K: usize> fmt::Display for Axes<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, axis) in self.axes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", axis)?;
        }
        write!(f, ">")
    }
}
