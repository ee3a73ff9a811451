/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Strided addressing for fixed-arity arrays.
//!
//! A [`Layout`] is the triple (`offset`, `sizes`, `strides`) that maps
//! a coordinate in `ℕᴰ` to a linear storage location:
//!
//! ```text
//! location(x) = offset + ∑ᵢ strides[i] × x[i]
//! ```
//!
//! Freshly allocated arrays use the dense row-major layout (last
//! axis fastest, `offset == 0`). Views derived by fixing axes keep
//! the strides of the remaining axes and fold the fixed axes into
//! `offset`.

use std::iter::zip;

use serde::Deserialize;
use serde::Serialize;

use crate::axes::Axes;
use crate::error::ArrayError;

/// Row-major strides for `sizes`: `strides[i] = ∏ sizes[i+1..]`,
/// so `strides[D - 1] == 1`.
pub fn row_major_strides<const D: usize>(sizes: &[usize; D]) -> [usize; D] {
    let mut strides = [0; D];
    let mut running = 1usize;
    for (stride, &size) in zip(strides.iter_mut(), sizes).rev() {
        *stride = running;
        running = running.saturating_mul(size);
    }
    strides
}

/// The number of elements addressed by `sizes`, or `None` on
/// overflow.
pub fn checked_len(sizes: &[usize]) -> Option<usize> {
    sizes
        .iter()
        .try_fold(1usize, |acc, &size| acc.checked_mul(size))
}

/// Layout of a `D`-dimensional array or view over a flat buffer.
///
/// The `offset` field is the base-offset accumulator: it is zero for
/// an owning array and absorbs `stride × value` for every axis fixed
/// on the way down to a view.
///
/// ```
/// # use ndmatrix::Layout;
/// let layout = Layout::row_major([3, 4, 5]);
/// assert_eq!(layout.strides(), &[20, 5, 1]);
/// assert_eq!(layout.location(&[1, 2, 3]), 33);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawLayout", into = "RawLayout")]
pub struct Layout<const D: usize> {
    offset: usize,
    sizes: [usize; D],
    strides: [usize; D],
}

impl<const D: usize> Layout<D> {
    /// A dense row-major layout of the given sizes, starting at
    /// offset zero.
    pub fn row_major(sizes: [usize; D]) -> Self {
        Self {
            offset: 0,
            strides: row_major_strides(&sizes),
            sizes,
        }
    }

    #[cfg(test)]
    fn from_parts(offset: usize, sizes: [usize; D], strides: [usize; D]) -> Self {
        Self {
            offset,
            sizes,
            strides,
        }
    }

    /// The number of dimensions.
    pub fn ndim(&self) -> usize {
        D
    }

    /// The location of the element at the origin.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The extent of each axis.
    pub fn sizes(&self) -> &[usize; D] {
        &self.sizes
    }

    /// The storage distance between neighbours along each axis.
    pub fn strides(&self) -> &[usize; D] {
        &self.strides
    }

    /// The number of coordinates in the layout.
    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the layout is dense row-major, ignoring offset.
    pub fn is_contiguous(&self) -> bool {
        let mut expected_stride = 1;
        for (stride, size) in zip(self.strides.iter(), self.sizes.iter()).rev() {
            if *size > 1 && *stride != expected_stride {
                return false;
            }
            expected_stride *= *size;
        }
        true
    }

    /// Validate `coord` against the sizes, reporting the first axis
    /// that is out of range.
    pub fn check(&self, coord: &[usize; D]) -> Result<(), ArrayError> {
        match zip(coord, &self.sizes).position(|(index, extent)| index >= extent) {
            None => Ok(()),
            Some(axis) => Err(ArrayError::IndexOutOfRange {
                axis,
                index: coord[axis],
                extent: self.sizes[axis],
            }),
        }
    }

    /// Whether every component of `coord` is within its extent.
    pub fn contains(&self, coord: &[usize; D]) -> bool {
        zip(coord, &self.sizes).all(|(index, extent)| index < extent)
    }

    /// The location of `coord`, without validating it.
    #[inline]
    pub fn location(&self, coord: &[usize; D]) -> usize {
        self.offset
            + zip(coord, &self.strides)
                .map(|(index, stride)| index * stride)
                .sum::<usize>()
    }

    /// The location of `coord`, failing if it is out of range.
    pub fn checked_location(&self, coord: &[usize; D]) -> Result<usize, ArrayError> {
        self.check(coord)?;
        Ok(self.location(coord))
    }

    /// The coordinate addressing `location`, if any.
    ///
    /// Inverts [`Layout::location`] by peeling off the largest
    /// strides first:
    ///
    /// ```text
    /// coordᵢ = ⌊pos / strideᵢ⌋
    /// pos   -= coordᵢ × strideᵢ
    /// ```
    ///
    /// If any `coordᵢ ≥ sizeᵢ`, or `pos ≠ 0` at the end, the location
    /// is not part of the layout.
    pub fn coordinates(&self, location: usize) -> Option<[usize; D]> {
        let mut pos = location.checked_sub(self.offset)?;
        let mut result = [0; D];

        let mut dims: [usize; D] = std::array::from_fn(|axis| axis);
        dims.sort_by_key(|&axis| self.strides[axis]);

        for &axis in dims.iter().rev() {
            let (size, stride) = (self.sizes[axis], self.strides[axis]);
            let index = if size > 1 { pos / stride } else { 0 };
            if index >= size {
                return None;
            }
            result[axis] = index;
            pos -= index * stride;
        }

        (pos == 0).then_some(result)
    }

    /// The layout over the axes not in `axes`, in their original
    /// order, with the same offset.
    pub(crate) fn project<const K: usize, const R: usize>(&self, axes: &Axes<K>) -> Layout<R> {
        let rest = axes.complement::<D, R>();
        Layout {
            offset: self.offset,
            sizes: rest.map(|axis| self.sizes[axis]),
            strides: rest.map(|axis| self.strides[axis]),
        }
    }

    /// Fix each of `axes` to the corresponding entry of `values`,
    /// producing the layout of the remaining `R = D - K` axes.
    ///
    /// Every fixed axis contributes `stride × value` to the new
    /// offset; the remaining axes keep their sizes and strides.
    pub fn fix<const K: usize, const R: usize>(
        &self,
        axes: [usize; K],
        values: [usize; K],
    ) -> Result<Layout<R>, ArrayError> {
        const { assert!(K + R == D, "fixing K axes of a D-dimensional layout leaves D - K") };
        let axes = Axes::new(axes, D)?;
        let mut offset = self.offset;
        for (axis, index) in zip(axes.iter(), values) {
            let extent = self.sizes[axis];
            if index >= extent {
                return Err(ArrayError::FixIndexOutOfRange {
                    axis,
                    index,
                    extent,
                });
            }
            offset += self.strides[axis] * index;
        }
        Ok(self.project::<K, R>(&axes).with_offset(offset))
    }

    pub(crate) fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// One past the largest location addressed by the layout, or
    /// `offset` if the layout is empty.
    pub(crate) fn extent_end(&self) -> usize {
        if self.is_empty() {
            return self.offset;
        }
        self.offset
            + zip(&self.sizes, &self.strides)
                .map(|(size, stride)| (size - 1) * stride)
                .sum::<usize>()
            + 1
    }
}

impl<const D: usize> std::fmt::Display for Layout<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[off={} sz={:?} st={:?}]",
            self.offset, self.sizes, self.strides
        )
    }
}

/// Arity-erased serialized form of a [`Layout`].
#[derive(Clone, Serialize, Deserialize)]
struct RawLayout {
    offset: usize,
    sizes: Vec<usize>,
    strides: Vec<usize>,
}

impl<const D: usize> From<Layout<D>> for RawLayout {
    fn from(layout: Layout<D>) -> Self {
        Self {
            offset: layout.offset,
            sizes: layout.sizes.to_vec(),
            strides: layout.strides.to_vec(),
        }
    }
}

impl<const D: usize> TryFrom<RawLayout> for Layout<D> {
    type Error = ArrayError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        let got = raw.sizes.len().max(raw.strides.len());
        let mismatch = ArrayError::LengthMismatch { expected: D, got };
        Ok(Self {
            offset: raw.offset,
            sizes: raw.sizes.try_into().map_err(|_| mismatch.clone())?,
            strides: raw.strides.try_into().map_err(|_| mismatch)?,
        })
    }
}
