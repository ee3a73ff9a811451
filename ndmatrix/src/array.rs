/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::ops::Index;
use std::ops::IndexMut;

use crate::access::Addressable;
use crate::access::AddressableMut;
use crate::access::sealed;
use crate::config;
use crate::config::Config;
use crate::error::ArrayError;
use crate::indexer::Indexer;
use crate::indexer::IndexerMut;
use crate::layout::Layout;
use crate::layout::checked_len;

/// A dense `D`-dimensional array owning its elements.
///
/// Elements are stored contiguously in row-major order (the last
/// axis varies fastest). The arity `D` is part of the type and never
/// changes; [`NdArray::resize`] only changes the extents.
///
/// ```
/// use ndmatrix::{Addressable, NdArray};
///
/// let mut a = NdArray::<i32, 3>::new([3, 4, 5]).unwrap();
/// a[[1, 2, 3]] = 23;
/// assert_eq!(a.at([1, 2, 3]), Ok(&23));
/// assert!(a.at([3, 0, 0]).is_err());
/// assert_eq!(a.shape(), [3, 4, 5]);
/// assert_eq!(a.size(1), Ok(3));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct NdArray<T, const D: usize> {
    data: Vec<T>,
    layout: Layout<D>,
}

/// Validate `shape` for allocating `D`-dimensional arrays of `T`,
/// returning the element count.
fn validate_shape<T, const D: usize>(shape: &[usize; D], config: &Config) -> Result<usize, ArrayError> {
    const { assert!(D > 0, "arrays have at least one axis") };
    if let Some(axis) = shape.iter().position(|&extent| extent == 0) {
        return Err(ArrayError::ZeroExtent { axis });
    }
    let limit = config.limit_for::<T>();
    match checked_len(shape) {
        Some(len) if len <= limit => Ok(len),
        _ => Err(ArrayError::TooManyElements {
            shape: shape.to_vec(),
            limit,
        }),
    }
}

impl<T, const D: usize> NdArray<T, D> {
    /// Wrap `data`, which must hold exactly `∏ shape` elements in
    /// row-major order.
    pub fn from_vec(shape: [usize; D], data: Vec<T>) -> Result<Self, ArrayError> {
        let len = validate_shape::<T, D>(&shape, &config::global::get())?;
        if data.len() != len {
            return Err(ArrayError::LengthMismatch {
                expected: len,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            layout: Layout::row_major(shape),
        })
    }

    /// Build an array by evaluating `f` at every coordinate, in
    /// row-major order.
    pub fn from_fn<F>(shape: [usize; D], mut f: F) -> Result<Self, ArrayError>
    where
        F: FnMut([usize; D]) -> T,
    {
        let len = validate_shape::<T, D>(&shape, &config::global::get())?;
        let layout = Layout::row_major(shape);
        let mut data = Vec::with_capacity(len);
        let mut coord = [0; D];
        for _ in 0..len {
            data.push(f(coord));
            for axis in (0..D).rev() {
                coord[axis] += 1;
                if coord[axis] < shape[axis] {
                    break;
                }
                coord[axis] = 0;
            }
        }
        tracing::debug!("allocating {} elements for shape {:?}", len, shape);
        Ok(Self { data, layout })
    }

    /// Release the storage. The shape becomes all zeros: every
    /// checked access fails and traversal yields nothing until the
    /// array is resized.
    pub fn clear(&mut self) {
        tracing::debug!("releasing {} elements of shape {:?}", self.data.len(), self.layout.sizes());
        self.data = Vec::new();
        self.layout = Layout::row_major([0; D]);
    }

    /// Whether the array has been cleared and not resized since.
    pub fn is_cleared(&self) -> bool {
        self.data.is_empty()
    }

    /// The contiguous element store, in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Give up the shape and return the element store.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone, const D: usize> NdArray<T, D> {
    /// An array of the given shape with every element set to `value`.
    pub fn from_elem(shape: [usize; D], value: T) -> Result<Self, ArrayError> {
        let len = validate_shape::<T, D>(&shape, &config::global::get())?;
        tracing::debug!("allocating {} elements for shape {:?}", len, shape);
        Ok(Self {
            data: vec![value; len],
            layout: Layout::row_major(shape),
        })
    }

    /// Reallocate for `shape` with every element set to `value`.
    pub fn resize_with_value(&mut self, shape: [usize; D], value: T) -> Result<(), ArrayError> {
        let len = validate_shape::<T, D>(&shape, &config::global::get())?;
        self.reallocate(shape, vec![value; len]);
        Ok(())
    }
}

impl<T: Default, const D: usize> NdArray<T, D> {
    /// An array of the given shape with default elements.
    pub fn new(shape: [usize; D]) -> Result<Self, ArrayError> {
        Self::with_config(shape, &config::global::get())
    }

    /// Like [`NdArray::new`], with an explicit allocation config.
    pub fn with_config(shape: [usize; D], config: &Config) -> Result<Self, ArrayError> {
        let len = validate_shape::<T, D>(&shape, config)?;
        tracing::debug!("allocating {} elements for shape {:?}", len, shape);
        Ok(Self {
            data: default_vec(len),
            layout: Layout::row_major(shape),
        })
    }

    /// Reallocate for `shape`. Contents are not preserved: every
    /// element is reset to its default.
    ///
    /// On error the array is left untouched.
    pub fn resize(&mut self, shape: [usize; D]) -> Result<(), ArrayError> {
        let len = validate_shape::<T, D>(&shape, &config::global::get())?;
        self.reallocate(shape, default_vec(len));
        Ok(())
    }
}

impl<T, const D: usize> NdArray<T, D> {
    fn reallocate(&mut self, shape: [usize; D], data: Vec<T>) {
        tracing::debug!(
            "reallocating {:?} ({} elements) -> {:?} ({} elements)",
            self.layout.sizes(),
            self.data.len(),
            shape,
            data.len()
        );
        self.data = data;
        self.layout = Layout::row_major(shape);
    }
}

fn default_vec<T: Default>(len: usize) -> Vec<T> {
    let mut data = Vec::with_capacity(len);
    data.resize_with(len, T::default);
    data
}

impl<T, const D: usize> sealed::Sealed for NdArray<T, D> {}

impl<T, const D: usize> Addressable<T, D> for NdArray<T, D> {
    fn layout(&self) -> &Layout<D> {
        &self.layout
    }

    fn storage(&self) -> &[T] {
        &self.data
    }
}

impl<T, const D: usize> AddressableMut<T, D> for NdArray<T, D> {
    fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T, const D: usize> Index<[usize; D]> for NdArray<T, D> {
    type Output = T;

    /// Unchecked access. Each coordinate is validated only in debug
    /// builds; the resulting location is always bounds checked
    /// against the storage.
    #[inline]
    fn index(&self, coord: [usize; D]) -> &T {
        debug_assert!(
            self.layout.contains(&coord),
            "{:?} out of range {:?}",
            coord,
            self.layout.sizes()
        );
        &self.data[self.layout.location(&coord)]
    }
}

impl<T, const D: usize> IndexMut<[usize; D]> for NdArray<T, D> {
    #[inline]
    fn index_mut(&mut self, coord: [usize; D]) -> &mut T {
        debug_assert!(
            self.layout.contains(&coord),
            "{:?} out of range {:?}",
            coord,
            self.layout.sizes()
        );
        &mut self.data[self.layout.location(&coord)]
    }
}

impl<'a, T, const D: usize> IntoIterator for &'a NdArray<T, D> {
    type Item = ([usize; D], &'a T);
    type IntoIter = Indexer<'a, T, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const D: usize> IntoIterator for &'a mut NdArray<T, D> {
    type Item = ([usize; D], &'a mut T);
    type IntoIter = IndexerMut<'a, T, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
