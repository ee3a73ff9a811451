/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Dense multidimensional arrays of fixed arity.
//!
//! Provides [`NdArray`], a contiguous row-major array whose number of
//! axes is a const generic parameter, together with:
//!
//! - strided coordinate addressing ([`Layout`]), checked
//!   ([`Addressable::at`]) and unchecked (`array[[i, j, k]]`);
//! - zero-copy views obtained by fixing a subset of axes to concrete
//!   values ([`Addressable::fix`], [`AddressableMut::fix_mut`]);
//! - traversal over any ordered subset of axes
//!   ([`Addressable::indexer`], [`AddressableMut::indexer_mut`],
//!   [`Addressable::lanes`]), driven by an [`Odometer`].
//!
//! ```
//! use ndmatrix::{Addressable, NdArray, View};
//!
//! let a = NdArray::from_fn([3, 4, 5], |[i, j, k]| i * 100 + j * 10 + k).unwrap();
//!
//! // Fix axis 0 at 1: a 4×5 view sharing `a`'s storage.
//! let plane: View<'_, usize, 2> = a.fix([0], [1]).unwrap();
//! assert_eq!(plane[[2, 3]], 123);
//!
//! // Walk axis 0 fastest, then axis 1, keeping axis 2 at 0.
//! let firsts: Vec<usize> = a.indexer([1, 0]).unwrap().map(|(_, v)| *v).take(5).collect();
//! assert_eq!(firsts, vec![0, 100, 200, 10, 110]);
//! ```

mod access;
pub use access::Addressable;
pub use access::AddressableMut;

mod array;
pub use array::NdArray;

mod axes;
/// A validated, ordered selection of distinct axes.
pub use axes::Axes;

mod error;
pub use error::ArrayError;
pub use error::ErrorKind;

mod indexer;
pub use indexer::Indexer;
pub use indexer::IndexerMut;
pub use indexer::Lanes;
pub use indexer::Odometer;

/// Strided addressing: shapes, strides and base offsets.
pub mod layout;
pub use layout::Layout;

mod view;
pub use view::View;
pub use view::ViewMut;

/// Allocation limits.
pub mod config;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;
