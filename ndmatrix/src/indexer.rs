/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Permuted traversal.
//!
//! An [`Odometer`] enumerates the Cartesian product of the extents of
//! a chosen, ordered subset of axes `(a₀, …, aₖ₋₁)`. The last selected
//! axis turns fastest, like the rightmost wheel of a mechanical
//! odometer; when a wheel rolls over it resets and carries into the
//! wheel on its left.
//!
//! Alongside the position the odometer keeps the linear storage
//! location it addresses. Each step adds the stride of the advanced
//! axis; a roll-over subtracts the precomputed wrap correction
//! `stride × (bound − start)`. A step is therefore one addition in the
//! common case and at most `K` additions when every wheel carries.
//!
//! ```text
//! axes = <2, 0> over sizes [2, 3, 2]
//!
//!   position   location
//!   [0, 0]     0
//!   [0, 1]     6
//!   [1, 0]     1
//!   [1, 1]     7
//!   end        position snapped to bounds [2, 2]
//! ```
//!
//! [`Indexer`], [`IndexerMut`] and [`Lanes`] pair an odometer with
//! the storage it walks.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::axes::Axes;
use crate::layout::Layout;
use crate::view::View;

/// Mixed-radix counter over `K` selected axes of a layout.
#[derive(Clone, Debug)]
pub struct Odometer<const K: usize> {
    position: [usize; K],
    start: [usize; K],
    bounds: [usize; K],
    /// Storage step for one unit along each selected axis.
    deltas: [usize; K],
    /// Storage distance undone when a wheel rolls over.
    wraps: [usize; K],
    location: usize,
    finished: bool,
}

impl<const K: usize> Odometer<K> {
    /// An odometer over `axes` of `layout`, positioned at the origin.
    ///
    /// The selection must have been validated against `layout`. An
    /// empty layout yields an odometer that is already finished, even
    /// when no axes are selected.
    pub fn new<const D: usize>(layout: &Layout<D>, axes: &Axes<K>) -> Self {
        let bounds = axes.as_array().map(|axis| layout.sizes()[axis]);
        let deltas = axes.as_array().map(|axis| layout.strides()[axis]);
        let start = [0; K];
        let wraps = std::array::from_fn(|j| deltas[j] * (bounds[j] - start[j]));
        let mut odometer = Self {
            position: start,
            start,
            bounds,
            deltas,
            wraps,
            location: layout.offset(),
            finished: false,
        };
        if bounds.contains(&0) || layout.is_empty() {
            odometer.finish();
        }
        odometer
    }

    fn finish(&mut self) {
        self.finished = true;
        self.position = self.bounds;
    }

    /// The current coordinate over the selected axes. Equal to the
    /// bounds once the odometer has finished.
    pub fn position(&self) -> &[usize; K] {
        &self.position
    }

    pub fn bounds(&self) -> &[usize; K] {
        &self.bounds
    }

    /// The storage location of the current position.
    pub fn location(&self) -> usize {
        self.location
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The number of positions left, including the current one.
    pub fn remaining(&self) -> usize {
        if self.finished {
            return 0;
        }
        let mut consumed = 0;
        let mut radix = 1;
        for j in (0..K).rev() {
            consumed += (self.position[j] - self.start[j]) * radix;
            radix *= self.bounds[j] - self.start[j];
        }
        radix - consumed
    }

    /// Step to the next position.
    pub fn advance(&mut self) {
        if self.finished {
            return;
        }
        for j in (0..K).rev() {
            self.position[j] += 1;
            self.location += self.deltas[j];
            if self.position[j] < self.bounds[j] {
                return;
            }
            self.position[j] = self.start[j];
            self.location -= self.wraps[j];
        }
        self.finish();
    }
}

impl<const K: usize> PartialEq for Odometer<K> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.bounds == other.bounds
            && self.start == other.start
            && self.finished == other.finished
    }
}

impl<const K: usize> Eq for Odometer<K> {}

/// Traversal yielding `(coordinate, &element)` over selected axes.
///
/// Created by [`Addressable::indexer`](crate::Addressable::indexer)
/// and [`Addressable::iter`](crate::Addressable::iter).
pub struct Indexer<'a, T, const K: usize> {
    data: &'a [T],
    odometer: Odometer<K>,
}

impl<'a, T, const K: usize> Indexer<'a, T, K> {
    pub(crate) fn new<const D: usize>(data: &'a [T], layout: &Layout<D>, axes: &Axes<K>) -> Self {
        Self {
            data,
            odometer: Odometer::new(layout, axes),
        }
    }

    pub fn odometer(&self) -> &Odometer<K> {
        &self.odometer
    }

    pub fn is_finished(&self) -> bool {
        self.odometer.is_finished()
    }
}

impl<'a, T, const K: usize> Iterator for Indexer<'a, T, K> {
    type Item = ([usize; K], &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.odometer.is_finished() {
            return None;
        }
        let coord = *self.odometer.position();
        let elem = &self.data[self.odometer.location()];
        self.odometer.advance();
        Some((coord, elem))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.odometer.remaining();
        (remaining, Some(remaining))
    }
}

impl<T, const K: usize> ExactSizeIterator for Indexer<'_, T, K> {}

impl<T, const K: usize> FusedIterator for Indexer<'_, T, K> {}

impl<T, const K: usize> Clone for Indexer<'_, T, K> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            odometer: self.odometer.clone(),
        }
    }
}

/// Two indexers are equal when they walk the same storage, stand at
/// the same position and address the same element.
impl<T, const K: usize> PartialEq for Indexer<'_, T, K> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
            && self.odometer == other.odometer
            && self.odometer.location() == other.odometer.location()
    }
}

impl<T, const K: usize> std::fmt::Debug for Indexer<'_, T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("odometer", &self.odometer)
            .finish()
    }
}

/// Traversal yielding `(coordinate, &mut element)` over selected
/// axes.
///
/// Created by
/// [`AddressableMut::indexer_mut`](crate::AddressableMut::indexer_mut)
/// and [`AddressableMut::iter_mut`](crate::AddressableMut::iter_mut).
pub struct IndexerMut<'a, T, const K: usize> {
    data: *mut T,
    len: usize,
    odometer: Odometer<K>,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T, const K: usize> IndexerMut<'a, T, K> {
    pub(crate) fn new<const D: usize>(
        data: &'a mut [T],
        layout: &Layout<D>,
        axes: &Axes<K>,
    ) -> Self {
        Self {
            len: data.len(),
            data: data.as_mut_ptr(),
            odometer: Odometer::new(layout, axes),
            _marker: PhantomData,
        }
    }

    pub fn odometer(&self) -> &Odometer<K> {
        &self.odometer
    }

    pub fn is_finished(&self) -> bool {
        self.odometer.is_finished()
    }
}

impl<'a, T, const K: usize> Iterator for IndexerMut<'a, T, K> {
    type Item = ([usize; K], &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.odometer.is_finished() {
            return None;
        }
        let coord = *self.odometer.position();
        let location = self.odometer.location();
        assert!(
            location < self.len,
            "location {} out of storage of {} elements",
            location,
            self.len
        );
        self.odometer.advance();
        // SAFETY: `location` is within the exclusively borrowed
        // storage (checked above). Layouts are only ever row-major or
        // derived from row-major by fixing axes, so distinct in-range
        // coordinates map to distinct locations, and the odometer
        // visits every coordinate at most once: no two yielded
        // references alias.
        let elem = unsafe { &mut *self.data.add(location) };
        Some((coord, elem))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.odometer.remaining();
        (remaining, Some(remaining))
    }
}

impl<T, const K: usize> ExactSizeIterator for IndexerMut<'_, T, K> {}

impl<T, const K: usize> FusedIterator for IndexerMut<'_, T, K> {}

impl<T, const K: usize> std::fmt::Debug for IndexerMut<'_, T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerMut")
            .field("odometer", &self.odometer)
            .finish()
    }
}

/// Traversal yielding, for every coordinate over `K` selected axes,
/// the view of arity `R` spanned by the remaining axes.
///
/// Created by [`Addressable::lanes`](crate::Addressable::lanes).
pub struct Lanes<'a, T, const K: usize, const R: usize> {
    data: &'a [T],
    odometer: Odometer<K>,
    rest: Layout<R>,
}

impl<'a, T, const K: usize, const R: usize> Lanes<'a, T, K, R> {
    pub(crate) fn new<const D: usize>(data: &'a [T], layout: &Layout<D>, axes: &Axes<K>) -> Self {
        Self {
            data,
            odometer: Odometer::new(layout, axes),
            rest: layout.project::<K, R>(axes),
        }
    }

    pub fn odometer(&self) -> &Odometer<K> {
        &self.odometer
    }
}

impl<'a, T, const K: usize, const R: usize> Iterator for Lanes<'a, T, K, R> {
    type Item = ([usize; K], View<'a, T, R>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.odometer.is_finished() {
            return None;
        }
        let coord = *self.odometer.position();
        let layout = self.rest.with_offset(self.odometer.location());
        self.odometer.advance();
        Some((coord, View::new(self.data, layout)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.odometer.remaining();
        (remaining, Some(remaining))
    }
}

impl<T, const K: usize, const R: usize> ExactSizeIterator for Lanes<'_, T, K, R> {}

impl<T, const K: usize, const R: usize> FusedIterator for Lanes<'_, T, K, R> {}
