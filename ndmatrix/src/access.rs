/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Coordinate-based access shared by owning arrays and views.
//!
//! [`Addressable`] is implemented by every type that pairs a flat
//! element store with a [`Layout`]: [`NdArray`](crate::NdArray),
//! [`View`] and [`ViewMut`](crate::ViewMut). All element access,
//! slicing and traversal is expressed once, in terms of the layout
//! and the store; the implementors only say where the two live.

use crate::axes::Axes;
use crate::error::ArrayError;
use crate::indexer::Indexer;
use crate::indexer::IndexerMut;
use crate::indexer::Lanes;
use crate::layout::Layout;
use crate::view::View;
use crate::view::ViewMut;

pub(crate) mod sealed {
    // Implemented only by types in this crate.
    pub trait Sealed {}
}

/// Read access to a `D`-dimensional array or view.
pub trait Addressable<T, const D: usize>: sealed::Sealed {
    /// The layout mapping coordinates into [`Addressable::storage`].
    fn layout(&self) -> &Layout<D>;

    /// The flat element store the layout addresses into. For a view
    /// this is the whole store of its ancestor array.
    fn storage(&self) -> &[T];

    /// The number of axes.
    fn ndim(&self) -> usize {
        D
    }

    /// The extent of every axis.
    fn shape(&self) -> [usize; D] {
        *self.layout().sizes()
    }

    /// The extent of `axis` (0-based). Panics if `axis >= D`.
    fn extent(&self, axis: usize) -> usize {
        self.layout().sizes()[axis]
    }

    /// The extent of the axis with the 1-based `number`.
    fn size(&self, number: usize) -> Result<usize, ArrayError> {
        if number == 0 || number > D {
            return Err(ArrayError::AxisNumberOutOfRange { number, ndim: D });
        }
        Ok(self.layout().sizes()[number - 1])
    }

    /// The number of addressable elements.
    fn len(&self) -> usize {
        self.layout().len()
    }

    fn is_empty(&self) -> bool {
        self.layout().is_empty()
    }

    /// The element at `coord`, failing with
    /// [`ArrayError::IndexOutOfRange`] if any component is outside
    /// its axis.
    fn at(&self, coord: [usize; D]) -> Result<&T, ArrayError> {
        let location = self.layout().checked_location(&coord)?;
        Ok(&self.storage()[location])
    }

    /// The element at `coord`, or `None` if it is out of range.
    fn get(&self, coord: [usize; D]) -> Option<&T> {
        self.at(coord).ok()
    }

    /// A view of arity `R = D - K` obtained by fixing each of `axes`
    /// to the corresponding entry of `values`.
    ///
    /// ```
    /// # use ndmatrix::{Addressable, NdArray, View};
    /// let a = NdArray::from_fn([3, 4, 5], |[i, j, k]| i * 100 + j * 10 + k).unwrap();
    /// let plane: View<'_, usize, 2> = a.fix([0], [1]).unwrap();
    /// assert_eq!(plane.at([2, 3]), Ok(&123));
    /// ```
    fn fix<const K: usize, const R: usize>(
        &self,
        axes: [usize; K],
        values: [usize; K],
    ) -> Result<View<'_, T, R>, ArrayError> {
        let layout = self.layout().fix::<K, R>(axes, values)?;
        tracing::trace!("fix {:?}={:?}: {} -> {}", axes, values, self.layout(), layout);
        Ok(View::new(self.storage(), layout))
    }

    /// Traverse every combination of coordinates over `axes`, in
    /// odometer order (the last selected axis varies fastest).
    ///
    /// Axes that are not selected stay at coordinate zero; fix them
    /// first to traverse at another position.
    fn indexer<const K: usize>(&self, axes: [usize; K]) -> Result<Indexer<'_, T, K>, ArrayError> {
        let axes = Axes::new(axes, D)?;
        tracing::trace!("indexer {} over {}", axes, self.layout());
        Ok(Indexer::new(self.storage(), self.layout(), &axes))
    }

    /// Traverse every combination of coordinates over `axes`,
    /// yielding for each the view of the remaining `R = D - K` axes.
    fn lanes<const K: usize, const R: usize>(
        &self,
        axes: [usize; K],
    ) -> Result<Lanes<'_, T, K, R>, ArrayError> {
        const { assert!(K + R == D, "lanes over K axes leave D - K") };
        let axes = Axes::new(axes, D)?;
        tracing::trace!("lanes {} over {}", axes, self.layout());
        Ok(Lanes::new(self.storage(), self.layout(), &axes))
    }

    /// Traverse all elements in storage order (axis 0 slowest).
    fn iter(&self) -> Indexer<'_, T, D> {
        Indexer::new(self.storage(), self.layout(), &Axes::identity())
    }
}

/// Write access to a `D`-dimensional array or view.
pub trait AddressableMut<T, const D: usize>: Addressable<T, D> {
    /// Mutable counterpart of [`Addressable::storage`].
    fn storage_mut(&mut self) -> &mut [T];

    /// Mutable counterpart of [`Addressable::at`].
    fn at_mut(&mut self, coord: [usize; D]) -> Result<&mut T, ArrayError> {
        let location = self.layout().checked_location(&coord)?;
        Ok(&mut self.storage_mut()[location])
    }

    fn get_mut(&mut self, coord: [usize; D]) -> Option<&mut T> {
        self.at_mut(coord).ok()
    }

    /// Mutable counterpart of [`Addressable::fix`].
    fn fix_mut<const K: usize, const R: usize>(
        &mut self,
        axes: [usize; K],
        values: [usize; K],
    ) -> Result<ViewMut<'_, T, R>, ArrayError> {
        let layout = self.layout().fix::<K, R>(axes, values)?;
        tracing::trace!("fix_mut {:?}={:?} -> {}", axes, values, layout);
        Ok(ViewMut::new(self.storage_mut(), layout))
    }

    /// Mutable counterpart of [`Addressable::indexer`].
    fn indexer_mut<const K: usize>(
        &mut self,
        axes: [usize; K],
    ) -> Result<IndexerMut<'_, T, K>, ArrayError> {
        let axes = Axes::new(axes, D)?;
        let layout = *self.layout();
        tracing::trace!("indexer_mut {} over {}", axes, layout);
        Ok(IndexerMut::new(self.storage_mut(), &layout, &axes))
    }

    /// Mutable counterpart of [`Addressable::iter`].
    fn iter_mut(&mut self) -> IndexerMut<'_, T, D> {
        let layout = *self.layout();
        IndexerMut::new(self.storage_mut(), &layout, &Axes::identity())
    }

    /// Set every addressable element to `value`.
    fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for (_, elem) in self.iter_mut() {
            *elem = value.clone();
        }
    }
}
