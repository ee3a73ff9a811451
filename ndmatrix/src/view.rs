/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Non-owning windows into an array's storage.
//!
//! A view is a [`Layout`] over storage borrowed from an ancestor
//! [`NdArray`](crate::NdArray). Views are produced by
//! [`Addressable::fix`] and [`AddressableMut::fix_mut`], which bind a
//! subset of axes to concrete values:
//!
//! ```text
//! offset'  = offset + ∑ₖ strides[axisₖ] × valueₖ
//! sizes'   = sizes   with the fixed axes removed
//! strides' = strides with the fixed axes removed
//! ```
//!
//! No element is copied. Because a view borrows the ancestor's
//! storage, the ancestor cannot be resized or cleared while the view
//! is alive; the borrow checker enforces this.
//!
//! Views can be fixed again, down to arity zero, where the single
//! remaining element is addressed by the empty coordinate.

use std::fmt;
use std::ops::Index;
use std::ops::IndexMut;

use crate::access::Addressable;
use crate::access::AddressableMut;
use crate::access::sealed;
use crate::layout::Layout;

/// A shared view of arity `D`.
pub struct View<'a, T, const D: usize> {
    data: &'a [T],
    layout: Layout<D>,
}

impl<'a, T, const D: usize> View<'a, T, D> {
    pub(crate) fn new(data: &'a [T], layout: Layout<D>) -> Self {
        debug_assert!(
            layout.extent_end() <= data.len(),
            "layout {} exceeds storage of {} elements",
            layout,
            data.len()
        );
        Self { data, layout }
    }

    /// The element at `coord`, borrowed for the lifetime of the
    /// underlying storage rather than of this view.
    pub fn get_ref(&self, coord: [usize; D]) -> Option<&'a T> {
        let location = self.layout.checked_location(&coord).ok()?;
        Some(&self.data[location])
    }
}

impl<T, const D: usize> Clone for View<'_, T, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const D: usize> Copy for View<'_, T, D> {}

impl<T, const D: usize> sealed::Sealed for View<'_, T, D> {}

impl<T, const D: usize> Addressable<T, D> for View<'_, T, D> {
    fn layout(&self) -> &Layout<D> {
        &self.layout
    }

    fn storage(&self) -> &[T] {
        self.data
    }
}

impl<T, const D: usize> Index<[usize; D]> for View<'_, T, D> {
    type Output = T;

    /// Unchecked access: the coordinate is only validated in debug
    /// builds. The computed location is still bounds checked against
    /// the storage.
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

impl<T, const D: usize> fmt::Debug for View<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("layout", &self.layout).finish()
    }
}

/// An exclusive view of arity `D`.
pub struct ViewMut<'a, T, const D: usize> {
    data: &'a mut [T],
    layout: Layout<D>,
}

impl<'a, T, const D: usize> ViewMut<'a, T, D> {
    pub(crate) fn new(data: &'a mut [T], layout: Layout<D>) -> Self {
        debug_assert!(
            layout.extent_end() <= data.len(),
            "layout {} exceeds storage of {} elements",
            layout,
            data.len()
        );
        Self { data, layout }
    }

    /// A shared view of the same elements.
    pub fn view(&self) -> View<'_, T, D> {
        View::new(&*self.data, self.layout)
    }

    /// Downgrade into a shared view for the full lifetime `'a`.
    pub fn into_view(self) -> View<'a, T, D> {
        View::new(self.data, self.layout)
    }

    /// A shorter-lived exclusive view of the same elements.
    pub fn reborrow(&mut self) -> ViewMut<'_, T, D> {
        ViewMut::new(&mut *self.data, self.layout)
    }
}

impl<T, const D: usize> sealed::Sealed for ViewMut<'_, T, D> {}

impl<T, const D: usize> Addressable<T, D> for ViewMut<'_, T, D> {
    fn layout(&self) -> &Layout<D> {
        &self.layout
    }

    fn storage(&self) -> &[T] {
        &*self.data
    }
}

impl<T, const D: usize> AddressableMut<T, D> for ViewMut<'_, T, D> {
    fn storage_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl<T, const D: usize> Index<[usize; D]> for ViewMut<'_, T, D> {
    type Output = T;

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

impl<T, const D: usize> IndexMut<[usize; D]> for ViewMut<'_, T, D> {
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

impl<T, const D: usize> fmt::Debug for ViewMut<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayError;
    use crate::NdArray;

    fn decimal() -> NdArray<usize, 3> {
        NdArray::from_fn([3, 4, 5], |[i, j, k]| i * 100 + j * 10 + k).unwrap()
    }

    #[test]
    fn test_fix_first_axis() {
        let a = decimal();
        let v: View<'_, usize, 2> = a.fix([0], [1]).unwrap();
        assert_eq!(v.shape(), [4, 5]);
        assert_eq!(v.layout().offset(), 20);
        for j in 0..4 {
            for k in 0..5 {
                assert_eq!(v.at([j, k]), Ok(&(100 + j * 10 + k)));
                assert_eq!(v[[j, k]], 100 + j * 10 + k);
            }
        }
    }

    #[test]
    fn test_fix_last_axis() {
        let a = decimal();
        let v: View<'_, usize, 2> = a.fix([2], [4]).unwrap();
        assert_eq!(v.shape(), [3, 4]);
        assert_eq!(v.layout().strides(), &[20, 5]);
        assert_eq!(v[[2, 3]], 234);
    }

    #[test]
    fn test_fix_chain_to_scalar() {
        let a = decimal();
        let plane: View<'_, usize, 2> = a.fix([1], [2]).unwrap();
        let lane: View<'_, usize, 1> = plane.fix([0], [1]).unwrap();
        assert_eq!(lane.shape(), [5]);
        assert_eq!(lane[[3]], 123);
        let scalar: View<'_, usize, 0> = lane.fix([0], [4]).unwrap();
        assert_eq!(scalar.shape(), [0usize; 0]);
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.at([]), Ok(&124));
    }

    #[test]
    fn test_fix_view_coordinates_are_local() {
        let a = decimal();
        let v: View<'_, usize, 2> = a.fix([0], [2]).unwrap();
        // Axis 0 of the view is axis 1 of the array, extent 4.
        assert!(v.at([4, 0]).unwrap_err().is_out_of_range());
        assert!(v.at([3, 4]).is_ok());
    }

    #[test]
    fn test_fix_out_of_range() {
        let a = decimal();
        let err = a.fix::<1, 2>([0], [3]).unwrap_err();
        assert_eq!(
            err,
            ArrayError::FixIndexOutOfRange {
                axis: 0,
                index: 3,
                extent: 3
            }
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_fix_mut_writes_through() {
        let mut a = decimal();
        {
            let mut v: ViewMut<'_, usize, 2> = a.fix_mut([1], [0]).unwrap();
            *v.at_mut([2, 2]).unwrap() = 7;
            v[[0, 0]] = 9;
            assert!(v.at_mut([3, 0]).is_err());
        }
        assert_eq!(a[[2, 0, 2]], 7);
        assert_eq!(a[[0, 0, 0]], 9);
    }

    #[test]
    fn test_fix_mut_chain_and_fill() {
        let mut a = NdArray::<i32, 3>::new([2, 3, 4]).unwrap();
        let mut plane: ViewMut<'_, i32, 2> = a.fix_mut([0], [1]).unwrap();
        let mut lane: ViewMut<'_, i32, 1> = plane.fix_mut([0], [2]).unwrap();
        lane.fill(5);
        assert_eq!(a.iter().filter(|(_, v)| **v == 5).count(), 4);
        assert_eq!(a[[1, 2, 3]], 5);
        assert_eq!(a[[1, 1, 3]], 0);
    }

    #[test]
    fn test_view_mut_downgrade() {
        let mut a = decimal();
        let v: ViewMut<'_, usize, 1> = a.fix_mut([0, 1], [2, 3]).unwrap();
        assert_eq!(v.view()[[1]], 231);
        let shared = v.into_view();
        assert_eq!(shared.get_ref([4]), Some(&234));
        assert_eq!(shared.get_ref([5]), None);
    }

    #[test]
    fn test_view_is_copy() {
        let a = decimal();
        let v: View<'_, usize, 2> = a.fix([0], [0]).unwrap();
        let w = v;
        assert_eq!(v[[1, 1]], w[[1, 1]]);
        assert_eq!(format!("{:?}", w), format!("View {{ layout: {:?} }}", w.layout()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_view_mut_unchecked_index_reports_coordinate() {
        let mut a = decimal();
        let mut v: ViewMut<'_, usize, 2> = a.fix_mut([0], [0]).unwrap();
        v[[4, 0]] = 1;
    }

    #[test]
    #[should_panic]
    fn test_unchecked_index_out_of_storage_panics() {
        let a = decimal();
        let v: View<'_, usize, 2> = a.fix([0], [2]).unwrap();
        let _ = v[[9, 9]];
    }
}
