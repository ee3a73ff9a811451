/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for shapes, coordinates and axis
//! selections.
//!
//! These strategies are used in `proptest`-based tests to exercise
//! addressing, slicing and traversal over randomized shapes. Arity is
//! a const parameter, so each generator is instantiated per arity:
//!
//! ```ignore
//! proptest! {
//!     #[test]
//!     fn test_shape((shape, coord) in gen_shape_and_coord::<3>(5)) {
//!         // `coord` lies inside `shape`
//!     }
//! }
//! ```
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use proptest::prelude::*;

/// A shape of arity `D` with every extent in `1..=max_extent`.
pub fn gen_shape<const D: usize>(max_extent: usize) -> BoxedStrategy<[usize; D]> {
    prop::collection::vec(1..=max_extent, D)
        .prop_map(|sizes| <[usize; D]>::try_from(sizes).unwrap())
        .boxed()
}

/// A coordinate inside `shape`.
pub fn gen_coord<const D: usize>(shape: [usize; D]) -> BoxedStrategy<[usize; D]> {
    shape
        .iter()
        .map(|&extent| 0..extent)
        .collect::<Vec<_>>()
        .prop_map(|coord| <[usize; D]>::try_from(coord).unwrap())
        .boxed()
}

/// A shape together with a coordinate inside it.
pub fn gen_shape_and_coord<const D: usize>(
    max_extent: usize,
) -> BoxedStrategy<([usize; D], [usize; D])> {
    gen_shape::<D>(max_extent)
        .prop_flat_map(|shape| (Just(shape), gen_coord(shape)))
        .boxed()
}

/// `K` distinct axes of a `D`-dimensional array, in random order.
pub fn gen_axes<const D: usize, const K: usize>() -> BoxedStrategy<[usize; K]> {
    Just((0..D).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|axes| <[usize; K]>::try_from(&axes[..K]).unwrap())
        .boxed()
}

mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;
    use proptest::test_runner::Config;
    use proptest::test_runner::TestRunner;

    use super::*;
    use crate::Addressable;
    use crate::AddressableMut;
    use crate::Axes;
    use crate::Layout;
    use crate::NdArray;
    use crate::View;

    #[test]
    fn sample_many() {
        let mut runner = TestRunner::new(Config::default());

        for _ in 0..256 {
            let (shape, coord) = gen_shape_and_coord::<3>(4)
                .new_tree(&mut runner)
                .unwrap()
                .current();
            assert!(shape.iter().all(|&n| (1..=4).contains(&n)));
            assert!(Layout::row_major(shape).contains(&coord));

            let axes = gen_axes::<4, 2>().new_tree(&mut runner).unwrap().current();
            assert!(Axes::new(axes, 4).is_ok());
        }
    }

    // Reference row-major address: Σ idx[i] × ∏ sizes[i+1..].
    fn reference_location(sizes: &[usize], coord: &[usize]) -> usize {
        (0..sizes.len())
            .map(|i| coord[i] * sizes[i + 1..].iter().product::<usize>())
            .sum()
    }

    fn counting<const D: usize>(shape: [usize; D]) -> NdArray<usize, D> {
        NdArray::from_vec(shape, (0..shape.iter().product()).collect()).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128, ..ProptestConfig::default()
        })]

        #[test]
        fn location_matches_reference((shape, coord) in gen_shape_and_coord::<4>(5)) {
            let layout = Layout::row_major(shape);
            prop_assert_eq!(layout.location(&coord), reference_location(&shape, &coord));
            prop_assert_eq!(layout.coordinates(layout.location(&coord)), Some(coord));
        }

        #[test]
        fn fill_then_read_back(shape in gen_shape::<3>(5)) {
            let mut a = NdArray::<usize, 3>::new(shape).unwrap();
            let mut n = 0;
            for coord in shape.iter().map(|&e| 0..e).multi_cartesian_product() {
                let coord: [usize; 3] = coord.try_into().unwrap();
                a[coord] = n;
                n += 1;
            }
            prop_assert_eq!(a.as_slice(), &(0..n).collect::<Vec<_>>()[..]);
            let mut n = 0;
            for coord in shape.iter().map(|&e| 0..e).multi_cartesian_product() {
                let coord: [usize; 3] = coord.try_into().unwrap();
                prop_assert_eq!(a.at(coord), Ok(&n));
                n += 1;
            }
        }

        #[test]
        fn permuted_traversal_visits_each_once(
            shape in gen_shape::<4>(4),
            axes in gen_axes::<4, 4>(),
        ) {
            let a = counting(shape);
            let mut seen = HashSet::new();
            let it = a.indexer(axes).unwrap();
            prop_assert_eq!(it.len(), a.len());
            for (pos, value) in it {
                let mut coord = [0; 4];
                for (j, &axis) in axes.iter().enumerate() {
                    coord[axis] = pos[j];
                }
                prop_assert_eq!(a.at(coord), Ok(value));
                prop_assert!(seen.insert(*value));
            }
            prop_assert_eq!(seen.len(), a.len());
        }

        #[test]
        fn partial_traversal_keeps_other_axes_at_zero(
            shape in gen_shape::<3>(4),
            axes in gen_axes::<3, 2>(),
        ) {
            let a = counting(shape);
            let rest = Axes::new(axes, 3).unwrap().complement::<3, 1>()[0];
            let mut count = 0;
            for (pos, value) in a.indexer(axes).unwrap() {
                let mut coord = [0; 3];
                coord[axes[0]] = pos[0];
                coord[axes[1]] = pos[1];
                prop_assert_eq!(coord[rest], 0);
                prop_assert_eq!(a[coord], *value);
                count += 1;
            }
            prop_assert_eq!(count, shape[axes[0]] * shape[axes[1]]);
        }

        #[test]
        fn fix_agrees_with_parent(
            (shape, coord) in gen_shape_and_coord::<3>(5),
            axis in 0usize..3,
        ) {
            let a = counting(shape);
            let view: View<'_, usize, 2> = a.fix([axis], [coord[axis]]).unwrap();
            let mut local = [0; 2];
            let mut next = 0;
            for (i, &c) in coord.iter().enumerate() {
                if i != axis {
                    local[next] = c;
                    next += 1;
                }
            }
            prop_assert_eq!(view.at(local), a.at(coord));
        }

        #[test]
        fn fix_at_extent_is_rejected(shape in gen_shape::<3>(5), axis in 0usize..3) {
            let a = counting(shape);
            let err = a.fix::<1, 2>([axis], [shape[axis]]).unwrap_err();
            prop_assert!(err.is_invalid_argument());
        }

        #[test]
        fn at_extent_is_out_of_range(shape in gen_shape::<3>(5)) {
            let a = counting(shape);
            let err = a.at([shape[0], 0, 0]).unwrap_err();
            prop_assert!(err.is_out_of_range());
        }

        #[test]
        fn lanes_partition_the_array(
            shape in gen_shape::<3>(4),
            axes in gen_axes::<3, 1>(),
        ) {
            let a = counting(shape);
            let mut seen = HashSet::new();
            for (_, lane) in a.lanes::<1, 2>(axes).unwrap() {
                for (_, value) in lane.iter() {
                    prop_assert!(seen.insert(*value));
                }
            }
            prop_assert_eq!(seen.len(), a.len());
        }

        #[test]
        fn indexer_mut_touches_each_once(
            shape in gen_shape::<3>(4),
            axes in gen_axes::<3, 3>(),
        ) {
            let mut a = NdArray::<u32, 3>::new(shape).unwrap();
            for (_, elem) in a.indexer_mut(axes).unwrap() {
                *elem += 1;
            }
            prop_assert!(a.as_slice().iter().all(|&n| n == 1));
        }
    }
}
