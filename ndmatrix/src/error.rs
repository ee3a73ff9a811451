/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// The type of error for array, view and traversal operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("axis {axis} has zero extent")]
    ZeroExtent { axis: usize },

    #[error("shape {shape:?} exceeds the limit of {limit} elements")]
    TooManyElements { shape: Vec<usize>, limit: usize },

    #[error("storage length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("cannot fix axis {axis} at {index}: extent is {extent}")]
    FixIndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    #[error("axis {axis} out of range for {ndim}-dimensional array")]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[error("axis number {number} out of range 1..={ndim}")]
    AxisNumberOutOfRange { number: usize, ndim: usize },

    #[error("axis {axis} selected more than once")]
    DuplicateAxis { axis: usize },

    #[error("index {index} out of range {extent} on axis {axis}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },
}

/// Coarse classification of an [`ArrayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A shape, axis selection or fixed value was rejected before any
    /// storage was touched.
    InvalidArgument,

    /// A checked accessor was given a coordinate outside the shape.
    OutOfRange,
}

impl ArrayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArrayError::IndexOutOfRange { .. } => ErrorKind::OutOfRange,
            ArrayError::ZeroExtent { .. }
            | ArrayError::TooManyElements { .. }
            | ArrayError::LengthMismatch { .. }
            | ArrayError::FixIndexOutOfRange { .. }
            | ArrayError::AxisOutOfRange { .. }
            | ArrayError::AxisNumberOutOfRange { .. }
            | ArrayError::DuplicateAxis { .. } => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_out_of_range(&self) -> bool {
        self.kind() == ErrorKind::OutOfRange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ArrayError::IndexOutOfRange {
                axis: 0,
                index: 3,
                extent: 3
            }
            .kind(),
            ErrorKind::OutOfRange
        );
        assert!(ArrayError::ZeroExtent { axis: 1 }.is_invalid_argument());
        assert!(
            ArrayError::FixIndexOutOfRange {
                axis: 0,
                index: 3,
                extent: 3
            }
            .is_invalid_argument()
        );
        assert!(!ArrayError::DuplicateAxis { axis: 2 }.is_out_of_range());
    }

    #[test]
    fn test_error_messages() {
        let err = ArrayError::IndexOutOfRange {
            axis: 2,
            index: 5,
            extent: 5,
        };
        assert_eq!(err.to_string(), "index 5 out of range 5 on axis 2");
        let err = ArrayError::AxisOutOfRange { axis: 3, ndim: 3 };
        assert_eq!(
            err.to_string(),
            "axis 3 out of range for 3-dimensional array"
        );
    }
}
