//! Core data primitives.
//!
//! Feature matrices are stored row-major so that every sample is a
//! contiguous slice, which is what the distance functions consume.

mod matrix;

pub use matrix::Matrix;
