//! The flat key/value definition store and its recursive interpolation.

mod interpolator;

pub use interpolator::{InterpolatingMap, InterpolationError};
