//! Pie chart layout, animation and serialization.
//!
//! # Responsibility
//! - Partition the circle by expense cost in mirror order.
//! - Animate slices keyed by expense id across snapshots.
//! - Expose frames and SVG for the view layer.

pub mod arc;
pub mod color;
pub mod pie;
pub mod renderer;
pub mod svg;
pub mod tween;
