//! Application services wiring store, mirror, chart and form.
//!
//! # Responsibility
//! - Keep UI/FFI layers decoupled from storage and rendering details.

pub mod tracker;
