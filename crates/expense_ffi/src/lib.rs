//! Flutter-facing FFI surface for the expense tracker.

pub mod api;
