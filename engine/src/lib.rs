//! Handsfree engine: hand-landmark gesture classification and the
//! interaction state machines of a gesture-driven image viewer.
//!
//! Landmark source -> frame assembler -> gesture classifier ->
//! `TrackingSnapshot` -> interaction session -> events.

pub mod config;
pub mod geometry;
pub mod interaction;
pub mod runtime;
pub mod sexp;
pub mod source;
pub mod tracking;
