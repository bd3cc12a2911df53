//! Platform abstraction layer
//!
//! Normalizes browser (or headless) input into per-tick intent. Device event
//! wiring lives in the front end; this module only keeps the flag set.

pub mod input;

pub use input::{Direction, InputState, Key};
