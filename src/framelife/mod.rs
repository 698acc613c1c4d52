//! FrameLife engine internals and public API.

pub mod cell;
pub mod engine;
pub mod frame;
pub mod grid;
pub mod kernel;
pub mod offsets;
pub mod seed;
