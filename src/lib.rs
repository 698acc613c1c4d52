//! Fixed-frame Conway's Game of Life engine (B3/S23).
//!
//! Cells are encoded as display-ready pixels in a pair of double-buffered
//! grid arenas. A dedicated producer thread advances generations on a rayon
//! pool while a consumer reads the most recently committed frame under a
//! brief swap lock.

pub mod framelife;

pub use framelife::cell::{ALIVE, CHANNELS, Cell, DEAD};
pub use framelife::engine::{FrameLife, FrameLifeConfig};
pub use framelife::frame::{FrameBuffers, StatsSnapshot, StepAccess};
pub use framelife::grid::{Grid, GridError};
pub use framelife::kernel::{StepTally, step_generation};
pub use framelife::offsets::{OffsetRecord, OffsetTable};
pub use framelife::seed::{clock_seed, seed_grid};
