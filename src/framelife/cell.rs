//! Pixel-shaped cell encoding.
//!
//! A cell is a fixed 3-channel pixel: all channels 0 when dead, all channels
//! `ALIVE_CHANNEL` when alive. Summing one channel across the 8 neighbors and
//! dividing by `ALIVE_CHANNEL` yields the live-neighbor count without a
//! branch per neighbor, and the grid doubles as the display upload buffer.

use bytemuck::{Pod, Zeroable};

/// Channels per cell. Matches a packed RGB display surface.
pub const CHANNELS: usize = 3;

/// Channel value of a live cell. Dead cells hold 0 in every channel.
pub const ALIVE_CHANNEL: u8 = u8::MAX;

/// One grid cell, encoded as a pixel.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Cell(pub [u8; CHANNELS]);

pub const DEAD: Cell = Cell([0; CHANNELS]);
pub const ALIVE: Cell = Cell([ALIVE_CHANNEL; CHANNELS]);

impl Cell {
    #[inline]
    pub const fn from_alive(alive: bool) -> Self {
        if alive { ALIVE } else { DEAD }
    }

    #[inline]
    pub const fn is_alive(self) -> bool {
        self.0[0] != 0
    }

    /// The channel used for branch-free neighbor summing.
    #[inline]
    pub const fn channel(self) -> u32 {
        self.0[0] as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips() {
        assert!(Cell::from_alive(true).is_alive());
        assert!(!Cell::from_alive(false).is_alive());
        assert_eq!(Cell::from_alive(true), ALIVE);
        assert_eq!(Cell::from_alive(false), DEAD);
    }

    #[test]
    fn channels_are_uniform() {
        assert!(ALIVE.0.iter().all(|&c| c == ALIVE_CHANNEL));
        assert!(DEAD.0.iter().all(|&c| c == 0));
        assert_eq!(ALIVE.channel(), ALIVE_CHANNEL as u32);
        assert_eq!(DEAD.channel(), 0);
    }

    #[test]
    fn eight_alive_channels_divide_to_eight() {
        let sum: u32 = (0..8).map(|_| ALIVE.channel()).sum();
        assert_eq!(sum / ALIVE_CHANNEL as u32, 8);
    }
}
