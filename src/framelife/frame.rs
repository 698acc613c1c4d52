//! Double-buffer coordinator.
//!
//! Two grid arenas plus a "which arena is visible" indicator behind a mutex.
//! The stepper writes the working arena without holding any lock while the
//! consumer reads the visible arena under the lock; [`StepAccess::commit`]
//! exchanges the roles and publishes the generation stats in one critical
//! section, so a reader observes generation N or N+1 in full, never a
//! mixture.

use std::cell::UnsafeCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::grid::{Grid, GridError};

/// Stats published together with each committed generation.
///
/// Written only at commit, under the swap lock; a copy taken under the same
/// lock is always internally consistent.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsSnapshot {
    pub generation: u64,
    /// Wall-clock time between the starts of the last two producer
    /// iterations.
    pub step_duration: Duration,
    pub alive: u64,
    pub dead: u64,
}

struct FrameState {
    /// Index of the arena the consumer may read.
    visible: usize,
    stats: StatsSnapshot,
}

/// Shared double buffer.
///
/// Role changes happen only in [`StepAccess::commit`] under the internal
/// mutex; readers go through [`FrameBuffers::with_visible`], which holds the
/// same mutex for the duration of the closure and releases it on every exit
/// path.
pub struct FrameBuffers {
    arenas: [UnsafeCell<Grid>; 2],
    state: Mutex<FrameState>,
}

// SAFETY: the arena named by `state.visible` is only ever read — by
// consumers holding the state mutex and by the stepper as the previous
// generation. The other arena is written exclusively through the unique,
// non-clonable `StepAccess` token. Roles flip only in `commit`, under the
// mutex, after the write pass has finished.
unsafe impl Send for FrameBuffers {}
unsafe impl Sync for FrameBuffers {}

impl FrameBuffers {
    /// Wrap two equally sized grids. `visible` is published as generation 0;
    /// `working` is the first step's write target. Returns the shared handle
    /// plus the unique step-access token, or an error when the arenas do not
    /// share dimensions.
    pub fn new(visible: Grid, working: Grid) -> Result<(Arc<Self>, StepAccess), GridError> {
        if visible.width() != working.width() || visible.height() != working.height() {
            return Err(GridError::ArenaMismatch(
                visible.width(),
                visible.height(),
                working.width(),
                working.height(),
            ));
        }

        let alive = visible.count_alive() as u64;
        let interior = visible.interior_cell_count() as u64;
        let frames = Arc::new(Self {
            arenas: [UnsafeCell::new(visible), UnsafeCell::new(working)],
            state: Mutex::new(FrameState {
                visible: 0,
                stats: StatsSnapshot {
                    generation: 0,
                    step_duration: Duration::ZERO,
                    alive,
                    dead: interior - alive,
                },
            }),
        });
        let access = StepAccess {
            frames: Arc::clone(&frames),
            working: 1,
        };
        Ok((frames, access))
    }

    /// Scoped consumer read of the most recently committed generation.
    pub fn with_visible<R>(&self, f: impl FnOnce(&Grid, StatsSnapshot) -> R) -> R {
        let state = self.lock_state();
        // SAFETY: `state.visible` cannot flip while the guard is held, and
        // the visible arena is never written between commits.
        let grid = unsafe { &*self.arenas[state.visible].get() };
        f(grid, state.stats)
    }

    /// Copy of the last committed stats.
    pub fn stats(&self) -> StatsSnapshot {
        self.lock_state().stats
    }

    fn lock_state(&self) -> MutexGuard<'_, FrameState> {
        self.state.lock().expect("frame state lock poisoned")
    }
}

/// Unique write capability for the working arena.
///
/// Exactly one exists per [`FrameBuffers`]; owning it is what makes the
/// lock-free write side of [`StepAccess::split`] sound.
pub struct StepAccess {
    frames: Arc<FrameBuffers>,
    /// Arena index the stepper may write. Always the complement of
    /// `state.visible`.
    working: usize,
}

impl StepAccess {
    /// The previous generation (read-only) and the working arena (writable),
    /// with no lock taken. The consumer may concurrently read the visible
    /// arena; both sides only ever read it.
    pub fn split(&mut self) -> (&Grid, &mut Grid) {
        let visible = 1 - self.working;
        // SAFETY: `self` is the unique write token, so no other reference to
        // the working arena exists; the visible arena is read-only until the
        // next commit.
        unsafe {
            (
                &*self.frames.arenas[visible].get(),
                &mut *self.frames.arenas[self.working].get(),
            )
        }
    }

    /// Publish the working arena as the new visible generation.
    ///
    /// Swaps the roles, bumps the generation counter and replaces the stats
    /// in one critical section. Lock contention blocks; a generation is
    /// never skipped.
    pub fn commit(&mut self, step_duration: Duration, alive: u64, dead: u64) {
        {
            let mut state = self.frames.lock_state();
            state.visible = self.working;
            state.stats = StatsSnapshot {
                generation: state.stats.generation + 1,
                step_duration,
                alive,
                dead,
            };
        }
        self.working = 1 - self.working;
    }

    /// Shared handle to the buffers, for handing to the consumer side.
    pub fn frames(&self) -> &Arc<FrameBuffers> {
        &self.frames
    }
}
