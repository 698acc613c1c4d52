//! Engine: configuration, the producer thread, and consumer-facing
//! accessors.
//!
//! The producer loop polls a stop flag at the top of every iteration,
//! snapshots the worker count, advances one full generation on a rayon pool
//! and commits it. A step in progress always runs to completion, so shutdown
//! never leaves the working arena half-written.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rayon::ThreadPool;

use super::frame::{FrameBuffers, StatsSnapshot, StepAccess};
use super::grid::{Grid, GridError};
use super::kernel::step_generation;
use super::offsets::OffsetTable;
use super::seed::{clock_seed, seed_grid};

const DEFAULT_WIDTH: usize = 1024;
const DEFAULT_HEIGHT: usize = 768;

/// Configuration for a FrameLife engine instance.
///
/// Use `FrameLifeConfig::default()` for auto-tuned defaults, or customise
/// individual knobs via the builder methods.
#[derive(Clone, Debug)]
pub struct FrameLifeConfig {
    /// Grid width in cells, dead border included.
    pub width: usize,
    /// Grid height in cells, dead border included.
    pub height: usize,
    /// Worker threads for the per-step compute pool.
    /// `None` means auto-detect from physical cores.
    pub worker_threads: Option<usize>,
    /// Hard upper bound on workers regardless of auto-detection.
    /// `None` means no additional cap beyond `worker_threads`.
    pub max_threads: Option<usize>,
    /// Fixed master seed for the initial pattern.
    /// `None` seeds from wall-clock time (a fresh pattern each run).
    pub seed: Option<u64>,
}

impl Default for FrameLifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            worker_threads: None,
            max_threads: None,
            seed: None,
        }
    }
}

impl FrameLifeConfig {
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set an explicit worker count for the compute pool.
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on workers.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    /// Seed the initial pattern deterministically.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Resolve the worker count from a config, falling back to auto-detect.
fn resolve_worker_threads(config: &FrameLifeConfig) -> usize {
    let mut threads = config
        .worker_threads
        .unwrap_or_else(|| num_cpus::get_physical());
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Control state shared between the engine handle and the producer thread.
struct Control {
    /// Cooperative stop flag. Set once, observed at iteration boundaries.
    stop: AtomicBool,
    /// Live-adjustable worker count, snapshotted at the top of each step.
    worker_threads: AtomicUsize,
}

/// A running (or startable) simulation.
///
/// Construction allocates both grid arenas and the offset table and seeds
/// the initial generation; [`FrameLife::start`] launches the producer
/// thread. Dropping the engine stops and joins it.
pub struct FrameLife {
    frames: Arc<FrameBuffers>,
    control: Arc<Control>,
    /// Step token and offset table, handed to the producer on start.
    pending: Option<(StepAccess, Arc<OffsetTable>)>,
    producer: Option<thread::JoinHandle<()>>,
}

impl FrameLife {
    pub fn new() -> Result<Self, GridError> {
        Self::with_config(FrameLifeConfig::default())
    }

    /// Create an engine with explicit configuration. Fails if the grid
    /// dimensions cannot hold an interior.
    pub fn with_config(config: FrameLifeConfig) -> Result<Self, GridError> {
        let mut visible = Grid::new(config.width, config.height)?;
        let working = Grid::new(config.width, config.height)?;

        let master_seed = config.seed.unwrap_or_else(clock_seed);
        seed_grid(&mut visible, master_seed);
        let table = Arc::new(OffsetTable::build(&visible));

        let workers = resolve_worker_threads(&config);
        let (frames, access) = FrameBuffers::new(visible, working)?;
        log::debug!(
            "engine ready: {}x{} grid, {workers} workers, seed {master_seed:#x}",
            config.width,
            config.height
        );

        Ok(Self {
            frames,
            control: Arc::new(Control {
                stop: AtomicBool::new(false),
                worker_threads: AtomicUsize::new(workers),
            }),
            pending: Some((access, table)),
            producer: None,
        })
    }

    /// Launch the producer thread. A second call is a no-op.
    pub fn start(&mut self) {
        if let Some((access, table)) = self.pending.take() {
            let control = Arc::clone(&self.control);
            let handle = thread::Builder::new()
                .name("frame-life-producer".into())
                .spawn(move || producer_loop(control, access, table))
                .expect("failed to spawn producer thread");
            self.producer = Some(handle);
        }
    }

    /// Signal the producer to stop after its in-flight generation and join
    /// it. Idempotent; also run on drop.
    pub fn stop(&mut self) {
        self.control.stop.store(true, Ordering::Release);
        if let Some(handle) = self.producer.take() {
            handle.join().expect("producer thread panicked");
        }
    }

    /// Scoped read access to the most recently committed generation, for
    /// direct upload to a display surface.
    pub fn with_visible<R>(&self, f: impl FnOnce(&Grid, StatsSnapshot) -> R) -> R {
        self.frames.with_visible(f)
    }

    /// Point-in-time stats snapshot; the fields are only ever updated
    /// together under the swap lock.
    pub fn stats(&self) -> StatsSnapshot {
        self.frames.stats()
    }

    pub fn generation_index(&self) -> u64 {
        self.stats().generation
    }

    pub fn last_step_duration(&self) -> Duration {
        self.stats().step_duration
    }

    pub fn alive_count(&self) -> u64 {
        self.stats().alive
    }

    pub fn dead_count(&self) -> u64 {
        self.stats().dead
    }

    /// Adjust the worker count for subsequent generations. Takes effect at
    /// the next iteration boundary; an in-flight step keeps its snapshot.
    pub fn set_worker_threads(&self, n: usize) {
        self.control.worker_threads.store(n.max(1), Ordering::Relaxed);
    }

    pub fn worker_threads(&self) -> usize {
        self.control.worker_threads.load(Ordering::Relaxed)
    }
}

impl Drop for FrameLife {
    fn drop(&mut self) {
        self.stop();
    }
}

fn producer_loop(control: Arc<Control>, mut access: StepAccess, table: Arc<OffsetTable>) {
    let mut pool: Option<ThreadPool> = None;
    let mut pool_threads = 0usize;
    let mut last_iteration = Instant::now();

    while !control.stop.load(Ordering::Acquire) {
        // Snapshot the worker count once per generation; live changes take
        // effect on the next iteration, never mid-step.
        let threads = control.worker_threads.load(Ordering::Relaxed).max(1);
        if pool.is_none() || pool_threads != threads {
            pool = Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .expect("failed to build compute pool"),
            );
            pool_threads = threads;
            log::debug!("compute pool rebuilt with {threads} workers");
        }

        let now = Instant::now();
        let elapsed = now - last_iteration;
        last_iteration = now;

        let (prev, working) = access.split();
        let tally = pool
            .as_ref()
            .expect("compute pool present")
            .install(|| step_generation(prev, working, &table));
        access.commit(elapsed, tally.alive, tally.dead);
    }

    log::debug!(
        "producer thread stopped at generation {}",
        access.frames().stats().generation
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> FrameLifeConfig {
        FrameLifeConfig::default()
            .dimensions(32, 24)
            .worker_threads(2)
            .seed(0xF00D)
    }

    #[test]
    fn worker_resolution_applies_cap_and_floor() {
        let auto = resolve_worker_threads(&FrameLifeConfig::default());
        assert!(auto >= 1);

        let capped = FrameLifeConfig::default().worker_threads(16).max_threads(4);
        assert_eq!(resolve_worker_threads(&capped), 4);

        let floor = FrameLifeConfig::default().worker_threads(0);
        assert_eq!(resolve_worker_threads(&floor), 1);
    }

    #[test]
    fn construction_rejects_degenerate_grid() {
        let config = FrameLifeConfig::default().dimensions(2, 50);
        assert!(FrameLife::with_config(config).is_err());
    }

    #[test]
    fn engine_runs_and_stops_cleanly() {
        let mut life = FrameLife::with_config(small_config()).unwrap();
        let interior = ((32 - 2) * (24 - 2)) as u64;
        assert_eq!(life.alive_count() + life.dead_count(), interior);

        life.start();
        while life.generation_index() < 3 {
            thread::yield_now();
        }
        life.stop();

        let stats = life.stats();
        assert!(stats.generation >= 3);
        assert_eq!(stats.alive + stats.dead, interior);

        // Stop is idempotent and the world is frozen afterwards.
        life.stop();
        assert_eq!(life.generation_index(), stats.generation);
    }

    #[test]
    fn start_twice_is_a_noop() {
        let mut life = FrameLife::with_config(small_config()).unwrap();
        life.start();
        life.start();
        while life.generation_index() < 1 {
            thread::yield_now();
        }
        life.stop();
    }

    #[test]
    fn worker_count_is_live_adjustable() {
        let mut life = FrameLife::with_config(small_config()).unwrap();
        life.start();
        life.set_worker_threads(1);
        assert_eq!(life.worker_threads(), 1);
        let target = life.generation_index() + 3;
        while life.generation_index() < target {
            thread::yield_now();
        }
        life.stop();
        assert_eq!(
            life.alive_count() + life.dead_count(),
            life.with_visible(|grid, _| grid.interior_cell_count() as u64)
        );
    }
}
