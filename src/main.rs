#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::thread;
use std::time::{Duration, Instant};

use frame_life::{FrameLife, FrameLifeConfig};

const DEFAULT_RUN_MS: u64 = 3000;
const DEFAULT_REPORT_MS: u64 = 250;

struct MainArgs {
    config: FrameLifeConfig,
    run_for: Duration,
    report_every: Duration,
}

fn parse_args() -> MainArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut config = FrameLifeConfig::default();
    let mut run_for = Duration::from_millis(DEFAULT_RUN_MS);
    let mut report_every = Duration::from_millis(DEFAULT_REPORT_MS);
    let next_arg = |i: usize, flag: &str| -> &str {
        args.get(i)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("{flag} requires a value"))
    };
    let mut width = config.width;
    let mut height = config.height;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = next_arg(i, "--width")
                    .parse()
                    .expect("--width requires a positive integer");
            }
            "--height" => {
                i += 1;
                height = next_arg(i, "--height")
                    .parse()
                    .expect("--height requires a positive integer");
            }
            "--threads" => {
                i += 1;
                let n: usize = next_arg(i, "--threads")
                    .parse()
                    .expect("--threads requires a positive integer");
                config = config.worker_threads(n);
            }
            "--max-threads" => {
                i += 1;
                let n: usize = next_arg(i, "--max-threads")
                    .parse()
                    .expect("--max-threads requires a positive integer");
                config = config.max_threads(n);
            }
            "--seed" => {
                i += 1;
                let seed: u64 = next_arg(i, "--seed")
                    .parse()
                    .expect("--seed requires an unsigned integer");
                config = config.seed(seed);
            }
            "--run-ms" => {
                i += 1;
                let ms: u64 = next_arg(i, "--run-ms")
                    .parse()
                    .expect("--run-ms requires a positive integer");
                run_for = Duration::from_millis(ms);
            }
            "--report-ms" => {
                i += 1;
                let ms: u64 = next_arg(i, "--report-ms")
                    .parse()
                    .expect("--report-ms requires a positive integer");
                report_every = Duration::from_millis(ms.max(1));
            }
            other => panic!(
                "unknown argument: {other}\nusage: frame-life [--width N] [--height N] [--threads N] [--max-threads N] [--seed N] [--run-ms N] [--report-ms N]"
            ),
        }
        i += 1;
    }
    MainArgs {
        config: config.dimensions(width, height),
        run_for,
        report_every,
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let mut life = FrameLife::with_config(args.config)
        .unwrap_or_else(|err| panic!("invalid configuration: {err}"));
    let interior = life.with_visible(|grid, _| grid.interior_cell_count());
    life.start();

    // Consumer side: briefly borrow the visible frame on each report tick.
    let deadline = Instant::now() + args.run_for;
    while Instant::now() < deadline {
        thread::sleep(args.report_every);
        let (stats, frame_bytes) = life.with_visible(|grid, stats| (stats, grid.as_bytes().len()));
        let step_ms = stats.step_duration.as_secs_f64() * 1000.0;
        println!(
            "generation {}: alive = {}, dead = {} ({} interior), {step_ms:.3} ms/generation, {frame_bytes} frame bytes",
            stats.generation, stats.alive, stats.dead, interior
        );
    }
    life.stop();

    let stats = life.stats();
    let rate = if stats.step_duration.as_secs_f64() > 0.0 {
        1.0 / stats.step_duration.as_secs_f64()
    } else {
        0.0
    };
    println!("\n--- Summary ---");
    println!(
        "stopped at generation {} with {} alive / {} dead ({rate:.1} generations/s at the end)",
        stats.generation, stats.alive, stats.dead
    );
}
