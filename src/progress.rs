//! # Progress — Atomic Walk Progress Counters
//!
//! Thread-safe progress tracking shared between the walk loop and the
//! background status reporter. Counters are atomics; a Mutex guards only the
//! current-candidate string (low contention — refreshed every few thousand
//! steps, not per candidate).
//!
//! ## Background Reporter
//!
//! A dedicated thread logs progress to stderr every 10 seconds: current
//! candidate, tested count, rate (candidates/sec), found count, and elapsed
//! time. It polls the `shutdown` flag every 100 ms, so the sub-second runs
//! typical of small moduli exit promptly instead of waiting out a full
//! report interval.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(10);
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

pub struct Progress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || {
            let mut last_report = Instant::now();
            loop {
                thread::sleep(SHUTDOWN_POLL);
                if progress.shutdown.load(Ordering::Relaxed) {
                    break;
                }
                if last_report.elapsed() >= REPORT_INTERVAL {
                    progress.print_status();
                    last_report = Instant::now();
                }
            }
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let current = self.current.lock().unwrap().clone();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested,
            rate = format_args!("{:.2}", rate),
            found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "walk progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
