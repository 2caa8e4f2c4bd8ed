//! Simple profiling macros using thread-local storage
//!
//! Lightweight timing of the per-turn phases without changing function signatures.
//! Enable with environment variable: FLIP_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Profiled phases of a turn
const CATEGORIES: [&str; 4] = ["grid_rebuild", "wall_analysis", "move_search", "schedule"];

thread_local! {
    static LOCAL_TIME: RefCell<[u64; 4]> = RefCell::new([0; 4]);
    static LOCAL_COUNT: RefCell<[usize; 4]> = RefCell::new([0; 4]);
    static SKIPPED_PIECES: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_TIME: [AtomicU64; 4] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_COUNT: [AtomicUsize; 4] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];
static GLOBAL_SKIPPED_PIECES: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("FLIP_PROFILE").is_ok()
}

pub struct ProfileGuard {
    start: Instant,
    slot: usize,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }
        CATEGORIES
            .iter()
            .position(|&c| c == category)
            .map(|slot| ProfileGuard {
                start: Instant::now(),
                slot,
            })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        LOCAL_TIME.with(|t| t.borrow_mut()[self.slot] += elapsed_ns);
        LOCAL_COUNT.with(|c| c.borrow_mut()[self.slot] += 1);
    }
}

/// Counts a piece that had no legal step this turn
#[inline]
pub fn record_skipped_piece() {
    if is_profiling_enabled() {
        SKIPPED_PIECES.with(|c| *c.borrow_mut() += 1);
    }
}

pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        for (slot, value) in t.borrow_mut().iter_mut().enumerate() {
            GLOBAL_TIME[slot].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
    LOCAL_COUNT.with(|c| {
        for (slot, value) in c.borrow_mut().iter_mut().enumerate() {
            GLOBAL_COUNT[slot].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
    SKIPPED_PIECES.with(|c| {
        GLOBAL_SKIPPED_PIECES.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for (slot, name) in CATEGORIES.iter().enumerate() {
        let time = GLOBAL_TIME[slot].load(Ordering::Relaxed);
        let count = GLOBAL_COUNT[slot].load(Ordering::Relaxed);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!("{}:", name);
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", count);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    eprintln!(
        "Skipped pieces (no legal step): {}",
        GLOBAL_SKIPPED_PIECES.load(Ordering::Relaxed)
    );
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for slot in 0..CATEGORIES.len() {
        GLOBAL_TIME[slot].store(0, Ordering::Relaxed);
        GLOBAL_COUNT[slot].store(0, Ordering::Relaxed);
    }
    GLOBAL_SKIPPED_PIECES.store(0, Ordering::Relaxed);
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
