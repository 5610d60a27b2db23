//! A `std`-backed `HostOps` implementation, so the rest of the crate can be
//! exercised as ordinary `#[test]` functions instead of needing a booted
//! kernel (`SPEC_FULL.md` §2, "Test tooling").
//!
//! Pages are boxed `[u8; PAGE_SIZE]` arrays; since nothing under `std` has a
//! real physical/virtual address split, `phys` is just `virt` cast to `u64`
//! (an identity mapping, the same simplification `host.rs` documents as
//! valid for hosts with identity-mapped kernel memory). `sleep`/`wakeup` are
//! built on a `std::sync::{Mutex, Condvar}` pair keyed by channel, with the
//! channel's generation counter bumped under the same internal lock that
//! `sleep` drops the caller's `spin::MutexGuard` under — so a `wakeup` that
//! lands between the guard drop and the condvar wait is never lost.

extern crate std;

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};

use spin::MutexGuard;

use crate::host::{HostOps, Page, PAGE_SIZE};

struct Waker {
    generations: Mutex<HashMap<usize, u64>>,
    cv: Condvar,
}

impl Waker {
    fn new() -> Self {
        Waker {
            generations: Mutex::new(HashMap::new()),
            cv: Condvar::new(),
        }
    }
}

/// `HostOps` backed by the system allocator and `std` threading primitives.
#[derive(Clone)]
pub struct StdHost {
    waker: std::sync::Arc<Waker>,
}

impl StdHost {
    pub fn new() -> Self {
        StdHost {
            waker: std::sync::Arc::new(Waker::new()),
        }
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostOps for StdHost {
    fn alloc_page(&self) -> Option<Page> {
        let boxed: std::boxed::Box<[u8; PAGE_SIZE]> = std::boxed::Box::new([0u8; PAGE_SIZE]);
        let virt = std::boxed::Box::into_raw(boxed) as *mut u8;
        Some(Page {
            virt,
            phys: virt as u64,
        })
    }

    fn free_page(&self, page: Page) {
        unsafe {
            drop(std::boxed::Box::from_raw(page.virt as *mut [u8; PAGE_SIZE]));
        }
    }

    fn v2p(&self, virt: *const u8) -> u64 {
        virt as u64
    }

    fn p2v(&self, phys: u64) -> *mut u8 {
        phys as usize as *mut u8
    }

    fn enable_irq(&self, _line: u8, _cpu: u32) {
        // No interrupt controller under `std`; interrupts are simulated by
        // tests calling `E1000::handle_interrupt` directly.
    }

    fn sleep<T>(&self, chan: usize, guard: MutexGuard<'_, T>) {
        let mut generations = self.waker.generations.lock().unwrap();
        let start = *generations.get(&chan).unwrap_or(&0);
        drop(guard);
        let _generations = self
            .waker
            .cv
            .wait_while(generations, |g| *g.get(&chan).unwrap_or(&0) == start)
            .unwrap();
    }

    fn wakeup(&self, chan: usize) {
        let mut generations = self.waker.generations.lock().unwrap();
        *generations.entry(chan).or_insert(0) += 1;
        self.waker.cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn alloc_then_free_roundtrips() {
        let host = StdHost::new();
        let page = host.alloc_page().unwrap();
        assert_eq!(host.v2p(page.virt), page.phys);
        host.free_page(page);
    }

    #[test]
    fn wakeup_after_sleep_releases_waiter() {
        let host = StdHost::new();
        let lock = Arc::new(spin::Mutex::new(0usize));
        let woken = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let waiter_host = host.clone();
        let waiter_lock = lock.clone();
        let waiter_woken = woken.clone();
        let handle = thread::spawn(move || {
            let guard = waiter_lock.lock();
            waiter_host.sleep(42, guard);
            waiter_woken.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!woken.load(std::sync::atomic::Ordering::SeqCst));
        host.wakeup(42);
        handle.join().unwrap();
        assert!(woken.load(std::sync::atomic::Ordering::SeqCst));
    }
}
