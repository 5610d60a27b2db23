//! The interface the stack expects its embedding kernel to provide.
//!
//! `spec.md` §1 treats the physical-page allocator, virtual↔physical
//! translation, the interrupt controller, and the cooperative sleep/wakeup
//! primitive as external collaborators "specified only by interface". This
//! module is that interface, expressed as a single trait so the rest of the
//! crate is generic over it rather than tied to any particular kernel (and
//! so it can be exercised under `std` in tests — see `testutil`).

use spin::MutexGuard;

/// Size of a physical page. Every DMA-visible buffer in this crate (RX/TX
/// descriptor rings, per-descriptor data buffers, per-connection receive
/// buffers, outbound frame staging buffers) is exactly one page.
pub const PAGE_SIZE: usize = 4096;

/// A single physical page, owned by whoever holds this value.
///
/// Carries both the kernel-virtual pointer (through which the stack reads
/// and writes the page's bytes) and the physical address (which is what
/// gets programmed into NIC descriptors, since the NIC only understands
/// physical addresses). A host OS with identity-mapped kernel memory can
/// make `virt` and `phys` the same bit pattern; one that doesn't must fill
/// in the real translation.
#[derive(Debug)]
pub struct Page {
    pub virt: *mut u8,
    pub phys: u64,
}

impl Page {
    /// View the page's bytes.
    ///
    /// # Safety
    /// The caller must ensure no other mutable reference to this page's
    /// bytes is alive concurrently with either the read or the returned
    /// slice's lifetime.
    pub unsafe fn as_slice(&self) -> &[u8] {
        core::slice::from_raw_parts(self.virt, PAGE_SIZE)
    }

    /// View the page's bytes mutably.
    ///
    /// # Safety
    /// See `as_slice`.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        core::slice::from_raw_parts_mut(self.virt, PAGE_SIZE)
    }
}

// Ownership of a `Page` is always mediated by `netlock` or by a descriptor
// ring slot the driver alone writes to, so it is safe to move between
// threads even though it wraps a raw pointer.
unsafe impl Send for Page {}

/// Operations the embedding kernel must supply.
///
/// Implementations are expected to be cheap to call repeatedly and, for
/// `sleep`/`wakeup`, to provide the same non-spurious-wakeup and
/// atomic-release-then-block guarantee xv6-style kernels give: a thread
/// that calls `sleep` while holding `guard` is registered as a waiter on
/// `chan` before `guard` is dropped, so a concurrent `wakeup(chan)` can
/// never be lost between the two.
pub trait HostOps {
    /// Allocate one physical page. Returns `None` if none are free.
    fn alloc_page(&self) -> Option<Page>;

    /// Return a page to the host's allocator.
    fn free_page(&self, page: Page);

    /// Translate a kernel-virtual address to its physical address.
    fn v2p(&self, virt: *const u8) -> u64;

    /// Translate a physical address to its kernel-virtual address.
    fn p2v(&self, phys: u64) -> *mut u8;

    /// Register the NIC's interrupt line with the platform interrupt
    /// controller, targeting the given CPU.
    fn enable_irq(&self, line: u8, cpu: u32);

    /// Block the calling thread on `chan`, releasing `guard` only once the
    /// thread is durably registered as a waiter, and re-acquire nothing —
    /// the caller re-locks after this returns. Wakes non-spuriously only in
    /// the sense the host provides; callers must re-check their predicate.
    fn sleep<T>(&self, chan: usize, guard: MutexGuard<'_, T>);

    /// Wake every thread sleeping on `chan`.
    fn wakeup(&self, chan: usize);
}
