//! Error taxonomy for the network stack.
//!
//! Mirrors the internal error kinds the spec assigns a fixed handling policy:
//! every one of them collapses to `-1` at the syscall boundary, but keeping
//! them as a typed enum (rather than bare integers, as a raw syscall ABI
//! would) lets the rest of the crate match on them.

use core::fmt;

/// Internal error kinds produced by the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// `netopen` found no free connection slot.
    TableFull,
    /// A page allocation failed.
    OutOfMemory,
    /// PCI scan found no matching E1000 device.
    NoDevice,
    /// Argument marshaling failed or an argument was out of range.
    BadArg,
    /// A header claimed more bytes than were actually received.
    Truncated,
    /// Packet silently dropped (unknown ethertype, wrong destination, etc).
    Drop,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            NetError::TableFull => "connection table full",
            NetError::OutOfMemory => "out of memory",
            NetError::NoDevice => "no matching network device found",
            NetError::BadArg => "bad argument",
            NetError::Truncated => "truncated header",
            NetError::Drop => "packet dropped",
        };
        f.write_str(msg)
    }
}

/// Result type used throughout the stack.
pub type NetResult<T> = Result<T, NetError>;
