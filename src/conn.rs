//! The connection table (`spec.md` §4.D): a fixed-capacity array of UDP
//! endpoints, each binding a local pseudo-port (its own slot index) to a
//! remote `(address, port)` and owning a one-page receive buffer.
//!
//! This module holds no reference to a particular `HostOps` impl or to the
//! driver — callers pass in whatever host/driver access a given operation
//! needs, which keeps the table itself exercisable under plain `std` tests.

use alloc::vec::Vec;

use crate::error::{NetError, NetResult};
use crate::host::{HostOps, Page, PAGE_SIZE};
use crate::wire::{ethernet, ipv4, udp};

/// Number of connection slots.
pub const NCONN: usize = 100;
/// Local UDP port of slot `i` is always `PORT_OFFSET + i`.
pub const PORT_OFFSET: u16 = 3000;

/// One connection slot.
struct Connection {
    in_use: bool,
    local_port: u16,
    remote_addr: [u8; 4],
    remote_port: u16,
    remote_mac: [u8; 6],
    remote_mac_valid: bool,
    /// Bumped every time this slot is opened. A waiter records the value in
    /// effect when its ARP request went out and only accepts a reply while
    /// that value is still current, so a stale reply arriving after the
    /// slot has been closed and reopened for a different wait can't
    /// prematurely satisfy the new one (`spec.md` §9).
    generation: u32,
    rx_buf: Option<Page>,
    rx_len: usize,
}

impl Connection {
    fn vacant() -> Self {
        Connection {
            in_use: false,
            local_port: 0,
            remote_addr: [0; 4],
            remote_port: 0,
            remote_mac: [0; 6],
            remote_mac_valid: false,
            generation: 0,
            rx_buf: None,
            rx_len: 0,
        }
    }
}

pub struct ConnTable {
    slots: Vec<Connection>,
}

impl ConnTable {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(NCONN);
        for _ in 0..NCONN {
            slots.push(Connection::vacant());
        }
        ConnTable { slots }
    }

    fn get(&self, i: usize) -> NetResult<&Connection> {
        self.slots.get(i).ok_or(NetError::BadArg)
    }

    fn get_mut(&mut self, i: usize) -> NetResult<&mut Connection> {
        self.slots.get_mut(i).ok_or(NetError::BadArg)
    }

    /// Whether slot `i` is occupied.
    pub fn in_use(&self, i: usize) -> bool {
        self.slots.get(i).map(|c| c.in_use).unwrap_or(false)
    }

    /// Local port of slot `i`, always `i + PORT_OFFSET` while occupied.
    pub fn local_port(&self, i: usize) -> NetResult<u16> {
        Ok(self.get(i)?.local_port)
    }

    /// Find the (at most one) occupied slot whose local port matches.
    pub fn find_by_local_port(&self, port: u16) -> Option<usize> {
        self.slots.iter().position(|c| c.in_use && c.local_port == port)
    }

    /// Allocate the lowest free slot for `(remote_addr, remote_port)`,
    /// returning the slot index and the generation stamped on it.
    pub fn alloc_slot<H: HostOps>(
        &mut self,
        host: &H,
        remote_addr: [u8; 4],
        remote_port: u16,
    ) -> NetResult<(usize, u32)> {
        let i = self.slots.iter().position(|c| !c.in_use).ok_or(NetError::TableFull)?;
        let rx_buf = host.alloc_page().ok_or(NetError::OutOfMemory)?;
        let conn = &mut self.slots[i];
        conn.in_use = true;
        conn.local_port = PORT_OFFSET + i as u16;
        conn.remote_addr = remote_addr;
        conn.remote_port = remote_port;
        conn.remote_mac = [0; 6];
        conn.remote_mac_valid = false;
        conn.generation = conn.generation.wrapping_add(1);
        conn.rx_buf = Some(rx_buf);
        conn.rx_len = 0;
        Ok((i, conn.generation))
    }

    /// True once slot `i`'s ARP resolution for generation `my_generation`
    /// has completed.
    pub fn is_resolved(&self, i: usize, my_generation: u32) -> bool {
        match self.slots.get(i) {
            Some(c) => c.in_use && c.generation == my_generation && c.remote_mac_valid,
            None => false,
        }
    }

    /// Idempotent close: frees the receive page and clears the slot.
    pub fn close<H: HostOps>(&mut self, host: &H, i: usize) -> NetResult<()> {
        let conn = self.get_mut(i)?;
        if conn.in_use {
            if let Some(page) = conn.rx_buf.take() {
                host.free_page(page);
            }
            conn.in_use = false;
            conn.remote_mac_valid = false;
            conn.rx_len = 0;
        }
        Ok(())
    }

    /// Record an ARP reply's sender hardware address against every occupied
    /// slot whose remote address matches, waking each one. Returns the slot
    /// indices updated (for the caller to wake).
    pub fn apply_arp_reply(&mut self, sender_ip: [u8; 4], sender_mac: [u8; 6]) -> Vec<usize> {
        let mut woken = Vec::new();
        for (i, conn) in self.slots.iter_mut().enumerate() {
            if conn.in_use && conn.remote_addr == sender_ip {
                conn.remote_mac = sender_mac;
                conn.remote_mac_valid = true;
                woken.push(i);
            }
        }
        woken
    }

    /// Append inbound UDP payload bytes to the matching connection's
    /// receive buffer, discarding any bytes past the page's capacity
    /// (`spec.md` §4.C overflow policy). No-op if no connection is bound to
    /// `dst_port`.
    pub fn deliver_udp(&mut self, dst_port: u16, payload: &[u8]) -> Option<usize> {
        let i = self.find_by_local_port(dst_port)?;
        let conn = &mut self.slots[i];
        let page = conn.rx_buf.as_mut()?;
        let space = PAGE_SIZE - conn.rx_len;
        let n = core::cmp::min(space, payload.len());
        let bytes = unsafe { page.as_mut_slice() };
        bytes[conn.rx_len..conn.rx_len + n].copy_from_slice(&payload[..n]);
        conn.rx_len += n;
        Some(i)
    }

    /// Copy up to `dst.len()` buffered bytes out of slot `i`, sliding any
    /// unread tail down to the front (`spec.md` §9 fix for the stale-reread
    /// bug). Returns the number of bytes copied.
    pub fn read(&mut self, i: usize, dst: &mut [u8]) -> NetResult<usize> {
        let conn = self.get_mut(i)?;
        if !conn.in_use {
            return Err(NetError::BadArg);
        }
        let page = conn.rx_buf.as_mut().ok_or(NetError::BadArg)?;
        let n = core::cmp::min(conn.rx_len, dst.len());
        let bytes = unsafe { page.as_mut_slice() };
        dst[..n].copy_from_slice(&bytes[..n]);
        let remaining = conn.rx_len - n;
        if remaining > 0 {
            bytes.copy_within(n..conn.rx_len, 0);
        }
        conn.rx_len = remaining;
        Ok(n)
    }

    /// Bytes currently buffered at slot `i`.
    pub fn rx_len(&self, i: usize) -> NetResult<usize> {
        Ok(self.get(i)?.rx_len)
    }

    /// Build the Ethernet/IPv4/UDP frame slot `i` would send for `payload`.
    pub fn build_frame(&self, i: usize, local_mac: [u8; 6], local_ip: [u8; 4], payload: &[u8]) -> NetResult<Vec<u8>> {
        let conn = self.get(i)?;
        if !conn.in_use {
            return Err(NetError::BadArg);
        }

        let mut udp_buf = alloc::vec![0u8; udp::HEADER_LEN + payload.len()];
        udp::UdpDatagram::serialise_into(conn.local_port, conn.remote_port, payload, &mut udp_buf);

        let mut ip_buf = alloc::vec![0u8; ipv4::HEADER_LEN + udp_buf.len()];
        ipv4::Ipv4Packet::serialise_into(&local_ip, &conn.remote_addr, ipv4::PROTO_UDP, &udp_buf, &mut ip_buf);

        let mut eth_buf = alloc::vec![0u8; ethernet::HEADER_LEN + ip_buf.len()];
        ethernet::EthernetFrame::serialise_into(
            &conn.remote_mac,
            &local_mac,
            ethernet::ETHERTYPE_IPV4,
            &ip_buf,
            &mut eth_buf,
        );
        Ok(eth_buf)
    }

    /// Sender fields a fresh ARP request for slot `i` should carry.
    pub fn remote_addr(&self, i: usize) -> NetResult<[u8; 4]> {
        Ok(self.get(i)?.remote_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StdHost;

    #[test]
    fn port_uniqueness() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (s0, _) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        let (s1, _) = table.alloc_slot(&host, [10, 0, 0, 2], 2).unwrap();
        assert_ne!(s0, s1);
        assert_eq!(table.local_port(s0).unwrap(), PORT_OFFSET + s0 as u16);
        assert_eq!(table.local_port(s1).unwrap(), PORT_OFFSET + s1 as u16);
    }

    #[test]
    fn table_full_when_exhausted() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        for n in 0..NCONN {
            table.alloc_slot(&host, [10, 0, 0, 1], n as u16).unwrap();
        }
        assert_eq!(
            table.alloc_slot(&host, [10, 0, 0, 1], 9999).unwrap_err(),
            NetError::TableFull
        );
    }

    #[test]
    fn close_frees_slot_for_reuse() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (i, _) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        table.close(&host, i).unwrap();
        assert!(!table.in_use(i));
        let (i2, _) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        assert_eq!(i, i2);
    }

    #[test]
    fn stale_generation_does_not_resolve() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (i, gen1) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        table.close(&host, i).unwrap();
        let (i2, gen2) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        assert_eq!(i, i2);
        assert_ne!(gen1, gen2);
        table.apply_arp_reply([10, 0, 0, 1], [1, 2, 3, 4, 5, 6]);
        assert!(!table.is_resolved(i, gen1));
        assert!(table.is_resolved(i, gen2));
    }

    #[test]
    fn byte_conservation_across_two_datagrams() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (i, gen) = table.alloc_slot(&host, [10, 0, 0, 1], 4444).unwrap();
        table.apply_arp_reply([10, 0, 0, 1], [1; 6]);
        assert!(table.is_resolved(i, gen));

        let port = table.local_port(i).unwrap();
        table.deliver_udp(port, b"hello").unwrap();
        table.deliver_udp(port, b"world").unwrap();

        let mut dst = [0u8; 32];
        let n = table.read(i, &mut dst).unwrap();
        assert_eq!(n, 10);
        assert_eq!(&dst[..10], b"helloworld");
    }

    #[test]
    fn read_slides_unread_tail() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (i, _) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        let port = table.local_port(i).unwrap();
        table.deliver_udp(port, b"abcdef").unwrap();

        let mut dst = [0u8; 3];
        assert_eq!(table.read(i, &mut dst).unwrap(), 3);
        assert_eq!(&dst, b"abc");

        let mut dst2 = [0u8; 3];
        assert_eq!(table.read(i, &mut dst2).unwrap(), 3);
        assert_eq!(&dst2, b"def");
    }

    #[test]
    fn overflow_truncates_at_page_size() {
        let host = StdHost::new();
        let mut table = ConnTable::new();
        let (i, _) = table.alloc_slot(&host, [10, 0, 0, 1], 1).unwrap();
        let port = table.local_port(i).unwrap();

        let first = alloc::vec![0xAAu8; 3000];
        let second = alloc::vec![0xBBu8; 2000];
        table.deliver_udp(port, &first).unwrap();
        table.deliver_udp(port, &second).unwrap();
        assert_eq!(table.rx_len(i).unwrap(), PAGE_SIZE);

        let mut dst = [0u8; 8192];
        assert_eq!(table.read(i, &mut dst).unwrap(), PAGE_SIZE);
    }
}
