//! IPv4 (RFC 791), fixed 20-byte header only: no options, ever.
//!
//! This stack neither computes nor verifies the header checksum — the NIC's
//! TCP/IP context descriptor does that on transmit (`e1000::tx_enqueue`), and
//! an inbound checksum is trusted as-is. `serialise_into` always writes zero
//! into the checksum field.

pub const HEADER_LEN: usize = 20;
pub const VERSION: u8 = 4;
pub const IHL_NO_OPTIONS: u8 = 5;
pub const PROTO_UDP: u8 = 17;
pub const DEFAULT_TTL: u8 = 64;

/// A parsed IPv4 header plus its payload. `payload` borrows from the input
/// buffer and is truncated to exactly `total_length - HEADER_LEN` bytes —
/// any trailing bytes beyond that (e.g. Ethernet padding) are not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Packet<'a> {
    pub ttl: u8,
    pub protocol: u8,
    pub src_ip: [u8; 4],
    pub dst_ip: [u8; 4],
    pub payload: &'a [u8],
}

impl<'a> Ipv4Packet<'a> {
    /// Parse an IPv4 header. Rejects anything that isn't version 4 with a
    /// 20-byte header (IHL != 5, i.e. any options) and anything whose
    /// `total_length` claims more bytes than were actually received —
    /// options and truncated headers are both treated as unparseable rather
    /// than partially handled.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }
        let version = data[0] >> 4;
        let ihl = data[0] & 0x0F;
        if version != VERSION || ihl != IHL_NO_OPTIONS {
            return None;
        }
        let total_length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if total_length < HEADER_LEN || total_length > data.len() {
            return None;
        }
        let ttl = data[8];
        let protocol = data[9];
        let src_ip = data[12..16].try_into().unwrap();
        let dst_ip = data[16..20].try_into().unwrap();

        Some(Ipv4Packet {
            ttl,
            protocol,
            src_ip,
            dst_ip,
            payload: &data[HEADER_LEN..total_length],
        })
    }

    /// Serialise a header plus `payload` into `out`, returning the number of
    /// bytes written. Always emits `id = 0`, `flags/frag_offset = 0`,
    /// `ttl = DEFAULT_TTL`, and `checksum = 0`; `out` must be at least
    /// `HEADER_LEN + payload.len()` bytes long.
    pub fn serialise_into(
        src_ip: &[u8; 4],
        dst_ip: &[u8; 4],
        protocol: u8,
        payload: &[u8],
        out: &mut [u8],
    ) -> usize {
        let total = HEADER_LEN + payload.len();
        assert!(out.len() >= total, "output buffer too small for IPv4 packet");

        out[0] = (VERSION << 4) | IHL_NO_OPTIONS;
        out[1] = 0; // DSCP/ECN, unused
        out[2..4].copy_from_slice(&(total as u16).to_be_bytes());
        out[4..6].copy_from_slice(&0u16.to_be_bytes()); // identification
        out[6..8].copy_from_slice(&0u16.to_be_bytes()); // flags + fragment offset
        out[8] = DEFAULT_TTL;
        out[9] = protocol;
        out[10..12].copy_from_slice(&0u16.to_be_bytes()); // checksum, NIC-offloaded
        out[12..16].copy_from_slice(src_ip);
        out[16..20].copy_from_slice(dst_ip);
        out[HEADER_LEN..total].copy_from_slice(payload);
        total
    }
}
