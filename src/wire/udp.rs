//! UDP (RFC 768): 8-byte header, no options.
//!
//! This stack never computes nor verifies the UDP checksum. `serialise_into`
//! always writes zero (valid per RFC 768, meaning "no checksum computed");
//! an inbound checksum field is ignored rather than checked.

pub const HEADER_LEN: usize = 8;

/// A parsed UDP header plus its payload. `payload` borrows from the input
/// buffer and is truncated to exactly `length - HEADER_LEN` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub payload: &'a [u8],
}

impl<'a> UdpDatagram<'a> {
    /// Parse a UDP header. Rejects anything whose `length` field claims
    /// more bytes than were actually received.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }
        let src_port = u16::from_be_bytes([data[0], data[1]]);
        let dst_port = u16::from_be_bytes([data[2], data[3]]);
        let length = u16::from_be_bytes([data[4], data[5]]) as usize;
        if length < HEADER_LEN || length > data.len() {
            return None;
        }

        Some(UdpDatagram {
            src_port,
            dst_port,
            payload: &data[HEADER_LEN..length],
        })
    }

    /// Serialise a header plus `payload` into `out`, returning the number of
    /// bytes written. `out` must be at least `HEADER_LEN + payload.len()`
    /// bytes long. Always emits `checksum = 0`.
    pub fn serialise_into(src_port: u16, dst_port: u16, payload: &[u8], out: &mut [u8]) -> usize {
        let total = HEADER_LEN + payload.len();
        assert!(out.len() >= total, "output buffer too small for UDP datagram");

        out[0..2].copy_from_slice(&src_port.to_be_bytes());
        out[2..4].copy_from_slice(&dst_port.to_be_bytes());
        out[4..6].copy_from_slice(&(total as u16).to_be_bytes());
        out[6..8].copy_from_slice(&0u16.to_be_bytes());
        out[HEADER_LEN..total].copy_from_slice(payload);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let payload = b"hello, world";
        let mut buf = [0u8; HEADER_LEN + 12];
        let n = UdpDatagram::serialise_into(3000, 7, payload, &mut buf);
        assert_eq!(n, buf.len());

        let dgram = UdpDatagram::parse(&buf).unwrap();
        assert_eq!(dgram.src_port, 3000);
        assert_eq!(dgram.dst_port, 7);
        assert_eq!(dgram.payload, payload);
    }

    #[test]
    fn checksum_always_zero() {
        let mut buf = [0u8; HEADER_LEN];
        UdpDatagram::serialise_into(1, 2, &[], &mut buf);
        assert_eq!(&buf[6..8], &[0, 0]);
    }

    #[test]
    fn rejects_truncated_length() {
        let mut buf = [0u8; HEADER_LEN + 4];
        UdpDatagram::serialise_into(1, 2, &[0; 4], &mut buf);
        buf[4..6].copy_from_slice(&1000u16.to_be_bytes());
        assert!(UdpDatagram::parse(&buf).is_none());
    }

    #[test]
    fn too_short_is_none() {
        let buf = [0u8; HEADER_LEN - 1];
        assert!(UdpDatagram::parse(&buf).is_none());
    }
}
