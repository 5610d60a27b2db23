//! Ethernet II framing (14-byte header: dst MAC, src MAC, ethertype).

/// Ethernet header size.
pub const HEADER_LEN: usize = 14;

/// Broadcast MAC address.
pub const BROADCAST_MAC: [u8; 6] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// EtherType for IPv4.
pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// EtherType for ARP.
pub const ETHERTYPE_ARP: u16 = 0x0806;
/// EtherType for IPv6 (recognised only so it can be dropped explicitly).
pub const ETHERTYPE_IPV6: u16 = 0x86DD;

/// A parsed Ethernet frame. `payload` borrows from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetFrame<'a> {
    pub dst_mac: [u8; 6],
    pub src_mac: [u8; 6],
    pub ethertype: u16,
    pub payload: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    /// Parse an Ethernet header. Total on any input of at least
    /// `HEADER_LEN` bytes.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }
        let dst_mac = data[0..6].try_into().unwrap();
        let src_mac = data[6..12].try_into().unwrap();
        let ethertype = u16::from_be_bytes([data[12], data[13]]);
        Some(EthernetFrame {
            dst_mac,
            src_mac,
            ethertype,
            payload: &data[HEADER_LEN..],
        })
    }

    /// Serialise a header plus `payload` into `out`, returning the number of
    /// bytes written. `out` must be at least `HEADER_LEN + payload.len()`
    /// bytes long.
    pub fn serialise_into(
        dst_mac: &[u8; 6],
        src_mac: &[u8; 6],
        ethertype: u16,
        payload: &[u8],
        out: &mut [u8],
    ) -> usize {
        let total = HEADER_LEN + payload.len();
        assert!(out.len() >= total, "output buffer too small for frame");
        out[0..6].copy_from_slice(dst_mac);
        out[6..12].copy_from_slice(src_mac);
        out[12..14].copy_from_slice(&ethertype.to_be_bytes());
        out[HEADER_LEN..total].copy_from_slice(payload);
        total
    }
}

/// Check if a MAC address is the broadcast address.
pub fn is_broadcast(mac: &[u8; 6]) -> bool {
    *mac == BROADCAST_MAC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dst = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        let src = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let payload = b"hello";
        let mut buf = [0u8; HEADER_LEN + 5];
        let n = EthernetFrame::serialise_into(&dst, &src, ETHERTYPE_IPV4, payload, &mut buf);
        assert_eq!(n, buf.len());

        let frame = EthernetFrame::parse(&buf).unwrap();
        assert_eq!(frame.dst_mac, dst);
        assert_eq!(frame.src_mac, src);
        assert_eq!(frame.ethertype, ETHERTYPE_IPV4);
        assert_eq!(frame.payload, payload);
    }

    #[test]
    fn too_short_is_none() {
        let buf = [0u8; HEADER_LEN - 1];
        assert!(EthernetFrame::parse(&buf).is_none());
    }

    #[test]
    fn broadcast_detection() {
        assert!(is_broadcast(&BROADCAST_MAC));
        assert!(!is_broadcast(&[1, 2, 3, 4, 5, 6]));
    }
}
